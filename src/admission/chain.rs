//! Plugin table and ordered admission chain
//!
//! `Plugins` is an ordinary value the host builds at startup, registers
//! plugins into, and turns into an `AdmissionChain`. There is no
//! process-wide registry.

use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use std::sync::Arc;

use crate::observability::{log_event_with_fields, Event, Logger, MetricsRegistry};

use super::attributes::AdmissionRequest;
use super::errors::{AdmissionError, AdmissionResult};
use super::initializer::PluginInitializer;
use super::interfaces::AdmissionPlugin;

/// Plugin constructor. The configuration reader is accepted for shape
/// compatibility; restaurant plugins ignore it.
pub type PluginFactory = fn(Option<&mut dyn Read>) -> AdmissionResult<Box<dyn AdmissionPlugin>>;

/// Name to constructor table
#[derive(Default)]
pub struct Plugins {
    factories: BTreeMap<String, PluginFactory>,
}

impl Plugins {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table holding every restaurant plugin
    pub fn restaurant() -> AdmissionResult<Self> {
        let mut plugins = Self::new();
        super::plugin::register_all(&mut plugins)?;
        Ok(plugins)
    }

    /// Registers a constructor under a name.
    ///
    /// # Errors
    ///
    /// `DuplicatePlugin` if the name is taken.
    pub fn register(&mut self, name: &str, factory: PluginFactory) -> AdmissionResult<()> {
        if self.factories.contains_key(name) {
            return Err(AdmissionError::DuplicatePlugin(name.to_string()));
        }
        self.factories.insert(name.to_string(), factory);
        Ok(())
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered names, sorted
    pub fn registered(&self) -> Vec<&str> {
        self.factories.keys().map(String::as_str).collect()
    }

    /// Constructs one plugin by name
    pub fn new_from_plugin(
        &self,
        name: &str,
        config: Option<&mut dyn Read>,
    ) -> AdmissionResult<Box<dyn AdmissionPlugin>> {
        let factory = self
            .factories
            .get(name)
            .ok_or_else(|| AdmissionError::UnknownPlugin(name.to_string()))?;
        factory(config)
    }

    /// Builds the chain in the given order and runs every initializer on
    /// each plugin.
    ///
    /// The initialization check is left to the caller so that it can run
    /// it as a distinct startup step; see `AdmissionChain::validate_initialization`.
    pub fn new_chain<S: AsRef<str>>(
        &self,
        names: &[S],
        initializers: &[&dyn PluginInitializer],
    ) -> AdmissionResult<AdmissionChain> {
        let mut seen = HashSet::new();
        let mut plugins = Vec::with_capacity(names.len());

        for name in names {
            let name = name.as_ref();
            if !seen.insert(name) {
                return Err(AdmissionError::DuplicatePlugin(name.to_string()));
            }

            let mut plugin = self.new_from_plugin(name, None)?;
            for initializer in initializers {
                initializer.initialize(plugin.as_mut());
            }
            plugins.push(plugin);
        }

        let chain = AdmissionChain::new(plugins);
        log_event_with_fields(
            Event::AdmissionChainBuilt,
            &[("plugins", &chain.plugin_names().join(","))],
        );
        Ok(chain)
    }
}

/// Ordered validating plugins
pub struct AdmissionChain {
    plugins: Vec<Box<dyn AdmissionPlugin>>,
    metrics: Arc<MetricsRegistry>,
}

impl AdmissionChain {
    /// Creates a chain with its own metrics
    pub fn new(plugins: Vec<Box<dyn AdmissionPlugin>>) -> Self {
        Self {
            plugins,
            metrics: Arc::new(MetricsRegistry::new()),
        }
    }

    /// Reports into a shared metrics registry
    pub fn with_metrics(mut self, metrics: Arc<MetricsRegistry>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    /// Plugin names in chain order
    pub fn plugin_names(&self) -> Vec<&'static str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Fails on the first plugin whose dependencies were never injected.
    ///
    /// Must pass before the host serves traffic.
    pub fn validate_initialization(&self) -> AdmissionResult<()> {
        for plugin in &self.plugins {
            if let Err(err) = plugin.validate_initialization() {
                log_event_with_fields(
                    Event::AdmissionInitializationFailed,
                    &[("plugin", plugin.name()), ("reason", &err.to_string())],
                );
                return Err(err);
            }
        }
        log_event_with_fields(
            Event::AdmissionInitialized,
            &[("plugins", &self.plugin_names().join(","))],
        );
        Ok(())
    }

    /// Runs every plugin that handles the request's operation, in order.
    /// The first rejection wins.
    pub fn validate(&self, request: &AdmissionRequest) -> AdmissionResult<()> {
        self.metrics.increment_admission_requests();
        let identity = request.identity();

        for plugin in &self.plugins {
            if !plugin.handles(request.operation()) {
                continue;
            }
            if let Err(err) = plugin.validate(request) {
                self.metrics.record_rejection(&err);
                Logger::warn(
                    Event::AdmissionRejected.as_str(),
                    &[
                        ("code", err.code()),
                        ("kind", request.kind().as_str()),
                        ("message", &err.to_string()),
                        ("name", &identity),
                        ("operation", request.operation().as_str()),
                        ("plugin", plugin.name()),
                        ("retryable", if err.is_retryable() { "true" } else { "false" }),
                    ],
                );
                return Err(err);
            }
        }

        self.metrics.increment_admitted();
        Logger::info(
            Event::AdmissionAdmitted.as_str(),
            &[
                ("kind", request.kind().as_str()),
                ("name", &identity),
                ("operation", request.operation().as_str()),
            ],
        );
        Ok(())
    }
}
