//! Request loop for `serve`
//!
//! Each request line is `{"operation": "...", "object": {...}}`. The object
//! is decoded, validated, run through the admission chain and, when
//! admitted, applied to the mirror, which stands in for the store. The
//! response carries the stored object in the version it was sent in.

use std::io::{BufRead, Write};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::admission::{
    AdmissionChain, AdmissionError, AdmissionRequest, Operation, Plugins, RestaurantInitializer,
};
use crate::apis::validation::{validate_object, FieldErrorList};
use crate::apis::{ResourceKind, RuntimeObject, SchemaVersion};
use crate::conversion::{ConversionError, Scheme};
use crate::informer::SharedInformers;
use crate::observability::{log_event, log_event_with_fields, Event, Logger, MetricsRegistry};

use super::config::{Config, Fixtures};
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, write_json};

/// A failed request, rendered as an error response
#[derive(Debug, Clone, PartialEq)]
pub struct RequestError {
    pub code: &'static str,
    pub http_status: u16,
    pub message: String,
    pub retryable: bool,
}

impl RequestError {
    fn new(code: &'static str, http_status: u16, message: impl Into<String>) -> Self {
        Self {
            code,
            http_status,
            message: message.into(),
            retryable: false,
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new("REQUEST_MALFORMED", 400, message)
    }

    pub fn invalid(errors: &FieldErrorList) -> Self {
        let details: Vec<String> = errors.iter().map(ToString::to_string).collect();
        Self::new("OBJECT_INVALID", 422, details.join("; "))
    }

    pub fn not_found(kind: ResourceKind, identity: &str) -> Self {
        Self::new("OBJECT_NOT_FOUND", 404, format!("{} \"{}\" not found", kind, identity))
    }

    pub fn already_exists(kind: ResourceKind, identity: &str) -> Self {
        Self::new(
            "OBJECT_ALREADY_EXISTS",
            409,
            format!("{} \"{}\" already exists", kind, identity),
        )
    }

    pub fn to_response(&self) -> Value {
        error_response(self.code, self.http_status, &self.message, self.retryable)
    }
}

impl From<AdmissionError> for RequestError {
    fn from(e: AdmissionError) -> Self {
        Self {
            code: e.code(),
            http_status: e.status_code(),
            message: e.to_string(),
            retryable: e.is_retryable(),
        }
    }
}

impl From<ConversionError> for RequestError {
    fn from(e: ConversionError) -> Self {
        Self::new(e.code(), e.status_code(), e.to_string())
    }
}

/// Booted server state
pub struct ApiServer {
    scheme: Scheme,
    informers: SharedInformers,
    chain: AdmissionChain,
    storage_version: SchemaVersion,
    metrics: Arc<MetricsRegistry>,
    resource_version: AtomicU64,
}

impl ApiServer {
    /// Boots from configuration, loading fixtures from disk
    pub fn boot(config: &Config) -> CliResult<Self> {
        let scheme = Scheme::restaurant().map_err(|e| CliError::boot_failed(e.to_string()))?;
        let fixtures = config.load_fixtures(&scheme)?;
        Self::assemble(config, scheme, fixtures)
    }

    /// Boots from configuration with fixtures already in hand
    pub fn with_fixtures(config: &Config, fixtures: Fixtures) -> CliResult<Self> {
        let scheme = Scheme::restaurant().map_err(|e| CliError::boot_failed(e.to_string()))?;
        Self::assemble(config, scheme, fixtures)
    }

    fn assemble(config: &Config, scheme: Scheme, fixtures: Fixtures) -> CliResult<Self> {
        config.validate()?;
        let storage_version = config.storage_version()?;

        let informers = SharedInformers::new();
        let (pizzas, toppings) = (fixtures.pizzas.len(), fixtures.toppings.len());
        if config.start_synced {
            informers.pizzas().replace(fixtures.pizzas);
            informers.toppings().replace(fixtures.toppings);
        } else {
            for pizza in fixtures.pizzas {
                informers.pizzas().upsert(pizza);
            }
            for topping in fixtures.toppings {
                informers.toppings().upsert(topping);
            }
        }
        log_event_with_fields(
            Event::MirrorSynced,
            &[
                ("pizzas", &pizzas.to_string()),
                ("synced", if config.start_synced { "true" } else { "false" }),
                ("toppings", &toppings.to_string()),
            ],
        );

        let metrics = Arc::new(MetricsRegistry::new());
        let initializer = RestaurantInitializer::new(Arc::new(informers.clone()));
        let plugins = Plugins::restaurant().map_err(|e| CliError::boot_failed(e.to_string()))?;
        let chain = plugins
            .new_chain(&config.admission_plugins, &[&initializer])
            .map_err(|e| CliError::boot_failed(e.to_string()))?
            .with_metrics(Arc::clone(&metrics));

        // Fatal: no request is served by an uninitialized chain
        chain
            .validate_initialization()
            .map_err(|e| CliError::boot_failed(e.to_string()))?;

        Ok(Self {
            scheme,
            informers,
            chain,
            storage_version,
            metrics,
            resource_version: AtomicU64::new(0),
        })
    }

    pub fn informers(&self) -> &SharedInformers {
        &self.informers
    }

    pub fn metrics(&self) -> &Arc<MetricsRegistry> {
        &self.metrics
    }

    pub fn chain(&self) -> &AdmissionChain {
        &self.chain
    }

    /// Reads request lines until EOF, writing one response line each
    pub fn serve<R: BufRead, W: Write>(&self, reader: R, writer: &mut W) -> CliResult<()> {
        log_event(Event::ServingBegin);

        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            let response = match serde_json::from_str::<Value>(&line) {
                Ok(request) => self.handle(request),
                Err(e) => RequestError::bad_request(format!("invalid JSON: {}", e)).to_response(),
            };
            write_json(writer, &response)?;
        }

        let snapshot = self.metrics.snapshot();
        log_event_with_fields(
            Event::ServingComplete,
            &[
                ("admitted", &snapshot.admitted.to_string()),
                ("rejected", &snapshot.rejected().to_string()),
                ("requests", &snapshot.admission_requests.to_string()),
            ],
        );
        Ok(())
    }

    /// Handles one request value, returning the response envelope
    pub fn handle(&self, request: Value) -> Value {
        match self.process(request) {
            Ok(data) => ok_response(data),
            Err(e) => e.to_response(),
        }
    }

    fn process(&self, request: Value) -> Result<Value, RequestError> {
        let op_name = request
            .get("operation")
            .and_then(Value::as_str)
            .ok_or_else(|| RequestError::bad_request("missing \"operation\""))?;
        let operation = Operation::parse(op_name)
            .ok_or_else(|| RequestError::bad_request(format!("unknown operation '{}'", op_name)))?;
        let wire = request
            .get("object")
            .cloned()
            .ok_or_else(|| RequestError::bad_request("missing \"object\""))?;

        let (version, mut object) = self.scheme.decode(wire).map_err(|e| self.conversion_failed(e))?;
        let kind = object.kind();
        let identity = object.metadata().key();
        let stored = self.stored(kind, &identity);

        if matches!(operation, Operation::Create | Operation::Update) {
            let errors = validate_object(&object);
            if !errors.is_empty() {
                self.metrics.increment_invalid_objects();
                let err = RequestError::invalid(&errors);
                Logger::warn(
                    Event::ObjectInvalid.as_str(),
                    &[("kind", kind.as_str()), ("message", &err.message), ("name", &identity)],
                );
                return Err(err);
            }
        }

        let mut admission = AdmissionRequest::new(operation, object.clone());
        if let Some(old) = stored.clone() {
            admission = admission.with_old_object(old);
        }
        self.chain.validate(&admission)?;

        match operation {
            Operation::Create => {
                if stored.is_some() {
                    return Err(RequestError::already_exists(kind, &identity));
                }
                let meta = object.metadata_mut();
                meta.stamp_server_fields();
                meta.resource_version = Some(self.next_resource_version());
                let persisted = self.persist(object)?;
                self.recode(&persisted, version)
            }
            Operation::Update => {
                let old = stored.ok_or_else(|| RequestError::not_found(kind, &identity))?;
                let meta = object.metadata_mut();
                meta.uid = old.metadata().uid;
                meta.creation_timestamp = old.metadata().creation_timestamp;
                meta.stamp_server_fields();
                meta.resource_version = Some(self.next_resource_version());
                let persisted = self.persist(object)?;
                self.recode(&persisted, version)
            }
            Operation::Delete => {
                let old = self
                    .remove(kind, &identity)
                    .ok_or_else(|| RequestError::not_found(kind, &identity))?;
                self.recode(&old, version)
            }
            Operation::Connect => self.recode(&object, version),
        }
    }

    /// Writes through the storage version, as the store would, then
    /// updates the mirror
    fn persist(&self, object: RuntimeObject) -> Result<RuntimeObject, RequestError> {
        let wire = self.recode(&object, self.storage_version)?;
        let (_, stored) = self.scheme.decode(wire).map_err(|e| self.conversion_failed(e))?;

        match &stored {
            RuntimeObject::Pizza(pizza) => self.informers.pizzas().upsert(pizza.clone()),
            RuntimeObject::Topping(topping) => self.informers.toppings().upsert(topping.clone()),
        }
        Ok(stored)
    }

    fn recode(&self, object: &RuntimeObject, version: SchemaVersion) -> Result<Value, RequestError> {
        let wire = self
            .scheme
            .encode(object, version)
            .map_err(|e| self.conversion_failed(e))?;
        self.metrics.increment_conversions();
        Logger::trace(
            Event::ObjectConverted.as_str(),
            &[
                ("kind", object.kind().as_str()),
                ("name", &object.metadata().key()),
                ("version", version.as_str()),
            ],
        );
        Ok(wire)
    }

    fn conversion_failed(&self, e: ConversionError) -> RequestError {
        self.metrics.increment_conversion_failures();
        let message = e.to_string();
        let fields = [("code", e.code()), ("message", message.as_str())];
        // 5xx means the scheme itself is broken, not the request
        if e.status_code() >= 500 {
            Logger::error(Event::ConversionFailed.as_str(), &fields);
        } else {
            Logger::warn(Event::ConversionFailed.as_str(), &fields);
        }
        e.into()
    }

    fn stored(&self, kind: ResourceKind, key: &str) -> Option<RuntimeObject> {
        match kind {
            ResourceKind::Pizza => self
                .informers
                .pizzas()
                .get(key)
                .map(|p| RuntimeObject::Pizza((*p).clone())),
            ResourceKind::Topping => self
                .informers
                .toppings()
                .get(key)
                .map(|t| RuntimeObject::Topping((*t).clone())),
        }
    }

    fn remove(&self, kind: ResourceKind, key: &str) -> Option<RuntimeObject> {
        match kind {
            ResourceKind::Pizza => self
                .informers
                .pizzas()
                .delete(key)
                .map(|p| RuntimeObject::Pizza((*p).clone())),
            ResourceKind::Topping => self
                .informers
                .toppings()
                .delete(key)
                .map(|t| RuntimeObject::Topping((*t).clone())),
        }
    }

    fn next_resource_version(&self) -> String {
        (self.resource_version.fetch_add(1, Ordering::Relaxed) + 1).to_string()
    }
}
