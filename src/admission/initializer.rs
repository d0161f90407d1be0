//! Dependency injection for plugins
//!
//! Plugins that read the object mirror implement
//! `WantsRestaurantInformerFactory`. The `RestaurantInitializer` walks a
//! freshly built plugin and hands it the shared factory if it asks for one.

use std::sync::Arc;

use crate::informer::SharedInformerFactory;

use super::interfaces::AdmissionPlugin;

/// Implemented by plugins that need listers from the restaurant mirror
pub trait WantsRestaurantInformerFactory {
    /// Wires the plugin's listers and readiness predicate to the factory
    fn set_restaurant_informer_factory(&mut self, factory: &dyn SharedInformerFactory);
}

/// Applies host-provided dependencies to a plugin after construction
pub trait PluginInitializer {
    fn initialize(&self, plugin: &mut dyn AdmissionPlugin);
}

/// Injects the restaurant informer factory
#[derive(Clone)]
pub struct RestaurantInitializer {
    factory: Arc<dyn SharedInformerFactory>,
}

impl RestaurantInitializer {
    pub fn new(factory: Arc<dyn SharedInformerFactory>) -> Self {
        Self { factory }
    }
}

impl PluginInitializer for RestaurantInitializer {
    fn initialize(&self, plugin: &mut dyn AdmissionPlugin) {
        if let Some(wants) = plugin.as_wants_restaurant_informer_factory() {
            wants.set_restaurant_informer_factory(self.factory.as_ref());
        }
    }
}
