//! `PizzaSize`: at most one pizza per size
//!
//! The check scans the local pizza mirror, not the authoritative store, so
//! it is a best-effort filter. Two concurrent creates for the same size can
//! both pass before either reaches the mirror; a hard guarantee needs a
//! unique constraint in the store behind this plugin.
//!
//! The scan does not skip the incoming pizza's own stored copy, so an update
//! that keeps a pizza's size is rejected as a conflict with itself.

use std::io::Read;
use std::sync::Arc;

use crate::apis::RuntimeObject;
use crate::informer::{PizzaLister, SharedInformerFactory};

use crate::admission::{
    AdmissionError, AdmissionPlugin, AdmissionRequest, AdmissionResult, Handler, Operation,
    Plugins, WantsRestaurantInformerFactory,
};

/// Registry name
pub const PLUGIN_NAME: &str = "PizzaSize";

/// Registers the plugin. The constructor ignores its configuration.
pub fn register(plugins: &mut Plugins) -> AdmissionResult<()> {
    plugins.register(PLUGIN_NAME, new_plugin)
}

fn new_plugin(_config: Option<&mut dyn Read>) -> AdmissionResult<Box<dyn AdmissionPlugin>> {
    Ok(Box::new(PizzaSizePlugin::new()))
}

pub struct PizzaSizePlugin {
    handler: Handler,
    pizza_lister: Option<Arc<dyn PizzaLister>>,
}

impl PizzaSizePlugin {
    /// Creates an uninitialized plugin handling creates and updates
    pub fn new() -> Self {
        Self {
            handler: Handler::new(&[Operation::Create, Operation::Update]),
            pizza_lister: None,
        }
    }

    /// Whether the pizza mirror has completed its first sync
    pub fn is_ready(&self) -> bool {
        self.handler.is_ready()
    }
}

impl Default for PizzaSizePlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionPlugin for PizzaSizePlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }

    fn validate(&self, request: &AdmissionRequest) -> AdmissionResult<()> {
        // only pizzas
        let pizza = match request.object() {
            RuntimeObject::Pizza(pizza) => pizza,
            _ => return Ok(()),
        };

        let lister = match &self.pizza_lister {
            Some(lister) if self.handler.is_ready() => lister,
            _ => {
                return Err(AdmissionError::NotReady {
                    kind: request.kind(),
                    name: request.identity(),
                })
            }
        };

        for existing in lister.list() {
            if existing.spec.size == pizza.spec.size {
                return Err(AdmissionError::SizeConflict {
                    kind: request.kind(),
                    name: request.identity(),
                    size: existing.spec.size.clone(),
                    existing: existing.metadata.key(),
                });
            }
        }

        Ok(())
    }

    fn validate_initialization(&self) -> AdmissionResult<()> {
        if self.pizza_lister.is_none() {
            return Err(AdmissionError::Uninitialized {
                plugin: PLUGIN_NAME.to_string(),
                reason: "missing pizza lister".to_string(),
            });
        }
        Ok(())
    }

    fn as_wants_restaurant_informer_factory(
        &mut self,
    ) -> Option<&mut dyn WantsRestaurantInformerFactory> {
        Some(self)
    }
}

impl WantsRestaurantInformerFactory for PizzaSizePlugin {
    fn set_restaurant_informer_factory(&mut self, factory: &dyn SharedInformerFactory) {
        self.pizza_lister = Some(factory.pizza_lister());
        self.handler.set_ready_func(factory.pizzas_synced());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::{Pizza, Topping};
    use crate::informer::SharedInformers;

    fn initialized(existing: Vec<Pizza>) -> (SharedInformers, PizzaSizePlugin) {
        let informers = SharedInformers::new();
        informers.pizzas().replace(existing);
        let mut plugin = PizzaSizePlugin::new();
        plugin.set_restaurant_informer_factory(&informers);
        (informers, plugin)
    }

    #[test]
    fn test_accepts_free_size() {
        let (_informers, plugin) = initialized(vec![
            Pizza::new("a", "S", vec![]),
            Pizza::new("b", "M", vec![]),
        ]);

        assert!(plugin.validate(&AdmissionRequest::create(Pizza::new("c", "L", vec![]))).is_ok());
    }

    #[test]
    fn test_rejects_taken_size() {
        let (_informers, plugin) = initialized(vec![
            Pizza::new("a", "S", vec![]),
            Pizza::new("b", "M", vec![]),
        ]);

        let err = plugin
            .validate(&AdmissionRequest::create(Pizza::new("c", "S", vec![])))
            .unwrap_err();
        assert_eq!(
            err,
            AdmissionError::SizeConflict {
                kind: crate::apis::ResourceKind::Pizza,
                name: "c".into(),
                size: "S".into(),
                existing: "a".into(),
            }
        );
    }

    #[test]
    fn test_update_keeping_size_conflicts_with_itself() {
        let (_informers, plugin) = initialized(vec![Pizza::new("a", "S", vec![])]);

        let req = AdmissionRequest::update(Pizza::new("a", "S", vec![]))
            .with_old_object(Pizza::new("a", "S", vec![]));
        assert!(matches!(
            plugin.validate(&req),
            Err(AdmissionError::SizeConflict { .. })
        ));
    }

    #[test]
    fn test_uninitialized_plugin() {
        let plugin = PizzaSizePlugin::new();

        assert!(plugin.validate_initialization().is_err());
        assert!(!plugin.is_ready());
        let err = plugin
            .validate(&AdmissionRequest::create(Pizza::new("a", "S", vec![])))
            .unwrap_err();
        assert_eq!(err.code(), "ADMISSION_NOT_READY");
    }

    #[test]
    fn test_not_ready_until_sync() {
        let informers = SharedInformers::new();
        let mut plugin = PizzaSizePlugin::new();
        plugin.set_restaurant_informer_factory(&informers);

        assert!(plugin.validate_initialization().is_ok());
        let req = AdmissionRequest::create(Pizza::new("a", "S", vec![]));
        assert!(plugin.validate(&req).unwrap_err().is_retryable());

        informers.pizzas().replace(vec![]);
        assert!(plugin.validate(&req).is_ok());
    }

    #[test]
    fn test_toppings_pass_through_even_when_not_ready() {
        let plugin = PizzaSizePlugin::new();
        assert!(plugin
            .validate(&AdmissionRequest::create(Topping::new("ham", 1.0)))
            .is_ok());
    }

    #[test]
    fn test_handles_only_create_and_update() {
        let plugin = PizzaSizePlugin::new();
        assert!(plugin.handles(Operation::Create));
        assert!(plugin.handles(Operation::Update));
        assert!(!plugin.handles(Operation::Delete));
        assert!(!plugin.handles(Operation::Connect));
    }
}
