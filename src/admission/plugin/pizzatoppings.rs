//! `PizzaToppings`: pizzas may only use toppings that exist
//!
//! Toppings are cluster-scoped and looked up by name in the topping mirror.

use std::io::Read;
use std::sync::Arc;

use crate::apis::RuntimeObject;
use crate::informer::{SharedInformerFactory, ToppingLister};

use crate::admission::{
    AdmissionError, AdmissionPlugin, AdmissionRequest, AdmissionResult, Handler, Operation,
    Plugins, WantsRestaurantInformerFactory,
};

/// Registry name
pub const PLUGIN_NAME: &str = "PizzaToppings";

pub fn register(plugins: &mut Plugins) -> AdmissionResult<()> {
    plugins.register(PLUGIN_NAME, new_plugin)
}

fn new_plugin(_config: Option<&mut dyn Read>) -> AdmissionResult<Box<dyn AdmissionPlugin>> {
    Ok(Box::new(PizzaToppingsPlugin::new()))
}

pub struct PizzaToppingsPlugin {
    handler: Handler,
    topping_lister: Option<Arc<dyn ToppingLister>>,
}

impl PizzaToppingsPlugin {
    pub fn new() -> Self {
        Self {
            handler: Handler::new(&[Operation::Create, Operation::Update]),
            topping_lister: None,
        }
    }
}

impl Default for PizzaToppingsPlugin {
    fn default() -> Self {
        Self::new()
    }
}

impl AdmissionPlugin for PizzaToppingsPlugin {
    fn name(&self) -> &'static str {
        PLUGIN_NAME
    }

    fn handles(&self, operation: Operation) -> bool {
        self.handler.handles(operation)
    }

    fn validate(&self, request: &AdmissionRequest) -> AdmissionResult<()> {
        let pizza = match request.object() {
            RuntimeObject::Pizza(pizza) => pizza,
            _ => return Ok(()),
        };

        let lister = match &self.topping_lister {
            Some(lister) if self.handler.is_ready() => lister,
            _ => {
                return Err(AdmissionError::NotReady {
                    kind: request.kind(),
                    name: request.identity(),
                })
            }
        };

        if let Some(missing) = pizza
            .spec
            .toppings
            .iter()
            .find(|top| lister.get(&top.name).is_none())
        {
            return Err(AdmissionError::UnknownTopping {
                kind: request.kind(),
                name: request.identity(),
                topping: missing.name.clone(),
            });
        }

        Ok(())
    }

    fn validate_initialization(&self) -> AdmissionResult<()> {
        if self.topping_lister.is_none() {
            return Err(AdmissionError::Uninitialized {
                plugin: PLUGIN_NAME.to_string(),
                reason: "missing topping lister".to_string(),
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

impl WantsRestaurantInformerFactory for PizzaToppingsPlugin {
    fn set_restaurant_informer_factory(&mut self, factory: &dyn SharedInformerFactory) {
        self.topping_lister = Some(factory.topping_lister());
        self.handler.set_ready_func(factory.toppings_synced());
    }
}
