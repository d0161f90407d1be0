//! Admission plugins for the restaurant group

pub mod pizzasize;
pub mod pizzatoppings;

pub use pizzasize::PizzaSizePlugin;
pub use pizzatoppings::PizzaToppingsPlugin;

use crate::admission::{AdmissionResult, Plugins};

/// Default chain order
pub const DEFAULT_PLUGIN_ORDER: [&str; 2] = [pizzasize::PLUGIN_NAME, pizzatoppings::PLUGIN_NAME];

/// Registers every restaurant plugin
pub fn register_all(plugins: &mut Plugins) -> AdmissionResult<()> {
    pizzasize::register(plugins)?;
    pizzatoppings::register(plugins)?;
    Ok(())
}
