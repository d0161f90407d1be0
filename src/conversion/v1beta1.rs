//! Conversions between `v1beta1` and the canonical types
//!
//! `v1beta1` pizzas have no size: decoding injects [`DEFAULT_PIZZA_SIZE`],
//! encoding drops whatever size the canonical pizza holds.

use crate::apis::{restaurant, v1beta1, ResourceKind, RuntimeObject, SchemaVersion, TypeMeta};

use super::errors::ConversionResult;
use super::scheme::{Scheme, VersionedObject};

/// Size given to every pizza decoded from `v1beta1`
pub const DEFAULT_PIZZA_SIZE: &str = "Medium";

/// Registers the `v1beta1` conversion pairs with the scheme.
pub fn add_conversion_funcs(scheme: &mut Scheme) -> ConversionResult<()> {
    scheme.add_conversion_funcs::<v1beta1::Pizza>()?;
    scheme.add_conversion_funcs::<v1beta1::Topping>()?;
    Ok(())
}

pub fn convert_v1beta1_pizza_spec_to_restaurant_pizza_spec(
    input: &v1beta1::PizzaSpec,
) -> restaurant::PizzaSpec {
    restaurant::PizzaSpec {
        size: DEFAULT_PIZZA_SIZE.to_string(),
        toppings: input
            .toppings
            .iter()
            .map(|top| restaurant::PizzaTopping {
                name: top.name.clone(),
                quantity: top.quantity,
            })
            .collect(),
    }
}

pub fn convert_restaurant_pizza_spec_to_v1beta1_pizza_spec(
    input: &restaurant::PizzaSpec,
) -> v1beta1::PizzaSpec {
    v1beta1::PizzaSpec {
        toppings: input
            .toppings
            .iter()
            .map(|top| v1beta1::PizzaTopping {
                name: top.name.clone(),
                quantity: top.quantity,
            })
            .collect(),
    }
}

pub fn convert_v1beta1_pizza_to_restaurant_pizza(input: &v1beta1::Pizza) -> restaurant::Pizza {
    restaurant::Pizza {
        metadata: input.metadata.clone(),
        spec: convert_v1beta1_pizza_spec_to_restaurant_pizza_spec(&input.spec),
    }
}

pub fn convert_restaurant_pizza_to_v1beta1_pizza(input: &restaurant::Pizza) -> v1beta1::Pizza {
    v1beta1::Pizza {
        type_meta: type_meta(ResourceKind::Pizza),
        metadata: input.metadata.clone(),
        spec: convert_restaurant_pizza_spec_to_v1beta1_pizza_spec(&input.spec),
    }
}

pub fn convert_v1beta1_topping_to_restaurant_topping(
    input: &v1beta1::Topping,
) -> restaurant::Topping {
    restaurant::Topping {
        metadata: input.metadata.clone(),
        spec: restaurant::ToppingSpec {
            cost: input.spec.cost,
        },
    }
}

pub fn convert_restaurant_topping_to_v1beta1_topping(
    input: &restaurant::Topping,
) -> v1beta1::Topping {
    v1beta1::Topping {
        type_meta: type_meta(ResourceKind::Topping),
        metadata: input.metadata.clone(),
        spec: v1beta1::ToppingSpec {
            cost: input.spec.cost,
        },
    }
}

fn type_meta(kind: ResourceKind) -> TypeMeta {
    TypeMeta {
        api_version: SchemaVersion::V1beta1.api_version(),
        kind: kind.as_str().to_string(),
    }
}

impl VersionedObject for v1beta1::Pizza {
    const VERSION: SchemaVersion = SchemaVersion::V1beta1;
    const KIND: ResourceKind = ResourceKind::Pizza;

    fn to_internal(&self) -> RuntimeObject {
        RuntimeObject::Pizza(convert_v1beta1_pizza_to_restaurant_pizza(self))
    }

    fn from_internal(obj: &RuntimeObject) -> Option<Self> {
        obj.as_pizza().map(convert_restaurant_pizza_to_v1beta1_pizza)
    }
}

impl VersionedObject for v1beta1::Topping {
    const VERSION: SchemaVersion = SchemaVersion::V1beta1;
    const KIND: ResourceKind = ResourceKind::Topping;

    fn to_internal(&self) -> RuntimeObject {
        RuntimeObject::Topping(convert_v1beta1_topping_to_restaurant_topping(self))
    }

    fn from_internal(obj: &RuntimeObject) -> Option<Self> {
        obj.as_topping().map(convert_restaurant_topping_to_v1beta1_topping)
    }
}
