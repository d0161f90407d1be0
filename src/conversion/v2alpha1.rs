//! Conversions between `v2alpha1` and the canonical types
//!
//! `v2alpha1` carries every canonical field, so both directions are lossless.

use crate::apis::{restaurant, v2alpha1, ResourceKind, RuntimeObject, SchemaVersion, TypeMeta};

use super::errors::ConversionResult;
use super::scheme::{Scheme, VersionedObject};

/// Registers the `v2alpha1` conversion pairs with the scheme.
pub fn add_conversion_funcs(scheme: &mut Scheme) -> ConversionResult<()> {
    scheme.add_conversion_funcs::<v2alpha1::Pizza>()?;
    scheme.add_conversion_funcs::<v2alpha1::Topping>()?;
    Ok(())
}

pub fn convert_v2alpha1_pizza_spec_to_restaurant_pizza_spec(
    input: &v2alpha1::PizzaSpec,
) -> restaurant::PizzaSpec {
    restaurant::PizzaSpec {
        size: input.size.clone(),
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

pub fn convert_restaurant_pizza_spec_to_v2alpha1_pizza_spec(
    input: &restaurant::PizzaSpec,
) -> v2alpha1::PizzaSpec {
    v2alpha1::PizzaSpec {
        size: input.size.clone(),
        toppings: input
            .toppings
            .iter()
            .map(|top| v2alpha1::PizzaTopping {
                name: top.name.clone(),
                quantity: top.quantity,
            })
            .collect(),
    }
}

pub fn convert_v2alpha1_pizza_to_restaurant_pizza(input: &v2alpha1::Pizza) -> restaurant::Pizza {
    restaurant::Pizza {
        metadata: input.metadata.clone(),
        spec: convert_v2alpha1_pizza_spec_to_restaurant_pizza_spec(&input.spec),
    }
}

pub fn convert_restaurant_pizza_to_v2alpha1_pizza(input: &restaurant::Pizza) -> v2alpha1::Pizza {
    v2alpha1::Pizza {
        type_meta: type_meta(ResourceKind::Pizza),
        metadata: input.metadata.clone(),
        spec: convert_restaurant_pizza_spec_to_v2alpha1_pizza_spec(&input.spec),
    }
}

pub fn convert_v2alpha1_topping_to_restaurant_topping(
    input: &v2alpha1::Topping,
) -> restaurant::Topping {
    restaurant::Topping {
        metadata: input.metadata.clone(),
        spec: restaurant::ToppingSpec {
            cost: input.spec.cost,
        },
    }
}

pub fn convert_restaurant_topping_to_v2alpha1_topping(
    input: &restaurant::Topping,
) -> v2alpha1::Topping {
    v2alpha1::Topping {
        type_meta: type_meta(ResourceKind::Topping),
        metadata: input.metadata.clone(),
        spec: v2alpha1::ToppingSpec {
            cost: input.spec.cost,
        },
    }
}

fn type_meta(kind: ResourceKind) -> TypeMeta {
    TypeMeta {
        api_version: SchemaVersion::V2alpha1.api_version(),
        kind: kind.as_str().to_string(),
    }
}

impl VersionedObject for v2alpha1::Pizza {
    const VERSION: SchemaVersion = SchemaVersion::V2alpha1;
    const KIND: ResourceKind = ResourceKind::Pizza;

    fn to_internal(&self) -> RuntimeObject {
        RuntimeObject::Pizza(convert_v2alpha1_pizza_to_restaurant_pizza(self))
    }

    fn from_internal(obj: &RuntimeObject) -> Option<Self> {
        obj.as_pizza().map(convert_restaurant_pizza_to_v2alpha1_pizza)
    }
}

impl VersionedObject for v2alpha1::Topping {
    const VERSION: SchemaVersion = SchemaVersion::V2alpha1;
    const KIND: ResourceKind = ResourceKind::Topping;

    fn to_internal(&self) -> RuntimeObject {
        RuntimeObject::Topping(convert_v2alpha1_topping_to_restaurant_topping(self))
    }

    fn from_internal(obj: &RuntimeObject) -> Option<Self> {
        obj.as_topping().map(convert_restaurant_topping_to_v2alpha1_topping)
    }
}
