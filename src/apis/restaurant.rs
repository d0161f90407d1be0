//! Canonical (internal) restaurant types
//!
//! Every wire version converts to and from these shapes. Admission plugins
//! and the object mirror only ever see canonical objects.

use serde::{Deserialize, Serialize};

use super::meta::ObjectMeta;
use super::ResourceKind;

/// A pizza order
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pizza {
    pub metadata: ObjectMeta,
    pub spec: PizzaSpec,
}

/// Desired state of a pizza
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PizzaSpec {
    /// Size class. At most one pizza may hold each size.
    pub size: String,
    /// Ordered toppings with their quantities
    #[serde(default)]
    pub toppings: Vec<PizzaTopping>,
}

/// One topping entry of a pizza
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaTopping {
    /// Name of a Topping object
    pub name: String,
    /// How many portions of it
    pub quantity: i64,
}

impl PizzaTopping {
    pub fn new(name: impl Into<String>, quantity: i64) -> Self {
        Self {
            name: name.into(),
            quantity,
        }
    }
}

impl Pizza {
    /// Creates a pizza with the given name, size and toppings
    pub fn new(name: impl Into<String>, size: impl Into<String>, toppings: Vec<PizzaTopping>) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            spec: PizzaSpec {
                size: size.into(),
                toppings,
            },
        }
    }
}

/// A topping that pizzas may reference by name
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Topping {
    pub metadata: ObjectMeta,
    pub spec: ToppingSpec,
}

/// Desired state of a topping
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToppingSpec {
    /// Price per portion
    pub cost: f64,
}

impl Topping {
    pub fn new(name: impl Into<String>, cost: f64) -> Self {
        Self {
            metadata: ObjectMeta::named(name),
            spec: ToppingSpec { cost },
        }
    }
}

/// Any canonical restaurant object.
///
/// The variant is the kind: consumers match on it instead of inspecting a
/// separate kind tag and casting.
#[derive(Debug, Clone, PartialEq)]
pub enum RuntimeObject {
    Pizza(Pizza),
    Topping(Topping),
}

impl RuntimeObject {
    /// Kind of the wrapped object
    pub fn kind(&self) -> ResourceKind {
        match self {
            RuntimeObject::Pizza(_) => ResourceKind::Pizza,
            RuntimeObject::Topping(_) => ResourceKind::Topping,
        }
    }

    /// Metadata of the wrapped object
    pub fn metadata(&self) -> &ObjectMeta {
        match self {
            RuntimeObject::Pizza(p) => &p.metadata,
            RuntimeObject::Topping(t) => &t.metadata,
        }
    }

    /// Mutable metadata of the wrapped object
    pub fn metadata_mut(&mut self) -> &mut ObjectMeta {
        match self {
            RuntimeObject::Pizza(p) => &mut p.metadata,
            RuntimeObject::Topping(t) => &mut t.metadata,
        }
    }

    /// Returns the pizza if this is one
    pub fn as_pizza(&self) -> Option<&Pizza> {
        match self {
            RuntimeObject::Pizza(p) => Some(p),
            _ => None,
        }
    }

    /// Returns the topping if this is one
    pub fn as_topping(&self) -> Option<&Topping> {
        match self {
            RuntimeObject::Topping(t) => Some(t),
            _ => None,
        }
    }
}

impl From<Pizza> for RuntimeObject {
    fn from(p: Pizza) -> Self {
        RuntimeObject::Pizza(p)
    }
}

impl From<Topping> for RuntimeObject {
    fn from(t: Topping) -> Self {
        RuntimeObject::Topping(t)
    }
}
