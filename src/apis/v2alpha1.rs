//! `v2alpha1` wire shapes
//!
//! Pizzas in this version carry their size, so conversion is lossless.

use serde::{Deserialize, Serialize};

use super::meta::{ObjectMeta, TypeMeta};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Pizza {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: PizzaSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PizzaSpec {
    #[serde(default)]
    pub size: String,
    #[serde(default)]
    pub toppings: Vec<PizzaTopping>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PizzaTopping {
    pub name: String,
    pub quantity: i64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Topping {
    #[serde(flatten)]
    pub type_meta: TypeMeta,
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub spec: ToppingSpec,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ToppingSpec {
    #[serde(default)]
    pub cost: f64,
}
