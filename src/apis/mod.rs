//! Restaurant API types
//!
//! The `restaurant` module holds the canonical (internal) representation that
//! admission and storage operate on. Each wire schema version has its own
//! module with the client-facing shape of the same kinds.
//!
//! # Versions
//!
//! - `v1beta1`: pizzas carry toppings only, no size
//! - `v2alpha1`: pizzas carry size and toppings

mod meta;
pub mod restaurant;
pub mod v1beta1;
pub mod v2alpha1;
pub mod validation;

pub use meta::{ObjectMeta, TypeMeta};
pub use restaurant::{Pizza, PizzaSpec, PizzaTopping, RuntimeObject, Topping, ToppingSpec};

use std::fmt;

/// API group shared by every restaurant kind
pub const GROUP_NAME: &str = "restaurant.programming-kubernetes.info";

/// Kinds served by the restaurant API group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ResourceKind {
    /// A pizza order
    Pizza,
    /// A topping that pizzas may reference
    Topping,
}

impl ResourceKind {
    /// All kinds, in registration order
    pub const ALL: [ResourceKind; 2] = [ResourceKind::Pizza, ResourceKind::Topping];

    /// Returns the kind name as it appears in `kind` type metadata
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Pizza => "Pizza",
            ResourceKind::Topping => "Topping",
        }
    }

    /// Parses a kind name
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Pizza" => Some(ResourceKind::Pizza),
            "Topping" => Some(ResourceKind::Topping),
            _ => None,
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.as_str(), GROUP_NAME)
    }
}

/// Wire schema versions of the restaurant group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SchemaVersion {
    V1beta1,
    V2alpha1,
}

impl SchemaVersion {
    /// All served versions, oldest first
    pub const ALL: [SchemaVersion; 2] = [SchemaVersion::V1beta1, SchemaVersion::V2alpha1];

    /// Returns the bare version name
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaVersion::V1beta1 => "v1beta1",
            SchemaVersion::V2alpha1 => "v2alpha1",
        }
    }

    /// Returns the `apiVersion` string (`<group>/<version>`)
    pub fn api_version(&self) -> String {
        format!("{}/{}", GROUP_NAME, self.as_str())
    }

    /// Parses either a bare version (`v1beta1`) or a full `apiVersion`.
    pub fn parse(s: &str) -> Option<Self> {
        let version = match s.split_once('/') {
            Some((group, version)) if group == GROUP_NAME => version,
            Some(_) => return None,
            None => s,
        };
        match version {
            "v1beta1" => Some(SchemaVersion::V1beta1),
            "v2alpha1" => Some(SchemaVersion::V2alpha1),
            _ => None,
        }
    }
}

impl fmt::Display for SchemaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
