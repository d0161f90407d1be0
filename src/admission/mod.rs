//! Admission control for restaurant writes
//!
//! A write passes through an ordered chain of validating plugins before it
//! is persisted. Plugins are built from a `Plugins` table, receive their
//! dependencies from `PluginInitializer`s, and must pass an initialization
//! check before the host serves traffic.
//!
//! Plugins decide against an eventually consistent mirror of stored
//! objects. Their guarantees are best-effort: two concurrent writes can
//! both be admitted.

mod attributes;
mod chain;
mod errors;
mod handler;
mod initializer;
mod interfaces;
pub mod plugin;

pub use attributes::{AdmissionRequest, Operation};
pub use chain::{AdmissionChain, PluginFactory, Plugins};
pub use errors::{AdmissionError, AdmissionResult, Severity};
pub use handler::{Handler, ReadinessGate};
pub use initializer::{PluginInitializer, RestaurantInitializer, WantsRestaurantInformerFactory};
pub use interfaces::AdmissionPlugin;
pub use plugin::{PizzaSizePlugin, PizzaToppingsPlugin, DEFAULT_PLUGIN_ORDER};
