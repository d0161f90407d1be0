//! Read-through object cache
//!
//! Admission plugins never read the authoritative store. They read a local,
//! eventually consistent mirror through the lister traits below, and gate on
//! the mirror's "has synced" predicate.
//!
//! The traits are the boundary; `SharedInformers` is the in-memory
//! implementation used by the host binary and tests.

mod store;

pub use store::{Indexer, Keyed, SharedInformers};

use std::sync::Arc;

use crate::apis::{Pizza, Topping};

/// Synchronous readiness predicate
pub type ReadyFunc = Arc<dyn Fn() -> bool + Send + Sync>;

/// Lists mirrored pizzas
pub trait PizzaLister: Send + Sync {
    /// Every pizza in the mirror, unordered
    fn list(&self) -> Vec<Arc<Pizza>>;

    /// One pizza by `namespace/name` key
    fn get(&self, key: &str) -> Option<Arc<Pizza>>;
}

/// Lists mirrored toppings
pub trait ToppingLister: Send + Sync {
    fn list(&self) -> Vec<Arc<Topping>>;

    fn get(&self, key: &str) -> Option<Arc<Topping>>;
}

/// Source of listers and sync predicates for every restaurant kind.
///
/// Each lister and its predicate come from the same underlying mirror.
pub trait SharedInformerFactory: Send + Sync {
    fn pizza_lister(&self) -> Arc<dyn PizzaLister>;

    fn pizzas_synced(&self) -> ReadyFunc;

    fn topping_lister(&self) -> Arc<dyn ToppingLister>;

    fn toppings_synced(&self) -> ReadyFunc;
}
