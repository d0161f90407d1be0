//! pizza-apiserver - admission control and version conversion for the
//! `restaurant.programming-kubernetes.info` API group
//!
//! - `apis`: canonical and versioned object types, validation
//! - `conversion`: per-version conversion functions and the `Scheme`
//! - `informer`: read-through object mirror and lister traits
//! - `admission`: plugin chain, dependency injection, `PizzaSize`
//! - `observability`: structured logs and counters
//! - `cli`: host binary commands

pub mod admission;
pub mod apis;
pub mod cli;
pub mod conversion;
pub mod informer;
pub mod observability;
