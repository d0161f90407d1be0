//! Operation filter and readiness gate shared by plugins

use std::collections::HashSet;
use std::fmt;

use crate::informer::ReadyFunc;

use super::attributes::Operation;

/// Reports whether the object mirror behind a plugin has synced.
///
/// Reports not ready until a predicate is injected. The predicate is a
/// plain synchronous check; the gate never waits.
#[derive(Default, Clone)]
pub struct ReadinessGate {
    ready_func: Option<ReadyFunc>,
}

impl ReadinessGate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs the sync predicate, replacing any previous one
    pub fn set_ready_func(&mut self, ready_func: ReadyFunc) {
        self.ready_func = Some(ready_func);
    }

    pub fn has_ready_func(&self) -> bool {
        self.ready_func.is_some()
    }

    pub fn is_ready(&self) -> bool {
        self.ready_func.as_ref().map_or(false, |f| f())
    }
}

impl fmt::Debug for ReadinessGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReadinessGate")
            .field("has_ready_func", &self.has_ready_func())
            .finish()
    }
}

/// Base state embedded by plugins: which operations they handle, and the
/// readiness gate.
#[derive(Debug, Clone)]
pub struct Handler {
    operations: HashSet<Operation>,
    gate: ReadinessGate,
}

impl Handler {
    /// Creates a handler for the given operations
    pub fn new(operations: &[Operation]) -> Self {
        Self {
            operations: operations.iter().copied().collect(),
            gate: ReadinessGate::new(),
        }
    }

    pub fn handles(&self, operation: Operation) -> bool {
        self.operations.contains(&operation)
    }

    pub fn set_ready_func(&mut self, ready_func: ReadyFunc) {
        self.gate.set_ready_func(ready_func);
    }

    pub fn is_ready(&self) -> bool {
        self.gate.is_ready()
    }
}
