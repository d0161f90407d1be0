//! Admission request attributes

use std::fmt;

use crate::apis::{ResourceKind, RuntimeObject};

/// Write operation being admitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Create,
    Update,
    Delete,
    Connect,
}

impl Operation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Create => "CREATE",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Connect => "CONNECT",
        }
    }

    /// Parses an operation name, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CREATE" => Some(Operation::Create),
            "UPDATE" => Some(Operation::Update),
            "DELETE" => Some(Operation::Delete),
            "CONNECT" => Some(Operation::Connect),
            _ => None,
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One attempted write, alive for a single admission pass
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    operation: Operation,
    object: RuntimeObject,
    old_object: Option<RuntimeObject>,
}

impl AdmissionRequest {
    pub fn new(operation: Operation, object: impl Into<RuntimeObject>) -> Self {
        Self {
            operation,
            object: object.into(),
            old_object: None,
        }
    }

    /// Shorthand for a create request
    pub fn create(object: impl Into<RuntimeObject>) -> Self {
        Self::new(Operation::Create, object)
    }

    /// Shorthand for an update request
    pub fn update(object: impl Into<RuntimeObject>) -> Self {
        Self::new(Operation::Update, object)
    }

    /// Attaches the currently stored object (updates and deletes)
    pub fn with_old_object(mut self, old: impl Into<RuntimeObject>) -> Self {
        self.old_object = Some(old.into());
        self
    }

    pub fn operation(&self) -> Operation {
        self.operation
    }

    /// Kind of the incoming object
    pub fn kind(&self) -> ResourceKind {
        self.object.kind()
    }

    pub fn object(&self) -> &RuntimeObject {
        &self.object
    }

    pub fn old_object(&self) -> Option<&RuntimeObject> {
        self.old_object.as_ref()
    }

    pub fn name(&self) -> &str {
        &self.object.metadata().name
    }

    pub fn namespace(&self) -> Option<&str> {
        self.object.metadata().namespace.as_deref()
    }

    /// `namespace/name` of the incoming object, for error messages and logs
    pub fn identity(&self) -> String {
        self.object.metadata().key()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::{ObjectMeta, Pizza, Topping};

    #[test]
    fn test_operation_parse() {
        assert_eq!(Operation::parse("create"), Some(Operation::Create));
        assert_eq!(Operation::parse("UPDATE"), Some(Operation::Update));
        assert_eq!(Operation::parse("patch"), None);
    }

    #[test]
    fn test_request_kind_and_identity_come_from_object() {
        let mut pizza = Pizza::new("margherita", "Small", vec![]);
        pizza.metadata = ObjectMeta::named("margherita").in_namespace("kitchen");

        let req = AdmissionRequest::create(pizza);
        assert_eq!(req.kind(), ResourceKind::Pizza);
        assert_eq!(req.identity(), "kitchen/margherita");
        assert_eq!(req.namespace(), Some("kitchen"));

        let req = AdmissionRequest::update(Topping::new("ham", 1.0))
            .with_old_object(Topping::new("ham", 0.5));
        assert_eq!(req.kind(), ResourceKind::Topping);
        assert_eq!(req.operation(), Operation::Update);
        assert!(req.old_object().is_some());
    }
}
