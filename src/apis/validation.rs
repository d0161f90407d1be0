//! Structural validation of canonical restaurant objects
//!
//! Runs before admission. Conversion never rejects input, so malformed
//! values (empty names, non-positive quantities) are caught here instead.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use super::restaurant::{Pizza, RuntimeObject, Topping};
use super::ObjectMeta;

/// Longest object name accepted
pub const MAX_NAME_LENGTH: usize = 253;

const DNS1123_SUBDOMAIN: &str = r"^[a-z0-9]([-a-z0-9]*[a-z0-9])?(\.[a-z0-9]([-a-z0-9]*[a-z0-9])?)*$";

fn dns1123_subdomain() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(DNS1123_SUBDOMAIN).expect("DNS-1123 pattern is valid"))
}

/// What is wrong with a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorType {
    Required,
    Invalid,
    TooLong,
    Forbidden,
}

impl FieldErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorType::Required => "Required value",
            FieldErrorType::Invalid => "Invalid value",
            FieldErrorType::TooLong => "Too long",
            FieldErrorType::Forbidden => "Forbidden",
        }
    }
}

impl fmt::Display for FieldErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A single validation failure at a field path
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {error_type}: {detail}")]
pub struct FieldError {
    /// Dotted field path, e.g. `spec.toppings[1].quantity`
    pub field: String,
    pub error_type: FieldErrorType,
    pub detail: String,
}

impl FieldError {
    fn required(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error_type: FieldErrorType::Required,
            detail: detail.into(),
        }
    }

    fn invalid(field: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            error_type: FieldErrorType::Invalid,
            detail: detail.into(),
        }
    }
}

/// All errors found in one object
pub type FieldErrorList = Vec<FieldError>;

/// Validates any canonical object
pub fn validate_object(obj: &RuntimeObject) -> FieldErrorList {
    match obj {
        RuntimeObject::Pizza(p) => validate_pizza(p),
        RuntimeObject::Topping(t) => validate_topping(t),
    }
}

/// Validates a pizza: name, size, and every topping entry.
pub fn validate_pizza(pizza: &Pizza) -> FieldErrorList {
    let mut errs = validate_object_meta(&pizza.metadata);

    if pizza.spec.size.is_empty() {
        errs.push(FieldError::required("spec.size", "size must be set"));
    }

    for (i, topping) in pizza.spec.toppings.iter().enumerate() {
        if topping.name.is_empty() {
            errs.push(FieldError::required(
                format!("spec.toppings[{}].name", i),
                "topping name must be set",
            ));
        }
        if topping.quantity <= 0 {
            errs.push(FieldError::invalid(
                format!("spec.toppings[{}].quantity", i),
                format!("{}: must be positive", topping.quantity),
            ));
        }
    }

    errs
}

/// Validates a topping. Toppings are cluster-scoped: pizzas name them
/// without a namespace.
pub fn validate_topping(topping: &Topping) -> FieldErrorList {
    let mut errs = validate_object_meta(&topping.metadata);

    if let Some(namespace) = topping.metadata.namespace.as_deref() {
        if !namespace.is_empty() {
            errs.push(FieldError {
                field: "metadata.namespace".into(),
                error_type: FieldErrorType::Forbidden,
                detail: format!("{}: toppings are cluster-scoped", namespace),
            });
        }
    }

    if !topping.spec.cost.is_finite() || topping.spec.cost < 0.0 {
        errs.push(FieldError::invalid(
            "spec.cost",
            format!("{}: must be a non-negative number", topping.spec.cost),
        ));
    }

    errs
}

fn validate_object_meta(meta: &ObjectMeta) -> FieldErrorList {
    let mut errs = Vec::new();

    if meta.name.is_empty() {
        errs.push(FieldError::required("metadata.name", "name or generateName is required"));
    } else if meta.name.len() > MAX_NAME_LENGTH {
        errs.push(FieldError {
            field: "metadata.name".into(),
            error_type: FieldErrorType::TooLong,
            detail: format!("must be no more than {} characters", MAX_NAME_LENGTH),
        });
    } else if !dns1123_subdomain().is_match(&meta.name) {
        errs.push(FieldError::invalid(
            "metadata.name",
            format!("{:?}: must be a lowercase RFC 1123 subdomain", meta.name),
        ));
    }

    errs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::PizzaTopping;

    #[test]
    fn test_valid_pizza_has_no_errors() {
        let pizza = Pizza::new(
            "margherita",
            "Medium",
            vec![PizzaTopping::new("mozzarella", 2), PizzaTopping::new("tomato", 1)],
        );
        assert!(validate_pizza(&pizza).is_empty());
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        let pizza = Pizza::new(
            "p",
            "Small",
            vec![PizzaTopping::new("salami", 1), PizzaTopping::new("ham", 0)],
        );
        let errs = validate_pizza(&pizza);

        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "spec.toppings[1].quantity");
        assert_eq!(errs[0].error_type, FieldErrorType::Invalid);
    }

    #[test]
    fn test_empty_size_and_topping_name_reported_together() {
        let pizza = Pizza::new("p", "", vec![PizzaTopping::new("", 1)]);
        let fields: Vec<_> = validate_pizza(&pizza).into_iter().map(|e| e.field).collect();

        assert_eq!(fields, vec!["spec.size", "spec.toppings[0].name"]);
    }

    #[test]
    fn test_name_rules() {
        assert_eq!(
            validate_pizza(&Pizza::new("", "S", vec![]))[0].error_type,
            FieldErrorType::Required
        );
        assert_eq!(
            validate_pizza(&Pizza::new("Margherita", "S", vec![]))[0].error_type,
            FieldErrorType::Invalid
        );
        assert_eq!(
            validate_pizza(&Pizza::new("a".repeat(254), "S", vec![]))[0].error_type,
            FieldErrorType::TooLong
        );
        assert!(validate_pizza(&Pizza::new("quattro.formaggi-2", "S", vec![])).is_empty());
    }

    #[test]
    fn test_negative_topping_cost_rejected() {
        assert_eq!(validate_topping(&Topping::new("cheese", -1.0)).len(), 1);
        assert!(validate_topping(&Topping::new("cheese", 0.0)).is_empty());
    }

    #[test]
    fn test_namespaced_topping_rejected() {
        let mut topping = Topping::new("ham", 1.0);
        topping.metadata = ObjectMeta::named("ham").in_namespace("kitchen");

        let errs = validate_topping(&topping);
        assert_eq!(errs.len(), 1);
        assert_eq!(errs[0].field, "metadata.namespace");
        assert_eq!(errs[0].error_type, FieldErrorType::Forbidden);

        topping.metadata.namespace = Some(String::new());
        assert!(validate_topping(&topping).is_empty());
    }

    #[test]
    fn test_dns1123_pattern_compiles() {
        assert!(Regex::new(DNS1123_SUBDOMAIN).is_ok());
        assert!(dns1123_subdomain().is_match("margherita"));
    }

    #[test]
    fn test_field_error_display() {
        let err = FieldError::invalid("spec.cost", "-1: must be a non-negative number");
        assert_eq!(
            err.to_string(),
            "spec.cost: Invalid value: -1: must be a non-negative number"
        );
    }
}
