//! Conversion Invariant Tests
//!
//! - v2alpha1 round-trips every canonical object exactly
//! - v1beta1 always decodes to the fixed default size
//! - Topping lists keep order and (name, quantity) pairs
//! - v1beta1 round-trips every field it carries

use pizza_apiserver::apis::{
    v1beta1, ObjectMeta, Pizza, PizzaTopping, ResourceKind, RuntimeObject,
    SchemaVersion, Topping,
};
use pizza_apiserver::conversion::v1beta1::{
    convert_restaurant_pizza_spec_to_v1beta1_pizza_spec, convert_restaurant_pizza_to_v1beta1_pizza,
    convert_v1beta1_pizza_spec_to_restaurant_pizza_spec, convert_v1beta1_pizza_to_restaurant_pizza,
};
use pizza_apiserver::conversion::v2alpha1::{
    convert_restaurant_pizza_to_v2alpha1_pizza, convert_v2alpha1_pizza_to_restaurant_pizza,
};
use pizza_apiserver::conversion::{ConversionError, Scheme, DEFAULT_PIZZA_SIZE};
use serde_json::json;

// =============================================================================
// Helper Functions
// =============================================================================

fn topping_lists() -> Vec<Vec<PizzaTopping>> {
    vec![
        vec![],
        vec![PizzaTopping::new("mozzarella", 1)],
        vec![
            PizzaTopping::new("tomato", 1),
            PizzaTopping::new("mozzarella", 2),
            PizzaTopping::new("basil", 3),
            PizzaTopping::new("tomato", 4),
        ],
    ]
}

fn sizes() -> Vec<&'static str> {
    vec!["Small", "Medium", "Large", "", "family size"]
}

fn full_metadata(name: &str) -> ObjectMeta {
    let mut meta = ObjectMeta::named(name).in_namespace("kitchen");
    meta.stamp_server_fields();
    meta.resource_version = Some("42".to_string());
    meta.labels.insert("oven".to_string(), "wood".to_string());
    meta
}

// =============================================================================
// Round-trip through the size-carrying version
// =============================================================================

#[test]
fn test_v2alpha1_round_trip_is_identity() {
    for size in sizes() {
        for toppings in topping_lists() {
            let mut pizza = Pizza::new("p", size, toppings);
            pizza.metadata = full_metadata("p");

            let wire = convert_restaurant_pizza_to_v2alpha1_pizza(&pizza);
            assert_eq!(convert_v2alpha1_pizza_to_restaurant_pizza(&wire), pizza);
        }
    }
}

/// Same property through JSON and the scheme.
#[test]
fn test_v2alpha1_scheme_round_trip() {
    let scheme = Scheme::restaurant().unwrap();
    let mut pizza = Pizza::new("p", "Large", topping_lists().pop().unwrap());
    pizza.metadata = full_metadata("p");
    let object = RuntimeObject::Pizza(pizza);

    let wire = scheme.encode(&object, SchemaVersion::V2alpha1).unwrap();
    assert_eq!(
        wire["apiVersion"],
        "restaurant.programming-kubernetes.info/v2alpha1"
    );
    let (version, decoded) = scheme.decode(wire).unwrap();
    assert_eq!(version, SchemaVersion::V2alpha1);
    assert_eq!(decoded, object);
}

// =============================================================================
// Defaulting from the size-less version
// =============================================================================

#[test]
fn test_v1beta1_always_defaults_size() {
    assert_eq!(DEFAULT_PIZZA_SIZE, "Medium");

    for toppings in topping_lists() {
        let spec = v1beta1::PizzaSpec {
            toppings: toppings
                .iter()
                .map(|t| v1beta1::PizzaTopping {
                    name: t.name.clone(),
                    quantity: t.quantity,
                })
                .collect(),
        };
        assert_eq!(
            convert_v1beta1_pizza_spec_to_restaurant_pizza_spec(&spec).size,
            "Medium"
        );
    }
}

/// Canonical -> v1beta1 -> canonical replaces any size with the default.
#[test]
fn test_v1beta1_drops_then_defaults_size() {
    for size in sizes() {
        let pizza = Pizza::new("p", size, vec![PizzaTopping::new("ham", 1)]);
        let back =
            convert_v1beta1_pizza_to_restaurant_pizza(&convert_restaurant_pizza_to_v1beta1_pizza(&pizza));
        assert_eq!(back.spec.size, DEFAULT_PIZZA_SIZE);
        assert_eq!(back.spec.toppings, pizza.spec.toppings);
    }
}

/// A stray `size` in v1beta1 JSON is ignored, not honored.
#[test]
fn test_v1beta1_json_size_ignored() {
    let scheme = Scheme::restaurant().unwrap();
    let (_, object) = scheme
        .decode(json!({
            "apiVersion": "restaurant.programming-kubernetes.info/v1beta1",
            "kind": "Pizza",
            "metadata": {"name": "p"},
            "spec": {"size": "Huge", "toppings": []}
        }))
        .unwrap();
    assert_eq!(object.as_pizza().unwrap().spec.size, "Medium");
}

// =============================================================================
// List fidelity
// =============================================================================

#[test]
fn test_topping_lists_preserved_both_directions() {
    for toppings in topping_lists() {
        let canonical = Pizza::new("p", "Small", toppings.clone()).spec;

        let wire = convert_restaurant_pizza_spec_to_v1beta1_pizza_spec(&canonical);
        let pairs: Vec<(String, i64)> = wire
            .toppings
            .iter()
            .map(|t| (t.name.clone(), t.quantity))
            .collect();
        let expected: Vec<(String, i64)> = toppings
            .iter()
            .map(|t| (t.name.clone(), t.quantity))
            .collect();
        assert_eq!(pairs, expected);

        let back = convert_v1beta1_pizza_spec_to_restaurant_pizza_spec(&wire);
        assert_eq!(back.toppings, toppings);

        let v2 = convert_restaurant_pizza_to_v2alpha1_pizza(&Pizza::new("p", "S", toppings.clone()));
        assert_eq!(v2.spec.toppings.len(), toppings.len());
        for (wire_top, top) in v2.spec.toppings.iter().zip(&toppings) {
            assert_eq!(wire_top.name, top.name);
            assert_eq!(wire_top.quantity, top.quantity);
        }
    }
}

// =============================================================================
// Round-trip of carried fields through v1beta1
// =============================================================================

#[test]
fn test_v1beta1_wire_round_trip_is_identity() {
    let scheme = Scheme::restaurant().unwrap();
    let wire = json!({
        "apiVersion": "restaurant.programming-kubernetes.info/v1beta1",
        "kind": "Pizza",
        "metadata": {"name": "p", "namespace": "kitchen", "labels": {"oven": "wood"}},
        "spec": {"toppings": [{"name": "ham", "quantity": 2}, {"name": "egg", "quantity": 1}]}
    });

    let converted = scheme.convert(wire.clone(), SchemaVersion::V1beta1).unwrap();
    assert_eq!(converted, wire);

    let typed: v1beta1::Pizza = serde_json::from_value(converted).unwrap();
    assert_eq!(typed.metadata.labels.get("oven").map(String::as_str), Some("wood"));
}

/// Toppings carry every field in both versions.
#[test]
fn test_topping_round_trip_both_versions() {
    let scheme = Scheme::restaurant().unwrap();
    let mut topping = Topping::new("ham", 1.25);
    topping.metadata = full_metadata("ham");
    let object = RuntimeObject::Topping(topping);

    for version in SchemaVersion::ALL {
        let wire = scheme.encode(&object, version).unwrap();
        assert_eq!(wire["kind"], "Topping");
        let (_, back) = scheme.decode(wire).unwrap();
        assert_eq!(back, object);
    }
}

// =============================================================================
// Scheme errors
// =============================================================================

#[test]
fn test_scheme_rejects_unknown_type_meta() {
    let scheme = Scheme::restaurant().unwrap();

    let err = scheme
        .decode(json!({"apiVersion": "restaurant.programming-kubernetes.info/v9", "kind": "Pizza"}))
        .unwrap_err();
    assert!(matches!(err, ConversionError::UnknownVersion(_)));

    let err = scheme
        .decode(json!({"apiVersion": "restaurant.programming-kubernetes.info/v1beta1", "kind": "Calzone"}))
        .unwrap_err();
    assert!(matches!(err, ConversionError::UnknownKind(_)));

    let err = scheme
        .decode(json!({"apiVersion": "restaurant.programming-kubernetes.info/v2alpha1", "kind": "Pizza", "spec": {"size": 7}}))
        .unwrap_err();
    assert_eq!(err.code(), "CONVERSION_MALFORMED_OBJECT");
}

#[test]
fn test_every_kind_registered_in_every_version() {
    let scheme = Scheme::restaurant().unwrap();
    for kind in ResourceKind::ALL {
        assert_eq!(scheme.versions_for(kind), SchemaVersion::ALL.to_vec());
    }
}
