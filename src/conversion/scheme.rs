//! Conversion registry
//!
//! A `Scheme` maps each (wire version, kind) pair to the functions that move
//! an object between that wire shape and the canonical representation. The
//! generic decode and encode paths look pairs up here, so adding a version
//! means adding a module and registering it, nothing else.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::apis::{ResourceKind, RuntimeObject, SchemaVersion};

use super::errors::{ConversionError, ConversionResult};

/// A wire type that converts to and from the canonical representation.
pub trait VersionedObject: Serialize + DeserializeOwned {
    /// Version this shape belongs to
    const VERSION: SchemaVersion;
    /// Kind this shape carries
    const KIND: ResourceKind;

    /// Converts to the canonical object
    fn to_internal(&self) -> RuntimeObject;

    /// Converts from the canonical object, `None` if it is another kind
    fn from_internal(obj: &RuntimeObject) -> Option<Self>;
}

/// Registry key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ConversionKey {
    pub version: SchemaVersion,
    pub kind: ResourceKind,
}

/// The two directions registered for one key
#[derive(Clone, Copy)]
pub struct ConversionFuncs {
    /// Wire JSON to canonical
    pub to_internal: fn(Value) -> ConversionResult<RuntimeObject>,
    /// Canonical to wire JSON
    pub from_internal: fn(&RuntimeObject) -> ConversionResult<Value>,
}

impl ConversionFuncs {
    /// Builds the pair for a wire type
    pub fn of<T: VersionedObject>() -> Self {
        Self {
            to_internal: decode_wire::<T>,
            from_internal: encode_wire::<T>,
        }
    }
}

fn decode_wire<T: VersionedObject>(value: Value) -> ConversionResult<RuntimeObject> {
    let wire: T = serde_json::from_value(value).map_err(|source| ConversionError::Malformed {
        kind: T::KIND,
        source,
    })?;
    Ok(wire.to_internal())
}

fn encode_wire<T: VersionedObject>(obj: &RuntimeObject) -> ConversionResult<Value> {
    let wire = T::from_internal(obj).ok_or(ConversionError::KindMismatch {
        expected: T::KIND,
        actual: obj.kind(),
    })?;
    serde_json::to_value(&wire).map_err(ConversionError::Encode)
}

/// Conversion registry for the restaurant group
#[derive(Default)]
pub struct Scheme {
    conversions: HashMap<ConversionKey, ConversionFuncs>,
}

impl Scheme {
    /// Creates an empty scheme
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a scheme with every served version registered
    pub fn restaurant() -> ConversionResult<Self> {
        let mut scheme = Self::new();
        super::v1beta1::add_conversion_funcs(&mut scheme)?;
        super::v2alpha1::add_conversion_funcs(&mut scheme)?;
        Ok(scheme)
    }

    /// Registers the conversion pair for a wire type.
    ///
    /// # Errors
    ///
    /// `AlreadyRegistered` if the (version, kind) pair is taken.
    pub fn add_conversion_funcs<T: VersionedObject>(&mut self) -> ConversionResult<()> {
        let key = ConversionKey {
            version: T::VERSION,
            kind: T::KIND,
        };
        if self.conversions.contains_key(&key) {
            return Err(ConversionError::AlreadyRegistered {
                version: key.version,
                kind: key.kind,
            });
        }
        self.conversions.insert(key, ConversionFuncs::of::<T>());
        Ok(())
    }

    /// Whether a pair exists for this version and kind
    pub fn is_registered(&self, version: SchemaVersion, kind: ResourceKind) -> bool {
        self.conversions.contains_key(&ConversionKey { version, kind })
    }

    /// Versions a kind can be served in, oldest first
    pub fn versions_for(&self, kind: ResourceKind) -> Vec<SchemaVersion> {
        SchemaVersion::ALL
            .into_iter()
            .filter(|v| self.is_registered(*v, kind))
            .collect()
    }

    fn lookup(&self, version: SchemaVersion, kind: ResourceKind) -> ConversionResult<&ConversionFuncs> {
        self.conversions
            .get(&ConversionKey { version, kind })
            .ok_or(ConversionError::NotRegistered { version, kind })
    }

    /// Decodes a wire object into its canonical form.
    ///
    /// The version and kind are read from `apiVersion` and `kind`.
    pub fn decode(&self, value: Value) -> ConversionResult<(SchemaVersion, RuntimeObject)> {
        let api_version = value
            .get("apiVersion")
            .and_then(Value::as_str)
            .ok_or(ConversionError::MissingTypeMeta("apiVersion"))?;
        let kind_name = value
            .get("kind")
            .and_then(Value::as_str)
            .ok_or(ConversionError::MissingTypeMeta("kind"))?;

        let version = SchemaVersion::parse(api_version)
            .ok_or_else(|| ConversionError::UnknownVersion(api_version.to_string()))?;
        let kind = ResourceKind::parse(kind_name)
            .ok_or_else(|| ConversionError::UnknownKind(kind_name.to_string()))?;

        let funcs = self.lookup(version, kind)?;
        let object = (funcs.to_internal)(value)?;
        Ok((version, object))
    }

    /// Encodes a canonical object in the given wire version
    pub fn encode(&self, obj: &RuntimeObject, version: SchemaVersion) -> ConversionResult<Value> {
        let funcs = self.lookup(version, obj.kind())?;
        (funcs.from_internal)(obj)
    }

    /// Re-encodes a wire object in another version, through the canonical form
    pub fn convert(&self, value: Value, to: SchemaVersion) -> ConversionResult<Value> {
        let (_, object) = self.decode(value)?;
        self.encode(&object, to)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::apis::{v1beta1, Pizza, PizzaTopping};
    use serde_json::json;

    #[test]
    fn test_restaurant_scheme_registers_all_pairs() {
        let scheme = Scheme::restaurant().unwrap();
        for kind in ResourceKind::ALL {
            assert_eq!(scheme.versions_for(kind), SchemaVersion::ALL.to_vec());
        }
    }

    #[test]
    fn test_duplicate_registration_rejected() {
        let mut scheme = Scheme::new();
        scheme.add_conversion_funcs::<v1beta1::Pizza>().unwrap();
        let err = scheme.add_conversion_funcs::<v1beta1::Pizza>().unwrap_err();

        assert_eq!(err.code(), "CONVERSION_ALREADY_REGISTERED");
    }

    #[test]
    fn test_decode_routes_on_type_meta() {
        let scheme = Scheme::restaurant().unwrap();
        let (version, obj) = scheme
            .decode(json!({
                "apiVersion": "restaurant.programming-kubernetes.info/v2alpha1",
                "kind": "Pizza",
                "metadata": {"name": "diavola"},
                "spec": {"size": "Large", "toppings": [{"name": "salami", "quantity": 3}]}
            }))
            .unwrap();

        assert_eq!(version, SchemaVersion::V2alpha1);
        assert_eq!(
            obj,
            RuntimeObject::Pizza(Pizza::new("diavola", "Large", vec![PizzaTopping::new("salami", 3)]))
        );
    }

    #[test]
    fn test_decode_errors() {
        let scheme = Scheme::restaurant().unwrap();

        let err = scheme.decode(json!({"kind": "Pizza"})).unwrap_err();
        assert!(matches!(err, ConversionError::MissingTypeMeta("apiVersion")));

        let err = scheme
            .decode(json!({"apiVersion": "restaurant.programming-kubernetes.info/v3", "kind": "Pizza"}))
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnknownVersion(_)));

        let err = scheme
            .decode(json!({"apiVersion": "v1beta1", "kind": "Calzone"}))
            .unwrap_err();
        assert!(matches!(err, ConversionError::UnknownKind(_)));

        let err = scheme
            .decode(json!({"apiVersion": "v1beta1", "kind": "Pizza", "spec": {"toppings": "cheese"}}))
            .unwrap_err();
        assert!(matches!(err, ConversionError::Malformed { kind: ResourceKind::Pizza, .. }));
    }

    #[test]
    fn test_empty_scheme_reports_not_registered() {
        let scheme = Scheme::new();
        let obj = RuntimeObject::Pizza(Pizza::new("p", "Small", vec![]));
        let err = scheme.encode(&obj, SchemaVersion::V1beta1).unwrap_err();

        assert!(matches!(err, ConversionError::NotRegistered { .. }));
    }

    #[test]
    fn test_encoder_rejects_other_kind() {
        let funcs = ConversionFuncs::of::<v1beta1::Pizza>();
        let topping = RuntimeObject::Topping(crate::apis::Topping::new("ham", 1.0));
        let err = (funcs.from_internal)(&topping).unwrap_err();

        assert!(matches!(
            err,
            ConversionError::KindMismatch {
                expected: ResourceKind::Pizza,
                actual: ResourceKind::Topping
            }
        ));
    }

    #[test]
    fn test_convert_down_to_v1beta1_drops_size() {
        let scheme = Scheme::restaurant().unwrap();
        let out = scheme
            .convert(
                json!({
                    "apiVersion": "restaurant.programming-kubernetes.info/v2alpha1",
                    "kind": "Pizza",
                    "metadata": {"name": "p"},
                    "spec": {"size": "Small", "toppings": []}
                }),
                SchemaVersion::V1beta1,
            )
            .unwrap();

        assert_eq!(out["apiVersion"], "restaurant.programming-kubernetes.info/v1beta1");
        assert!(out["spec"].get("size").is_none());
    }
}
