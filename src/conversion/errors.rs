//! Codec errors for the generic decode/encode path
//!
//! The per-version conversion functions never fail. Everything here comes
//! from routing a JSON object to the right pair or from (de)serializing it.

use thiserror::Error;

use crate::apis::{ResourceKind, SchemaVersion};

/// Result type for scheme operations
pub type ConversionResult<T> = Result<T, ConversionError>;

#[derive(Debug, Error)]
pub enum ConversionError {
    /// `apiVersion` or `kind` is absent
    #[error("object is missing {0}")]
    MissingTypeMeta(&'static str),

    /// `apiVersion` names no served version
    #[error("unknown apiVersion: {0}")]
    UnknownVersion(String),

    /// `kind` names no restaurant kind
    #[error("unknown kind: {0}")]
    UnknownKind(String),

    /// No conversion pair registered for this version and kind
    #[error("no conversion registered for {kind} in {version}")]
    NotRegistered {
        version: SchemaVersion,
        kind: ResourceKind,
    },

    /// A pair was registered twice
    #[error("conversion for {kind} in {version} already registered")]
    AlreadyRegistered {
        version: SchemaVersion,
        kind: ResourceKind,
    },

    /// Object passed to an encoder of another kind
    #[error("cannot encode {actual} as {expected}")]
    KindMismatch {
        expected: ResourceKind,
        actual: ResourceKind,
    },

    /// JSON did not match the wire shape
    #[error("malformed {kind} object: {source}")]
    Malformed {
        kind: ResourceKind,
        #[source]
        source: serde_json::Error,
    },

    /// Serializing a wire object failed
    #[error("failed to encode object: {0}")]
    Encode(#[source] serde_json::Error),
}

impl ConversionError {
    /// Stable error code for responses and logs
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingTypeMeta(_) => "CONVERSION_MISSING_TYPE_META",
            Self::UnknownVersion(_) => "CONVERSION_UNKNOWN_VERSION",
            Self::UnknownKind(_) => "CONVERSION_UNKNOWN_KIND",
            Self::NotRegistered { .. } => "CONVERSION_NOT_REGISTERED",
            Self::AlreadyRegistered { .. } => "CONVERSION_ALREADY_REGISTERED",
            Self::KindMismatch { .. } => "CONVERSION_KIND_MISMATCH",
            Self::Malformed { .. } => "CONVERSION_MALFORMED_OBJECT",
            Self::Encode(_) => "CONVERSION_ENCODE_FAILED",
        }
    }

    /// HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self {
            Self::MissingTypeMeta(_)
            | Self::UnknownVersion(_)
            | Self::UnknownKind(_)
            | Self::Malformed { .. } => 400,
            Self::NotRegistered { .. } => 406,
            Self::AlreadyRegistered { .. } | Self::KindMismatch { .. } | Self::Encode(_) => 500,
        }
    }
}
