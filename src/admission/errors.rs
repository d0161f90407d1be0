//! Admission error types
//!
//! Error codes:
//! - ADMISSION_NOT_READY (REJECT, retryable)
//! - ADMISSION_SIZE_CONFLICT (REJECT)
//! - ADMISSION_UNKNOWN_TOPPING (REJECT)
//! - ADMISSION_UNINITIALIZED (FATAL)
//! - ADMISSION_UNKNOWN_PLUGIN (FATAL)
//! - ADMISSION_DUPLICATE_PLUGIN (FATAL)

use std::fmt;

use thiserror::Error;

use crate::apis::ResourceKind;

/// Result type for admission operations
pub type AdmissionResult<T> = Result<T, AdmissionError>;

/// Severity of an admission error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The write is refused; the server keeps running
    Reject,
    /// The server must not serve traffic with this chain
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Reject => write!(f, "REJECT"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AdmissionError {
    /// The object mirror has not finished its first sync
    #[error("{kind} \"{name}\" is forbidden: not yet ready to handle request")]
    NotReady { kind: ResourceKind, name: String },

    /// Another pizza already holds the requested size
    #[error("{kind} \"{name}\" is forbidden: size already present: {size}")]
    SizeConflict {
        kind: ResourceKind,
        name: String,
        size: String,
        /// Key of the pizza holding the size
        existing: String,
    },

    /// The pizza references a topping with no Topping object
    #[error("{kind} \"{name}\" is forbidden: unknown topping: {topping}")]
    UnknownTopping {
        kind: ResourceKind,
        name: String,
        topping: String,
    },

    /// A plugin's dependencies were never injected
    #[error("admission plugin \"{plugin}\" is not initialized: {reason}")]
    Uninitialized { plugin: String, reason: String },

    /// A chain names a plugin nobody registered
    #[error("unknown admission plugin: {0}")]
    UnknownPlugin(String),

    /// A plugin name was registered or listed twice
    #[error("admission plugin \"{0}\" registered twice")]
    DuplicatePlugin(String),
}

impl AdmissionError {
    /// Stable error code
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotReady { .. } => "ADMISSION_NOT_READY",
            Self::SizeConflict { .. } => "ADMISSION_SIZE_CONFLICT",
            Self::UnknownTopping { .. } => "ADMISSION_UNKNOWN_TOPPING",
            Self::Uninitialized { .. } => "ADMISSION_UNINITIALIZED",
            Self::UnknownPlugin(_) => "ADMISSION_UNKNOWN_PLUGIN",
            Self::DuplicatePlugin(_) => "ADMISSION_DUPLICATE_PLUGIN",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            Self::NotReady { .. } | Self::SizeConflict { .. } | Self::UnknownTopping { .. } => {
                Severity::Reject
            }
            Self::Uninitialized { .. } | Self::UnknownPlugin(_) | Self::DuplicatePlugin(_) => {
                Severity::Fatal
            }
        }
    }

    /// HTTP status code equivalent
    pub fn status_code(&self) -> u16 {
        match self.severity() {
            Severity::Reject => 403,
            Severity::Fatal => 500,
        }
    }

    /// Whether resubmitting the same object later may succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::NotReady { .. })
    }

    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn conflict() -> AdmissionError {
        AdmissionError::SizeConflict {
            kind: ResourceKind::Pizza,
            name: "kitchen/diavola".into(),
            size: "S".into(),
            existing: "kitchen/margherita".into(),
        }
    }

    #[test]
    fn test_only_not_ready_is_retryable() {
        let not_ready = AdmissionError::NotReady {
            kind: ResourceKind::Pizza,
            name: "p".into(),
        };
        assert!(not_ready.is_retryable());
        assert!(!conflict().is_retryable());
    }

    #[test]
    fn test_conflict_message_names_value_and_request() {
        let msg = conflict().to_string();
        assert!(msg.contains("size already present: S"));
        assert!(msg.contains("kitchen/diavola"));
        assert!(msg.contains("Pizza.restaurant.programming-kubernetes.info"));
    }

    #[test]
    fn test_severity_and_status() {
        assert_eq!(conflict().severity(), Severity::Reject);
        assert_eq!(conflict().status_code(), 403);

        let uninit = AdmissionError::Uninitialized {
            plugin: "PizzaSize".into(),
            reason: "missing pizza lister".into(),
        };
        assert!(uninit.is_fatal());
        assert_eq!(uninit.status_code(), 500);
        assert_eq!(uninit.code(), "ADMISSION_UNINITIALIZED");
    }
}
