//! Observable events
//!
//! Events are explicit and typed.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file parsed and validated
    ConfigLoaded,
    /// Object mirror populated from fixtures
    MirrorSynced,
    /// Ordered plugin chain constructed
    AdmissionChainBuilt,
    /// Every plugin passed its initialization check
    AdmissionInitialized,
    /// A plugin failed its initialization check
    AdmissionInitializationFailed,

    // Requests
    /// Write admitted by every plugin
    AdmissionAdmitted,
    /// Write rejected by a plugin
    AdmissionRejected,
    /// Object failed structural validation
    ObjectInvalid,
    /// Object re-encoded into another version
    ObjectConverted,
    /// Object could not be decoded or encoded
    ConversionFailed,

    // Server
    /// Request loop started
    ServingBegin,
    /// Request loop finished
    ServingComplete,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::MirrorSynced => "MIRROR_SYNCED",
            Event::AdmissionChainBuilt => "ADMISSION_CHAIN_BUILT",
            Event::AdmissionInitialized => "ADMISSION_INITIALIZED",
            Event::AdmissionInitializationFailed => "ADMISSION_INITIALIZATION_FAILED",
            Event::AdmissionAdmitted => "ADMISSION_ADMITTED",
            Event::AdmissionRejected => "ADMISSION_REJECTED",
            Event::ObjectInvalid => "OBJECT_INVALID",
            Event::ObjectConverted => "OBJECT_CONVERTED",
            Event::ConversionFailed => "CONVERSION_FAILED",
            Event::ServingBegin => "SERVING_BEGIN",
            Event::ServingComplete => "SERVING_COMPLETE",
        }
    }

    /// Whether the event ends the process
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::AdmissionInitializationFailed)
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
