//! Plugin interface

use super::attributes::{AdmissionRequest, Operation};
use super::errors::AdmissionResult;
use super::initializer::WantsRestaurantInformerFactory;

/// A validating admission plugin.
///
/// `validate` is only called for operations the plugin `handles`; the chain
/// filters the rest. Plugins must accept kinds they do not govern.
pub trait AdmissionPlugin: Send + Sync {
    /// Name the plugin is registered under
    fn name(&self) -> &'static str;

    /// Whether the plugin wants to see this operation
    fn handles(&self, operation: Operation) -> bool;

    /// Accepts (`Ok`) or rejects the request
    fn validate(&self, request: &AdmissionRequest) -> AdmissionResult<()>;

    /// Fails when required dependencies were never injected.
    ///
    /// Called once at startup, before any request.
    fn validate_initialization(&self) -> AdmissionResult<()> {
        Ok(())
    }

    /// Returns the plugin as an informer-factory consumer, if it is one
    fn as_wants_restaurant_informer_factory(
        &mut self,
    ) -> Option<&mut dyn WantsRestaurantInformerFactory> {
        None
    }
}
