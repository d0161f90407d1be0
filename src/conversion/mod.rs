//! Version conversion layer
//!
//! Pure functions between each wire version and the canonical types, plus
//! the `Scheme` registry the generic encode/decode path routes through.
//!
//! # Rules
//!
//! - Topping lists map 1:1 in order; names and quantities are copied as-is
//! - A version without the size attribute injects its fixed default on
//!   decode and drops the attribute on encode
//! - A version with the size attribute copies it both ways
//! - Conversion functions never fail and hold no state

mod errors;
mod scheme;
pub mod v1beta1;
pub mod v2alpha1;

pub use errors::{ConversionError, ConversionResult};
pub use scheme::{ConversionFuncs, ConversionKey, Scheme, VersionedObject};
pub use v1beta1::DEFAULT_PIZZA_SIZE;
