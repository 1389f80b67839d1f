
//! Physical units and dimensioned quantities with canonical unit
//! identity.
//!
//! See [`units`] for the value types and [`units::palette`] for the
//! predefined units. [`canonical`] provides the interning machinery
//! that makes equal units identical.

pub mod canonical;
pub mod error;
pub mod units;
pub mod util;

pub use error::UnitError;
