
//! Physical units and dimensioned quantities.
//!
//! The algebra has four kinds of values, from smallest to largest: a
//! [`ScalingFactor`] (a named prefix), a [`Unit`] (an atomic unit,
//! possibly prefixed), a [`CompositeUnit`] (a normalized product of
//! powers of units), and a [`Quantity`] (a number tagged with a
//! composite unit). Scaling factors and units are canonical, so they
//! compare by identity. [`Value`] erases the distinction for dynamic
//! arithmetic.

pub mod composite;
pub mod dimension;
mod ops;
pub mod palette;
pub mod prefix;
pub mod quantity;
pub mod unit;
pub mod value;

pub use composite::CompositeUnit;
pub use dimension::{Dimension, PhysicalDimension};
pub use prefix::ScalingFactor;
pub use quantity::Quantity;
pub use unit::{Unit, UnitBuilder};
pub use value::{Operator, Value, ValueKind};
