
//! Mixed-type arithmetic between scaling factors, units, composite
//! units, quantities, and bare numbers.
//!
//! The same-type operators live alongside their types. This module
//! fills in every remaining pairing so that, for instance, `kilo() *
//! gram()` is a [`Unit`], `meter() / second()` is a [`CompositeUnit`],
//! and `2.0 * meter()` is a [`Quantity`]. All results are produced by
//! promoting operands to composite units and going through the
//! composite unit operators, so they are always in canonical form.

use super::composite::CompositeUnit;
use super::prefix::ScalingFactor;
use super::quantity::Quantity;
use super::unit::Unit;

use std::ops::{Mul, Div};

/// Products and quotients of two unit-like operands, yielding a
/// composite unit.
macro_rules! composite_ops {
  ($(($lhs:ty, $rhs:ty)),* $(,)?) => {
    $(
      impl Mul<$rhs> for $lhs {
        type Output = CompositeUnit;

        fn mul(self, rhs: $rhs) -> CompositeUnit {
          CompositeUnit::from(self) * CompositeUnit::from(rhs)
        }
      }

      impl Div<$rhs> for $lhs {
        type Output = CompositeUnit;

        fn div(self, rhs: $rhs) -> CompositeUnit {
          CompositeUnit::from(self) / CompositeUnit::from(rhs)
        }
      }
    )*
  };
}

/// Products and quotients between a unit-like operand and either a
/// quantity or a bare number, yielding a quantity.
macro_rules! quantity_ops {
  ($($unit:ty),* $(,)?) => {
    $(
      impl Mul<$unit> for Quantity {
        type Output = Quantity;

        fn mul(self, rhs: $unit) -> Quantity {
          let (value, unit) = self.into_parts();
          Quantity::new(value, unit * CompositeUnit::from(rhs))
        }
      }

      impl Div<$unit> for Quantity {
        type Output = Quantity;

        fn div(self, rhs: $unit) -> Quantity {
          let (value, unit) = self.into_parts();
          Quantity::new(value, unit / CompositeUnit::from(rhs))
        }
      }

      impl Mul<Quantity> for $unit {
        type Output = Quantity;

        fn mul(self, rhs: Quantity) -> Quantity {
          let (value, unit) = rhs.into_parts();
          Quantity::new(value, CompositeUnit::from(self) * unit)
        }
      }

      impl Div<Quantity> for $unit {
        type Output = Quantity;

        fn div(self, rhs: Quantity) -> Quantity {
          let (value, unit) = rhs.into_parts();
          Quantity::new(1.0 / value, CompositeUnit::from(self) / unit)
        }
      }

      impl Mul<f64> for $unit {
        type Output = Quantity;

        fn mul(self, rhs: f64) -> Quantity {
          Quantity::new(rhs, self)
        }
      }

      impl Div<f64> for $unit {
        type Output = Quantity;

        fn div(self, rhs: f64) -> Quantity {
          Quantity::new(1.0 / rhs, self)
        }
      }

      impl Mul<$unit> for f64 {
        type Output = Quantity;

        fn mul(self, rhs: $unit) -> Quantity {
          Quantity::new(self, rhs)
        }
      }

      impl Div<$unit> for f64 {
        type Output = Quantity;

        fn div(self, rhs: $unit) -> Quantity {
          Quantity::new(self, CompositeUnit::from(rhs).recip())
        }
      }
    )*
  };
}

composite_ops! {
  (Unit, Unit),
  (Unit, CompositeUnit),
  (CompositeUnit, Unit),
  (ScalingFactor, CompositeUnit),
  (CompositeUnit, ScalingFactor),
}

quantity_ops! {
  ScalingFactor,
  Unit,
  CompositeUnit,
}

// A prefix times a unit stays a unit (see `unit.rs`), but a prefix
// over a unit has no atomic representation.
impl Div<Unit> for ScalingFactor {
  type Output = CompositeUnit;

  fn div(self, rhs: Unit) -> CompositeUnit {
    CompositeUnit::from(self) / CompositeUnit::from(rhs)
  }
}

impl Mul<f64> for Quantity {
  type Output = Quantity;

  fn mul(self, rhs: f64) -> Quantity {
    let (value, unit) = self.into_parts();
    Quantity::new(value * rhs, unit)
  }
}

impl Div<f64> for Quantity {
  type Output = Quantity;

  fn div(self, rhs: f64) -> Quantity {
    let (value, unit) = self.into_parts();
    Quantity::new(value / rhs, unit)
  }
}

impl Mul<Quantity> for f64 {
  type Output = Quantity;

  fn mul(self, rhs: Quantity) -> Quantity {
    rhs * self
  }
}

impl Div<Quantity> for f64 {
  type Output = Quantity;

  fn div(self, rhs: Quantity) -> Quantity {
    let (value, unit) = rhs.into_parts();
    Quantity::new(self / value, unit.recip())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::prefix::{kilo, milli};
  use crate::units::test_utils::{grams, meters, one, seconds};

  use approx::assert_relative_eq;
  use num::Rational64;
  use num::pow::Pow;

  #[test]
  fn test_unit_products_are_commutative() {
    assert_eq!(meters() * seconds(), seconds() * meters());
    assert_eq!((meters() * seconds()) * grams(), meters() * (seconds() * grams()));
  }

  #[test]
  fn test_cancellation() {
    assert_eq!((meters() / seconds()) * seconds(), CompositeUnit::from(meters()));
    assert_eq!(meters() / meters(), CompositeUnit::unitless());
    assert_eq!(meters() / meters(), CompositeUnit::from(one()));
  }

  #[test]
  fn test_derived_unit_identity() {
    let newton = kilo() * grams() * meters() / seconds().pow(2);
    let kilogram = kilo() * grams();
    assert_eq!(newton, kilogram.clone() * meters() / seconds().pow(2));
    assert_eq!(newton, meters() * (kilogram.clone() / seconds().pow(2)));
    assert_eq!(newton, (seconds().pow(-2) * meters()) * kilogram);
    assert_relative_eq!(newton.scalar_factor(), 1e3);
  }

  #[test]
  fn test_scaling_factor_and_composite() {
    let speed = meters() / seconds();
    let scaled = kilo() * speed.clone();
    assert_eq!(scaled, speed.clone() * kilo());
    assert_relative_eq!(scaled.scalar_factor(), 1e3);
    assert_eq!(scaled / kilo(), speed);
    let per_meter = kilo() / meters();
    assert_eq!(per_meter.exponent_of(&meters()), Rational64::from_integer(-1));
    assert_relative_eq!(per_meter.scalar_factor(), 1e3);
  }

  #[test]
  fn test_numbers_promote_to_quantities() {
    let q = 2.0 * meters();
    assert_eq!(q, Quantity::new(2.0, meters()));
    assert_eq!(meters() * 2.0, q);
    let q = meters() / 4.0;
    assert_eq!(q, Quantity::new(0.25, meters()));
    let q = 2.0 / seconds();
    assert_eq!(q, Quantity::new(2.0, seconds().pow(-1)));
    let q = 3.0 * kilo();
    assert_eq!(q.value(), 3.0);
    assert_relative_eq!(q.base_value(), 3000.0);
    assert!(q.unit().is_empty());
    let q = 3.0 / milli();
    assert_relative_eq!(q.base_value(), 3000.0);
  }

  #[test]
  fn test_quantity_with_units() {
    let q = Quantity::new(3.0, meters()) / seconds();
    assert_eq!(q, Quantity::new(3.0, meters() / seconds()));
    let q = seconds() * q;
    assert_eq!(q, Quantity::new(3.0, meters()));
    let q = meters() / Quantity::new(4.0, seconds());
    assert_eq!(q, Quantity::new(0.25, meters() / seconds()));
    let q = Quantity::new(3.0, meters()) * kilo();
    assert_relative_eq!(q.base_value(), 3000.0);
  }

  #[test]
  fn test_quantity_with_numbers() {
    let q = Quantity::new(3.0, meters()) * 2.0;
    assert_eq!(q, Quantity::new(6.0, meters()));
    let q = 2.0 * q;
    assert_eq!(q, Quantity::new(12.0, meters()));
    let q = q / 4.0;
    assert_eq!(q, Quantity::new(3.0, meters()));
    let q = 6.0 / q;
    assert_eq!(q, Quantity::new(2.0, meters().pow(-1)));
  }
}
