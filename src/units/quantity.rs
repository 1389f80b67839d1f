
use super::composite::{CompositeUnit, scale_power};
use super::dimension::Dimension;
use super::value::{Operator, Value};
use crate::error::UnitError;

use num::Rational64;
use num::pow::Pow;

use std::fmt::{self, Formatter, Display};
use std::ops::{Mul, Div, Neg};

/// A scalar quantity, tagged with a unit.
#[derive(Debug, Clone)]
pub struct Quantity {
  value: f64,
  unit: CompositeUnit,
}

impl Quantity {
  pub fn new(value: f64, unit: impl Into<CompositeUnit>) -> Self {
    Self { value, unit: unit.into() }
  }

  pub fn unitless(value: f64) -> Self {
    Self::new(value, CompositeUnit::unitless())
  }

  /// Constructs a quantity from a dynamically-typed unit argument.
  /// `None` is the unitless unit; only units and composite units are
  /// otherwise accepted.
  pub fn try_new(value: f64, unit: Option<Value>) -> Result<Self, UnitError> {
    match unit {
      None => Ok(Self::unitless(value)),
      Some(Value::Unit(unit)) => Ok(Self::new(value, unit)),
      Some(Value::Composite(unit)) => Ok(Self::new(value, unit)),
      Some(other) => Err(UnitError::invalid_construction(
        format!("the unit of a quantity must be a Unit or CompositeUnit, not {}", other.kind()),
      )),
    }
  }

  pub fn value(&self) -> f64 {
    self.value
  }

  pub fn unit(&self) -> &CompositeUnit {
    &self.unit
  }

  pub fn into_parts(self) -> (f64, CompositeUnit) {
    (self.value, self.unit)
  }

  pub fn dimension(&self) -> Dimension {
    self.unit.dimension()
  }

  /// The value expressed against the unscaled base units, i.e. with
  /// the unit's scalar factor multiplied in.
  pub fn base_value(&self) -> f64 {
    self.value * self.unit.scalar_factor()
  }

  pub fn checked_add(&self, rhs: &Quantity) -> Result<Quantity, UnitError> {
    self.check_same_unit(Operator::Add, rhs)?;
    Ok(Quantity::new(self.value + rhs.value, self.unit.clone()))
  }

  pub fn checked_sub(&self, rhs: &Quantity) -> Result<Quantity, UnitError> {
    self.check_same_unit(Operator::Sub, rhs)?;
    Ok(Quantity::new(self.value - rhs.value, self.unit.clone()))
  }

  fn check_same_unit(&self, operator: Operator, rhs: &Quantity) -> Result<(), UnitError> {
    if self.unit == rhs.unit {
      Ok(())
    } else {
      Err(UnitError::UnitMismatch { operator, lhs: self.unit.clone(), rhs: rhs.unit.clone() })
    }
  }

  /// Raises both the value and the unit to `power`, failing if a unit
  /// exponent overflows.
  pub fn checked_pow(self, power: Rational64) -> Result<Quantity, UnitError> {
    let unit = self.unit.checked_pow(power)?;
    Ok(Quantity::new(scale_power(self.value, power), unit))
  }

  /// Re-expresses this quantity in `target_unit`, which must have the
  /// same base units as the current unit and may differ only in its
  /// scalar factor. Conversion is never performed implicitly by
  /// arithmetic.
  pub fn try_convert(self, target_unit: CompositeUnit) -> Result<Quantity, UnitError> {
    if self.unit.is_convertible_to(&target_unit) {
      let value = self.base_value() / target_unit.scalar_factor();
      Ok(Quantity::new(value, target_unit))
    } else {
      Err(UnitError::UnitMismatch { operator: Operator::Convert, lhs: self.unit, rhs: target_unit })
    }
  }
}

impl From<f64> for Quantity {
  fn from(value: f64) -> Self {
    Quantity::unitless(value)
  }
}

impl PartialEq for Quantity {
  fn eq(&self, other: &Self) -> bool {
    self.value == other.value && self.unit == other.unit
  }
}

/// A quantity equals a bare number only when it is unitless.
impl PartialEq<f64> for Quantity {
  fn eq(&self, other: &f64) -> bool {
    self.unit.is_unitless() && self.value == *other
  }
}

impl PartialEq<Quantity> for f64 {
  fn eq(&self, other: &Quantity) -> bool {
    other == self
  }
}

impl Display for Quantity {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    if self.unit.is_unitless() {
      write!(f, "{}", self.value)
    } else {
      write!(f, "{} {}", self.value, self.unit)
    }
  }
}

impl Mul for Quantity {
  type Output = Quantity;

  fn mul(self, rhs: Self) -> Self::Output {
    Quantity::new(self.value * rhs.value, self.unit * rhs.unit)
  }
}

impl Div for Quantity {
  type Output = Quantity;

  fn div(self, rhs: Self) -> Self::Output {
    Quantity::new(self.value / rhs.value, self.unit / rhs.unit)
  }
}

impl Neg for Quantity {
  type Output = Quantity;

  fn neg(self) -> Self::Output {
    Quantity::new(-self.value, self.unit)
  }
}

impl Pow<i64> for Quantity {
  type Output = Quantity;

  fn pow(self, rhs: i64) -> Self::Output {
    self.pow(Rational64::from_integer(rhs))
  }
}

impl Pow<Rational64> for Quantity {
  type Output = Quantity;

  fn pow(self, rhs: Rational64) -> Self::Output {
    self.checked_pow(rhs).unwrap_or_else(|err| panic!("{}", err))
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::prefix::kilo;
  use crate::units::test_utils::{grams, kilometers, meters, one, seconds};

  use approx::assert_relative_eq;

  #[test]
  fn test_construction_promotes_units() {
    let q = Quantity::new(5.0, meters());
    assert_eq!(q.unit(), &CompositeUnit::from(meters()));
    let q = Quantity::try_new(5.0, None).unwrap();
    assert!(q.unit().is_unitless());
    let q = Quantity::try_new(5.0, Some(Value::Unit(meters()))).unwrap();
    assert_eq!(q, Quantity::new(5.0, meters()));
  }

  #[test]
  fn test_construction_rejects_non_units() {
    let err = Quantity::try_new(5.0, Some(Value::Number(2.0))).unwrap_err();
    assert!(matches!(err, UnitError::InvalidConstruction { .. }));
    let err = Quantity::try_new(5.0, Some(Value::Factor(kilo()))).unwrap_err();
    assert!(matches!(err, UnitError::InvalidConstruction { .. }));
    let err = Quantity::try_new(5.0, Some(Value::Quantity(Quantity::unitless(1.0)))).unwrap_err();
    assert!(matches!(err, UnitError::InvalidConstruction { .. }));
  }

  #[test]
  fn test_add_requires_same_unit() {
    let sum = Quantity::new(5.0, meters()).checked_add(&Quantity::new(3.0, meters())).unwrap();
    assert_eq!(sum, Quantity::new(8.0, meters()));
    let err = Quantity::new(5.0, meters()).checked_add(&Quantity::new(3.0, seconds())).unwrap_err();
    assert!(matches!(err, UnitError::UnitMismatch { operator: Operator::Add, .. }));
  }

  #[test]
  fn test_sub_requires_same_scale() {
    let diff = Quantity::new(5.0, meters()).checked_sub(&Quantity::new(3.0, meters())).unwrap();
    assert_eq!(diff, Quantity::new(2.0, meters()));
    let err = Quantity::new(5.0, meters()).checked_sub(&Quantity::new(3.0, kilometers())).unwrap_err();
    assert!(matches!(err, UnitError::UnitMismatch { operator: Operator::Sub, .. }));
  }

  #[test]
  fn test_mul_and_div_combine_units() {
    let force = Quantity::new(2.0, kilo() * grams()) * Quantity::new(3.0, meters())
      / (Quantity::new(2.0, seconds()) * Quantity::new(1.0, seconds()));
    assert_relative_eq!(force.value(), 3.0);
    assert_relative_eq!(force.base_value(), 3000.0);
    assert_eq!(force.unit().exponent_of(&seconds()), Rational64::from_integer(-2));
  }

  #[test]
  fn test_neg_and_pow() {
    let q = -Quantity::new(3.0, meters());
    assert_eq!(q.value(), -3.0);
    let q = q.pow(2);
    assert_eq!(q, Quantity::new(9.0, meters().pow(2)));
    let q = Quantity::new(-2.0, seconds()).pow(3);
    assert_eq!(q.value(), -8.0);
    let q = Quantity::new(4.0, meters().pow(2)).pow(Rational64::new(1, 2));
    assert_eq!(q, Quantity::new(2.0, meters()));
  }

  #[test]
  fn test_checked_pow_overflow() {
    let huge = Rational64::from_integer(1 << 40);
    let q = Quantity::new(1.0, meters().pow(huge));
    let err = q.checked_pow(huge).unwrap_err();
    assert!(matches!(err, UnitError::ExponentOverflow { operator: Operator::Pow }));
  }

  #[test]
  fn test_unitless_equals_number() {
    assert_eq!(Quantity::unitless(2.5), 2.5);
    assert_eq!(Quantity::new(2.5, one()), 2.5);
    assert_eq!(2.5, Quantity::unitless(2.5));
    assert_ne!(Quantity::new(2.5, meters()), 2.5);
    assert_ne!(Quantity::unitless(2.5), 2.0);
    let collapsed = Quantity::new(2.5, meters()) / Quantity::new(1.0, meters());
    assert_eq!(collapsed, 2.5);
  }

  #[test]
  fn test_try_convert() {
    let q = Quantity::new(1.5, kilometers());
    let converted = q.try_convert(CompositeUnit::from(meters())).unwrap();
    assert_relative_eq!(converted.value(), 1500.0);
    assert_eq!(converted.unit(), &CompositeUnit::from(meters()));
    let err = Quantity::new(1.5, kilometers()).try_convert(CompositeUnit::from(seconds())).unwrap_err();
    assert!(matches!(err, UnitError::UnitMismatch { operator: Operator::Convert, .. }));
  }

  #[test]
  fn test_display() {
    assert_eq!(Quantity::unitless(2.5).to_string(), "2.5");
    assert_eq!(Quantity::new(2.5, meters()).to_string(), "2.5 m");
  }
}
