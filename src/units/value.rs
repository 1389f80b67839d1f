
//! Dynamically-typed arithmetic over the quantity algebra.
//!
//! [`Value`] tags any operand the algebra accepts. Multiplication and
//! division are defined for every pair of operands and always
//! succeed; the result type follows the usual promotion from numbers
//! and prefixes up to quantities. Addition, subtraction, negation,
//! and exponentiation are defined only on some operands and report a
//! [`UnitError`] otherwise.

use super::composite::{CompositeUnit, scale_power};
use super::prefix::ScalingFactor;
use super::quantity::Quantity;
use super::unit::Unit;
use crate::error::UnitError;

use num::Rational64;

use std::fmt::{self, Formatter, Display};
use std::ops::{Mul, Div};

use Value as V;

#[derive(Debug, Clone)]
pub enum Value {
  Number(f64),
  Factor(ScalingFactor),
  Unit(Unit),
  Composite(CompositeUnit),
  Quantity(Quantity),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
  Number,
  ScalingFactor,
  Unit,
  CompositeUnit,
  Quantity,
}

/// The arithmetic operators, as reported in errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operator {
  Add,
  Sub,
  Mul,
  Div,
  Pow,
  Neg,
  Pos,
  Convert,
}

impl Value {
  pub fn kind(&self) -> ValueKind {
    match self {
      Value::Number(_) => ValueKind::Number,
      Value::Factor(_) => ValueKind::ScalingFactor,
      Value::Unit(_) => ValueKind::Unit,
      Value::Composite(_) => ValueKind::CompositeUnit,
      Value::Quantity(_) => ValueKind::Quantity,
    }
  }

  fn type_mismatch(operator: Operator, lhs: &Value, rhs: Option<&Value>) -> UnitError {
    UnitError::TypeMismatch { operator, lhs: lhs.kind(), rhs: rhs.map(Value::kind) }
  }

  /// Sum of two numbers or of two quantities in the same unit. A
  /// number is never implicitly promoted to a quantity here.
  pub fn checked_add(self, rhs: Value) -> Result<Value, UnitError> {
    match (self, rhs) {
      (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a + b)),
      (Value::Quantity(a), Value::Quantity(b)) => a.checked_add(&b).map(Value::Quantity),
      (lhs, rhs) => Err(Self::type_mismatch(Operator::Add, &lhs, Some(&rhs))),
    }
  }

  pub fn checked_sub(self, rhs: Value) -> Result<Value, UnitError> {
    match (self, rhs) {
      (Value::Number(a), Value::Number(b)) => Ok(Value::Number(a - b)),
      (Value::Quantity(a), Value::Quantity(b)) => a.checked_sub(&b).map(Value::Quantity),
      (lhs, rhs) => Err(Self::type_mismatch(Operator::Sub, &lhs, Some(&rhs))),
    }
  }

  pub fn checked_neg(self) -> Result<Value, UnitError> {
    match self {
      Value::Number(a) => Ok(Value::Number(-a)),
      Value::Quantity(a) => Ok(Value::Quantity(-a)),
      other => Err(Self::type_mismatch(Operator::Neg, &other, None)),
    }
  }

  pub fn checked_pos(self) -> Result<Value, UnitError> {
    match self {
      value @ (Value::Number(_) | Value::Quantity(_)) => Ok(value),
      other => Err(Self::type_mismatch(Operator::Pos, &other, None)),
    }
  }

  /// Raises a value to a rational power. Scaling factors have no
  /// powers; a unit raised to a power becomes a composite unit.
  pub fn checked_pow(self, power: Rational64) -> Result<Value, UnitError> {
    match self {
      Value::Number(a) => Ok(Value::Number(scale_power(a, power))),
      Value::Unit(a) => CompositeUnit::from(a).checked_pow(power).map(Value::Composite),
      Value::Composite(a) => a.checked_pow(power).map(Value::Composite),
      Value::Quantity(a) => a.checked_pow(power).map(Value::Quantity),
      other @ Value::Factor(_) => Err(Self::type_mismatch(Operator::Pow, &other, Some(&Value::from(power)))),
    }
  }
}

impl From<f64> for Value {
  fn from(value: f64) -> Self {
    Value::Number(value)
  }
}

impl From<Rational64> for Value {
  fn from(value: Rational64) -> Self {
    Value::Number(*value.numer() as f64 / *value.denom() as f64)
  }
}

impl From<ScalingFactor> for Value {
  fn from(value: ScalingFactor) -> Self {
    Value::Factor(value)
  }
}

impl From<Unit> for Value {
  fn from(value: Unit) -> Self {
    Value::Unit(value)
  }
}

impl From<CompositeUnit> for Value {
  fn from(value: CompositeUnit) -> Self {
    Value::Composite(value)
  }
}

impl From<Quantity> for Value {
  fn from(value: Quantity) -> Self {
    Value::Quantity(value)
  }
}

/// Values of different kinds are unequal, except that a unitless
/// quantity equals the bare number with the same value.
impl PartialEq for Value {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (Value::Number(a), Value::Number(b)) => a == b,
      (Value::Factor(a), Value::Factor(b)) => a == b,
      (Value::Unit(a), Value::Unit(b)) => a == b,
      (Value::Composite(a), Value::Composite(b)) => a == b,
      (Value::Quantity(a), Value::Quantity(b)) => a == b,
      (Value::Quantity(a), Value::Number(b)) => a == b,
      (Value::Number(a), Value::Quantity(b)) => a == b,
      _ => false,
    }
  }
}

impl Display for Value {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      Value::Number(a) => write!(f, "{}", a),
      Value::Factor(a) => write!(f, "{}", a),
      Value::Unit(a) => write!(f, "{}", a),
      Value::Composite(a) => write!(f, "{}", a),
      Value::Quantity(a) => write!(f, "{}", a),
    }
  }
}

impl Display for ValueKind {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let name = match self {
      ValueKind::Number => "number",
      ValueKind::ScalingFactor => "ScalingFactor",
      ValueKind::Unit => "Unit",
      ValueKind::CompositeUnit => "CompositeUnit",
      ValueKind::Quantity => "Quantity",
    };
    f.write_str(name)
  }
}

impl Display for Operator {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let name = match self {
      Operator::Add => "+",
      Operator::Sub => "-",
      Operator::Mul => "*",
      Operator::Div => "/",
      Operator::Pow => "**",
      Operator::Neg => "unary -",
      Operator::Pos => "unary +",
      Operator::Convert => "conversion",
    };
    f.write_str(name)
  }
}

impl Mul for Value {
  type Output = Value;

  fn mul(self, rhs: Value) -> Value {
    match (self, rhs) {
      (V::Number(a), V::Number(b)) => V::Number(a * b),
      (V::Number(a), V::Factor(b)) => V::Quantity(a * b),
      (V::Number(a), V::Unit(b)) => V::Quantity(a * b),
      (V::Number(a), V::Composite(b)) => V::Quantity(a * b),
      (V::Number(a), V::Quantity(b)) => V::Quantity(a * b),

      (V::Factor(a), V::Number(b)) => V::Quantity(a * b),
      (V::Factor(a), V::Factor(b)) => V::Factor(a * b),
      (V::Factor(a), V::Unit(b)) => V::Unit(a * b),
      (V::Factor(a), V::Composite(b)) => V::Composite(a * b),
      (V::Factor(a), V::Quantity(b)) => V::Quantity(a * b),

      (V::Unit(a), V::Number(b)) => V::Quantity(a * b),
      (V::Unit(a), V::Factor(b)) => V::Unit(a * b),
      (V::Unit(a), V::Unit(b)) => V::Composite(a * b),
      (V::Unit(a), V::Composite(b)) => V::Composite(a * b),
      (V::Unit(a), V::Quantity(b)) => V::Quantity(a * b),

      (V::Composite(a), V::Number(b)) => V::Quantity(a * b),
      (V::Composite(a), V::Factor(b)) => V::Composite(a * b),
      (V::Composite(a), V::Unit(b)) => V::Composite(a * b),
      (V::Composite(a), V::Composite(b)) => V::Composite(a * b),
      (V::Composite(a), V::Quantity(b)) => V::Quantity(a * b),

      (V::Quantity(a), V::Number(b)) => V::Quantity(a * b),
      (V::Quantity(a), V::Factor(b)) => V::Quantity(a * b),
      (V::Quantity(a), V::Unit(b)) => V::Quantity(a * b),
      (V::Quantity(a), V::Composite(b)) => V::Quantity(a * b),
      (V::Quantity(a), V::Quantity(b)) => V::Quantity(a * b),
    }
  }
}

impl Div for Value {
  type Output = Value;

  fn div(self, rhs: Value) -> Value {
    match (self, rhs) {
      (V::Number(a), V::Number(b)) => V::Number(a / b),
      (V::Number(a), V::Factor(b)) => V::Quantity(a / b),
      (V::Number(a), V::Unit(b)) => V::Quantity(a / b),
      (V::Number(a), V::Composite(b)) => V::Quantity(a / b),
      (V::Number(a), V::Quantity(b)) => V::Quantity(a / b),

      (V::Factor(a), V::Number(b)) => V::Quantity(a / b),
      (V::Factor(a), V::Factor(b)) => V::Factor(a / b),
      (V::Factor(a), V::Unit(b)) => V::Composite(a / b),
      (V::Factor(a), V::Composite(b)) => V::Composite(a / b),
      (V::Factor(a), V::Quantity(b)) => V::Quantity(a / b),

      (V::Unit(a), V::Number(b)) => V::Quantity(a / b),
      (V::Unit(a), V::Factor(b)) => V::Unit(a / b),
      (V::Unit(a), V::Unit(b)) => V::Composite(a / b),
      (V::Unit(a), V::Composite(b)) => V::Composite(a / b),
      (V::Unit(a), V::Quantity(b)) => V::Quantity(a / b),

      (V::Composite(a), V::Number(b)) => V::Quantity(a / b),
      (V::Composite(a), V::Factor(b)) => V::Composite(a / b),
      (V::Composite(a), V::Unit(b)) => V::Composite(a / b),
      (V::Composite(a), V::Composite(b)) => V::Composite(a / b),
      (V::Composite(a), V::Quantity(b)) => V::Quantity(a / b),

      (V::Quantity(a), V::Number(b)) => V::Quantity(a / b),
      (V::Quantity(a), V::Factor(b)) => V::Quantity(a / b),
      (V::Quantity(a), V::Unit(b)) => V::Quantity(a / b),
      (V::Quantity(a), V::Composite(b)) => V::Quantity(a / b),
      (V::Quantity(a), V::Quantity(b)) => V::Quantity(a / b),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::units::prefix::{kilo, mega, milli, nano};
  use crate::units::test_utils::{grams, meters, seconds};

  use approx::assert_relative_eq;
  use itertools::iproduct;
  use num::pow::Pow;

  fn number(n: f64) -> Value {
    Value::Number(n)
  }

  /// One operand of each shape, covering every kind.
  fn sample_values() -> Vec<Value> {
    vec![
      number(2.0),
      number(0.5),
      Value::from(meters()),
      Value::from(seconds()),
      Value::from(milli()),
      Value::from(nano()),
      Value::from(2.0 * meters()),
      Value::from(2.0 * (meters() / seconds())),
      Value::from(meters() / seconds()),
      Value::from(grams() * meters()),
    ]
  }

  fn product_kind(lhs: ValueKind, rhs: ValueKind) -> ValueKind {
    match (lhs, rhs) {
      (ValueKind::Number, ValueKind::Number) => ValueKind::Number,
      (ValueKind::Number, _) | (_, ValueKind::Number) => ValueKind::Quantity,
      (ValueKind::Quantity, _) | (_, ValueKind::Quantity) => ValueKind::Quantity,
      (ValueKind::ScalingFactor, ValueKind::ScalingFactor) => ValueKind::ScalingFactor,
      (ValueKind::ScalingFactor, ValueKind::Unit) | (ValueKind::Unit, ValueKind::ScalingFactor) => ValueKind::Unit,
      _ => ValueKind::CompositeUnit,
    }
  }

  fn quotient_kind(lhs: ValueKind, rhs: ValueKind) -> ValueKind {
    match (lhs, rhs) {
      (ValueKind::ScalingFactor, ValueKind::Unit) => ValueKind::CompositeUnit,
      _ => product_kind(lhs, rhs),
    }
  }

  #[test]
  fn test_mul_promotion_table() {
    for (a, b) in iproduct!(sample_values(), sample_values()) {
      let (a_kind, b_kind) = (a.kind(), b.kind());
      let description = format!("{} * {}", a, b);
      assert_eq!((a * b).kind(), product_kind(a_kind, b_kind), "{}", description);
    }
  }

  #[test]
  fn test_div_promotion_table() {
    for (a, b) in iproduct!(sample_values(), sample_values()) {
      let (a_kind, b_kind) = (a.kind(), b.kind());
      let description = format!("{} / {}", a, b);
      assert_eq!((a / b).kind(), quotient_kind(a_kind, b_kind), "{}", description);
    }
  }

  #[test]
  fn test_promotion_table_is_covered() {
    let kinds: std::collections::HashSet<_> = iproduct!(sample_values(), sample_values())
      .map(|(a, b)| (a.kind(), b.kind()))
      .collect();
    assert_eq!(kinds.len(), 25);
  }

  #[test]
  fn test_mul_promotion() {
    assert_eq!((number(2.0) * number(3.0)).kind(), ValueKind::Number);
    assert_eq!((number(2.0) * Value::from(kilo())).kind(), ValueKind::Quantity);
    assert_eq!((Value::from(kilo()) * Value::from(mega())).kind(), ValueKind::ScalingFactor);
    assert_eq!((Value::from(kilo()) * Value::from(grams())).kind(), ValueKind::Unit);
    assert_eq!((Value::from(grams()) * Value::from(kilo())).kind(), ValueKind::Unit);
    assert_eq!((Value::from(meters()) * Value::from(seconds())).kind(), ValueKind::CompositeUnit);
    assert_eq!((Value::from(meters()) * number(2.0)).kind(), ValueKind::Quantity);
    assert_eq!(
      (Value::from(Quantity::new(2.0, meters())) * Value::from(seconds())).kind(),
      ValueKind::Quantity,
    );
  }

  #[test]
  fn test_div_promotion() {
    assert_eq!((Value::from(kilo()) / Value::from(grams())).kind(), ValueKind::CompositeUnit);
    assert_eq!((Value::from(grams()) / Value::from(kilo())).kind(), ValueKind::Unit);
    assert_eq!((Value::from(kilo()) / Value::from(milli())).kind(), ValueKind::ScalingFactor);
    assert_eq!((number(1.0) / Value::from(seconds())).kind(), ValueKind::Quantity);
    assert_eq!((Value::from(meters()) / Value::from(meters())).kind(), ValueKind::CompositeUnit);
  }

  #[test]
  fn test_number_results() {
    assert_eq!(number(2.0) * number(3.0), number(6.0));
    assert_eq!(number(3.0) / number(2.0), number(1.5));
    let q = Value::from(Quantity::new(6.0, meters())) / Value::from(Quantity::new(2.0, meters()));
    assert_eq!(q.kind(), ValueKind::Quantity);
    assert_eq!(q, number(3.0));
    assert_eq!(number(3.0), q);
  }

  #[test]
  fn test_add_and_sub() {
    assert_eq!(number(2.0).checked_add(number(3.0)).unwrap(), number(5.0));
    assert_eq!(number(2.0).checked_sub(number(3.0)).unwrap(), number(-1.0));
    let q = Value::from(Quantity::new(2.0, meters()))
      .checked_add(Value::from(Quantity::new(3.0, meters())))
      .unwrap();
    assert_eq!(q, Value::from(Quantity::new(5.0, meters())));
  }

  #[test]
  fn test_add_rejects_mixed_operands() {
    let err = Value::from(meters()).checked_add(number(1.0)).unwrap_err();
    assert!(matches!(
      err,
      UnitError::TypeMismatch { operator: Operator::Add, lhs: ValueKind::Unit, rhs: Some(ValueKind::Number) },
    ));
    let err = number(1.0).checked_sub(Value::from(Quantity::unitless(1.0))).unwrap_err();
    assert!(matches!(err, UnitError::TypeMismatch { operator: Operator::Sub, .. }));
    let err = Value::from(Quantity::new(1.0, meters()))
      .checked_add(Value::from(Quantity::new(1.0, seconds())))
      .unwrap_err();
    assert!(matches!(err, UnitError::UnitMismatch { .. }));
  }

  #[test]
  fn test_unary_operators() {
    assert_eq!(number(2.0).checked_neg().unwrap(), number(-2.0));
    assert_eq!(
      Value::from(Quantity::new(2.0, meters())).checked_neg().unwrap(),
      Value::from(Quantity::new(-2.0, meters())),
    );
    assert_eq!(number(2.0).checked_pos().unwrap(), number(2.0));
    let err = Value::from(kilo()).checked_neg().unwrap_err();
    assert!(matches!(
      err,
      UnitError::TypeMismatch { operator: Operator::Neg, lhs: ValueKind::ScalingFactor, rhs: None },
    ));
    let err = Value::from(meters()).checked_pos().unwrap_err();
    assert!(matches!(err, UnitError::TypeMismatch { operator: Operator::Pos, .. }));
  }

  #[test]
  fn test_pow() {
    let two = Rational64::from_integer(2);
    assert_eq!(number(3.0).checked_pow(two).unwrap(), number(9.0));
    let area = Value::from(meters()).checked_pow(two).unwrap();
    assert_eq!(area, Value::from(meters().pow(2)));
    let q = Value::from(Quantity::new(3.0, kilo() * grams())).checked_pow(two).unwrap();
    match q {
      Value::Quantity(q) => {
        assert_relative_eq!(q.value(), 9.0);
        assert_relative_eq!(q.base_value(), 9e6);
      }
      other => panic!("expected a quantity, got {}", other),
    }
    let err = Value::from(kilo()).checked_pow(two).unwrap_err();
    assert!(matches!(err, UnitError::TypeMismatch { operator: Operator::Pow, .. }));
    let huge = Rational64::from_integer(1 << 40);
    let err = Value::from(meters().pow(huge)).checked_pow(huge).unwrap_err();
    assert!(matches!(err, UnitError::ExponentOverflow { operator: Operator::Pow }));
  }

  #[test]
  fn test_kinds_never_compare_equal() {
    assert_ne!(Value::from(meters()), Value::from(CompositeUnit::from(meters())));
    assert_ne!(Value::from(kilo()), Value::from(CompositeUnit::from(kilo())));
    assert_ne!(Value::from(Quantity::new(1.0, meters())), number(1.0));
  }

  #[test]
  fn test_display() {
    assert_eq!(Operator::Neg.to_string(), "unary -");
    assert_eq!(ValueKind::CompositeUnit.to_string(), "CompositeUnit");
    assert_eq!(Value::from(Quantity::new(2.5, meters())).to_string(), "2.5 m");
  }
}
