
use crate::units::composite::CompositeUnit;
use crate::units::value::{Operator, ValueKind};

use thiserror::Error;

/// Errors produced by unit and quantity construction and arithmetic.
///
/// Every entity in this crate is immutable, so a failed operation
/// leaves its operands untouched and reusable.
#[derive(Clone, Debug, Error)]
#[non_exhaustive]
pub enum UnitError {
  #[error("Invalid construction: {reason}")]
  InvalidConstruction {
    reason: String,
  },
  #[error("Unit mismatch in {operator}: [{lhs}] and [{rhs}]")]
  UnitMismatch {
    operator: Operator,
    lhs: CompositeUnit,
    rhs: CompositeUnit,
  },
  #[error("Exponent overflow in {operator}")]
  ExponentOverflow {
    operator: Operator,
  },
  #[error("Unsupported operand types for {operator}: {}", describe_operands(.lhs, .rhs))]
  TypeMismatch {
    operator: Operator,
    lhs: ValueKind,
    rhs: Option<ValueKind>,
  },
}

impl UnitError {
  pub fn invalid_construction(reason: impl Into<String>) -> Self {
    Self::InvalidConstruction { reason: reason.into() }
  }
}

fn describe_operands(lhs: &ValueKind, rhs: &Option<ValueKind>) -> String {
  match rhs {
    None => lhs.to_string(),
    Some(rhs) => format!("{} and {}", lhs, rhs),
  }
}
