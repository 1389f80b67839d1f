
use super::value::Operator;
use crate::error::UnitError;
use crate::util::zip_with;

use num::{CheckedAdd, CheckedMul, CheckedSub, One, Rational64, Zero};
use num::pow::Pow;

use std::ops::{Mul, Div};
use std::fmt::{self, Formatter, Display};

/// The physical dimension tag carried by every atomic
/// [`Unit`](super::unit::Unit).
///
/// These are the seven SI base dimensions, plus plane angle and a
/// marker for dimensionless units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PhysicalDimension {
  Nondimensional,
  Length,
  Mass,
  Time,
  Current,
  Temperature,
  AmountOfSubstance,
  LuminousIntensity,
  Angle,
}

/// A dimension is a formal product and quotient of zero or more
/// [`PhysicalDimension`] values, raised to rational powers.
///
/// # Panics
///
/// `Mul`, `Div` and `Pow` panic if an exponent overflows
/// [`Rational64`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dimension {
  dims: [Rational64; NDIMS],
}

pub const NDIMS: usize = 8;

fn exponent_or_panic(exponent: Option<Rational64>, operator: Operator) -> Rational64 {
  exponent.unwrap_or_else(|| panic!("{}", UnitError::ExponentOverflow { operator }))
}

impl Dimension {
  pub fn singleton(base: PhysicalDimension) -> Self {
    let mut result = Dimension::one();
    if let Some(index) = base.dimension_index() {
      result.dims[index] = Rational64::one();
    }
    result
  }

  pub fn get(&self, base: PhysicalDimension) -> Rational64 {
    match base.dimension_index() {
      Some(index) => self.dims[index],
      None => Rational64::zero(),
    }
  }

  /// A simple dimension is one which can be represented as
  /// `Dimension::from(x)` for some `x: PhysicalDimension` other than
  /// `Nondimensional`. That is, exactly one base dimension has power
  /// 1 and all others have power zero.
  pub fn is_simple(&self) -> bool {
    let mut nonzero = self.dims.iter().filter(|x| !x.is_zero());
    matches!((nonzero.next(), nonzero.next()), (Some(x), None) if x.is_one())
  }

  pub fn components(&self) -> impl Iterator<Item = (PhysicalDimension, Rational64)> + '_ {
    PhysicalDimension::BASE.iter()
      .copied()
      .zip(self.dims.iter().copied())
      .filter(|(_, x)| !x.is_zero())
  }
}

impl PhysicalDimension {
  /// All dimensions which occupy a slot in a [`Dimension`] vector, in
  /// display order.
  pub const BASE: [PhysicalDimension; NDIMS] = [
    PhysicalDimension::Length,
    PhysicalDimension::Mass,
    PhysicalDimension::Time,
    PhysicalDimension::Current,
    PhysicalDimension::Temperature,
    PhysicalDimension::AmountOfSubstance,
    PhysicalDimension::LuminousIntensity,
    PhysicalDimension::Angle,
  ];

  fn dimension_index(self) -> Option<usize> {
    match self {
      PhysicalDimension::Nondimensional => None,
      PhysicalDimension::Length => Some(0),
      PhysicalDimension::Mass => Some(1),
      PhysicalDimension::Time => Some(2),
      PhysicalDimension::Current => Some(3),
      PhysicalDimension::Temperature => Some(4),
      PhysicalDimension::AmountOfSubstance => Some(5),
      PhysicalDimension::LuminousIntensity => Some(6),
      PhysicalDimension::Angle => Some(7),
    }
  }
}

impl From<PhysicalDimension> for Dimension {
  fn from(base: PhysicalDimension) -> Self {
    Dimension::singleton(base)
  }
}

impl Pow<Rational64> for &Dimension {
  type Output = Dimension;

  fn pow(self, power: Rational64) -> Dimension {
    Dimension {
      dims: self.dims.map(|x| exponent_or_panic(x.checked_mul(&power), Operator::Pow)),
    }
  }
}

impl Pow<i64> for &Dimension {
  type Output = Dimension;

  fn pow(self, power: i64) -> Dimension {
    self.pow(Rational64::from_integer(power))
  }
}

impl Pow<i64> for PhysicalDimension {
  type Output = Dimension;

  fn pow(self, power: i64) -> Dimension {
    Dimension::singleton(self).pow(power)
  }
}

impl Mul for Dimension {
  type Output = Self;

  fn mul(self, rhs: Self) -> Self {
    Dimension {
      dims: zip_with(self.dims, rhs.dims, |a, b| exponent_or_panic(a.checked_add(&b), Operator::Mul)),
    }
  }
}

impl Div for Dimension {
  type Output = Self;

  fn div(self, rhs: Self) -> Self {
    Dimension {
      dims: zip_with(self.dims, rhs.dims, |a, b| exponent_or_panic(a.checked_sub(&b), Operator::Div)),
    }
  }
}

impl Mul for PhysicalDimension {
  type Output = Dimension;

  fn mul(self, rhs: Self) -> Dimension {
    Dimension::singleton(self) * Dimension::singleton(rhs)
  }
}

impl Div for PhysicalDimension {
  type Output = Dimension;

  fn div(self, rhs: Self) -> Dimension {
    Dimension::singleton(self) / Dimension::singleton(rhs)
  }
}

impl Div<Dimension> for PhysicalDimension {
  type Output = Dimension;

  fn div(self, rhs: Dimension) -> Dimension {
    Dimension::singleton(self) / rhs
  }
}

impl One for Dimension {
  fn one() -> Self {
    Self { dims: [Rational64::zero(); NDIMS] }
  }

  fn is_one(&self) -> bool {
    self.dims.iter().all(Zero::is_zero)
  }
}

impl Display for PhysicalDimension {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      PhysicalDimension::Nondimensional => write!(f, "nondimensional"),
      PhysicalDimension::Length => write!(f, "length"),
      PhysicalDimension::Mass => write!(f, "mass"),
      PhysicalDimension::Time => write!(f, "time"),
      PhysicalDimension::Current => write!(f, "current"),
      PhysicalDimension::Temperature => write!(f, "temperature"),
      PhysicalDimension::AmountOfSubstance => write!(f, "amount"),
      PhysicalDimension::LuminousIntensity => write!(f, "intensity"),
      PhysicalDimension::Angle => write!(f, "angle"),
    }
  }
}

/// Formats `name^power`, omitting a power of one and parenthesizing
/// fractional powers.
pub(crate) fn format_power(name: impl Display, power: Rational64) -> String {
  if power.is_one() {
    name.to_string()
  } else if power.is_integer() {
    format!("{}^{}", name, power)
  } else {
    format!("{}^({})", name, power)
  }
}

impl Display for Dimension {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut numerator: Vec<String> = Vec::new();
    let mut denominator: Vec<String> = Vec::new();
    for (dim, power) in self.components() {
      if power > Rational64::zero() {
        numerator.push(format_power(dim, power));
      } else {
        denominator.push(format_power(dim, -power));
      }
    }
    if numerator.is_empty() {
      write!(f, "1")?;
    } else {
      write!(f, "{}", numerator.join(" "))?;
    }
    if !denominator.is_empty() {
      write!(f, " / {}", denominator.join(" "))?;
    }
    Ok(())
  }
}
