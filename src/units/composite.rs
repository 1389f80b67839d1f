
use super::dimension::{Dimension, format_power};
use super::prefix::ScalingFactor;
use super::unit::Unit;
use super::value::Operator;
use crate::canonical::float_bits;
use crate::error::UnitError;

use itertools::Itertools;
use num::{CheckedAdd, CheckedMul, One, Rational64, Zero};
use num::pow::Pow;

use std::collections::BTreeMap;
use std::fmt::{self, Formatter, Display};
use std::hash::{Hash, Hasher};
use std::ops::{Mul, Div};

/// A composite unit is a formal product and quotient of unscaled
/// [`Unit`] values raised to rational powers, together with a scalar
/// factor.
///
/// Composite units are always in canonical form: every constructor
/// and every operator goes through one normalization step, which
/// folds each component's scaling factor out of the component,
/// re-keys the component by its unscaled unit, sums repeated
/// exponents, and drops zero exponents and the dimensionless unit.
///
/// The folded scaling factors are kept with exact exponents, and the
/// scalar factor is their product taken in a fixed order. Two
/// composite units built from the same factors therefore have
/// bit-identical scalar factors, whatever order they were multiplied
/// in.
///
/// Exponent arithmetic is exact and fails on `i64` overflow. The
/// `checked_*` methods report this as
/// [`UnitError::ExponentOverflow`]; the operators panic instead.
#[derive(Debug, Clone)]
pub struct CompositeUnit {
  // Keys are unscaled and never the dimensionless unit `one`; all
  // exponents are nonzero.
  base_units: BTreeMap<Unit, Rational64>,
  // Never contains the unscaled factor; all exponents are nonzero.
  scaling_factors: BTreeMap<ScalingFactor, Rational64>,
  // Product of `scaling_factors`, in key order.
  scalar_factor: f64,
}

/// `factor` raised to an exact rational power, using integer
/// exponentiation when the power is whole.
pub(crate) fn scale_power(factor: f64, power: Rational64) -> f64 {
  if factor == 1.0 {
    return 1.0;
  }
  if power.is_integer() {
    if let Ok(n) = i32::try_from(power.to_integer()) {
      return factor.powi(n);
    }
  }
  factor.powf(*power.numer() as f64 / *power.denom() as f64)
}

fn format_scalar(value: f64) -> String {
  let magnitude = value.abs();
  if (1e-4..1e6).contains(&magnitude) {
    format!("{}", value)
  } else {
    format!("{:e}", value)
  }
}

/// Sums the exponents of repeated keys and drops the keys whose
/// exponents cancel. `None` on overflow.
fn sum_exponents<K>(terms: impl IntoIterator<Item = (K, Rational64)>) -> Option<BTreeMap<K, Rational64>>
where K: Hash + Ord {
  terms.into_iter()
    .into_grouping_map()
    .fold(Some(Rational64::zero()), |acc: Option<Rational64>, _: &K, power: Rational64| {
      acc?.checked_add(&power)
    })
    .into_iter()
    .filter_map(|(key, power)| match power {
      Some(power) if power.is_zero() => None,
      Some(power) => Some(Some((key, power))),
      None => Some(None),
    })
    .collect()
}

fn scale_exponents<K>(terms: BTreeMap<K, Rational64>, power: Rational64) -> Option<Vec<(K, Rational64)>> {
  terms.into_iter()
    .map(|(key, exponent)| exponent.checked_mul(&power).map(|exponent| (key, exponent)))
    .collect()
}

fn negate_exponents<K>(terms: BTreeMap<K, Rational64>) -> impl Iterator<Item = (K, Rational64)> {
  terms.into_iter().map(|(key, exponent)| (key, -exponent))
}

fn overflow(operator: Operator) -> UnitError {
  UnitError::ExponentOverflow { operator }
}

impl CompositeUnit {
  /// Constructs the canonical product of the given units raised to
  /// the given powers.
  ///
  /// # Panics
  ///
  /// Panics if the summed exponent of some unit overflows `i64`.
  pub fn new(components: impl IntoIterator<Item = (Unit, Rational64)>) -> Self {
    Self::normalize(components, ScalingFactor::unity())
  }

  /// Constructs the canonical product of the given units raised to
  /// the given powers, times `extra_factor`. Use
  /// [`ScalingFactor::coefficient`] for a bare numeric factor.
  ///
  /// # Panics
  ///
  /// Panics if the summed exponent of some unit overflows `i64`.
  pub fn normalize(components: impl IntoIterator<Item = (Unit, Rational64)>, extra_factor: ScalingFactor) -> Self {
    Self::try_build(components, [(extra_factor, Rational64::one())])
      .unwrap_or_else(|| panic!("{}", overflow(Operator::Mul)))
  }

  fn try_build(
    components: impl IntoIterator<Item = (Unit, Rational64)>,
    scaling: impl IntoIterator<Item = (ScalingFactor, Rational64)>,
  ) -> Option<Self> {
    let mut folded = Vec::new();
    let units = components.into_iter()
      .map(|(unit, power)| {
        folded.push((unit.scaling_factor().clone(), power));
        (unit.unscaled(), power)
      })
      .filter(|(unit, _)| !unit.is_one());
    let base_units = sum_exponents(units)?;
    let scaling_factors = sum_exponents(
      folded.into_iter().chain(scaling).filter(|(factor, _)| !factor.is_unity()),
    )?;
    Some(Self::from_parts(base_units, scaling_factors))
  }

  fn from_parts(base_units: BTreeMap<Unit, Rational64>, scaling_factors: BTreeMap<ScalingFactor, Rational64>) -> Self {
    let scalar_factor = scaling_factors.iter()
      .fold(1.0, |acc, (factor, power)| acc * scale_power(factor.factor(), *power));
    Self { base_units, scaling_factors, scalar_factor }
  }

  /// The unitless composite unit. This serves as the "one" value for
  /// multiplication and division of composite units.
  pub fn unitless() -> Self {
    Self { base_units: BTreeMap::new(), scaling_factors: BTreeMap::new(), scalar_factor: 1.0 }
  }

  pub fn is_unitless(&self) -> bool {
    self.base_units.is_empty() && self.scalar_factor == 1.0
  }

  /// Whether there are no base units. The scalar factor may still be
  /// something other than one.
  pub fn is_empty(&self) -> bool {
    self.base_units.is_empty()
  }

  pub fn len(&self) -> usize {
    self.base_units.len()
  }

  pub fn scalar_factor(&self) -> f64 {
    self.scalar_factor
  }

  /// An iterator over the distinct base units in this composite unit,
  /// in a deterministic order, tagged with their exponents. All
  /// returned exponents are nonzero.
  pub fn iter(&self) -> impl Iterator<Item = (&Unit, Rational64)> {
    self.base_units.iter().map(|(unit, power)| (unit, *power))
  }

  /// The scaling factors folded into the scalar factor, with their
  /// exponents.
  pub fn scaling_factors(&self) -> impl Iterator<Item = (&ScalingFactor, Rational64)> {
    self.scaling_factors.iter().map(|(factor, power)| (factor, *power))
  }

  /// The exponent of `unit` in this composite unit, or zero if it
  /// does not occur. Any scaling on `unit` is ignored.
  pub fn exponent_of(&self, unit: &Unit) -> Rational64 {
    self.base_units.get(&unit.unscaled())
      .copied()
      .unwrap_or_else(Rational64::zero)
  }

  /// The reciprocal of `self`.
  pub fn recip(self) -> Self {
    Self::from_parts(
      negate_exponents(self.base_units).collect(),
      negate_exponents(self.scaling_factors).collect(),
    )
  }

  /// The same base units with a scalar factor of one.
  pub fn unscaled(&self) -> Self {
    Self { base_units: self.base_units.clone(), scaling_factors: BTreeMap::new(), scalar_factor: 1.0 }
  }

  /// Whether a value in this unit can be re-expressed in `other`,
  /// i.e. both have the same base units with the same exponents and
  /// differ at most in their scalar factor.
  pub fn is_convertible_to(&self, other: &CompositeUnit) -> bool {
    self.base_units == other.base_units
  }

  /// The physical dimension of the composite unit.
  pub fn dimension(&self) -> Dimension {
    self.base_units.iter()
      .map(|(unit, power)| unit.dimension().pow(*power))
      .fold(Dimension::one(), |acc, dim| acc * dim)
  }

  pub fn checked_mul(self, rhs: CompositeUnit) -> Result<Self, UnitError> {
    Self::try_build(
      self.base_units.into_iter().chain(rhs.base_units),
      self.scaling_factors.into_iter().chain(rhs.scaling_factors),
    ).ok_or_else(|| overflow(Operator::Mul))
  }

  pub fn checked_div(self, rhs: CompositeUnit) -> Result<Self, UnitError> {
    Self::try_build(
      self.base_units.into_iter().chain(negate_exponents(rhs.base_units)),
      self.scaling_factors.into_iter().chain(negate_exponents(rhs.scaling_factors)),
    ).ok_or_else(|| overflow(Operator::Div))
  }

  pub fn checked_pow(self, power: Rational64) -> Result<Self, UnitError> {
    let base_units = scale_exponents(self.base_units, power).ok_or_else(|| overflow(Operator::Pow))?;
    let scaling_factors = scale_exponents(self.scaling_factors, power).ok_or_else(|| overflow(Operator::Pow))?;
    Self::try_build(base_units, scaling_factors).ok_or_else(|| overflow(Operator::Pow))
  }
}

impl From<Unit> for CompositeUnit {
  fn from(unit: Unit) -> Self {
    CompositeUnit::new([(unit, Rational64::one())])
  }
}

impl From<ScalingFactor> for CompositeUnit {
  fn from(scaling_factor: ScalingFactor) -> Self {
    CompositeUnit::normalize([], scaling_factor)
  }
}

// Scalar factors compare by bit pattern, matching `Hash`.
impl PartialEq for CompositeUnit {
  fn eq(&self, other: &Self) -> bool {
    float_bits(self.scalar_factor) == float_bits(other.scalar_factor) && self.base_units == other.base_units
  }
}

impl Eq for CompositeUnit {}

impl Hash for CompositeUnit {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.base_units.hash(state);
    float_bits(self.scalar_factor).hash(state);
  }
}

impl Display for CompositeUnit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut numerator: Vec<String> = Vec::new();
    let mut denominator: Vec<String> = Vec::new();
    if self.scalar_factor != 1.0 {
      numerator.push(format_scalar(self.scalar_factor));
    }
    for (unit, power) in self.iter() {
      if power > Rational64::zero() {
        numerator.push(format_power(unit, power));
      } else {
        denominator.push(format_power(unit, -power));
      }
    }
    if numerator.is_empty() {
      write!(f, "1")?;
    } else {
      write!(f, "{}", numerator.iter().join(" "))?;
    }
    if !denominator.is_empty() {
      write!(f, " / {}", denominator.iter().join(" "))?;
    }
    Ok(())
  }
}

impl Mul for CompositeUnit {
  type Output = CompositeUnit;

  fn mul(self, rhs: Self) -> Self::Output {
    self.checked_mul(rhs).unwrap_or_else(|err| panic!("{}", err))
  }
}

impl Div for CompositeUnit {
  type Output = CompositeUnit;

  fn div(self, rhs: Self) -> Self::Output {
    self.checked_div(rhs).unwrap_or_else(|err| panic!("{}", err))
  }
}

impl Pow<Rational64> for CompositeUnit {
  type Output = CompositeUnit;

  fn pow(self, rhs: Rational64) -> Self::Output {
    self.checked_pow(rhs).unwrap_or_else(|err| panic!("{}", err))
  }
}

impl Pow<i64> for CompositeUnit {
  type Output = CompositeUnit;

  fn pow(self, rhs: i64) -> Self::Output {
    self.pow(Rational64::from_integer(rhs))
  }
}

impl Pow<Rational64> for Unit {
  type Output = CompositeUnit;

  fn pow(self, rhs: Rational64) -> Self::Output {
    CompositeUnit::new([(self, rhs)])
  }
}

impl Pow<i64> for Unit {
  type Output = CompositeUnit;

  fn pow(self, rhs: i64) -> Self::Output {
    self.pow(Rational64::from_integer(rhs))
  }
}

impl One for CompositeUnit {
  fn one() -> Self {
    CompositeUnit::unitless()
  }

  fn is_one(&self) -> bool {
    self.is_unitless()
  }
}
