
use crate::canonical::{Canonical, Canonicalizer, CanonicalKey, KeyValue, float_bits};
use crate::error::UnitError;

use once_cell::sync::Lazy;

use std::cmp::Ordering;
use std::fmt::{self, Formatter, Display, Debug};
use std::hash::{Hash, Hasher};
use std::ops::{Mul, Div};
use std::sync::Arc;

/// A named multiplicative prefix, such as kilo (`1e3`) or kibi
/// (`2^10`).
///
/// Scaling factors are canonical: two factors built from the same
/// name, symbol, and factor are the same shared instance, and
/// equality and hashing are by identity.
///
/// The multiplier is always finite and nonzero. [`ScalingFactor::new`]
/// rejects anything else, and products and quotients of factors
/// saturate at the largest and smallest positive `f64` magnitudes
/// rather than overflowing to infinity or underflowing to zero.
#[derive(Clone)]
pub struct ScalingFactor(Arc<ScalingFactorData>);

#[derive(Debug)]
struct ScalingFactorData {
  name: String,
  symbol: String,
  factor: f64,
}

static SCALING_FACTORS: Lazy<Canonicalizer<ScalingFactor>> =
  Lazy::new(|| Canonicalizer::new("ScalingFactor"));

impl Canonical for ScalingFactor {
  fn registry() -> &'static Canonicalizer<Self> {
    &SCALING_FACTORS
  }
}

impl ScalingFactor {
  /// Constructs (or retrieves) the canonical scaling factor with the
  /// given name, symbol, and multiplier. The multiplier must be
  /// finite and nonzero.
  pub fn new(name: impl Into<String>, symbol: impl Into<String>, factor: f64) -> Result<Self, UnitError> {
    if factor.is_nan() {
      return Err(UnitError::invalid_construction("unhashable value for argument 'factor'"));
    }
    if factor.is_infinite() || factor == 0.0 {
      return Err(UnitError::invalid_construction(format!("scaling factor must be finite and nonzero, got {}", factor)));
    }
    Ok(Self::intern_parts(name.into(), symbol.into(), factor))
  }

  /// An unnamed factor, for carrying a bare numeric coefficient in a
  /// [`CompositeUnit`](super::composite::CompositeUnit). The
  /// coefficient `1` is the unscaled factor itself.
  pub fn coefficient(factor: f64) -> Result<Self, UnitError> {
    Self::new("", "", factor)
  }

  /// Interns without validating `factor`. Used for constants and for
  /// factors derived from already-valid ones.
  pub(crate) fn intern_parts(name: String, symbol: String, factor: f64) -> Self {
    let key = Self::canonical_key(&name, &symbol, factor);
    Self::intern(key, || ScalingFactor(Arc::new(ScalingFactorData { name, symbol, factor })))
  }

  /// The key a scaling factor is registered under; field names match
  /// the constructor parameters `(name, symbol, factor)`.
  pub fn canonical_key(name: &str, symbol: &str, factor: f64) -> CanonicalKey {
    CanonicalKey::from_fields([
      ("name", KeyValue::from(name)),
      ("symbol", KeyValue::from(symbol)),
      ("factor", KeyValue::from(factor)),
    ])
  }

  /// The unscaled factor, with empty name and symbol and multiplier 1.
  pub fn unity() -> Self {
    static UNITY: Lazy<ScalingFactor> =
      Lazy::new(|| ScalingFactor::intern_parts(String::new(), String::new(), 1.0));
    UNITY.clone()
  }

  pub fn name(&self) -> &str {
    &self.0.name
  }

  pub fn symbol(&self) -> &str {
    &self.0.symbol
  }

  pub fn factor(&self) -> f64 {
    self.0.factor
  }

  pub fn is_unity(&self) -> bool {
    *self == Self::unity()
  }

  /// The decimal SI prefixes, from quetta down to quecto. The unscaled
  /// factor is not included.
  pub fn si_prefixes() -> Vec<ScalingFactor> {
    vec![
      quetta(), ronna(), yotta(), zetta(), exa(), peta(), tera(), giga(), mega(), kilo(),
      hecto(), deca(), deci(), centi(), milli(), micro(), nano(), pico(), femto(), atto(),
      zepto(), yocto(), ronto(), quecto(),
    ]
  }

  /// The binary IEC prefixes, from yobi down to kibi.
  pub fn iec_prefixes() -> Vec<ScalingFactor> {
    vec![yobi(), zebi(), exbi(), pebi(), tebi(), gibi(), mebi(), kibi()]
  }

  /// Looks up a prefix (SI or IEC) by its symbol.
  pub fn from_symbol(symbol: &str) -> Option<ScalingFactor> {
    Self::si_prefixes().into_iter()
      .chain(Self::iec_prefixes())
      .find(|prefix| prefix.symbol() == symbol)
  }

  fn total_cmp(&self, other: &Self) -> Ordering {
    self.factor().total_cmp(&other.factor())
      .then_with(|| self.name().cmp(other.name()))
      .then_with(|| self.symbol().cmp(other.symbol()))
  }
}

macro_rules! scaling_factors {
  ($($(#[$meta:meta])* $fn_name:ident => ($name:expr, $symbol:expr, $factor:expr);)*) => {
    $(
      $(#[$meta])*
      pub fn $fn_name() -> ScalingFactor {
        static VALUE: Lazy<ScalingFactor> =
          Lazy::new(|| ScalingFactor::intern_parts($name.to_owned(), $symbol.to_owned(), $factor));
        VALUE.clone()
      }
    )*
  };
}

scaling_factors! {
  // SI prefixes
  quetta => ("quetta", "Q", 1e30);
  ronna => ("ronna", "R", 1e27);
  yotta => ("yotta", "Y", 1e24);
  zetta => ("zetta", "Z", 1e21);
  exa => ("exa", "E", 1e18);
  peta => ("peta", "P", 1e15);
  tera => ("tera", "T", 1e12);
  giga => ("giga", "G", 1e9);
  mega => ("mega", "M", 1e6);
  kilo => ("kilo", "k", 1e3);
  hecto => ("hecto", "h", 1e2);
  deca => ("deca", "da", 1e1);
  deci => ("deci", "d", 1e-1);
  centi => ("centi", "c", 1e-2);
  milli => ("milli", "m", 1e-3);
  micro => ("micro", "μ", 1e-6);
  nano => ("nano", "n", 1e-9);
  pico => ("pico", "p", 1e-12);
  femto => ("femto", "f", 1e-15);
  atto => ("atto", "a", 1e-18);
  zepto => ("zepto", "z", 1e-21);
  yocto => ("yocto", "y", 1e-24);
  ronto => ("ronto", "r", 1e-27);
  quecto => ("quecto", "q", 1e-30);
  // IEC prefixes
  yobi => ("yobi", "Yi", 2f64.powi(80));
  zebi => ("zebi", "Zi", 2f64.powi(70));
  exbi => ("exbi", "Ei", 2f64.powi(60));
  pebi => ("pebi", "Pi", 2f64.powi(50));
  tebi => ("tebi", "Ti", 2f64.powi(40));
  gibi => ("gibi", "Gi", 2f64.powi(30));
  mebi => ("mebi", "Mi", 2f64.powi(20));
  kibi => ("kibi", "ki", 2f64.powi(10));
}

/// The unscaled factor. Shorthand for [`ScalingFactor::unity`].
pub fn uni() -> ScalingFactor {
  ScalingFactor::unity()
}

fn join(separator: &str, lhs: &str, rhs: &str) -> String {
  format!("{}{}{}", lhs, separator, rhs)
}

/// Clamps the product or quotient of two finite nonzero factors back
/// into the finite nonzero range. Such a result is never NaN.
fn saturate(factor: f64) -> f64 {
  if factor.is_infinite() {
    f64::MAX.copysign(factor)
  } else if factor == 0.0 {
    f64::MIN_POSITIVE.copysign(factor)
  } else {
    factor
  }
}

impl PartialEq for ScalingFactor {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for ScalingFactor {}

impl Hash for ScalingFactor {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.name.hash(state);
    self.0.symbol.hash(state);
    float_bits(self.0.factor).hash(state);
  }
}

impl PartialOrd for ScalingFactor {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for ScalingFactor {
  fn cmp(&self, other: &Self) -> Ordering {
    if self == other {
      Ordering::Equal
    } else {
      self.total_cmp(other)
    }
  }
}

impl Debug for ScalingFactor {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    f.debug_struct("ScalingFactor")
      .field("name", &self.0.name)
      .field("symbol", &self.0.symbol)
      .field("factor", &self.0.factor)
      .finish()
  }
}

impl Display for ScalingFactor {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "<{}({}) = {:e}>", self.name(), self.symbol(), self.factor())
  }
}

impl Mul for ScalingFactor {
  type Output = ScalingFactor;

  fn mul(self, rhs: Self) -> Self::Output {
    if self.is_unity() {
      rhs
    } else if rhs.is_unity() {
      self
    } else {
      ScalingFactor::intern_parts(
        join("+", self.name(), rhs.name()),
        join("+", self.symbol(), rhs.symbol()),
        saturate(self.factor() * rhs.factor()),
      )
    }
  }
}

impl Div for ScalingFactor {
  type Output = ScalingFactor;

  fn div(self, rhs: Self) -> Self::Output {
    if rhs.is_unity() {
      self
    } else if self == rhs {
      ScalingFactor::unity()
    } else {
      ScalingFactor::intern_parts(
        join("/", self.name(), rhs.name()),
        join("/", self.symbol(), rhs.symbol()),
        saturate(self.factor() / rhs.factor()),
      )
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  use approx::assert_relative_eq;

  #[test]
  fn test_scaling_factors_are_canonical() {
    let a = ScalingFactor::new("kilo", "k", 1e3).unwrap();
    let b = ScalingFactor::new(String::from("kilo"), "k", 1000.0).unwrap();
    assert_eq!(a, b);
    assert_eq!(a, kilo());
    assert_ne!(kilo(), mega());
    assert_ne!(ScalingFactor::new("kilo", "K", 1e3).unwrap(), kilo());
  }

  #[test]
  fn test_invalid_scaling_factors() {
    assert!(matches!(
      ScalingFactor::new("bad", "b", f64::NAN),
      Err(UnitError::InvalidConstruction { .. }),
    ));
    assert!(matches!(
      ScalingFactor::new("bad", "b", 0.0),
      Err(UnitError::InvalidConstruction { .. }),
    ));
    assert!(matches!(
      ScalingFactor::new("bad", "b", f64::INFINITY),
      Err(UnitError::InvalidConstruction { .. }),
    ));
  }

  #[test]
  fn test_mul_joins_names() {
    let product = kilo() * mega();
    assert_eq!(product.name(), "kilo+mega");
    assert_eq!(product.symbol(), "k+M");
    assert_relative_eq!(product.factor(), 1e9);
    assert_ne!(product, giga());
    assert_eq!(product, kilo() * mega());
  }

  #[test]
  fn test_div_joins_names() {
    let quotient = kibi() / kilo();
    assert_eq!(quotient.name(), "kibi/kilo");
    assert_eq!(quotient.symbol(), "ki/k");
    assert_relative_eq!(quotient.factor(), 1.024);
  }

  #[test]
  fn test_unity_is_identity() {
    assert_eq!(uni() * kilo(), kilo());
    assert_eq!(kilo() * uni(), kilo());
    assert_eq!(kilo() / uni(), kilo());
    assert_eq!(kilo() / kilo(), uni());
    assert_eq!(uni() * uni(), uni());
    let inverse = uni() / kilo();
    assert_eq!(inverse.name(), "/kilo");
    assert_relative_eq!(inverse.factor(), 1e-3);
  }

  #[test]
  fn test_products_saturate() {
    let huge = (0..10).fold(quetta(), |acc, _| acc * quetta());
    assert_eq!(huge.factor(), f64::MAX);
    let ratio = huge.clone() / (huge.clone() * kilo());
    assert!(ratio.factor().is_finite());
    assert_eq!(ratio.factor(), 1.0);
    let tiny = (0..10).fold(quecto(), |acc, _| acc * quecto());
    assert_eq!(tiny.factor(), f64::MIN_POSITIVE);
    let negative = ScalingFactor::new("neg", "-", -1e300).unwrap() * quetta();
    assert_eq!(negative.factor(), -f64::MAX);
  }

  #[test]
  fn test_coefficient() {
    let two = ScalingFactor::coefficient(2.0).unwrap();
    assert_eq!(two.name(), "");
    assert_eq!(two.factor(), 2.0);
    assert_eq!(two, ScalingFactor::coefficient(2.0).unwrap());
    assert_eq!(ScalingFactor::coefficient(1.0).unwrap(), uni());
    assert!(ScalingFactor::coefficient(f64::NAN).is_err());
  }

  #[test]
  fn test_prefix_tables() {
    assert_eq!(ScalingFactor::si_prefixes().len(), 24);
    assert_eq!(ScalingFactor::iec_prefixes().len(), 8);
    assert_eq!(ScalingFactor::from_symbol("Mi"), Some(mebi()));
    assert_eq!(ScalingFactor::from_symbol("μ"), Some(micro()));
    assert_eq!(ScalingFactor::from_symbol("x"), None);
    assert_eq!(kibi().factor(), 1024.0);
  }

  #[test]
  fn test_display() {
    assert_eq!(kilo().to_string(), "<kilo(k) = 1e3>");
    assert_eq!(milli().to_string(), "<milli(m) = 1e-3>");
  }

  #[test]
  fn test_ordering_is_by_factor() {
    let mut prefixes = vec![kilo(), milli(), mega(), uni()];
    prefixes.sort();
    assert_eq!(prefixes, vec![milli(), uni(), kilo(), mega()]);
  }
}
