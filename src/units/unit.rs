
use super::dimension::{Dimension, PhysicalDimension};
use super::prefix::ScalingFactor;
use crate::canonical::{Canonical, Canonicalizer, CanonicalKey, KeyValue, Signature};

use once_cell::sync::Lazy;

use std::cmp::Ordering;
use std::fmt::{self, Formatter, Display, Debug};
use std::hash::{Hash, Hasher};
use std::ops::{Mul, Div};
use std::sync::Arc;

/// An atomic physical unit, such as the meter or the kilogram.
///
/// A unit is identified by its dimension, name, symbol, optional
/// referent, and scaling factor. Units are canonical: constructing a
/// unit twice from equal fields yields the same shared instance, so
/// equality is identity and units are cheap to clone and to use as
/// map keys. A kilogram and a gram are distinct units which differ
/// only in their scaling factor.
#[derive(Clone)]
pub struct Unit(Arc<UnitData>);

#[derive(Debug)]
struct UnitData {
  physical_dimension: PhysicalDimension,
  name: String,
  symbol: String,
  // Distinguishes physically distinct units sharing a dimension (for
  // instance, decays per second versus cycles per second). Participates
  // in identity.
  referent: Option<String>,
  scaling_factor: ScalingFactor,
}

/// Field-by-field constructor for [`Unit`], also used by
/// [`Unit::but`] to produce modified copies.
#[derive(Debug, Clone)]
pub struct UnitBuilder {
  physical_dimension: PhysicalDimension,
  name: String,
  symbol: String,
  referent: Option<String>,
  scaling_factor: ScalingFactor,
}

static UNITS: Lazy<Canonicalizer<Unit>> = Lazy::new(|| Canonicalizer::new("Unit"));

impl Canonical for Unit {
  fn registry() -> &'static Canonicalizer<Self> {
    &UNITS
  }
}

impl Unit {
  /// Constructs (or retrieves) the canonical unscaled unit with no
  /// referent.
  pub fn new(physical_dimension: PhysicalDimension, name: impl Into<String>, symbol: impl Into<String>) -> Self {
    Self::builder(physical_dimension, name, symbol).build()
  }

  pub fn builder(physical_dimension: PhysicalDimension, name: impl Into<String>, symbol: impl Into<String>) -> UnitBuilder {
    UnitBuilder {
      physical_dimension,
      name: name.into(),
      symbol: symbol.into(),
      referent: None,
      scaling_factor: ScalingFactor::unity(),
    }
  }

  /// The declared constructor signature of a unit:
  /// `(physical_dimension, name, symbol, referent=None,
  /// scaling_factor=uni)`. Binding any call shape against it yields
  /// the same key the unit is registered under.
  pub fn signature() -> &'static Signature {
    static SIGNATURE: Lazy<Signature> = Lazy::new(|| {
      Signature::new()
        .positional("physical_dimension")
        .positional("name")
        .positional("symbol")
        .positional_with_default("referent", KeyValue::None)
        .positional_with_default("scaling_factor", ScalingFactor::unity())
    });
    &SIGNATURE
  }

  /// A copy of this unit with some fields replaced. The returned
  /// builder starts out with every field of `self`.
  pub fn but(&self) -> UnitBuilder {
    UnitBuilder {
      physical_dimension: self.0.physical_dimension,
      name: self.0.name.clone(),
      symbol: self.0.symbol.clone(),
      referent: self.0.referent.clone(),
      scaling_factor: self.0.scaling_factor.clone(),
    }
  }

  /// This unit with its scaling factor stripped. This is the form in
  /// which units are stored inside a
  /// [`CompositeUnit`](super::composite::CompositeUnit).
  pub fn unscaled(&self) -> Unit {
    if self.0.scaling_factor.is_unity() {
      self.clone()
    } else {
      self.but().scaling_factor(ScalingFactor::unity()).build()
    }
  }

  pub fn physical_dimension(&self) -> PhysicalDimension {
    self.0.physical_dimension
  }

  pub fn dimension(&self) -> Dimension {
    Dimension::singleton(self.0.physical_dimension)
  }

  pub fn name(&self) -> &str {
    &self.0.name
  }

  pub fn symbol(&self) -> &str {
    &self.0.symbol
  }

  pub fn referent(&self) -> Option<&str> {
    self.0.referent.as_deref()
  }

  pub fn scaling_factor(&self) -> &ScalingFactor {
    &self.0.scaling_factor
  }

  /// Whether this is the unscaled nondimensional unit with empty name
  /// and symbol and no referent.
  pub fn is_one(&self) -> bool {
    self.0.physical_dimension == PhysicalDimension::Nondimensional &&
      self.0.name.is_empty() &&
      self.0.symbol.is_empty() &&
      self.0.referent.is_none() &&
      self.0.scaling_factor.is_unity()
  }

  fn field_cmp(&self, other: &Self) -> Ordering {
    self.0.physical_dimension.cmp(&other.0.physical_dimension)
      .then_with(|| self.0.name.cmp(&other.0.name))
      .then_with(|| self.0.symbol.cmp(&other.0.symbol))
      .then_with(|| self.0.referent.cmp(&other.0.referent))
      .then_with(|| self.0.scaling_factor.cmp(&other.0.scaling_factor))
  }
}

impl UnitBuilder {
  pub fn physical_dimension(mut self, physical_dimension: PhysicalDimension) -> Self {
    self.physical_dimension = physical_dimension;
    self
  }

  pub fn name(mut self, name: impl Into<String>) -> Self {
    self.name = name.into();
    self
  }

  pub fn symbol(mut self, symbol: impl Into<String>) -> Self {
    self.symbol = symbol.into();
    self
  }

  pub fn referent(mut self, referent: impl Into<String>) -> Self {
    self.referent = Some(referent.into());
    self
  }

  pub fn no_referent(mut self) -> Self {
    self.referent = None;
    self
  }

  pub fn scaling_factor(mut self, scaling_factor: ScalingFactor) -> Self {
    self.scaling_factor = scaling_factor;
    self
  }

  /// The key the built unit will be registered under.
  pub fn canonical_key(&self) -> CanonicalKey {
    CanonicalKey::from_fields([
      ("physical_dimension", KeyValue::from(self.physical_dimension)),
      ("name", KeyValue::from(self.name.as_str())),
      ("symbol", KeyValue::from(self.symbol.as_str())),
      ("referent", KeyValue::from(self.referent.clone())),
      ("scaling_factor", KeyValue::from(self.scaling_factor.clone())),
    ])
  }

  pub fn build(self) -> Unit {
    let key = self.canonical_key();
    Unit::intern(key, || Unit(Arc::new(UnitData {
      physical_dimension: self.physical_dimension,
      name: self.name,
      symbol: self.symbol,
      referent: self.referent,
      scaling_factor: self.scaling_factor,
    })))
  }
}

impl PartialEq for Unit {
  fn eq(&self, other: &Self) -> bool {
    Arc::ptr_eq(&self.0, &other.0)
  }
}

impl Eq for Unit {}

impl Hash for Unit {
  fn hash<H: Hasher>(&self, state: &mut H) {
    self.0.physical_dimension.hash(state);
    self.0.name.hash(state);
    self.0.symbol.hash(state);
    self.0.referent.hash(state);
    self.0.scaling_factor.hash(state);
  }
}

impl PartialOrd for Unit {
  fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
    Some(self.cmp(other))
  }
}

impl Ord for Unit {
  fn cmp(&self, other: &Self) -> Ordering {
    if self == other {
      Ordering::Equal
    } else {
      self.field_cmp(other)
    }
  }
}

impl Debug for Unit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let mut debug = f.debug_struct("Unit");
    debug.field("physical_dimension", &self.0.physical_dimension)
      .field("name", &self.0.name)
      .field("symbol", &self.0.symbol);
    if let Some(referent) = &self.0.referent {
      debug.field("referent", referent);
    }
    if !self.0.scaling_factor.is_unity() {
      debug.field("scaling_factor", &self.0.scaling_factor);
    }
    debug.finish()
  }
}

impl Display for Unit {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    write!(f, "{}{}", self.0.scaling_factor.symbol(), self.0.symbol)?;
    if let Some(referent) = &self.0.referent {
      write!(f, "[{}]", referent)?;
    }
    Ok(())
  }
}

impl Mul<ScalingFactor> for Unit {
  type Output = Unit;

  fn mul(self, rhs: ScalingFactor) -> Unit {
    let scaling_factor = self.0.scaling_factor.clone() * rhs;
    self.but().scaling_factor(scaling_factor).build()
  }
}

impl Div<ScalingFactor> for Unit {
  type Output = Unit;

  fn div(self, rhs: ScalingFactor) -> Unit {
    let scaling_factor = self.0.scaling_factor.clone() / rhs;
    self.but().scaling_factor(scaling_factor).build()
  }
}

impl Mul<Unit> for ScalingFactor {
  type Output = Unit;

  fn mul(self, rhs: Unit) -> Unit {
    rhs * self
  }
}
