
use crate::units::dimension::PhysicalDimension;
use crate::units::prefix::ScalingFactor;

use itertools::Itertools;

use std::fmt::{self, Formatter, Display};
use std::hash::{Hash, Hasher};

/// A single constructor argument, in a form that can participate in a
/// [`CanonicalKey`].
#[derive(Debug, Clone)]
pub enum KeyValue {
  None,
  Bool(bool),
  Int(i64),
  Float(f64),
  Str(String),
  Dimension(PhysicalDimension),
  Factor(ScalingFactor),
  Tuple(Vec<KeyValue>),
}

/// A normalized set of constructor arguments: `(parameter_name,
/// value)` pairs sorted by parameter name. Two keys are equal exactly
/// when they bind the same values to the same names, regardless of
/// the order or shape in which those arguments were supplied.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CanonicalKey {
  fields: Vec<(String, KeyValue)>,
}

/// Bit pattern used to hash and compare floats. Positive and negative
/// zero collapse onto one key, as do all NaN payloads.
pub(crate) fn float_bits(value: f64) -> u64 {
  if value == 0.0 {
    0
  } else if value.is_nan() {
    f64::NAN.to_bits()
  } else {
    value.to_bits()
  }
}

impl KeyValue {
  /// Whether this value may be used as part of a key. NaN has no
  /// meaningful identity, so any value containing one is rejected.
  pub fn is_hashable(&self) -> bool {
    match self {
      KeyValue::Float(x) => !x.is_nan(),
      KeyValue::Tuple(xs) => xs.iter().all(KeyValue::is_hashable),
      _ => true,
    }
  }
}

impl CanonicalKey {
  /// Builds a key from named fields in any order. Later duplicates of
  /// a name are kept side by side; callers which need uniqueness
  /// (such as [`Signature::bind`](super::Signature::bind)) check for
  /// it before calling.
  pub fn from_fields<S>(fields: impl IntoIterator<Item = (S, KeyValue)>) -> Self
  where S: Into<String> {
    let fields = fields.into_iter()
      .map(|(name, value)| (name.into(), value))
      .sorted_by(|a, b| a.0.cmp(&b.0))
      .collect();
    Self { fields }
  }

  pub fn fields(&self) -> &[(String, KeyValue)] {
    &self.fields
  }

  pub fn get(&self, name: &str) -> Option<&KeyValue> {
    self.fields.iter()
      .find(|(field_name, _)| field_name == name)
      .map(|(_, value)| value)
  }

  pub fn len(&self) -> usize {
    self.fields.len()
  }

  pub fn is_empty(&self) -> bool {
    self.fields.is_empty()
  }
}

impl PartialEq for KeyValue {
  fn eq(&self, other: &Self) -> bool {
    match (self, other) {
      (KeyValue::None, KeyValue::None) => true,
      (KeyValue::Bool(a), KeyValue::Bool(b)) => a == b,
      (KeyValue::Int(a), KeyValue::Int(b)) => a == b,
      (KeyValue::Float(a), KeyValue::Float(b)) => float_bits(*a) == float_bits(*b),
      (KeyValue::Str(a), KeyValue::Str(b)) => a == b,
      (KeyValue::Dimension(a), KeyValue::Dimension(b)) => a == b,
      (KeyValue::Factor(a), KeyValue::Factor(b)) => a == b,
      (KeyValue::Tuple(a), KeyValue::Tuple(b)) => a == b,
      _ => false,
    }
  }
}

impl Eq for KeyValue {}

impl Hash for KeyValue {
  fn hash<H: Hasher>(&self, state: &mut H) {
    std::mem::discriminant(self).hash(state);
    match self {
      KeyValue::None => {}
      KeyValue::Bool(x) => x.hash(state),
      KeyValue::Int(x) => x.hash(state),
      KeyValue::Float(x) => float_bits(*x).hash(state),
      KeyValue::Str(x) => x.hash(state),
      KeyValue::Dimension(x) => x.hash(state),
      KeyValue::Factor(x) => x.hash(state),
      KeyValue::Tuple(xs) => xs.hash(state),
    }
  }
}

impl From<bool> for KeyValue {
  fn from(value: bool) -> Self {
    KeyValue::Bool(value)
  }
}

impl From<i64> for KeyValue {
  fn from(value: i64) -> Self {
    KeyValue::Int(value)
  }
}

impl From<i32> for KeyValue {
  fn from(value: i32) -> Self {
    KeyValue::Int(value.into())
  }
}

impl From<f64> for KeyValue {
  fn from(value: f64) -> Self {
    KeyValue::Float(value)
  }
}

impl From<&str> for KeyValue {
  fn from(value: &str) -> Self {
    KeyValue::Str(value.to_owned())
  }
}

impl From<String> for KeyValue {
  fn from(value: String) -> Self {
    KeyValue::Str(value)
  }
}

impl From<PhysicalDimension> for KeyValue {
  fn from(value: PhysicalDimension) -> Self {
    KeyValue::Dimension(value)
  }
}

impl From<ScalingFactor> for KeyValue {
  fn from(value: ScalingFactor) -> Self {
    KeyValue::Factor(value)
  }
}

impl<T: Into<KeyValue>> From<Option<T>> for KeyValue {
  fn from(value: Option<T>) -> Self {
    value.map_or(KeyValue::None, Into::into)
  }
}

impl<T: Into<KeyValue>> From<Vec<T>> for KeyValue {
  fn from(values: Vec<T>) -> Self {
    KeyValue::Tuple(values.into_iter().map(Into::into).collect())
  }
}

impl Display for KeyValue {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    match self {
      KeyValue::None => write!(f, "None"),
      KeyValue::Bool(x) => write!(f, "{}", x),
      KeyValue::Int(x) => write!(f, "{}", x),
      KeyValue::Float(x) => write!(f, "{:?}", x),
      KeyValue::Str(x) => write!(f, "{:?}", x),
      KeyValue::Dimension(x) => write!(f, "{}", x),
      KeyValue::Factor(x) => write!(f, "{}", x),
      KeyValue::Tuple(xs) => write!(f, "({})", xs.iter().join(", ")),
    }
  }
}

impl Display for CanonicalKey {
  fn fmt(&self, f: &mut Formatter) -> fmt::Result {
    let fields = self.fields.iter()
      .map(|(name, value)| format!("{}={}", name, value))
      .join(", ");
    write!(f, "({})", fields)
  }
}
