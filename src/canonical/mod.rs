
//! Interning of immutable values by a normalized key, so that values
//! which are equal by construction are also identical.

mod key;
mod signature;

pub use key::{CanonicalKey, KeyValue};
pub(crate) use key::float_bits;
pub use signature::{Arguments, Parameter, ParameterKind, Signature};

use parking_lot::Mutex;

use std::collections::HashMap;

/// A per-type registry of canonical instances.
///
/// `T` is expected to be a cheap handle (typically wrapping an `Arc`),
/// since every lookup hands out a clone of the registered instance.
#[derive(Debug)]
pub struct Canonicalizer<T> {
  type_name: &'static str,
  instances: Mutex<HashMap<CanonicalKey, T>>,
}

/// A type whose instances are interned in a [`Canonicalizer`].
pub trait Canonical: Clone + Sized + 'static {
  fn registry() -> &'static Canonicalizer<Self>;

  /// Returns the canonical instance for `key`, invoking `builder` only
  /// if no instance exists yet.
  fn intern(key: CanonicalKey, builder: impl FnOnce() -> Self) -> Self {
    Self::registry().get_or_create(key, builder)
  }
}

impl<T: Clone> Canonicalizer<T> {
  pub fn new(type_name: &'static str) -> Self {
    Self {
      type_name,
      instances: Mutex::new(HashMap::new()),
    }
  }

  /// Looks up `key`, constructing and registering a new instance with
  /// `builder` if it is absent. The lookup and the insertion happen
  /// under one lock acquisition, so concurrent requests for the same
  /// key always observe a single instance.
  ///
  /// `builder` must not construct values of this same type, as the
  /// registry lock is held while it runs.
  pub fn get_or_create(&self, key: CanonicalKey, builder: impl FnOnce() -> T) -> T {
    let mut instances = self.instances.lock();
    if let Some(existing) = instances.get(&key) {
      return existing.clone();
    }
    log::trace!("canonicalizer[{}]: new instance for {}", self.type_name, key);
    let instance = builder();
    instances.insert(key, instance.clone());
    instance
  }

  pub fn get(&self, key: &CanonicalKey) -> Option<T> {
    self.instances.lock().get(key).cloned()
  }

  pub(crate) fn len(&self) -> usize {
    self.instances.lock().len()
  }
}
