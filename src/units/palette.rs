
//! The fixed palette of named units.
//!
//! Base units are constructed directly. Every derived unit is built
//! from them purely through the unit operators, so each one is in
//! canonical form and its type is whatever the operators produce: a
//! prefixed base unit stays a [`Unit`], a product of units is a
//! [`CompositeUnit`], and anything carrying a numeric coefficient is a
//! [`Quantity`]. Each constant is built once, on first use.

use super::composite::CompositeUnit;
use super::dimension::PhysicalDimension;
use super::prefix::{ScalingFactor, kilo};
use super::quantity::Quantity;
use super::unit::Unit;
use crate::canonical::Canonical;

use num::pow::Pow;
use once_cell::sync::Lazy;

use std::f64::consts::PI;

macro_rules! palette {
  ($($(#[$meta:meta])* $fn_name:ident: $ty:ty = $value:expr;)*) => {
    $(
      $(#[$meta])*
      pub fn $fn_name() -> $ty {
        static VALUE: Lazy<$ty> = Lazy::new(|| $value);
        VALUE.clone()
      }
    )*

    /// Forces every palette constant, including the prefixes. Calling
    /// this is never required, since each constant is built on first
    /// use, but it moves the cost of construction to a known point.
    pub fn init() {
      static INIT: Lazy<()> = Lazy::new(|| {
        let prefixes = ScalingFactor::si_prefixes().len() + ScalingFactor::iec_prefixes().len();
        $(let _ = $fn_name();)*
        log::debug!(
          "unit palette initialized: {} prefixes, {} named units ({} interned factors, {} interned units)",
          prefixes,
          [$(stringify!($fn_name)),*].len(),
          ScalingFactor::registry().len(),
          Unit::registry().len(),
        );
      });
      Lazy::force(&INIT);
    }
  };
}

palette! {
  // SI base units
  /// The dimensionless unit. It never appears inside a composite unit.
  one: Unit = Unit::new(PhysicalDimension::Nondimensional, "", "");
  second: Unit = Unit::new(PhysicalDimension::Time, "second", "s");
  meter: Unit = Unit::new(PhysicalDimension::Length, "meter", "m");
  /// The base unit of mass. Note that this is the gram, not the
  /// kilogram.
  gram: Unit = Unit::new(PhysicalDimension::Mass, "gram", "g");
  ampere: Unit = Unit::new(PhysicalDimension::Current, "ampere", "A");
  kelvin: Unit = Unit::new(PhysicalDimension::Temperature, "kelvin", "K");
  mole: Unit = Unit::new(PhysicalDimension::AmountOfSubstance, "mole", "mol");
  candela: Unit = Unit::new(PhysicalDimension::LuminousIntensity, "candela", "cd");
  radian: Unit = Unit::new(PhysicalDimension::Angle, "radian", "rad");

  kilogram: Unit = kilo() * gram();

  // Derived units
  steradian: CompositeUnit = radian().pow(2);
  turn: Quantity = 2.0 * PI * radian();
  liter: Quantity = 1e-3 * meter().pow(3);
  /// Full turns per second.
  hertz: Quantity = turn() / second();
  newton: CompositeUnit = kilo() * gram() * meter() / second().pow(2);
  joule: CompositeUnit = kilo() * gram() * meter().pow(2) / second().pow(2);
  watt: CompositeUnit = joule() / second();
  coulomb: CompositeUnit = ampere() * second();
  volt: CompositeUnit = joule() / coulomb();
  farad: CompositeUnit = coulomb() / volt();
  ohm: CompositeUnit = volt() / ampere();
  siemens: Quantity = 1.0 / ohm();
  weber: CompositeUnit = joule() / ampere();
  tesla: CompositeUnit = volt() * second() / meter().pow(2);
  henry: CompositeUnit = volt() * second() / ampere();
  lumen: CompositeUnit = candela() * steradian();
  lux: CompositeUnit = lumen() / meter().pow(2);
  /// Decays per second. The referent keeps it apart from other
  /// reciprocal-time units.
  becquerel: CompositeUnit = one().but().referent("decays").build() / second();

  // Non-SI units
  minute: Quantity = 60.0 * second();
  hour: Quantity = 60.0 * minute();
  barn: Quantity = 1e-28 * meter().pow(2);
  dalton: Quantity = 1.66053906660e-27 * kilogram();
}
