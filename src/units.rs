// faultchain/src/units.rs

//! # Physical Quantities
//!
//! SI units, engineering prefixes, and precision-aware conversion. A
//! [`Quantity`] couples a number with its unit, an engineering prefix,
//! and the number of significant digits it is good for; conversions go
//! through the unit's own converter via the SI base representation.
//!
//! This is a plain numeric utility on top of the fault runtime: a
//! conversion that cannot be expressed raises
//! [`Condition::PrecisionViolated`] or [`Condition::UnsupportedUnit`]
//! like any other consumer.

use crate::fault::{self, Condition, FaultResult};
use crate::raise;
use core::fmt;
use core::ptr;

/// Engineering prefixes. The discriminant is the decimal exponent.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i8)]
pub enum Prefix {
    Atto = -18,
    Femto = -15,
    Pico = -12,
    Nano = -9,
    Micro = -6,
    Milli = -3,
    None = 0,
    Kilo = 3,
    Mega = 6,
    Giga = 9,
    Tera = 12,
    Peta = 15,
    Exa = 18,
}

impl Prefix {
    /// The decimal exponent of this prefix.
    pub const fn exponent(self) -> i8 {
        self as i8
    }

    /// The scale factor of this prefix.
    pub fn factor(self) -> f64 {
        libm::pow(10.0, self.exponent() as f64)
    }

    fn from_exponent(exponent: i8) -> Option<Prefix> {
        match exponent {
            -18 => Some(Prefix::Atto),
            -15 => Some(Prefix::Femto),
            -12 => Some(Prefix::Pico),
            -9 => Some(Prefix::Nano),
            -6 => Some(Prefix::Micro),
            -3 => Some(Prefix::Milli),
            0 => Some(Prefix::None),
            3 => Some(Prefix::Kilo),
            6 => Some(Prefix::Mega),
            9 => Some(Prefix::Giga),
            12 => Some(Prefix::Tera),
            15 => Some(Prefix::Peta),
            18 => Some(Prefix::Exa),
            _ => None,
        }
    }

    /// Prefix symbol, used when the unit allows prefixed display.
    pub const fn symbol(self) -> &'static str {
        match self {
            Prefix::Atto => "a",
            Prefix::Femto => "f",
            Prefix::Pico => "p",
            Prefix::Nano => "n",
            Prefix::Micro => "u",
            Prefix::Milli => "m",
            Prefix::None => "",
            Prefix::Kilo => "k",
            Prefix::Mega => "M",
            Prefix::Giga => "G",
            Prefix::Tera => "T",
            Prefix::Peta => "P",
            Prefix::Exa => "E",
        }
    }

    /// Power-of-ten spelling, used when the unit forbids prefixed
    /// display but the number is scaled anyway.
    pub const fn power_of_ten(self) -> &'static str {
        match self {
            Prefix::Atto => "* 10^-18 ",
            Prefix::Femto => "* 10^-15 ",
            Prefix::Pico => "* 10^-12 ",
            Prefix::Nano => "* 10^-9 ",
            Prefix::Micro => "* 10^-6 ",
            Prefix::Milli => "* 10^-3 ",
            Prefix::None => "",
            Prefix::Kilo => "* 10^3 ",
            Prefix::Mega => "* 10^6 ",
            Prefix::Giga => "* 10^9 ",
            Prefix::Tera => "* 10^12 ",
            Prefix::Peta => "* 10^15 ",
            Prefix::Exa => "* 10^18 ",
        }
    }
}

/// Direction a unit converter is asked to work in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ConversionDirection {
    /// The quantity is in SI base form and should become this unit.
    FromSi,
    /// The quantity is in this unit and should become SI base form.
    ToSi,
}

/// Converts a quantity between a unit and its SI base representation.
pub type UnitConverter = fn(Quantity, ConversionDirection) -> FaultResult<Quantity>;

/// A unit of measurement. Units are compared by identity; the built-in
/// units below are the canonical instances.
#[derive(Debug)]
pub struct Unit {
    /// Full name of the unit, e.g. _Volt_.
    pub name: &'static str,
    /// Unit abbreviation, e.g. _V_.
    pub abbreviation: &'static str,
    converter: UnitConverter,
    /// Whether the unit is displayed with prefix symbols.
    pub allow_prefixing: bool,
}

impl Unit {
    pub const fn new(
        name: &'static str,
        abbreviation: &'static str,
        converter: UnitConverter,
        allow_prefixing: bool,
    ) -> Self {
        Self {
            name,
            abbreviation,
            converter,
            allow_prefixing,
        }
    }
}

impl PartialEq for Unit {
    fn eq(&self, other: &Self) -> bool {
        ptr::eq(self, other)
    }
}

pub static DIMENSIONLESS: Unit = Unit::new("Dimensionless", "", convert_identity, true);
pub static METER: Unit = Unit::new("Meter", "m", convert_identity, true);
pub static SECOND: Unit = Unit::new("Second", "s", convert_identity, true);
pub static GRAM: Unit = Unit::new("Gram", "g", convert_gram, true);
pub static KILOGRAM: Unit = Unit::new("Kilogram", "kg", convert_identity, false);
pub static VOLT: Unit = Unit::new("Volt", "V", convert_identity, true);
pub static AMPERE: Unit = Unit::new("Ampere", "A", convert_identity, true);
pub static OHM: Unit = Unit::new("Ohm", "Ohm", convert_identity, true);
/// Logarithmic pseudo-unit; its SI base form is dimensionless.
pub static DECIBEL: Unit = Unit::new("Decibel", "dB", convert_decibel, false);

fn convert_identity(input: Quantity, _direction: ConversionDirection) -> FaultResult<Quantity> {
    Ok(input)
}

fn convert_gram(input: Quantity, direction: ConversionDirection) -> FaultResult<Quantity> {
    match direction {
        ConversionDirection::FromSi => {
            Quantity::new(input.number * 1000.0, &GRAM, input.precision)
        }
        ConversionDirection::ToSi => {
            Quantity::new(input.number / 1000.0, &KILOGRAM, input.precision)
        }
    }
}

fn convert_decibel(input: Quantity, direction: ConversionDirection) -> FaultResult<Quantity> {
    match direction {
        ConversionDirection::FromSi => {
            if input.unit != &DIMENSIONLESS {
                raise!(
                    Condition::UnsupportedUnit,
                    "decibel: linear side must be dimensionless"
                );
            }
            Quantity::new(libm::log10(input.number) * 10.0, &DECIBEL, input.precision)
        }
        ConversionDirection::ToSi => {
            if input.unit != &DECIBEL {
                raise!(
                    Condition::UnsupportedUnit,
                    "decibel: logarithmic side must be decibels"
                );
            }
            Quantity::new(
                libm::pow(10.0, input.number / 10.0),
                &DIMENSIONLESS,
                input.precision,
            )
        }
    }
}

/// A number together with its unit, prefix, and precision.
///
/// `precision` counts significant digits, excluding leading zeros and
/// including trailing zeros.
#[derive(Debug, Copy, Clone)]
pub struct Quantity {
    number: f64,
    unit: &'static Unit,
    prefix: Prefix,
    precision: u8,
}

impl Quantity {
    /// Creates a quantity from an unprefixed number and auto-applies
    /// the best engineering prefix.
    pub fn new(number: f64, unit: &'static Unit, precision: u8) -> FaultResult<Quantity> {
        let mut quantity = Quantity {
            number,
            unit,
            prefix: Prefix::None,
            precision,
        };
        quantity.apply_prefix()?;
        Ok(quantity)
    }

    pub fn number(&self) -> f64 {
        self.number
    }

    pub fn unit(&self) -> &'static Unit {
        self.unit
    }

    pub fn prefix(&self) -> Prefix {
        self.prefix
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    /// Folds any prefix back into the number.
    pub fn remove_prefix(&mut self) {
        if self.prefix != Prefix::None {
            self.number *= self.prefix.factor();
            self.prefix = Prefix::None;
        }
    }

    /// Rescales the quantity to the given prefix.
    ///
    /// Raises [`Condition::PrecisionViolated`] when the rescaled number
    /// has more integer digits than the precision can carry. The
    /// quantity is adjusted *before* the check, so a caller that
    /// catches the fault keeps the rescaled value and thereby bypasses
    /// the check.
    pub fn set_prefix(&mut self, prefix: Prefix) -> FaultResult<()> {
        self.number *= self.prefix.factor();
        self.number /= prefix.factor();
        self.prefix = prefix;

        if self.precision < digits_before_decimal_point(self.number) {
            raise!(
                Condition::PrecisionViolated,
                "quantity cannot carry its integer digits at this precision"
            );
        }
        Ok(())
    }

    /// Picks the engineering prefix matching the number's magnitude.
    /// If the preferred prefix violates the precision, the next larger
    /// prefix group is tried once; a violation there escalates.
    pub fn apply_prefix(&mut self) -> FaultResult<()> {
        let exponent = engineering_exponent(self.number);
        let attempt = *self;
        *self = fault::run_guarded(
            move || {
                let mut adjusted = attempt;
                adjusted.set_prefix_exponent(exponent)?;
                Ok(adjusted)
            },
            move |_| {
                let mut adjusted = attempt;
                adjusted.set_prefix_exponent(exponent + 3)?;
                Ok(adjusted)
            },
        )?;
        Ok(())
    }

    /// Converts this quantity to the given unit, via the SI base form.
    pub fn convert_to(&self, unit: &'static Unit) -> FaultResult<Quantity> {
        let mut stripped = *self;
        stripped.remove_prefix();
        let si = (stripped.unit.converter)(stripped, ConversionDirection::ToSi)?;
        let mut output = (unit.converter)(si, ConversionDirection::FromSi)?;
        output.unit = unit;
        output.apply_prefix()?;
        Ok(output)
    }

    fn set_prefix_exponent(&mut self, exponent: i8) -> FaultResult<()> {
        match Prefix::from_exponent(exponent.clamp(-18, 18)) {
            Some(prefix) => self.set_prefix(prefix),
            None => raise!(Condition::OutOfRange, "unsupported prefix exponent"),
        }
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let digits = digits_before_decimal_point(self.number);
        let decimals = self.precision.saturating_sub(digits) as usize;
        let prefix = if self.unit.allow_prefixing {
            self.prefix.symbol()
        } else {
            self.prefix.power_of_ten()
        };
        write!(
            f,
            "{:.*} {}{}",
            decimals, self.number, prefix, self.unit.abbreviation
        )
    }
}

/// The engineering exponent (a multiple of 3, clamped to the prefix
/// table) matching the number's magnitude.
fn engineering_exponent(number: f64) -> i8 {
    let magnitude = libm::fabs(number);
    if magnitude == 0.0 || !magnitude.is_finite() {
        return 0;
    }
    let exponent = libm::floor(libm::log10(magnitude) / 3.0) * 3.0;
    (exponent as i32).clamp(-18, 18) as i8
}

/// Number of digits before the decimal point.
fn digits_before_decimal_point(number: f64) -> u8 {
    let mut magnitude = libm::fabs(number);
    if magnitude < 1.0 {
        return 0;
    }
    let mut digits = 0u8;
    while magnitude >= 1.0 && digits < u8::MAX {
        magnitude /= 10.0;
        digits += 1;
    }
    digits
}
