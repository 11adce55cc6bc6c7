//! Physical units and unit-carrying quantities.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

/// Relative tolerance used when comparing two quantities for equality.
pub const REL_TOL: f64 = 1e-9;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Hertz,
    Decibel,
    Ampere,
    Volt,
    VoltPerSecond,
    Count,
}

impl Unit {
    pub fn symbol(&self) -> &'static str {
        match self {
            Unit::Hertz => "Hz",
            Unit::Decibel => "dB",
            Unit::Ampere => "A",
            Unit::Volt => "V",
            Unit::VoltPerSecond => "V/s",
            Unit::Count => "",
        }
    }

    /// Whether values in this unit are displayed with an SI prefix.
    pub fn is_si(&self) -> bool {
        !matches!(self, Unit::Decibel | Unit::Count)
    }
}

impl Display for Unit {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd)]
pub enum SiPrefix {
    Femto,
    Pico,
    Nano,
    Micro,
    Milli,
    None,
    Kilo,
    Mega,
    Giga,
    Tera,
}

impl SiPrefix {
    const ALL: [SiPrefix; 10] = [
        SiPrefix::Femto,
        SiPrefix::Pico,
        SiPrefix::Nano,
        SiPrefix::Micro,
        SiPrefix::Milli,
        SiPrefix::None,
        SiPrefix::Kilo,
        SiPrefix::Mega,
        SiPrefix::Giga,
        SiPrefix::Tera,
    ];

    pub fn exponent(&self) -> i32 {
        match self {
            SiPrefix::Femto => -15,
            SiPrefix::Pico => -12,
            SiPrefix::Nano => -9,
            SiPrefix::Micro => -6,
            SiPrefix::Milli => -3,
            SiPrefix::None => 0,
            SiPrefix::Kilo => 3,
            SiPrefix::Mega => 6,
            SiPrefix::Giga => 9,
            SiPrefix::Tera => 12,
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            SiPrefix::Femto => "f",
            SiPrefix::Pico => "p",
            SiPrefix::Nano => "n",
            SiPrefix::Micro => "u",
            SiPrefix::Milli => "m",
            SiPrefix::None => "",
            SiPrefix::Kilo => "k",
            SiPrefix::Mega => "M",
            SiPrefix::Giga => "G",
            SiPrefix::Tera => "T",
        }
    }

    /// The next prefix up, if any.
    pub fn next_larger(&self) -> Option<SiPrefix> {
        let i = Self::ALL.iter().position(|p| p == self)?;
        Self::ALL.get(i + 1).copied()
    }

    /// Picks the largest prefix that keeps the mantissa of `value` at or above 1.
    pub fn for_value(value: f64) -> Self {
        let mag = value.abs();
        if mag == 0.0 || !mag.is_finite() {
            return SiPrefix::None;
        }
        Self::ALL
            .iter()
            .rev()
            .copied()
            .find(|p| mag >= 10f64.powi(p.exponent()) * (1.0 - REL_TOL))
            .unwrap_or(SiPrefix::Femto)
    }
}

/// A value in base units together with its [`Unit`].
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }

    pub fn hertz(value: f64) -> Self {
        Self::new(value, Unit::Hertz)
    }

    pub fn decibels(value: f64) -> Self {
        Self::new(value, Unit::Decibel)
    }

    pub fn amperes(value: f64) -> Self {
        Self::new(value, Unit::Ampere)
    }

    pub fn volts(value: f64) -> Self {
        Self::new(value, Unit::Volt)
    }

    pub fn volts_per_second(value: f64) -> Self {
        Self::new(value, Unit::VoltPerSecond)
    }

    pub fn count(value: usize) -> Self {
        Self::new(value as f64, Unit::Count)
    }

    /// Same unit and values equal within [`REL_TOL`].
    pub fn approx_eq(&self, other: &Quantity) -> bool {
        if self.unit != other.unit {
            return false;
        }
        let scale = self.value.abs().max(other.value.abs());
        (self.value - other.value).abs() <= scale * REL_TOL
    }
}

/// Rounds to the three decimal places shown by [`Quantity`]'s `Display`.
fn round_to_display(mantissa: f64) -> f64 {
    (mantissa * 1e3).round() / 1e3
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let mut prefix = if self.unit.is_si() {
            SiPrefix::for_value(self.value)
        } else {
            SiPrefix::None
        };
        let mut mantissa = round_to_display(self.value / 10f64.powi(prefix.exponent()));
        if mantissa.abs() >= 1000.0 && self.unit.is_si() {
            if let Some(larger) = prefix.next_larger() {
                prefix = larger;
                mantissa = round_to_display(self.value / 10f64.powi(prefix.exponent()));
            }
        }
        if mantissa == 0.0 {
            // Also turns -0.0 into 0.0.
            mantissa = 0.0;
            prefix = SiPrefix::None;
        }
        let digits = format!("{mantissa:.3}");
        let digits = digits.trim_end_matches('0').trim_end_matches('.');
        write!(f, "{}{}{}", digits, prefix.symbol(), self.unit.symbol())
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn test_display_picks_si_prefix() {
        assert_eq!(Quantity::hertz(10e6).to_string(), "10MHz");
        assert_eq!(Quantity::amperes(1.5e-12).to_string(), "1.5pA");
        assert_eq!(Quantity::volts(0.002).to_string(), "2mV");
        assert_eq!(Quantity::volts_per_second(13e6).to_string(), "13MV/s");
        assert_eq!(Quantity::hertz(0.0).to_string(), "0Hz");
    }

    #[test]
    fn test_display_rounds_before_picking_prefix() {
        assert_eq!(Quantity::hertz(999.9996).to_string(), "1kHz");
        assert_eq!(Quantity::hertz(999.9994).to_string(), "999.999Hz");
        assert_eq!(Quantity::hertz(1_234_400.0).to_string(), "1.234MHz");
        assert_eq!(Quantity::amperes(-999.9996e-6).to_string(), "-1mA");
    }

    #[test]
    fn test_display_negative_zero() {
        assert_eq!(Quantity::volts(-0.0).to_string(), "0V");
        assert_eq!(Quantity::decibels(-0.0001).to_string(), "0dB");
    }

    #[test]
    fn test_display_without_prefix() {
        assert_eq!(Quantity::decibels(90.0).to_string(), "90dB");
        assert_eq!(Quantity::decibels(1500.0).to_string(), "1500dB");
        assert_eq!(Quantity::count(4).to_string(), "4");
    }

    #[test]
    fn test_prefix_selection() {
        assert_eq!(SiPrefix::for_value(999.0), SiPrefix::None);
        assert_eq!(SiPrefix::for_value(1_000.0), SiPrefix::Kilo);
        assert_eq!(SiPrefix::for_value(-4.7e-9), SiPrefix::Nano);
        assert_eq!(SiPrefix::for_value(1e-20), SiPrefix::Femto);
        assert_eq!(SiPrefix::Milli.next_larger(), Some(SiPrefix::None));
        assert_eq!(SiPrefix::Tera.next_larger(), None);
        assert_relative_eq!(10f64.powi(SiPrefix::Mega.exponent()), 1e6);
    }

    #[test]
    fn test_approx_eq() {
        assert!(Quantity::hertz(1e6).approx_eq(&Quantity::hertz(1e6 + 1e-6)));
        assert!(!Quantity::hertz(1e6).approx_eq(&Quantity::hertz(1.1e6)));
        assert!(!Quantity::hertz(1.0).approx_eq(&Quantity::volts(1.0)));
    }
}
