//! Four-axis resource vector (COWS) and its compact literal notation.
//!
//! A [`Price`] is a plain `Copy` value, so every value read from the registry
//! is already a private copy; arithmetic always produces a new vector.
//!
//! Literal syntax accepted by [`Price::from_str`]:
//!
//! ```text
//! 12c, 4.5o, 0w, 3s     any order, any subset, comma-separated
//! ""                    the zero vector
//! ```

use core::fmt;
use core::ops::{Add, AddAssign, Div, Mul, Sub};
use core::str::FromStr;

use strum::{EnumIter, IntoEnumIterator};

use crate::error::CalcError;

/// One of the four resource axes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, EnumIter)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Axis {
    C,
    O,
    W,
    S,
}

impl Axis {
    /// Literal suffix for this axis (`c`, `o`, `w`, `s`).
    pub const fn suffix(self) -> char {
        match self {
            Self::C => 'c',
            Self::O => 'o',
            Self::W => 'w',
            Self::S => 's',
        }
    }

    pub fn from_suffix(suffix: char) -> Option<Self> {
        Self::iter().find(|axis| axis.suffix() == suffix)
    }
}

/// Resource vector with one real-valued quantity per [`Axis`].
///
/// Missing axes deserialize as zero and a missing price deserializes as the
/// zero vector, matching the record files.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "UPPERCASE"))]
pub struct Price {
    pub c: f64,
    pub o: f64,
    pub w: f64,
    pub s: f64,
}

impl Price {
    pub const ZERO: Price = Price::new(0.0, 0.0, 0.0, 0.0);

    pub const fn new(c: f64, o: f64, w: f64, s: f64) -> Self {
        Self { c, o, w, s }
    }

    /// Vector with the same value on every axis.
    pub const fn splat(value: f64) -> Self {
        Self::new(value, value, value, value)
    }

    pub fn get(&self, axis: Axis) -> f64 {
        match axis {
            Axis::C => self.c,
            Axis::O => self.o,
            Axis::W => self.w,
            Axis::S => self.s,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        match axis {
            Axis::C => self.c = value,
            Axis::O => self.o = value,
            Axis::W => self.w = value,
            Axis::S => self.s = value,
        }
    }

    /// Sum of the four axes. Display only.
    pub fn total(&self) -> f64 {
        self.c + self.o + self.w + self.s
    }

    fn zip(self, rhs: Price, op: impl Fn(f64, f64) -> f64) -> Price {
        Price::new(
            op(self.c, rhs.c),
            op(self.o, rhs.o),
            op(self.w, rhs.w),
            op(self.s, rhs.s),
        )
    }

    // Optional-operand forms: a missing operand is the identity and the
    // receiver comes back unchanged.

    pub fn add_opt(self, rhs: Option<&Price>) -> Price {
        rhs.map_or(self, |rhs| self + *rhs)
    }

    pub fn sub_opt(self, rhs: Option<&Price>) -> Price {
        rhs.map_or(self, |rhs| self - *rhs)
    }

    pub fn mul_opt(self, rhs: Option<&Price>) -> Price {
        rhs.map_or(self, |rhs| self * *rhs)
    }

    pub fn div_opt(self, rhs: Option<&Price>) -> Price {
        rhs.map_or(self, |rhs| self / *rhs)
    }
}

impl Add for Price {
    type Output = Price;

    fn add(self, rhs: Price) -> Price {
        self.zip(rhs, |a, b| a + b)
    }
}

impl AddAssign for Price {
    fn add_assign(&mut self, rhs: Price) {
        *self = *self + rhs;
    }
}

impl Sub for Price {
    type Output = Price;

    fn sub(self, rhs: Price) -> Price {
        self.zip(rhs, |a, b| a - b)
    }
}

impl Mul for Price {
    type Output = Price;

    fn mul(self, rhs: Price) -> Price {
        self.zip(rhs, |a, b| a * b)
    }
}

/// Scalar broadcast across all four axes.
impl Mul<f64> for Price {
    type Output = Price;

    fn mul(self, rhs: f64) -> Price {
        self * Price::splat(rhs)
    }
}

impl Div for Price {
    type Output = Price;

    fn div(self, rhs: Price) -> Price {
        self.zip(rhs, |a, b| a / b)
    }
}

/// Rounds to the nearest multiple of `unit`, half away from zero for
/// positive values and truncating toward zero otherwise.
pub fn round_to(value: f64, unit: f64) -> f64 {
    (value / unit + 0.5).trunc() * unit
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // The total is rounded from the raw sum, not from the rounded axes.
        write!(
            f,
            "{:.2}c + {:.2}o + {:.2}w + {:.2}s = {:.2}",
            round_to(self.c, 0.01),
            round_to(self.o, 0.01),
            round_to(self.w, 0.01),
            round_to(self.s, 0.01),
            round_to(self.total(), 0.01),
        )
    }
}

impl FromStr for Price {
    type Err = CalcError;

    fn from_str(literal: &str) -> Result<Self, Self::Err> {
        let mut price = Price::ZERO;
        if literal.trim().is_empty() {
            return Ok(price);
        }

        let invalid = || CalcError::InvalidCowsLiteral(literal.trim().to_string());
        for field in literal.split(',') {
            let field = field.trim();
            let mut chars = field.chars();
            let suffix = chars.next_back().ok_or_else(invalid)?;
            let number = chars.as_str();
            if number.is_empty() {
                return Err(invalid());
            }

            let axis = Axis::from_suffix(suffix).ok_or_else(invalid)?;
            let value: f64 = number.trim().parse().map_err(|_| invalid())?;
            price.set(axis, value);
        }

        Ok(price)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Price, b: Price) -> bool {
        Axis::iter().all(|axis| (a.get(axis) - b.get(axis)).abs() < 1e-9)
    }

    #[test]
    fn add_then_sub_restores_value() {
        let a = Price::new(1.5, -2.0, 3.25, 100.0);
        let b = Price::new(0.1, 0.2, 0.3, 0.4);
        assert!(close(a + b - b, a));
    }

    #[test]
    fn copies_are_independent() {
        let a = Price::new(1.0, 2.0, 3.0, 4.0);
        let mut b = a;
        b.set(Axis::C, 99.0);
        assert_eq!(a.c, 1.0);
        assert_eq!(b.c, 99.0);
    }

    #[test]
    fn missing_operand_is_identity() {
        let a = Price::new(1.0, 2.0, 3.0, 4.0);
        assert_eq!(a.add_opt(None), a);
        assert_eq!(a.sub_opt(None), a);
        assert_eq!(a.mul_opt(None), a);
        assert_eq!(a.div_opt(None), a);
        assert_eq!(a.mul_opt(Some(&Price::splat(2.0))), a * 2.0);
    }

    #[test]
    fn division_by_zero_propagates() {
        let result = Price::splat(1.0) / Price::ZERO;
        assert!(result.c.is_infinite());
    }

    #[test]
    fn display_rounds_total_independently() {
        let price = Price::new(0.004, 0.004, 0.004, 0.0);
        assert_eq!(price.to_string(), "0.00c + 0.00o + 0.00w + 0.00s = 0.01");

        let price = Price::new(1.0, 2.5, 0.125, 10.0);
        assert_eq!(price.to_string(), "1.00c + 2.50o + 0.13w + 10.00s = 13.63");
    }

    #[test]
    fn parses_literals_in_any_order() {
        let price: Price = " 3s, 1.5c ,2w".parse().unwrap();
        assert_eq!(price, Price::new(1.5, 0.0, 2.0, 3.0));

        let empty: Price = "   ".parse().unwrap();
        assert_eq!(empty, Price::ZERO);
    }

    #[test]
    fn rejects_bad_literals() {
        for literal in ["5x", "c", "abcc", "1c,,2o", "1c 2o"] {
            let err = literal.parse::<Price>().unwrap_err();
            assert!(
                matches!(err, CalcError::InvalidCowsLiteral(_)),
                "{literal} should fail"
            );
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn missing_axes_default_to_zero() {
        let price: Price = serde_json::from_str(r#"{"C": 1.5, "S": 2}"#).unwrap();
        assert_eq!(price, Price::new(1.5, 0.0, 0.0, 2.0));

        let empty: Price = serde_json::from_str("{}").unwrap();
        assert_eq!(empty, Price::ZERO);
    }
}
