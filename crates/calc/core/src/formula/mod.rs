//! Native formula language for bonus scripts.
//!
//! A [`BonusScript`] assigns an optional [`Formula`] to each axis. Formulas
//! read the running cost (`Input`) and the bonus contribution (`Bonus`) and
//! combine them arithmetically. Axes without a formula keep their value.
//!
//! ## Examples
//!
//! ```ignore
//! // Armor discount: subtract half the armor contribution from C, floor at 0.
//! BonusScript {
//!     c: Some(Formula::Max(vec![
//!         Formula::Constant(0.0),
//!         Formula::Difference(
//!             Box::new(Formula::Input(Axis::C)),
//!             Box::new(Formula::Scaled(Box::new(Formula::Bonus(Axis::C)), 0.5)),
//!         ),
//!     ])),
//!     ..Default::default()
//! }
//! ```

pub mod evaluate;

pub use evaluate::{apply, evaluate};

use crate::price::Axis;

/// Expression producing a single axis value.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Formula {
    /// Fixed constant value.
    Constant(f64),

    /// An axis of the running cost.
    Input(Axis),

    /// An axis of the accumulated bonus contribution.
    Bonus(Axis),

    /// Sum of multiple formulas (empty sum is 0).
    Sum(Vec<Formula>),

    /// Product of multiple formulas (empty product is 1).
    Product(Vec<Formula>),

    /// First minus second.
    Difference(Box<Formula>, Box<Formula>),

    /// First divided by second, IEEE semantics.
    Quotient(Box<Formula>, Box<Formula>),

    /// Minimum of multiple formulas (empty is +inf).
    Min(Vec<Formula>),

    /// Maximum of multiple formulas (empty is -inf).
    Max(Vec<Formula>),

    /// Formula times a fixed factor.
    Scaled(Box<Formula>, f64),
}

/// Per-axis rewrite rules of one bonus.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BonusScript {
    pub c: Option<Formula>,
    pub o: Option<Formula>,
    pub w: Option<Formula>,
    pub s: Option<Formula>,
}

impl BonusScript {
    pub fn axis(&self, axis: Axis) -> Option<&Formula> {
        match axis {
            Axis::C => self.c.as_ref(),
            Axis::O => self.o.as_ref(),
            Axis::W => self.w.as_ref(),
            Axis::S => self.s.as_ref(),
        }
    }
}
