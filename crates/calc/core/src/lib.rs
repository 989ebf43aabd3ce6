//! Production-line cost rules shared by the loaders and the bot runtime.
//!
//! `calc-core` turns a pattern request into a scaled COWS figure:
//! [`pattern`] resolves the text against a side's [`model::Catalog`],
//! [`aggregate`] walks the composition tree, [`bonus`] pipes the total
//! through the side's bonus scripts, and [`scale`] normalizes it by the side's
//! production. [`calc::calculate`] runs the whole chain on one
//! [`model::SideView`] snapshot. Nothing here performs I/O or logs.
pub mod aggregate;
pub mod bonus;
pub mod calc;
pub mod error;
pub mod formula;
pub mod model;
pub mod pattern;
pub mod price;
pub mod scale;

pub use aggregate::{Aggregate, CompositionNode};
pub use bonus::{
    BonusEvaluator, BonusOutcome, BonusPipeline, BonusStep, PriceUpdate, RejectingEvaluator,
};
pub use calc::{PatternReport, calculate, calculate_literal};
pub use error::{CalcError, Result};
pub use formula::{BonusScript, Formula};
pub use model::{
    Bonus, BonusId, Catalog, DEFAULT_SCOPE, HOME_SPIRE, Part, PartId, SideView, Spire, SpireId,
    TWEAK_SPIRE,
};
pub use pattern::{Modifier, Pattern, ResolvedPattern, Sign};
pub use price::{Axis, Price};
pub use scale::{BASE_PRODUCTION, base_factor, current_production, scale};
