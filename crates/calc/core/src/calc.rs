//! End-to-end calculation of a pattern request against one side snapshot.
//!
//! pattern text → resolver → aggregator → bonus pipeline → scaler

use crate::aggregate::Aggregate;
use crate::bonus::{BonusEvaluator, BonusPipeline, BonusStep};
use crate::error::Result;
use crate::model::SideView;
use crate::pattern::Pattern;
use crate::price::Price;
use crate::scale::scale;

/// Everything a reply needs about one pattern request.
#[derive(Clone, Debug, PartialEq)]
pub struct PatternReport {
    /// Aggregated cost before bonuses.
    pub raw: Price,
    /// Snapshots after each bonus; empty unless the side has debug enabled.
    pub steps: Vec<BonusStep>,
    /// Cost after every bonus ran.
    pub adjusted: Price,
    /// Adjusted cost scaled by the side's production.
    pub scaled: Price,
}

/// Calculates a comma-separated pattern request.
///
/// Reads only the snapshot; a failure at any stage rejects the request.
pub fn calculate(
    side: &SideView,
    evaluator: &dyn BonusEvaluator,
    request: &str,
) -> Result<PatternReport> {
    let catalog = side.catalog.as_ref();

    let mut totals = Aggregate::new();
    for pattern in Pattern::parse_request(request)? {
        let (resolved, count) = pattern.resolve(catalog)?;
        totals.add_tree(catalog, &resolved, count)?;
    }

    let outcome = BonusPipeline::new(catalog, evaluator)
        .recording(side.debug)
        .run(totals.cost, &totals.bonus)?;
    let scaled = scale(outcome.cost, side)?;

    Ok(PatternReport {
        raw: totals.cost,
        steps: outcome.steps,
        adjusted: outcome.cost,
        scaled,
    })
}

/// Scales a raw COWS literal with the side's production.
pub fn calculate_literal(side: &SideView, literal: &str) -> Result<Price> {
    let cost: Price = literal.parse()?;
    scale(cost, side)
}
