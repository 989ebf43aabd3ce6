//! Bonus post-processing of an aggregated cost.
//!
//! Each bonus that collected a contribution during aggregation is run once,
//! threading the running cost through every bonus. The order in which
//! bonuses run is unspecified, so bonus scripts must commute.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::error::{CalcError, Result};
use crate::model::{Bonus, BonusId, Catalog};
use crate::price::{Axis, Price};

/// Partial vector returned by a bonus script; `None` axes stay unchanged.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PriceUpdate {
    pub c: Option<f64>,
    pub o: Option<f64>,
    pub w: Option<f64>,
    pub s: Option<f64>,
}

impl PriceUpdate {
    /// Update that sets every axis.
    pub fn full(price: Price) -> Self {
        Self {
            c: Some(price.c),
            o: Some(price.o),
            w: Some(price.w),
            s: Some(price.s),
        }
    }

    pub fn get(&self, axis: Axis) -> Option<f64> {
        match axis {
            Axis::C => self.c,
            Axis::O => self.o,
            Axis::W => self.w,
            Axis::S => self.s,
        }
    }

    pub fn set(&mut self, axis: Axis, value: f64) {
        let slot = match axis {
            Axis::C => &mut self.c,
            Axis::O => &mut self.o,
            Axis::W => &mut self.w,
            Axis::S => &mut self.s,
        };
        *slot = Some(value);
    }

    pub fn applied_to(&self, mut price: Price) -> Price {
        for axis in Axis::iter() {
            if let Some(value) = self.get(axis) {
                price.set(axis, value);
            }
        }
        price
    }
}

/// External capability that runs a bonus script.
///
/// Receives the running cost and the bonus's accumulated contribution and
/// returns the new cost. Calls may block and may fail; failures are not
/// retried.
pub trait BonusEvaluator: Send + Sync {
    fn evaluate(&self, bonus: &Bonus, cost: &Price, contribution: &Price) -> Result<PriceUpdate>;

    /// Checks a script ahead of use, at load time. Accepts everything unless
    /// the evaluator can validate scripts without running them.
    fn prepare(&self, _bonus: &Bonus) -> Result<()> {
        Ok(())
    }
}

impl<F> BonusEvaluator for F
where
    F: Fn(&Bonus, &Price, &Price) -> Result<PriceUpdate> + Send + Sync,
{
    fn evaluate(&self, bonus: &Bonus, cost: &Price, contribution: &Price) -> Result<PriceUpdate> {
        self(bonus, cost, contribution)
    }
}

/// Cost snapshot after one bonus ran.
#[derive(Clone, Debug, PartialEq)]
pub struct BonusStep {
    pub bonus: BonusId,
    pub name: String,
    pub cost: Price,
}

#[derive(Clone, Debug, PartialEq)]
pub struct BonusOutcome {
    pub cost: Price,
    /// Filled only when step recording is enabled.
    pub steps: Vec<BonusStep>,
}

pub struct BonusPipeline<'a> {
    catalog: &'a Catalog,
    evaluator: &'a dyn BonusEvaluator,
    record_steps: bool,
}

impl<'a> BonusPipeline<'a> {
    pub fn new(catalog: &'a Catalog, evaluator: &'a dyn BonusEvaluator) -> Self {
        Self {
            catalog,
            evaluator,
            record_steps: false,
        }
    }

    /// Keep a cost snapshot after every bonus (debug reporting).
    #[must_use]
    pub fn recording(mut self, record_steps: bool) -> Self {
        self.record_steps = record_steps;
        self
    }

    /// Runs every bonus present in `contributions`.
    pub fn run(&self, cost: Price, contributions: &BTreeMap<BonusId, Price>) -> Result<BonusOutcome> {
        let order: Vec<&str> = contributions.keys().map(String::as_str).collect();
        self.run_ordered(cost, contributions, &order)
    }

    /// Runs the bonuses named in `order`, in that order.
    ///
    /// Every ID is checked against the catalog before any script runs, so an
    /// unknown bonus rejects the request without evaluator calls.
    pub fn run_ordered(
        &self,
        cost: Price,
        contributions: &BTreeMap<BonusId, Price>,
        order: &[&str],
    ) -> Result<BonusOutcome> {
        let bonuses = order
            .iter()
            .map(|id| self.catalog.bonus(id))
            .collect::<Result<Vec<_>>>()?;

        let mut outcome = BonusOutcome {
            cost,
            steps: Vec::new(),
        };
        for bonus in bonuses {
            let contribution = contributions.get(&bonus.id).copied().unwrap_or_default();
            let update = self
                .evaluator
                .evaluate(bonus, &outcome.cost, &contribution)?;
            outcome.cost = update.applied_to(outcome.cost);

            if self.record_steps {
                outcome.steps.push(BonusStep {
                    bonus: bonus.id.clone(),
                    name: bonus.name.clone(),
                    cost: outcome.cost,
                });
            }
        }

        Ok(outcome)
    }
}

/// Evaluator that rejects every script; useful where no bonus is expected.
pub struct RejectingEvaluator;

impl BonusEvaluator for RejectingEvaluator {
    fn evaluate(&self, bonus: &Bonus, _cost: &Price, _contribution: &Price) -> Result<PriceUpdate> {
        Err(CalcError::BonusScript {
            bonus: bonus.id.clone(),
            message: "no script evaluator configured".to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus(id: &str) -> Bonus {
        Bonus {
            name: format!("{id} bonus"),
            description: String::new(),
            id: id.to_string(),
            script: String::new(),
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::seeded();
        catalog.insert_bonus(bonus("discount"));
        catalog.insert_bonus(bonus("surcharge"));
        catalog
    }

    /// Subtracts the contribution on C, or adds it on O, depending on the bonus.
    fn native(bonus: &Bonus, cost: &Price, contribution: &Price) -> Result<PriceUpdate> {
        let mut update = PriceUpdate::default();
        match bonus.id.as_str() {
            "discount" => update.set(Axis::C, cost.c - contribution.c),
            _ => update.set(Axis::O, cost.o + contribution.o),
        }
        Ok(update)
    }

    fn contributions() -> BTreeMap<BonusId, Price> {
        BTreeMap::from([
            ("discount".to_string(), Price::new(2.0, 0.0, 0.0, 0.0)),
            ("surcharge".to_string(), Price::new(0.0, 3.0, 0.0, 0.0)),
        ])
    }

    #[test]
    fn threads_cost_through_every_bonus() {
        let catalog = catalog();
        let pipeline = BonusPipeline::new(&catalog, &native);
        let outcome = pipeline
            .run(Price::new(10.0, 10.0, 1.0, 1.0), &contributions())
            .unwrap();
        assert_eq!(outcome.cost, Price::new(8.0, 13.0, 1.0, 1.0));
        assert!(outcome.steps.is_empty());
    }

    #[test]
    fn commuting_bonuses_are_order_independent() {
        let catalog = catalog();
        let pipeline = BonusPipeline::new(&catalog, &native);
        let start = Price::new(10.0, 10.0, 0.0, 0.0);
        let forward = pipeline
            .run_ordered(start, &contributions(), &["discount", "surcharge"])
            .unwrap();
        let backward = pipeline
            .run_ordered(start, &contributions(), &["surcharge", "discount"])
            .unwrap();
        assert_eq!(forward.cost, backward.cost);
    }

    #[test]
    fn records_steps_when_enabled() {
        let catalog = catalog();
        let outcome = BonusPipeline::new(&catalog, &native)
            .recording(true)
            .run_ordered(Price::ZERO, &contributions(), &["surcharge", "discount"])
            .unwrap();
        let names: Vec<_> = outcome.steps.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["surcharge bonus", "discount bonus"]);
        assert_eq!(outcome.steps[0].cost, Price::new(0.0, 3.0, 0.0, 0.0));
    }

    #[test]
    fn unknown_bonus_fails_before_any_script_runs() {
        let catalog = catalog();
        let mut totals = contributions();
        totals.insert("ghost".to_string(), Price::ZERO);

        let outcome = BonusPipeline::new(&catalog, &RejectingEvaluator).run(Price::ZERO, &totals);
        assert_eq!(outcome.unwrap_err(), CalcError::BonusNotFound("ghost".into()));
    }

    #[test]
    fn evaluator_failure_aborts() {
        let catalog = catalog();
        let err = BonusPipeline::new(&catalog, &RejectingEvaluator)
            .run(Price::ZERO, &contributions())
            .unwrap_err();
        assert_eq!(err.error_code(), "bonus_script");
    }
}
