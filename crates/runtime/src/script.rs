//! RON-backed bonus script evaluator.
//!
//! Script bodies are RON [`BonusScript`] values, one optional formula per
//! axis:
//!
//! ```text
//! #![enable(implicit_some)]
//! (
//!     c: Max([Constant(0.0), Difference(Input(C), Scaled(Bonus(C), 0.5))]),
//! )
//! ```
//!
//! Parsed scripts are cached by body, so each distinct script is parsed once
//! per process.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use calc_core::formula;
use calc_core::{Bonus, BonusEvaluator, BonusScript, CalcError, Price, PriceUpdate};

#[derive(Debug, Default)]
pub struct FormulaEvaluator {
    cache: RwLock<HashMap<String, Arc<BonusScript>>>,
}

impl FormulaEvaluator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a script body.
    pub fn compile(source: &str) -> Result<BonusScript, ron::error::SpannedError> {
        ron::from_str(source)
    }

    fn script(&self, bonus: &Bonus) -> Result<Arc<BonusScript>, CalcError> {
        if let Some(script) = self
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&bonus.script)
        {
            return Ok(Arc::clone(script));
        }

        let script = Arc::new(Self::compile(&bonus.script).map_err(|e| {
            CalcError::BonusScript {
                bonus: bonus.id.clone(),
                message: e.to_string(),
            }
        })?);
        self.cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(bonus.script.clone(), Arc::clone(&script));
        Ok(script)
    }
}

impl BonusEvaluator for FormulaEvaluator {
    fn evaluate(&self, bonus: &Bonus, cost: &Price, contribution: &Price) -> Result<PriceUpdate, CalcError> {
        let script = self.script(bonus)?;
        Ok(formula::apply(&script, cost, contribution))
    }

    /// Parses the script into the cache.
    fn prepare(&self, bonus: &Bonus) -> Result<(), CalcError> {
        self.script(bonus).map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bonus(script: &str) -> Bonus {
        Bonus {
            name: "Armor".into(),
            description: String::new(),
            id: "armor".into(),
            script: script.to_string(),
        }
    }

    #[test]
    fn evaluates_ron_script() {
        let evaluator = FormulaEvaluator::new();
        let bonus = bonus(
            "#![enable(implicit_some)]\n(c: Max([Constant(0.0), Difference(Input(C), Scaled(Bonus(C), 0.5))]))",
        );
        let update = evaluator
            .evaluate(&bonus, &Price::new(10.0, 1.0, 1.0, 1.0), &Price::new(4.0, 0.0, 0.0, 0.0))
            .unwrap();
        assert_eq!(update.c, Some(8.0));
        assert_eq!(update.o, None);
    }

    #[test]
    fn explicit_some_syntax_works() {
        let evaluator = FormulaEvaluator::new();
        let bonus = bonus("(s: Some(Sum([Input(S), Bonus(S)])))");
        let update = evaluator
            .evaluate(&bonus, &Price::splat(1.0), &Price::splat(2.0))
            .unwrap();
        assert_eq!(update.applied_to(Price::splat(1.0)), Price::new(1.0, 1.0, 1.0, 3.0));
    }

    #[test]
    fn empty_script_changes_nothing() {
        let evaluator = FormulaEvaluator::new();
        let update = evaluator
            .evaluate(&bonus("()"), &Price::splat(1.0), &Price::ZERO)
            .unwrap();
        assert_eq!(update, PriceUpdate::default());
    }

    #[test]
    fn prepare_rejects_malformed_scripts() {
        let evaluator = FormulaEvaluator::new();
        assert!(evaluator.prepare(&bonus("#![enable(implicit_some)]\n(c: Constant(1.0))")).is_ok());
        assert!(matches!(
            evaluator.prepare(&bonus("(c: Nope(")).unwrap_err(),
            CalcError::BonusScript { .. }
        ));
    }

    #[test]
    fn invalid_script_is_a_bonus_error() {
        let evaluator = FormulaEvaluator::new();
        let err = evaluator
            .evaluate(&bonus("return IN"), &Price::ZERO, &Price::ZERO)
            .unwrap_err();
        assert!(matches!(err, CalcError::BonusScript { ref bonus, .. } if bonus == "armor"));
    }
}
