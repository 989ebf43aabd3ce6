//! Formula evaluation.

use strum::IntoEnumIterator;

use crate::bonus::PriceUpdate;
use crate::formula::{BonusScript, Formula};
use crate::price::{Axis, Price};

// ============================================================================
// Formula Evaluation
// ============================================================================

/// Evaluate a formula against the running cost and a bonus contribution.
///
/// Evaluation never fails: division by zero and overflow follow IEEE
/// semantics and propagate into the result.
pub fn evaluate(formula: &Formula, input: &Price, bonus: &Price) -> f64 {
    let all = |formulas: &[Formula]| {
        formulas
            .iter()
            .map(|f| evaluate(f, input, bonus))
            .collect::<Vec<_>>()
    };

    match formula {
        Formula::Constant(value) => *value,
        Formula::Input(axis) => input.get(*axis),
        Formula::Bonus(axis) => bonus.get(*axis),
        Formula::Sum(formulas) => all(formulas).into_iter().sum(),
        Formula::Product(formulas) => all(formulas).into_iter().product(),
        Formula::Difference(a, b) => evaluate(a, input, bonus) - evaluate(b, input, bonus),
        Formula::Quotient(a, b) => evaluate(a, input, bonus) / evaluate(b, input, bonus),
        Formula::Min(formulas) => all(formulas).into_iter().fold(f64::INFINITY, f64::min),
        Formula::Max(formulas) => all(formulas)
            .into_iter()
            .fold(f64::NEG_INFINITY, f64::max),
        Formula::Scaled(formula, factor) => evaluate(formula, input, bonus) * factor,
    }
}

/// Evaluate every axis formula of a script.
///
/// All axes read the same pre-call `input`; axes without a formula are left
/// out of the update.
pub fn apply(script: &BonusScript, input: &Price, bonus: &Price) -> PriceUpdate {
    let mut update = PriceUpdate::default();
    for axis in Axis::iter() {
        if let Some(formula) = script.axis(axis) {
            update.set(axis, evaluate(formula, input, bonus));
        }
    }
    update
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(formula: Formula) -> Box<Formula> {
        Box::new(formula)
    }

    #[test]
    fn arithmetic_combinators() {
        let input = Price::new(10.0, 20.0, 30.0, 40.0);
        let bonus = Price::new(1.0, 2.0, 3.0, 4.0);

        let sum = Formula::Sum(vec![Formula::Input(Axis::C), Formula::Bonus(Axis::S)]);
        assert_eq!(evaluate(&sum, &input, &bonus), 14.0);

        let product = Formula::Product(vec![Formula::Input(Axis::O), Formula::Constant(0.5)]);
        assert_eq!(evaluate(&product, &input, &bonus), 10.0);

        let diff = Formula::Difference(boxed(Formula::Input(Axis::W)), boxed(Formula::Bonus(Axis::W)));
        assert_eq!(evaluate(&diff, &input, &bonus), 27.0);

        let quotient = Formula::Quotient(boxed(Formula::Input(Axis::S)), boxed(Formula::Constant(8.0)));
        assert_eq!(evaluate(&quotient, &input, &bonus), 5.0);

        let min = Formula::Min(vec![Formula::Input(Axis::C), Formula::Bonus(Axis::C)]);
        assert_eq!(evaluate(&min, &input, &bonus), 1.0);

        let max = Formula::Max(vec![Formula::Constant(0.0), Formula::Constant(-3.0)]);
        assert_eq!(evaluate(&max, &input, &bonus), 0.0);

        let scaled = Formula::Scaled(boxed(Formula::Bonus(Axis::O)), 3.0);
        assert_eq!(evaluate(&scaled, &input, &bonus), 6.0);
    }

    #[test]
    fn unset_axes_are_not_updated() {
        let script = BonusScript {
            o: Some(Formula::Constant(7.0)),
            ..Default::default()
        };
        let input = Price::new(1.0, 2.0, 3.0, 4.0);
        let update = apply(&script, &input, &Price::ZERO);
        assert_eq!(update.applied_to(input), Price::new(1.0, 7.0, 3.0, 4.0));
    }

    #[test]
    fn axes_read_pre_call_input() {
        let script = BonusScript {
            c: Some(Formula::Input(Axis::O)),
            o: Some(Formula::Input(Axis::C)),
            ..Default::default()
        };
        let input = Price::new(1.0, 2.0, 0.0, 0.0);
        let update = apply(&script, &input, &Price::ZERO);
        assert_eq!(update.applied_to(input), Price::new(2.0, 1.0, 0.0, 0.0));
    }
}
