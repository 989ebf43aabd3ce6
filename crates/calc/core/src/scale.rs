//! Production-rate scaling of a final cost.
//!
//! A cost is converted into a time-equivalent figure: minutes of nominal
//! output, corrected by how the side's current production compares with the
//! nominal rate.

use crate::error::{CalcError, Result};
use crate::model::SideView;
use crate::price::Price;

/// Nominal per-minute output, identical for every side.
pub const BASE_PRODUCTION: Price = Price::new(13.0, 17.0, 19.0, 10.0);

/// `60 / BASE_PRODUCTION`, per axis.
pub fn base_factor() -> Price {
    Price::splat(60.0) / BASE_PRODUCTION
}

/// Sum of the production of every enabled spire.
///
/// Fails with `InvalidSpireList` when an enabled ID no longer names a spire.
pub fn current_production(side: &SideView) -> Result<Price> {
    side.enabled_spires().try_fold(Price::ZERO, |total, id| {
        side.spire_production(id)
            .map(|production| total + production)
            .ok_or_else(|| CalcError::InvalidSpireList(id.to_string()))
    })
}

/// Scales `cost` by `base_factor / (current / BASE_PRODUCTION)`.
pub fn scale(cost: Price, side: &SideView) -> Result<Price> {
    let production = current_production(side)?;
    let factor = base_factor() / (production / BASE_PRODUCTION);
    Ok(cost * factor)
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;
    use std::sync::Arc;

    use super::*;
    use crate::model::{Catalog, HOME_SPIRE, Spire, TWEAK_SPIRE};

    fn view(enabled: &[&str], tweak: Price) -> SideView {
        let mut catalog = Catalog::seeded();
        catalog.insert_spire(Spire {
            name: "Forge".into(),
            description: String::new(),
            id: "forge".into(),
            production: BASE_PRODUCTION,
        });
        SideView {
            name: "test".into(),
            catalog: Arc::new(catalog),
            spire_enabled: enabled.iter().map(|id| (id.to_string(), true)).collect(),
            tweak,
            debug: false,
        }
    }

    fn close(a: Price, b: Price) -> bool {
        let d = a - b;
        [d.c, d.o, d.w, d.s].iter().all(|x| x.abs() < 1e-9)
    }

    #[test]
    fn baseline_production_applies_base_factor() {
        let side = view(&[TWEAK_SPIRE, HOME_SPIRE], Price::ZERO);
        let cost = Price::new(13.0, 17.0, 19.0, 10.0);
        let scaled = scale(cost, &side).unwrap();
        assert!(close(scaled, Price::splat(60.0)));
    }

    #[test]
    fn doubled_production_halves_result() {
        let cost = Price::new(1.0, 2.0, 3.0, 4.0);
        let base = scale(cost, &view(&[HOME_SPIRE], Price::ZERO)).unwrap();
        let doubled = scale(cost, &view(&[HOME_SPIRE, "forge"], Price::ZERO)).unwrap();
        assert!(close(doubled * 2.0, base));
    }

    #[test]
    fn tweak_adds_to_production() {
        let side = view(&[TWEAK_SPIRE, HOME_SPIRE], BASE_PRODUCTION);
        assert!(close(current_production(&side).unwrap(), BASE_PRODUCTION * 2.0));
    }

    #[test]
    fn disabled_entries_are_ignored() {
        let mut side = view(&[HOME_SPIRE], Price::ZERO);
        side.spire_enabled.insert("gone".into(), false);
        assert!(current_production(&side).is_ok());
    }

    #[test]
    fn stale_enabled_spire_fails() {
        let mut side = view(&[HOME_SPIRE], Price::ZERO);
        side.spire_enabled = BTreeMap::from([("gone".to_string(), true)]);
        assert_eq!(
            scale(Price::ZERO, &side).unwrap_err(),
            CalcError::InvalidSpireList("gone".into())
        );
    }
}
