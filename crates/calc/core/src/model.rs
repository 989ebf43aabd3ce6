//! Configuration records and the per-request side snapshot.
//!
//! Records deserialize straight from the JSON data files, so field names
//! follow the files (`Name`, `Desc`, `ID`, `Prod`, `Cost`, `Bonus`, `Parts`,
//! `Script`), with the longer spellings accepted as aliases.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::error::{CalcError, Result};
use crate::price::Price;

pub type SpireId = String;
pub type PartId = String;
pub type BonusId = String;

/// Scope key of the fallback side.
pub const DEFAULT_SCOPE: &str = "DEFAULT";

/// Pseudo-spire whose production is set at runtime.
pub const TWEAK_SPIRE: &str = "Tweak";

/// Pseudo-spire carrying the baseline home production.
pub const HOME_SPIRE: &str = "Home";

/// A named production source.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Spire {
    #[cfg_attr(feature = "serde", serde(rename = "Name", default))]
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Desc", alias = "Description", default)
    )]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(rename = "ID"))]
    pub id: SpireId,
    #[cfg_attr(feature = "serde", serde(rename = "Prod", alias = "Production", default))]
    pub production: Price,
}

/// A reusable cost unit that may reference other parts as children.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Part {
    #[cfg_attr(feature = "serde", serde(rename = "Name", default))]
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Desc", alias = "Description", default)
    )]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(rename = "ID"))]
    pub id: PartId,
    #[cfg_attr(feature = "serde", serde(rename = "Cost", default))]
    pub cost: Price,
    #[cfg_attr(feature = "serde", serde(rename = "Bonus", default))]
    pub bonus: BTreeMap<BonusId, Price>,
    /// Ordered multiset; a repeated ID means several instances.
    #[cfg_attr(feature = "serde", serde(rename = "Parts", alias = "Children", default))]
    pub children: Vec<PartId>,
}

impl Part {
    /// Children folded into `id -> count`.
    pub fn child_counts(&self) -> BTreeMap<PartId, u32> {
        let mut counts = BTreeMap::new();
        for child in &self.children {
            *counts.entry(child.clone()).or_insert(0) += 1;
        }
        counts
    }
}

/// A named post-processing rule applied to an aggregated cost.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Bonus {
    #[cfg_attr(feature = "serde", serde(rename = "Name", default))]
    pub name: String,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "Desc", alias = "Description", default)
    )]
    pub description: String,
    #[cfg_attr(feature = "serde", serde(rename = "ID"))]
    pub id: BonusId,
    /// Script body. In record files this names a resource; loaders replace it
    /// with the resource contents before the record is stored.
    #[cfg_attr(feature = "serde", serde(rename = "Script", default))]
    pub script: String,
}

/// The immutable definitions of one side.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Catalog {
    pub spires: BTreeMap<SpireId, Spire>,
    pub parts: BTreeMap<PartId, Part>,
    pub bonuses: BTreeMap<BonusId, Bonus>,
}

impl Catalog {
    /// Catalog holding only the built-in `Tweak` and `Home` spires.
    pub fn seeded() -> Self {
        let mut catalog = Self::default();
        catalog.insert_spire(Spire {
            name: "Income Modifier".to_string(),
            description: "A fake 'spire' used to preview income changes.".to_string(),
            id: TWEAK_SPIRE.to_string(),
            production: Price::ZERO,
        });
        catalog.insert_spire(Spire {
            name: "Home Spires".to_string(),
            description: "A fake 'spire' representing the home spires for each side."
                .to_string(),
            id: HOME_SPIRE.to_string(),
            production: crate::scale::BASE_PRODUCTION,
        });
        catalog
    }

    pub fn insert_spire(&mut self, spire: Spire) {
        self.spires.insert(spire.id.clone(), spire);
    }

    pub fn insert_part(&mut self, part: Part) {
        self.parts.insert(part.id.clone(), part);
    }

    pub fn insert_bonus(&mut self, bonus: Bonus) {
        self.bonuses.insert(bonus.id.clone(), bonus);
    }

    pub fn part(&self, id: &str) -> Result<&Part> {
        self.parts
            .get(id)
            .ok_or_else(|| CalcError::PartNotFound(id.to_string()))
    }

    pub fn bonus(&self, id: &str) -> Result<&Bonus> {
        self.bonuses
            .get(id)
            .ok_or_else(|| CalcError::BonusNotFound(id.to_string()))
    }

    pub fn has_spire(&self, id: &str) -> bool {
        self.spires.contains_key(id)
    }
}

/// Consistent read-only snapshot of a side, taken once per request.
///
/// Holds the shared catalog plus a private copy of the mutable state, so a
/// concurrent spire-list or tweak change never shows up half-way through a
/// calculation.
#[derive(Clone, Debug)]
pub struct SideView {
    pub name: String,
    pub catalog: Arc<Catalog>,
    pub spire_enabled: BTreeMap<SpireId, bool>,
    pub tweak: Price,
    pub debug: bool,
}

impl SideView {
    /// Production of a spire, with the runtime tweak applied to `Tweak`.
    pub fn spire_production(&self, id: &str) -> Option<Price> {
        if id == TWEAK_SPIRE {
            return self.catalog.has_spire(id).then_some(self.tweak);
        }
        self.catalog.spires.get(id).map(|spire| spire.production)
    }

    /// Enabled spire IDs in sorted order.
    pub fn enabled_spires(&self) -> impl Iterator<Item = &str> + '_ {
        self.spire_enabled
            .iter()
            .filter(|(_, enabled)| **enabled)
            .map(|(id, _)| id.as_str())
    }
}
