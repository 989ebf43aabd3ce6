//! Per-scope configuration registry.
//!
//! The registry owns one immutable [`SideMap`] at a time behind an
//! `RwLock<Arc<_>>`. Readers clone the `Arc` and release the lock at once, so
//! a request always works against one generation. A reload builds the next
//! map completely off-lock and installs it with a single swap; a failed
//! reload leaves the current map in place.

mod build;
mod side;

pub use build::DEFAULT_SIDE_NAME;
pub use side::Side;

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use calc_content::{ContentFactory, ContentSet, Records};
use calc_core::{BonusEvaluator, CalcError};
use tracing::{debug, info, warn};

/// One generation of sides.
#[derive(Debug)]
pub struct SideMap {
    sides: HashMap<String, Arc<Side>>,
    default: Arc<Side>,
    generation: u64,
}

impl SideMap {
    /// Side for `scope`, or the default side when the scope is unknown.
    pub fn side(&self, scope: &str) -> Arc<Side> {
        self.sides
            .get(scope)
            .map_or_else(|| Arc::clone(&self.default), Arc::clone)
    }

    pub fn default_side(&self) -> &Arc<Side> {
        &self.default
    }

    /// Every configured side, the default side first.
    pub fn sides(&self) -> impl Iterator<Item = &Arc<Side>> + '_ {
        std::iter::once(&self.default).chain(self.sides.values())
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// What a successful reload installed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReloadSummary {
    pub generation: u64,
    pub files: usize,
    pub skipped: Vec<String>,
    /// `(side name, spires, parts, bonuses)` per side, default side first.
    pub sides: Vec<(String, usize, usize, usize)>,
    /// A reload that started later had already installed; this generation
    /// was built and discarded.
    pub superseded: bool,
}

#[derive(Debug)]
pub struct Registry {
    current: RwLock<Arc<SideMap>>,
    generations: AtomicU64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    /// Registry holding only the default side with the built-in spires.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(build::default_side_map())),
            generations: AtomicU64::new(0),
        }
    }

    /// Current generation. Never blocks on a reload in progress, which only
    /// holds the lock for the swap itself.
    pub fn snapshot(&self) -> Arc<SideMap> {
        // Poisoning cannot leave a half-written map: the guarded value is
        // only ever replaced whole.
        Arc::clone(&self.current.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Side for `scope`, falling back to the default side. Never fails.
    pub fn side(&self, scope: &str) -> Arc<Side> {
        self.snapshot().side(scope)
    }

    /// Builds a new generation from already-loaded content and installs it.
    pub fn install(&self, content: &ContentSet) -> Result<ReloadSummary, CalcError> {
        let generation = self.generations.fetch_add(1, Ordering::SeqCst) + 1;
        let map = build::build_side_map(content, generation)?;
        let summary = ReloadSummary {
            generation: map.generation,
            files: content.files.len(),
            skipped: content.skipped.clone(),
            sides: map
                .sides()
                .map(|side| {
                    let catalog = side.catalog();
                    (
                        side.name().to_string(),
                        catalog.spires.len(),
                        catalog.parts.len(),
                        catalog.bonuses.len(),
                    )
                })
                .collect(),
            superseded: false,
        };
        self.swap(map, summary)
    }

    fn swap(&self, map: SideMap, mut summary: ReloadSummary) -> Result<ReloadSummary, CalcError> {
        let mut current = self.current.write().unwrap_or_else(PoisonError::into_inner);
        // A concurrent reload that started later may already have installed.
        if current.generation < map.generation {
            *current = Arc::new(map);
        } else {
            summary.superseded = true;
        }
        Ok(summary)
    }

    /// Reloads every side from the factory's data directory.
    ///
    /// All files are read and parsed before anything is installed; any
    /// failure returns `ConfigLoad` and keeps the current generation.
    /// Bonus scripts are handed to `evaluator` for validation first, so a
    /// malformed script fails the reload instead of later calculations.
    pub fn reload(
        &self,
        factory: &ContentFactory,
        evaluator: &dyn BonusEvaluator,
    ) -> Result<ReloadSummary, CalcError> {
        info!(dir = %factory.data_dir().display(), "reloading configuration");
        let content = factory.load().map_err(|e| {
            warn!(error = %format!("{e:#}"), "configuration reload failed");
            CalcError::ConfigLoad(format!("{e:#}"))
        })?;

        for name in &content.skipped {
            warn!(file = %name, "skipping file with unknown extension");
        }

        prepare_scripts(&content, evaluator).inspect_err(|e| {
            warn!(error = %e, "configuration reload failed");
        })?;

        let summary = self.install(&content)?;
        if summary.superseded {
            debug!(
                generation = summary.generation,
                "newer configuration already installed, discarding this one"
            );
            return Ok(summary);
        }
        for (name, spires, parts, bonuses) in &summary.sides {
            info!(side = %name, spires, parts, bonuses, "side loaded");
        }
        info!(generation = summary.generation, files = summary.files, "configuration installed");
        Ok(summary)
    }
}

fn prepare_scripts(content: &ContentSet, evaluator: &dyn BonusEvaluator) -> Result<(), CalcError> {
    for file in &content.files {
        let Records::Bonuses(bonuses) = &file.records else {
            continue;
        };
        for bonus in bonuses {
            evaluator
                .prepare(bonus)
                .map_err(|e| CalcError::ConfigLoad(format!("{}: {e}", file.file_name)))?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::script::FormulaEvaluator;
    use calc_content::{RecordFile, SideDefinition};
    use calc_core::{Bonus, DEFAULT_SCOPE, HOME_SPIRE, Part, Price, Spire};

    fn part(id: &str) -> Part {
        Part {
            name: id.to_string(),
            description: String::new(),
            id: id.to_string(),
            cost: Price::splat(1.0),
            bonus: Default::default(),
            children: vec![],
        }
    }

    fn content() -> ContentSet {
        ContentSet {
            sides: vec![SideDefinition {
                scope: "chan-1".into(),
                name: "Wreth".into(),
                prefix: "wreth".into(),
            }],
            files: vec![
                RecordFile {
                    file_name: "shared.part".into(),
                    records: Records::Parts(vec![part("common")]),
                },
                RecordFile {
                    file_name: "wreth-ships.part".into(),
                    records: Records::Parts(vec![part("raider")]),
                },
                RecordFile {
                    file_name: "wreth.spire".into(),
                    records: Records::Spires(vec![Spire {
                        name: "Forge".into(),
                        description: String::new(),
                        id: "forge".into(),
                        production: Price::splat(1.0),
                    }]),
                },
            ],
            skipped: vec![],
        }
    }

    #[test]
    fn unknown_scope_falls_back_to_default() {
        let registry = Registry::new();
        let side = registry.side("nobody");
        assert_eq!(side.scope(), DEFAULT_SCOPE);
        assert!(side.catalog().has_spire(HOME_SPIRE));
    }

    #[test]
    fn prefixed_files_route_to_one_side() {
        let registry = Registry::new();
        registry.install(&content()).unwrap();

        let wreth = registry.side("chan-1");
        assert_eq!(wreth.name(), "Wreth");
        assert!(wreth.catalog().parts.contains_key("raider"));
        assert!(wreth.catalog().parts.contains_key("common"));
        assert!(wreth.catalog().has_spire("forge"));

        let default = registry.side("other");
        assert!(default.catalog().parts.contains_key("common"));
        assert!(!default.catalog().parts.contains_key("raider"));
        assert!(!default.catalog().has_spire("forge"));
    }

    #[test]
    fn install_bumps_generation_and_resets_state() {
        let registry = Registry::new();
        registry.install(&content()).unwrap();
        let side = registry.side("chan-1");
        side.set_debug(true);

        let summary = registry.install(&content()).unwrap();
        assert_eq!(summary.generation, 2);
        assert!(!registry.side("chan-1").debug_enabled());
        // The old side object is untouched and still usable by in-flight readers.
        assert!(side.debug_enabled());
    }

    #[test]
    fn install_behind_a_newer_generation_is_superseded() {
        let registry = Registry::new();
        let newer = build::build_side_map(&content(), 10).unwrap();
        *registry.current.write().unwrap() = Arc::new(newer);

        let summary = registry.install(&content()).unwrap();
        assert!(summary.superseded);
        assert_eq!(summary.generation, 1);
        assert_eq!(registry.snapshot().generation(), 10);
    }

    #[test]
    fn malformed_bonus_script_fails_the_reload() {
        let mut content = content();
        content.files.push(RecordFile {
            file_name: "armor.bonus".into(),
            records: Records::Bonuses(vec![Bonus {
                name: "Armor".into(),
                description: String::new(),
                id: "armor".into(),
                script: "(c: Nope(".into(),
            }]),
        });
        let err = prepare_scripts(&content, &FormulaEvaluator::new()).unwrap_err();
        assert_eq!(err.error_code(), "config_load");
        assert!(err.to_string().contains("armor.bonus"));
    }

    #[test]
    fn overlapping_prefixes_are_rejected() {
        let registry = Registry::new();
        let mut content = content();
        content.sides.push(SideDefinition {
            scope: "chan-2".into(),
            name: "W".into(),
            prefix: "w".into(),
        });

        let err = registry.install(&content).unwrap_err();
        assert_eq!(err.error_code(), "config_load");
        assert_eq!(registry.snapshot().generation(), 0);

        content.sides[1].prefix = "krell".into();
        assert!(registry.install(&content).is_ok());
    }

    #[test]
    fn duplicate_scopes_are_rejected_without_install() {
        let registry = Registry::new();
        let mut content = content();
        content.sides.push(content.sides[0].clone());

        let err = registry.install(&content).unwrap_err();
        assert_eq!(err.error_code(), "config_load");
        assert_eq!(registry.snapshot().generation(), 0);
        assert_eq!(registry.side("chan-1").scope(), DEFAULT_SCOPE);
    }
}
