//! A side: immutable definitions plus its lock-guarded runtime state.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use calc_core::{CalcError, Catalog, HOME_SPIRE, Price, SideView, SpireId, TWEAK_SPIRE};
use tracing::debug;

/// Fields of a side that commands may change after load.
#[derive(Clone, Debug, PartialEq)]
struct SideState {
    spire_enabled: BTreeMap<SpireId, bool>,
    tweak: Price,
    debug: bool,
}

impl Default for SideState {
    fn default() -> Self {
        Self {
            spire_enabled: BTreeMap::from([
                (TWEAK_SPIRE.to_string(), true),
                (HOME_SPIRE.to_string(), true),
            ]),
            tweak: Price::ZERO,
            debug: false,
        }
    }
}

/// One configuration scope.
///
/// The catalog is shared and never changes; a reload builds new `Side`
/// values instead. Runtime state is serialized by a per-side mutex and is
/// only ever read through a [`SideView`] copy.
#[derive(Debug)]
pub struct Side {
    scope: String,
    name: String,
    catalog: Arc<Catalog>,
    state: Mutex<SideState>,
}

impl Side {
    pub fn new(scope: impl Into<String>, name: impl Into<String>, catalog: Catalog) -> Self {
        Self {
            scope: scope.into(),
            name: name.into(),
            catalog: Arc::new(catalog),
            state: Mutex::new(SideState::default()),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    // State is a plain value map that every mutation rewrites in one step,
    // so a poisoned lock still guards a coherent value.
    fn state(&self) -> MutexGuard<'_, SideState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Consistent snapshot for one request.
    pub fn view(&self) -> SideView {
        let state = self.state().clone();
        SideView {
            name: self.name.clone(),
            catalog: Arc::clone(&self.catalog),
            spire_enabled: state.spire_enabled,
            tweak: state.tweak,
            debug: state.debug,
        }
    }

    /// Replaces the enabled list with exactly `ids`.
    ///
    /// Every ID must name a spire; otherwise the list is left unchanged and
    /// the first unknown ID is reported.
    pub fn set_spire_list<S: AsRef<str>>(&self, ids: &[S]) -> Result<(), CalcError> {
        if let Some(unknown) = ids
            .iter()
            .map(AsRef::as_ref)
            .find(|id| !self.catalog.has_spire(id))
        {
            return Err(CalcError::SpireNotFound(unknown.to_string()));
        }

        let enabled = ids
            .iter()
            .map(|id| (id.as_ref().to_string(), true))
            .collect();
        self.state().spire_enabled = enabled;
        debug!(side = %self.name, count = ids.len(), "spire list replaced");
        Ok(())
    }

    /// Enables or disables each known ID in `ids`.
    ///
    /// Unknown IDs are skipped and returned; disabling a spire that is not
    /// enabled is a no-op.
    pub fn adjust_spire_list<S: AsRef<str>>(&self, enable: bool, ids: &[S]) -> Vec<String> {
        let mut rejected = Vec::new();
        let mut state = self.state();
        for id in ids.iter().map(AsRef::as_ref) {
            if self.catalog.has_spire(id) {
                state.spire_enabled.insert(id.to_string(), enable);
            } else {
                rejected.push(id.to_string());
            }
        }
        rejected
    }

    pub fn set_tweak(&self, production: Price) {
        self.state().tweak = production;
    }

    pub fn set_debug(&self, enabled: bool) {
        self.state().debug = enabled;
    }

    pub fn debug_enabled(&self) -> bool {
        self.state().debug
    }

    /// Enabled spire IDs in sorted order.
    pub fn enabled_spires(&self) -> Vec<String> {
        self.view().enabled_spires().map(str::to_string).collect()
    }
}
