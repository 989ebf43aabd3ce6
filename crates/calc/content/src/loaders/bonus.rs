//! Bonus catalog loader.

use std::path::Path;

use calc_core::Bonus;

use crate::loaders::{LoadResult, read_file};

/// Loader for bonus catalogs stored as JSON arrays.
///
/// A record's `Script` field names a resource relative to the data
/// directory; the loader replaces it with the resource contents.
pub struct BonusLoader;

impl BonusLoader {
    /// Load a bonus catalog and inline every script resource.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a `.bonus` file
    /// * `data_dir` - Directory that script references are resolved against
    pub fn load(path: &Path, data_dir: &Path) -> LoadResult<Vec<Bonus>> {
        let content = read_file(path)?;
        let mut bonuses: Vec<Bonus> = serde_json::from_str(&content).map_err(|e| {
            anyhow::anyhow!("Failed to parse bonus catalog {}: {}", path.display(), e)
        })?;

        for bonus in &mut bonuses {
            let script_path = data_dir.join(bonus.script.trim());
            bonus.script = read_file(&script_path).map_err(|e| {
                anyhow::anyhow!("Failed to load script for bonus {}: {}", bonus.id, e)
            })?;
        }

        Ok(bonuses)
    }
}
