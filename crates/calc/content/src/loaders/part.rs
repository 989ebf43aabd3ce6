//! Part catalog loader.

use std::path::Path;

use calc_core::Part;

use crate::loaders::{LoadResult, read_file};

/// Loader for part catalogs stored as JSON arrays.
///
/// Also reads the older `.core` files, whose records are parts with a
/// `Parts` child list.
pub struct PartLoader;

impl PartLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<Part>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse part catalog {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> serde_json::Result<Vec<Part>> {
        serde_json::from_str(content)
    }
}
