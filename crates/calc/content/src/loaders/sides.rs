//! Scope table loader.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, read_file};

/// One configured side.
///
/// `scope` is the external key (for a chat bot, the channel ID); record
/// files whose name starts with `prefix` are routed to this side only.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SideDefinition {
    pub scope: String,
    pub name: String,
    pub prefix: String,
}

impl SideDefinition {
    pub fn claims(&self, file_name: &str) -> bool {
        !self.prefix.is_empty() && file_name.starts_with(&self.prefix)
    }
}

/// Scope table structure for TOML files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SideTable {
    #[serde(default)]
    pub sides: Vec<SideDefinition>,
}

/// Loader for the scope table from TOML files.
pub struct SidesLoader;

impl SidesLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<SideDefinition>> {
        let content = read_file(path)?;
        let table: SideTable = toml::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse sides TOML: {}", e))?;

        Ok(table.sides)
    }
}
