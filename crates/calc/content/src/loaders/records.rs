//! Record files and their kinds.

use std::path::Path;

use calc_core::{Bonus, Part, Spire};

use crate::loaders::{BonusLoader, LoadResult, PartLoader, SpireLoader};

/// Kind of a record file, chosen by extension.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RecordKind {
    Spire,
    Part,
    Bonus,
}

impl RecordKind {
    /// `.spire`, `.part`, `.core` (parts), `.bonus`; anything else is not a
    /// record file.
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension()?.to_str()? {
            "spire" => Some(Self::Spire),
            "part" | "core" => Some(Self::Part),
            "bonus" => Some(Self::Bonus),
            _ => None,
        }
    }
}

/// Parsed contents of one record file.
#[derive(Clone, Debug, PartialEq)]
pub enum Records {
    Spires(Vec<Spire>),
    Parts(Vec<Part>),
    Bonuses(Vec<Bonus>),
}

impl Records {
    pub fn len(&self) -> usize {
        match self {
            Self::Spires(v) => v.len(),
            Self::Parts(v) => v.len(),
            Self::Bonuses(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// One loaded record file. `file_name` drives side routing.
#[derive(Clone, Debug, PartialEq)]
pub struct RecordFile {
    pub file_name: String,
    pub records: Records,
}

impl RecordFile {
    pub fn load(kind: RecordKind, path: &Path, data_dir: &Path) -> LoadResult<Self> {
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| anyhow::anyhow!("Invalid record file name: {}", path.display()))?
            .to_string();

        let records = match kind {
            RecordKind::Spire => Records::Spires(SpireLoader::load(path)?),
            RecordKind::Part => Records::Parts(PartLoader::load(path)?),
            RecordKind::Bonus => Records::Bonuses(BonusLoader::load(path, data_dir)?),
        };

        Ok(Self { file_name, records })
    }
}
