//! Content factory for loading a whole data directory.

use std::path::{Path, PathBuf};

use crate::loaders::{LoadResult, RecordFile, RecordKind, SideDefinition, SidesLoader};

/// File name of the scope table inside the data directory.
pub const SIDES_FILE: &str = "sides.toml";

/// Everything read from a data directory in one pass.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContentSet {
    pub sides: Vec<SideDefinition>,
    /// Record files in file-name order.
    pub files: Vec<RecordFile>,
    /// Top-level files that are neither record files nor the scope table.
    pub skipped: Vec<String>,
}

/// Content factory that loads all calculator content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── sides.toml           optional scope table
/// ├── home.spire           broadcast to every side
/// ├── wreth-ships.part     routed to the side with prefix "wreth"
/// ├── ships.bonus
/// └── scripts/
///     └── armor.ron        referenced from ships.bonus
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the scope table; a missing `sides.toml` means no extra sides.
    pub fn load_sides(&self) -> LoadResult<Vec<SideDefinition>> {
        let path = self.data_dir.join(SIDES_FILE);
        if !path.exists() {
            return Ok(Vec::new());
        }
        SidesLoader::load(&path)
    }

    /// Load every top-level record file, sorted by file name.
    ///
    /// Returns the parsed files and the names of skipped files. Any file
    /// that fails to read or parse fails the whole call.
    pub fn load_records(&self) -> LoadResult<(Vec<RecordFile>, Vec<String>)> {
        let entries = std::fs::read_dir(&self.data_dir).map_err(|e| {
            anyhow::anyhow!(
                "Failed to read data directory {}: {}",
                self.data_dir.display(),
                e
            )
        })?;

        let mut paths = Vec::new();
        for entry in entries {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                paths.push(entry.path());
            }
        }
        paths.sort();

        let mut files = Vec::new();
        let mut skipped = Vec::new();
        for path in paths {
            match RecordKind::from_path(&path) {
                Some(kind) => files.push(RecordFile::load(kind, &path, &self.data_dir)?),
                None => {
                    let name = path
                        .file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                        .unwrap_or_default();
                    if name != SIDES_FILE {
                        skipped.push(name);
                    }
                }
            }
        }

        Ok((files, skipped))
    }

    /// Load the scope table and every record file.
    pub fn load(&self) -> LoadResult<ContentSet> {
        let sides = self.load_sides()?;
        let (files, skipped) = self.load_records()?;
        Ok(ContentSet {
            sides,
            files,
            skipped,
        })
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}
