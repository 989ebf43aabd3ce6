//! Content loaders for reading calculator data from files.

pub mod bonus;
pub mod factory;
pub mod part;
pub mod records;
pub mod sides;
pub mod spire;

pub use bonus::BonusLoader;
pub use factory::{ContentFactory, ContentSet};
pub use part::PartLoader;
pub use records::{RecordFile, RecordKind, Records};
pub use sides::{SideDefinition, SidesLoader};
pub use spire::SpireLoader;

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
