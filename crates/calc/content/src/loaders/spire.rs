//! Spire catalog loader.

use std::path::Path;

use calc_core::Spire;

use crate::loaders::{LoadResult, read_file};

/// Loader for spire catalogs stored as JSON arrays.
pub struct SpireLoader;

impl SpireLoader {
    /// Load a spire catalog from a JSON file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a `.spire` file containing an array of spire records
    pub fn load(path: &Path) -> LoadResult<Vec<Spire>> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse spire catalog {}: {}", path.display(), e))
    }

    pub fn parse(content: &str) -> serde_json::Result<Vec<Spire>> {
        serde_json::from_str(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use calc_core::Price;

    #[test]
    fn parses_original_field_names() {
        let spires = SpireLoader::parse(
            r#"[{"Name": "Forge", "Desc": "A forge", "ID": "forge", "Prod": {"C": 2, "S": 1.5}}]"#,
        )
        .unwrap();
        assert_eq!(spires[0].id, "forge");
        assert_eq!(spires[0].description, "A forge");
        assert_eq!(spires[0].production, Price::new(2.0, 0.0, 0.0, 1.5));
    }

    #[test]
    fn accepts_long_field_names() {
        let spires = SpireLoader::parse(
            r#"[{"Name": "Mill", "Description": "d", "ID": "mill", "Production": {"W": 4}}]"#,
        )
        .unwrap();
        assert_eq!(spires[0].production.w, 4.0);
    }

    #[test]
    fn missing_id_is_an_error() {
        assert!(SpireLoader::parse(r#"[{"Name": "Nameless"}]"#).is_err());
    }
}
