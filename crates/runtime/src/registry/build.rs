//! Builds a complete side map from loaded content.

use std::collections::HashMap;
use std::sync::Arc;

use calc_content::{ContentSet, Records, SideDefinition};
use calc_core::{CalcError, Catalog, DEFAULT_SCOPE};

use super::{Side, SideMap};

/// Display name of the fallback side.
pub const DEFAULT_SIDE_NAME: &str = "Default side";

fn apply(catalog: &mut Catalog, records: &Records) {
    match records {
        Records::Spires(spires) => spires
            .iter()
            .for_each(|spire| catalog.insert_spire(spire.clone())),
        Records::Parts(parts) => parts
            .iter()
            .for_each(|part| catalog.insert_part(part.clone())),
        Records::Bonuses(bonuses) => bonuses
            .iter()
            .for_each(|bonus| catalog.insert_bonus(bonus.clone())),
    }
}

/// Map holding only the default side with the built-in spires.
pub(super) fn default_side_map() -> SideMap {
    SideMap {
        sides: HashMap::new(),
        default: Arc::new(Side::new(DEFAULT_SCOPE, DEFAULT_SIDE_NAME, Catalog::seeded())),
        generation: 0,
    }
}

/// Routes every record file into fresh side catalogs.
///
/// A file whose name starts with a side's prefix goes to that side only;
/// every other file is broadcast to all sides, the default side included.
pub(super) fn build_side_map(content: &ContentSet, generation: u64) -> Result<SideMap, CalcError> {
    let mut default = Catalog::seeded();
    let mut drafts: Vec<(&SideDefinition, Catalog)> = Vec::new();
    for definition in &content.sides {
        if definition.scope == DEFAULT_SCOPE
            || drafts.iter().any(|(other, _)| other.scope == definition.scope)
        {
            return Err(CalcError::ConfigLoad(format!(
                "duplicate side scope {:?}",
                definition.scope
            )));
        }
        if let Some((other, _)) = drafts.iter().find(|(other, _)| {
            other.claims(&definition.prefix) || definition.claims(&other.prefix)
        }) {
            return Err(CalcError::ConfigLoad(format!(
                "side prefixes {:?} and {:?} overlap",
                other.prefix, definition.prefix
            )));
        }
        drafts.push((definition, Catalog::seeded()));
    }

    for file in &content.files {
        let target = drafts
            .iter()
            .position(|(definition, _)| definition.claims(&file.file_name));
        match target {
            Some(index) => apply(&mut drafts[index].1, &file.records),
            None => {
                apply(&mut default, &file.records);
                for (_, catalog) in &mut drafts {
                    apply(catalog, &file.records);
                }
            }
        }
    }

    let sides = drafts
        .into_iter()
        .map(|(definition, catalog)| {
            let side = Side::new(&definition.scope, &definition.name, catalog);
            (definition.scope.clone(), Arc::new(side))
        })
        .collect();

    Ok(SideMap {
        sides,
        default: Arc::new(Side::new(DEFAULT_SCOPE, DEFAULT_SIDE_NAME, default)),
        generation,
    })
}
