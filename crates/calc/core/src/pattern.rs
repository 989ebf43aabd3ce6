//! Pattern expressions: a base part plus ad hoc child modifications.
//!
//! ```text
//! pattern  = base (";" modifier)*
//! base     = ID [":" count]          count is a real instance multiplier
//! modifier = ["+" | "-"] ID [":" n]  n is an integer, default 1
//! request  = pattern ("," pattern)*
//! ```
//!
//! Resolution copies the base part's children into a multiset, applies the
//! modifiers, and never touches the stored definition.

use std::collections::BTreeMap;

use crate::error::{CalcError, Result};
use crate::model::{BonusId, Catalog, PartId};
use crate::price::Price;

/// Whether a modifier adds or removes child instances.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Sign {
    Add,
    Remove,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    pub sign: Sign,
    pub part: PartId,
    pub delta: i64,
}

impl Modifier {
    fn signed_delta(&self) -> Result<i64> {
        match self.sign {
            Sign::Add => Some(self.delta),
            Sign::Remove => self.delta.checked_neg(),
        }
        .ok_or_else(|| CalcError::InvalidCount(self.delta.to_string()))
    }
}

/// A parsed, not yet resolved pattern.
#[derive(Clone, Debug, PartialEq)]
pub struct Pattern {
    pub base: PartId,
    pub count: f64,
    pub modifiers: Vec<Modifier>,
}

/// Ephemeral composition derived from a base part and modifiers.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedPattern {
    pub base: PartId,
    pub cost: Price,
    pub bonus: BTreeMap<BonusId, Price>,
    /// Child multiset; every count is at least one.
    pub children: BTreeMap<PartId, u32>,
}

fn split_count(field: &str) -> (&str, Option<&str>) {
    match field.split_once(':') {
        Some((id, count)) => (id.trim(), Some(count.trim())),
        None => (field.trim(), None),
    }
}

impl Pattern {
    pub fn parse(text: &str) -> Result<Self> {
        let mut fields = text.split(';');
        let (base, count) = split_count(fields.next().unwrap_or_default());
        let count = match count {
            Some(raw) => raw
                .parse::<f64>()
                .ok()
                .filter(|count| count.is_finite())
                .ok_or_else(|| CalcError::InvalidCount(raw.to_string()))?,
            None => 1.0,
        };

        let mut modifiers = Vec::new();
        for field in fields {
            let (id, delta) = split_count(field);
            let delta = match delta {
                Some(raw) => raw
                    .parse::<i64>()
                    .map_err(|_| CalcError::InvalidCount(raw.to_string()))?,
                None => 1,
            };

            let (sign, id) = if let Some(id) = id.strip_prefix('+') {
                (Sign::Add, id)
            } else if let Some(id) = id.strip_prefix('-') {
                (Sign::Remove, id)
            } else {
                (Sign::Add, id)
            };
            let id = id.trim();
            if id.is_empty() {
                continue;
            }

            modifiers.push(Modifier {
                sign,
                part: id.to_string(),
                delta,
            });
        }

        Ok(Self {
            base: base.to_string(),
            count,
            modifiers,
        })
    }

    /// Parses a comma-separated list of patterns.
    pub fn parse_request(text: &str) -> Result<Vec<Self>> {
        text.split(',').map(Self::parse).collect()
    }

    /// Materializes the pattern against a catalog.
    ///
    /// Returns the composition and the instance multiplier for the whole
    /// pattern. Either every referenced part exists or nothing resolves.
    pub fn resolve(&self, catalog: &Catalog) -> Result<(ResolvedPattern, f64)> {
        let base = catalog.part(&self.base)?;

        let mut counts: BTreeMap<PartId, i64> = base
            .child_counts()
            .into_iter()
            .map(|(id, count)| (id, i64::from(count)))
            .collect();

        for modifier in &self.modifiers {
            catalog.part(&modifier.part)?;
            let count = counts.entry(modifier.part.clone()).or_insert(0);
            *count = count
                .checked_add(modifier.signed_delta()?)
                .ok_or_else(|| CalcError::InvalidCount(modifier.delta.to_string()))?;
        }

        // Counts beyond u32 are rejected, never clamped.
        let children = counts
            .into_iter()
            .filter(|(_, count)| *count > 0)
            .map(|(id, count)| {
                u32::try_from(count)
                    .map(|count| (id, count))
                    .map_err(|_| CalcError::InvalidCount(count.to_string()))
            })
            .collect::<Result<_>>()?;

        let resolved = ResolvedPattern {
            base: base.id.clone(),
            cost: base.cost,
            bonus: base.bonus.clone(),
            children,
        };
        Ok((resolved, self.count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Part;

    fn part(id: &str, children: &[&str]) -> Part {
        Part {
            name: id.to_uppercase(),
            description: String::new(),
            id: id.to_string(),
            cost: Price::new(1.0, 0.0, 0.0, 0.0),
            bonus: BTreeMap::new(),
            children: children.iter().map(|c| c.to_string()).collect(),
        }
    }

    fn catalog() -> Catalog {
        let mut catalog = Catalog::seeded();
        catalog.insert_part(part("x", &["y", "y", "z"]));
        catalog.insert_part(part("y", &[]));
        catalog.insert_part(part("z", &[]));
        catalog
    }

    #[test]
    fn parses_base_and_modifiers() {
        let pattern = Pattern::parse("x:2.5; +y ;-z:3; w:2").unwrap();
        assert_eq!(pattern.base, "x");
        assert_eq!(pattern.count, 2.5);
        assert_eq!(
            pattern.modifiers,
            vec![
                Modifier { sign: Sign::Add, part: "y".into(), delta: 1 },
                Modifier { sign: Sign::Remove, part: "z".into(), delta: 3 },
                Modifier { sign: Sign::Add, part: "w".into(), delta: 2 },
            ]
        );
    }

    #[test]
    fn empty_modifiers_are_skipped() {
        let pattern = Pattern::parse("x;;+").unwrap();
        assert!(pattern.modifiers.is_empty());
    }

    #[test]
    fn malformed_counts_fail() {
        assert_eq!(
            Pattern::parse("x:two").unwrap_err(),
            CalcError::InvalidCount("two".into())
        );
        assert_eq!(
            Pattern::parse("x;+y:1.5").unwrap_err(),
            CalcError::InvalidCount("1.5".into())
        );
        assert!(matches!(
            Pattern::parse("x:inf").unwrap_err(),
            CalcError::InvalidCount(_)
        ));
    }

    #[test]
    fn modifiers_adjust_multiset_without_touching_catalog() {
        let catalog = catalog();
        let pattern = Pattern::parse("x:2;-y;+z:2").unwrap();
        let (resolved, count) = pattern.resolve(&catalog).unwrap();

        assert_eq!(count, 2.0);
        assert_eq!(resolved.children.get("y"), Some(&1));
        assert_eq!(resolved.children.get("z"), Some(&3));
        assert_eq!(catalog.part("x").unwrap().children, vec!["y", "y", "z"]);
    }

    #[test]
    fn removal_below_zero_drops_entry() {
        let catalog = catalog();
        let (resolved, _) = Pattern::parse("x;-z:5;-y").unwrap().resolve(&catalog).unwrap();
        assert!(!resolved.children.contains_key("z"));
        assert_eq!(resolved.children.get("y"), Some(&1));

        let (leaf, _) = Pattern::parse("y;-z").unwrap().resolve(&catalog).unwrap();
        assert!(leaf.children.is_empty());
    }

    #[test]
    fn unknown_parts_reject_pattern() {
        let catalog = catalog();
        assert_eq!(
            Pattern::parse("nope").unwrap().resolve(&catalog).unwrap_err(),
            CalcError::PartNotFound("nope".into())
        );
        assert_eq!(
            Pattern::parse("x;+ghost").unwrap().resolve(&catalog).unwrap_err(),
            CalcError::PartNotFound("ghost".into())
        );
    }

    #[test]
    fn overflowing_modifier_counts_are_rejected() {
        let catalog = catalog();
        assert_eq!(
            Pattern::parse("x;+y:9223372036854775807;+y:1")
                .unwrap()
                .resolve(&catalog)
                .unwrap_err(),
            CalcError::InvalidCount("1".into())
        );
        assert!(matches!(
            Pattern::parse("x;-y:-9223372036854775808")
                .unwrap()
                .resolve(&catalog)
                .unwrap_err(),
            CalcError::InvalidCount(_)
        ));
    }

    #[test]
    fn child_counts_beyond_u32_are_rejected_not_clamped() {
        let catalog = catalog();
        assert_eq!(
            Pattern::parse("x;+y:5000000000")
                .unwrap()
                .resolve(&catalog)
                .unwrap_err(),
            CalcError::InvalidCount("5000000002".into())
        );

        let (resolved, _) = Pattern::parse("x;+y:4294967293")
            .unwrap()
            .resolve(&catalog)
            .unwrap();
        assert_eq!(resolved.children.get("y"), Some(&u32::MAX));
    }

    #[test]
    fn request_splits_on_commas() {
        let patterns = Pattern::parse_request("x, y:2").unwrap();
        assert_eq!(patterns.len(), 2);
        assert_eq!(patterns[1].base, "y");
        assert_eq!(patterns[1].count, 2.0);
    }
}
