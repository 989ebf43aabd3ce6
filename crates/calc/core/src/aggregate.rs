//! Recursive cost aggregation over a composition tree.

use std::collections::BTreeMap;

use crate::error::{CalcError, Result};
use crate::model::{BonusId, Catalog, Part, PartId};
use crate::pattern::ResolvedPattern;
use crate::price::Price;

/// A node of a composition tree: its own cost and bonus contributions, and
/// the child parts it references with their multiplicities.
pub trait CompositionNode {
    fn id(&self) -> &str;
    fn cost(&self) -> Price;
    fn bonus(&self) -> &BTreeMap<BonusId, Price>;
    fn children(&self) -> BTreeMap<PartId, u32>;
}

impl CompositionNode for Part {
    fn id(&self) -> &str {
        &self.id
    }

    fn cost(&self) -> Price {
        self.cost
    }

    fn bonus(&self) -> &BTreeMap<BonusId, Price> {
        &self.bonus
    }

    fn children(&self) -> BTreeMap<PartId, u32> {
        self.child_counts()
    }
}

impl CompositionNode for ResolvedPattern {
    fn id(&self) -> &str {
        &self.base
    }

    fn cost(&self) -> Price {
        self.cost
    }

    fn bonus(&self) -> &BTreeMap<BonusId, Price> {
        &self.bonus
    }

    fn children(&self) -> BTreeMap<PartId, u32> {
        self.children.clone()
    }
}

/// Running totals shared by every pattern of one request.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Aggregate {
    pub cost: Price,
    pub bonus: BTreeMap<BonusId, Price>,
}

impl Aggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `node` and its whole subtree, scaled by `multiplier`.
    ///
    /// Children are looked up in `catalog`; a dangling reference fails with
    /// `PartNotFound` and a part reachable from itself fails with
    /// `CompositionCycle`. On error the totals may hold a partial sum and
    /// should be discarded.
    pub fn add_tree(
        &mut self,
        catalog: &Catalog,
        node: &impl CompositionNode,
        multiplier: f64,
    ) -> Result<()> {
        let mut path = Vec::new();
        self.visit(catalog, node, multiplier, &mut path)
    }

    fn visit(
        &mut self,
        catalog: &Catalog,
        node: &impl CompositionNode,
        multiplier: f64,
        path: &mut Vec<String>,
    ) -> Result<()> {
        if path.iter().any(|id| id == node.id()) {
            return Err(CalcError::CompositionCycle(node.id().to_string()));
        }
        path.push(node.id().to_string());

        self.cost += node.cost() * multiplier;
        for (id, contribution) in node.bonus() {
            *self.bonus.entry(id.clone()).or_default() += *contribution * multiplier;
        }

        // Repeated children are folded into a count; costs only sum, so
        // scaling by the count equals visiting each instance.
        for (child_id, count) in node.children() {
            let child = catalog.part(&child_id)?;
            self.visit(catalog, child, multiplier * f64::from(count), path)?;
        }

        path.pop();
        Ok(())
    }
}
