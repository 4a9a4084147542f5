// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Logical composer - resolves whole filter trees
//!
//! Resolution is bottom-up and produces a [`ResultMap`] rather than a flat
//! set:
//!
//! - a leaf contributes one entry, keyed by the leaf;
//! - an `Or` merges its children's maps and adds no entry of its own;
//! - an `And` merges its children's maps, computes the ids present in every
//!   child's result and prunes *every* collected entry to that set, so an
//!   ancestor still sees each original leaf with only its surviving elements;
//! - a `Not` contributes one entry, keyed by itself, holding every document
//!   element its child did not match.

use crate::{
    CriteriaEvaluator, ElementSet, EvaluatorOptions, FilterKind, FilterNode, ResultMap,
};
use bim_bridge_model::{HostStore, NativeId};
use rustc_hash::FxHashSet;

/// Tree resolver bound to one host document
pub struct Composer<'s> {
    evaluator: CriteriaEvaluator<'s>,
}

impl<'s> Composer<'s> {
    /// Create a composer with default evaluator options
    pub fn new(store: &'s dyn HostStore) -> Self {
        Self {
            evaluator: CriteriaEvaluator::new(store),
        }
    }

    /// Create a composer with explicit evaluator options
    pub fn with_options(store: &'s dyn HostStore, options: EvaluatorOptions) -> Self {
        Self {
            evaluator: CriteriaEvaluator::with_options(store, options),
        }
    }

    pub fn evaluator(&self) -> &CriteriaEvaluator<'s> {
        &self.evaluator
    }

    /// Resolve a whole tree
    pub fn resolve<'f>(&self, root: &'f FilterNode) -> ResolvedQuery<'f> {
        log::debug!("resolving filter tree '{}'", root.display_name());
        let map = self.resolve_node(root);
        let resolved = ResolvedQuery { root, map };
        log::debug!(
            "filter tree '{}' resolved: {} entries, {} elements",
            root.display_name(),
            resolved.map.len(),
            resolved.len()
        );
        resolved
    }

    fn resolve_node<'f>(&self, node: &'f FilterNode) -> ResultMap<'f> {
        match &node.kind {
            FilterKind::Leaf(leaf) => {
                let elements = self.evaluator.evaluate_leaf(leaf);
                log::trace!("leaf '{}': {} elements", node.display_name(), elements.len());
                ResultMap::single(node, elements)
            }
            FilterKind::Or(children) => {
                let mut merged = ResultMap::new();
                for child in children {
                    merged.merge(self.resolve_node(child));
                }
                merged
            }
            FilterKind::And(children) => {
                let mut merged = ResultMap::new();
                let mut common: Option<FxHashSet<NativeId>> = None;
                for child in children {
                    let child_map = self.resolve_node(child);
                    let child_ids = child_map.id_set();
                    common = Some(match common {
                        None => child_ids,
                        Some(so_far) => so_far.intersection(&child_ids).copied().collect(),
                    });
                    merged.merge(child_map);
                }
                let common = common.unwrap_or_default();
                log::trace!(
                    "and '{}': {} elements common to {} branches",
                    node.display_name(),
                    common.len(),
                    children.len()
                );
                merged.restrict_to(&common);
                merged
            }
            FilterKind::Not(child) => {
                let excluded = self.resolve_node(child).id_set();
                let complement: ElementSet = self
                    .evaluator
                    .store()
                    .all_elements()
                    .into_iter()
                    .filter(|e| !excluded.contains(&e.id))
                    .collect();
                ResultMap::single(node, complement)
            }
        }
    }
}

/// Outcome of resolving one tree
#[derive(Clone, Debug)]
pub struct ResolvedQuery<'f> {
    root: &'f FilterNode,
    map: ResultMap<'f>,
}

impl<'f> ResolvedQuery<'f> {
    pub fn root(&self) -> &'f FilterNode {
        self.root
    }

    /// Per-node entries
    pub fn map(&self) -> &ResultMap<'f> {
        &self.map
    }

    pub(crate) fn map_mut(&mut self) -> &mut ResultMap<'f> {
        &mut self.map
    }

    /// Elements the root matched, first-seen order
    pub fn elements(&self) -> ElementSet {
        self.map.union_of_entries()
    }

    /// Ids the root matched, first-seen order
    pub fn ids(&self) -> Vec<NativeId> {
        self.elements().ids()
    }

    pub fn len(&self) -> usize {
        self.map.id_set().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Elements recorded for one node of the tree
    pub fn entry(&self, node: &FilterNode) -> Option<&ElementSet> {
        self.map.get(node)
    }

    /// Every node whose entry contains `id`
    pub fn matches(&self, id: NativeId) -> Vec<&'f FilterNode> {
        self.map.nodes_containing(id)
    }
}

/// Resolve a tree with default options
pub fn resolve<'f>(root: &'f FilterNode, store: &dyn HostStore) -> ResolvedQuery<'f> {
    Composer::new(store).resolve(root)
}

/// Resolve a tree with explicit options
pub fn resolve_with<'f>(
    root: &'f FilterNode,
    store: &dyn HostStore,
    options: EvaluatorOptions,
) -> ResolvedQuery<'f> {
    Composer::with_options(store, options).resolve(root)
}

/// Filter nodes of an already-resolved tree that selected `id`
pub fn matches<'f>(resolved: &ResolvedQuery<'f>, id: NativeId) -> Vec<&'f FilterNode> {
    resolved.matches(id)
}
