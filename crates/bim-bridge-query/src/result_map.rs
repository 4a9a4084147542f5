// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-node result maps
//!
//! A result map keeps, for every filter node that contributed to a
//! resolution, the elements that node matched. Union merges entries by key;
//! restriction prunes every entry to a common id set, which is how an `And`
//! broadcasts its intersection back into each branch.

use crate::{ElementSet, FilterNode, FxIndexMap};
use bim_bridge_model::NativeId;
use rustc_hash::FxHashSet;
use std::hash::{Hash, Hasher};

/// A filter node keyed by address
#[derive(Clone, Copy, Debug)]
pub struct NodeRef<'f>(pub &'f FilterNode);

impl<'f> NodeRef<'f> {
    pub fn node(&self) -> &'f FilterNode {
        self.0
    }
}

impl PartialEq for NodeRef<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.0, other.0)
    }
}

impl Eq for NodeRef<'_> {}

impl Hash for NodeRef<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::ptr::hash(self.0, state)
    }
}

/// Filter node -> matched elements, in first-contribution order
#[derive(Clone, Debug, Default)]
pub struct ResultMap<'f> {
    entries: FxIndexMap<NodeRef<'f>, ElementSet>,
}

impl<'f> ResultMap<'f> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map with one entry
    pub fn single(node: &'f FilterNode, elements: ElementSet) -> Self {
        let mut map = Self::new();
        map.entries.insert(NodeRef(node), elements);
        map
    }

    /// Union `other` into `self`; entries sharing a key are concatenated
    /// and deduplicated
    pub fn merge(&mut self, other: ResultMap<'f>) {
        for (key, elements) in other.entries {
            match self.entries.get_mut(&key) {
                Some(existing) => existing.union_with(&elements),
                None => {
                    self.entries.insert(key, elements);
                }
            }
        }
    }

    /// Every element of every entry, first-seen order
    pub fn union_of_entries(&self) -> ElementSet {
        let mut all = ElementSet::new();
        for elements in self.entries.values() {
            all.union_with(elements);
        }
        all
    }

    /// Ids present in any entry
    pub fn id_set(&self) -> FxHashSet<NativeId> {
        self.entries
            .values()
            .flat_map(|elements| elements.ids())
            .collect()
    }

    /// Prune every entry to the ids in `keep`
    ///
    /// Keys stay present even when their list becomes empty, so provenance
    /// for a key can still be asked about.
    pub fn restrict_to(&mut self, keep: &FxHashSet<NativeId>) {
        for elements in self.entries.values_mut() {
            elements.retain_ids(keep);
        }
    }

    /// Apply a per-element predicate to every entry
    pub fn retain_elements(&mut self, mut keep: impl FnMut(&bim_bridge_model::Element) -> bool) {
        for elements in self.entries.values_mut() {
            elements.retain(&mut keep);
        }
    }

    /// Elements recorded for `node`, if it has an entry
    pub fn get(&self, node: &FilterNode) -> Option<&ElementSet> {
        // shorten the key lifetime to the lookup node's
        let entries: &FxIndexMap<NodeRef<'_>, ElementSet> = &self.entries;
        let index = entries.get_index_of(&NodeRef(node))?;
        self.entries.get_index(index).map(|(_, elements)| elements)
    }

    /// Nodes whose entry contains `id`, in entry order
    pub fn nodes_containing(&self, id: NativeId) -> Vec<&'f FilterNode> {
        self.entries
            .iter()
            .filter(|(_, elements)| elements.contains(id))
            .map(|(key, _)| key.0)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'f FilterNode, &ElementSet)> {
        self.entries.iter().map(|(key, elements)| (key.0, elements))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::LeafFilter;
    use bim_bridge_model::{Element, NativeClass};
    use std::sync::Arc;

    fn set(ids: &[i64]) -> ElementSet {
        ids.iter()
            .map(|&id| Arc::new(Element::new(id, format!("p{id}"), NativeClass::Wall, "W")))
            .collect()
    }

    fn leaf(name: &str) -> FilterNode {
        FilterNode::leaf(LeafFilter::new().named(name)).labeled(name)
    }

    #[test]
    fn test_keys_are_node_addresses() {
        let a = leaf("same");
        let b = leaf("same");
        assert_eq!(a, b);

        let mut map = ResultMap::single(&a, set(&[1]));
        map.merge(ResultMap::single(&b, set(&[2])));
        assert_eq!(map.len(), 2);
        assert_eq!(map.get(&a).unwrap().ids(), vec![NativeId(1)]);
        assert_eq!(map.get(&b).unwrap().ids(), vec![NativeId(2)]);
    }

    #[test]
    fn test_get_ignores_structurally_equal_nodes() {
        let a = leaf("a");
        let lookalike = leaf("a");
        let map = ResultMap::single(&a, set(&[1]));
        assert!(map.get(&a).is_some());
        assert!(map.get(&lookalike).is_none());
    }

    #[test]
    fn test_merge_same_key_concatenates_and_dedups() {
        let a = leaf("a");
        let mut map = ResultMap::single(&a, set(&[1, 2]));
        map.merge(ResultMap::single(&a, set(&[2, 3])));
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get(&a).unwrap().ids(),
            vec![NativeId(1), NativeId(2), NativeId(3)]
        );
    }

    #[test]
    fn test_restrict_keeps_keys() {
        let a = leaf("a");
        let b = leaf("b");
        let mut map = ResultMap::single(&a, set(&[1, 2, 3]));
        map.merge(ResultMap::single(&b, set(&[4])));

        let keep: FxHashSet<_> = [NativeId(2)].into_iter().collect();
        map.restrict_to(&keep);

        assert_eq!(map.get(&a).unwrap().ids(), vec![NativeId(2)]);
        assert!(map.get(&b).unwrap().is_empty());
        assert_eq!(map.len(), 2);
    }

    #[test]
    fn test_nodes_containing() {
        let a = leaf("a");
        let b = leaf("b");
        let mut map = ResultMap::single(&a, set(&[1, 2]));
        map.merge(ResultMap::single(&b, set(&[2, 3])));

        let hits: Vec<_> = map
            .nodes_containing(NativeId(2))
            .iter()
            .map(|n| n.display_name())
            .collect();
        assert_eq!(hits, vec!["a", "b"]);
        assert!(map.nodes_containing(NativeId(9)).is_empty());
        assert_eq!(map.union_of_entries().len(), 3);
    }
}
