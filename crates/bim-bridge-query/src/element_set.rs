// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Ordered, duplicate-free element collection

use crate::FxIndexMap;
use bim_bridge_model::{Element, NativeId};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Elements in first-seen order, unique by [`NativeId`]
#[derive(Clone, Debug, Default)]
pub struct ElementSet {
    items: FxIndexMap<NativeId, Arc<Element>>,
}

impl ElementSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an element; returns `false` if its id was already present
    pub fn insert(&mut self, element: Arc<Element>) -> bool {
        match self.items.entry(element.id) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(element);
                true
            }
        }
    }

    /// Append every element of `other` not already present
    pub fn union_with(&mut self, other: &ElementSet) {
        for element in other.iter() {
            self.insert(Arc::clone(element));
        }
    }

    /// Keep only elements satisfying `keep`, preserving order
    pub fn retain(&mut self, mut keep: impl FnMut(&Element) -> bool) {
        self.items.retain(|_, element| keep(element));
    }

    /// Keep only elements whose id is in `ids`
    pub fn retain_ids(&mut self, ids: &FxHashSet<NativeId>) {
        self.items.retain(|id, _| ids.contains(id));
    }

    pub fn contains(&self, id: NativeId) -> bool {
        self.items.contains_key(&id)
    }

    pub fn get(&self, id: NativeId) -> Option<&Arc<Element>> {
        self.items.get(&id)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Ids in order
    pub fn ids(&self) -> Vec<NativeId> {
        self.items.keys().copied().collect()
    }

    /// Ids as a hash set, for intersection tests
    pub fn id_set(&self) -> FxHashSet<NativeId> {
        self.items.keys().copied().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<Element>> {
        self.items.values()
    }

    pub fn into_vec(self) -> Vec<Arc<Element>> {
        self.items.into_values().collect()
    }
}

impl Extend<Arc<Element>> for ElementSet {
    fn extend<I: IntoIterator<Item = Arc<Element>>>(&mut self, iter: I) {
        for element in iter {
            self.insert(element);
        }
    }
}

impl FromIterator<Arc<Element>> for ElementSet {
    fn from_iter<I: IntoIterator<Item = Arc<Element>>>(iter: I) -> Self {
        let mut set = ElementSet::new();
        set.extend(iter);
        set
    }
}

impl IntoIterator for ElementSet {
    type Item = Arc<Element>;
    type IntoIter = indexmap::map::IntoValues<NativeId, Arc<Element>>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_values()
    }
}
