// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pull direction: native element to converted domain objects

use bim_bridge_model::{HasOrigin, NativeId};
use im::{HashMap, Vector};

/// Domain objects already converted, keyed by the native id they came from
///
/// One element may decompose into several objects, so each key holds an
/// ordered list. Appending never mutates a version another caller holds.
#[derive(Clone, Debug)]
pub struct PullCache<D: Clone> {
    entries: HashMap<NativeId, Vector<D>>,
}

impl<D: Clone> Default for PullCache<D> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<D: Clone + HasOrigin> PullCache<D> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Objects converted from `id`, empty if none
    pub fn find(&self, id: NativeId) -> Vec<D> {
        self.entries
            .get(&id)
            .map(|list| list.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, id: NativeId) -> bool {
        self.entries.get(&id).is_some_and(|list| !list.is_empty())
    }

    /// New version with `object` appended under its origin id
    ///
    /// An object without an origin cannot be keyed; the returned version
    /// equals this one.
    pub fn with(&self, object: D) -> Self {
        self.clone().append(object)
    }

    /// Consuming form of [`with`](Self::with)
    pub fn append(mut self, object: D) -> Self {
        let Some(id) = object.origin_id() else {
            log::warn!("pull cache: dropping object with no origin id");
            return self;
        };
        let mut list = self.entries.get(&id).cloned().unwrap_or_default();
        list.push_back(object);
        self.entries.insert(id, list);
        self
    }

    /// New version whose entry for `id` holds exactly `objects`, whatever
    /// their recorded origin
    pub fn replace(&self, id: NativeId, objects: impl IntoIterator<Item = D>) -> Self {
        let list: Vector<D> = objects.into_iter().collect();
        let entries = if list.is_empty() {
            self.entries.without(&id)
        } else {
            self.entries.update(id, list)
        };
        Self { entries }
    }

    /// Number of native ids with at least one entry
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Cached native ids, in no particular order
    pub fn keys(&self) -> impl Iterator<Item = NativeId> + '_ {
        self.entries.keys().copied()
    }

    /// Total objects across all keys
    pub fn object_count(&self) -> usize {
        self.entries.values().map(|list| list.len()).sum()
    }
}

/// Look up `id`; a missing cache behaves like an empty one
pub fn find_in_pull_cache<D: Clone + HasOrigin>(
    cache: Option<&PullCache<D>>,
    id: NativeId,
) -> Vec<D> {
    cache.map(|c| c.find(id)).unwrap_or_default()
}

/// Append `object`; `None` stays `None`
pub fn append_to_pull_cache<D: Clone + HasOrigin>(
    cache: Option<PullCache<D>>,
    object: D,
) -> Option<PullCache<D>> {
    cache.map(|c| c.append(object))
}
