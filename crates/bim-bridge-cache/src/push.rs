// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Push direction: domain object to native ids created for it

use bim_bridge_model::{HasOrigin, NativeId, PersistentId};
use im::{HashMap, Vector};

/// Native ids already created for a domain object, keyed by its persistent id
#[derive(Clone, Debug, Default)]
pub struct PushCache {
    entries: HashMap<PersistentId, Vector<NativeId>>,
}

impl PushCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Native ids created for `id`, empty if none
    pub fn find(&self, id: &PersistentId) -> Vec<NativeId> {
        self.entries
            .get(id)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Native ids created for a domain object, looked up by its own identity
    pub fn native_ids_for(&self, object: &impl HasOrigin) -> Vec<NativeId> {
        match object.persistent_id() {
            Some(id) => self.find(id),
            None => Vec::new(),
        }
    }

    /// New version with `native` appended under `id`
    pub fn with(&self, id: PersistentId, native: NativeId) -> Self {
        self.clone().append(id, native)
    }

    /// Consuming form of [`with`](Self::with)
    pub fn append(mut self, id: PersistentId, native: NativeId) -> Self {
        let mut ids = self.entries.get(&id).cloned().unwrap_or_default();
        ids.push_back(native);
        self.entries.insert(id, ids);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Look up `id`; a missing cache behaves like an empty one
pub fn find_in_push_cache(cache: Option<&PushCache>, id: &PersistentId) -> Vec<NativeId> {
    cache.map(|c| c.find(id)).unwrap_or_default()
}

/// Append `native` under `id`; `None` stays `None`
pub fn append_to_push_cache(
    cache: Option<PushCache>,
    id: PersistentId,
    native: NativeId,
) -> Option<PushCache> {
    cache.map(|c| c.append(id, native))
}
