// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Serializable document snapshot

use bim_bridge_model::{
    BridgeError, Category, Element, FamilySymbol, NativeId, Result, SelectionSet, Workset,
    WorksetId,
};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

/// Everything a [`crate::MemoryDocument`] is built from
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocumentSnapshot {
    pub categories: Vec<Category>,
    pub worksets: Vec<Workset>,
    pub active_workset: Option<WorksetId>,
    pub elements: Vec<Element>,
    pub selection: Vec<NativeId>,
    pub selection_sets: Vec<SelectionSet>,
    pub family_symbols: Vec<FamilySymbol>,
}

impl DocumentSnapshot {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse snapshot JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to pretty JSON
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn with_category(mut self, category: Category) -> Self {
        self.categories.push(category);
        self
    }

    pub fn with_workset(mut self, workset: Workset) -> Self {
        self.worksets.push(workset);
        self
    }

    pub fn with_active_workset(mut self, workset: WorksetId) -> Self {
        self.active_workset = Some(workset);
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.elements.push(element);
        self
    }

    pub fn with_selection(mut self, ids: impl IntoIterator<Item = NativeId>) -> Self {
        self.selection.extend(ids);
        self
    }

    pub fn with_selection_set(mut self, set: SelectionSet) -> Self {
        self.selection_sets.push(set);
        self
    }

    pub fn with_family_symbol(mut self, symbol: FamilySymbol) -> Self {
        self.family_symbols.push(symbol);
        self
    }

    /// Check numeric and persistent ids are unique and every
    /// category/workset an element names is defined
    ///
    /// Element-to-element references (`references`, `type_id`, selections)
    /// may dangle: hosts routinely hold ids of deleted elements.
    pub fn validate(&self) -> Result<()> {
        let mut seen = FxHashSet::default();
        let mut seen_persistent = FxHashSet::default();
        for element in &self.elements {
            if !seen.insert(element.id) {
                return Err(BridgeError::DuplicateElement(element.id));
            }
            if !seen_persistent.insert(&element.persistent_id) {
                return Err(BridgeError::DuplicatePersistentId(
                    element.persistent_id.clone(),
                ));
            }
        }

        let categories: FxHashSet<_> = self.categories.iter().map(|c| c.id).collect();
        let worksets: FxHashSet<_> = self.worksets.iter().map(|w| w.id).collect();

        for element in &self.elements {
            if let Some(category) = element.category {
                if !categories.contains(&category) {
                    return Err(BridgeError::dangling(
                        element.id.to_string(),
                        category.to_string(),
                    ));
                }
            }
            if let Some(workset) = element.workset {
                if !worksets.contains(&workset) {
                    return Err(BridgeError::dangling(
                        element.id.to_string(),
                        workset.to_string(),
                    ));
                }
            }
        }

        if let Some(active) = self.active_workset {
            if !worksets.contains(&active) {
                return Err(BridgeError::dangling("active workset", active.to_string()));
            }
        }

        Ok(())
    }
}
