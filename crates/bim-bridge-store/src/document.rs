// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! MemoryDocument - HostStore implementation over indexed vectors

use crate::snapshot::DocumentSnapshot;
use bim_bridge_model::{
    Category, CategoryId, Element, FamilySymbol, HostStore, NativeClass, NativeId, PersistentId,
    Result, SelectionSet, Workset, WorksetId,
};
use rustc_hash::FxHashMap;
use std::sync::Arc;

/// In-memory host document
///
/// Elements keep their snapshot order; every index stores positions into
/// that order so enumerations are stable across calls.
pub struct MemoryDocument {
    /// Elements in enumeration order
    elements: Vec<Arc<Element>>,
    /// Numeric id -> position
    id_index: FxHashMap<NativeId, usize>,
    /// Persistent id -> position
    persistent_index: FxHashMap<PersistentId, usize>,
    /// Class -> positions
    class_index: FxHashMap<NativeClass, Vec<usize>>,
    /// Category -> positions
    category_index: FxHashMap<CategoryId, Vec<usize>>,
    /// Workset -> positions
    workset_index: FxHashMap<WorksetId, Vec<usize>>,
    /// Family symbol -> positions of its instances
    symbol_index: FxHashMap<NativeId, Vec<usize>>,
    categories: Vec<Category>,
    worksets: Vec<Workset>,
    active_workset: Option<WorksetId>,
    selection: Vec<NativeId>,
    selection_sets: Vec<SelectionSet>,
    family_symbols: Vec<FamilySymbol>,
}

impl MemoryDocument {
    /// Build a document from a validated snapshot
    pub fn from_snapshot(snapshot: DocumentSnapshot) -> Result<Self> {
        snapshot.validate()?;

        let DocumentSnapshot {
            categories,
            worksets,
            active_workset,
            elements,
            selection,
            selection_sets,
            family_symbols,
        } = snapshot;

        let mut id_index = FxHashMap::default();
        let mut persistent_index = FxHashMap::default();
        let mut class_index: FxHashMap<NativeClass, Vec<usize>> = FxHashMap::default();
        let mut category_index: FxHashMap<CategoryId, Vec<usize>> = FxHashMap::default();
        let mut workset_index: FxHashMap<WorksetId, Vec<usize>> = FxHashMap::default();
        let mut symbol_index: FxHashMap<NativeId, Vec<usize>> = FxHashMap::default();

        for (pos, element) in elements.iter().enumerate() {
            id_index.insert(element.id, pos);
            persistent_index.insert(element.persistent_id.clone(), pos);
            class_index
                .entry(element.class.clone())
                .or_default()
                .push(pos);
            if let Some(category) = element.category {
                category_index.entry(category).or_default().push(pos);
            }
            if let Some(workset) = element.workset {
                workset_index.entry(workset).or_default().push(pos);
            }
            if let Some(symbol) = element.type_id {
                symbol_index.entry(symbol).or_default().push(pos);
            }
        }

        log::debug!(
            "indexed {} elements ({} classes, {} categories, {} worksets)",
            elements.len(),
            class_index.len(),
            categories.len(),
            worksets.len()
        );

        Ok(Self {
            elements: elements.into_iter().map(Arc::new).collect(),
            id_index,
            persistent_index,
            class_index,
            category_index,
            workset_index,
            symbol_index,
            categories,
            worksets,
            active_workset,
            selection,
            selection_sets,
            family_symbols,
        })
    }

    /// Parse snapshot JSON and build a document
    pub fn from_json(json: &str) -> Result<Self> {
        Self::from_snapshot(DocumentSnapshot::from_json(json)?)
    }

    /// Read a snapshot file and build a document
    pub fn from_path(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Replace the current UI selection
    pub fn set_selection(&mut self, ids: impl IntoIterator<Item = NativeId>) {
        self.selection = ids.into_iter().collect();
    }

    fn at(&self, positions: &[usize]) -> Vec<Arc<Element>> {
        positions
            .iter()
            .map(|&pos| Arc::clone(&self.elements[pos]))
            .collect()
    }
}

impl HostStore for MemoryDocument {
    fn element_by_id(&self, id: NativeId) -> Option<Arc<Element>> {
        self.id_index
            .get(&id)
            .map(|&pos| Arc::clone(&self.elements[pos]))
    }

    fn element_by_persistent_id(&self, id: &PersistentId) -> Option<Arc<Element>> {
        self.persistent_index
            .get(id)
            .map(|&pos| Arc::clone(&self.elements[pos]))
    }

    fn all_elements(&self) -> Vec<Arc<Element>> {
        self.elements.clone()
    }

    fn elements_of_class(&self, class: &NativeClass) -> Vec<Arc<Element>> {
        if *class == NativeClass::RoofBase {
            // Subclasses interleave in enumeration order
            return self
                .elements
                .iter()
                .filter(|e| e.class.is_a(class))
                .cloned()
                .collect();
        }
        self.class_index
            .get(class)
            .map(|positions| self.at(positions))
            .unwrap_or_default()
    }

    fn elements_of_category(&self, category: CategoryId) -> Vec<Arc<Element>> {
        self.category_index
            .get(&category)
            .map(|positions| self.at(positions))
            .unwrap_or_default()
    }

    fn categories(&self) -> Vec<Category> {
        self.categories.clone()
    }

    fn worksets(&self) -> Vec<Workset> {
        self.worksets.clone()
    }

    fn active_workset_id(&self) -> Option<WorksetId> {
        self.active_workset
    }

    fn current_selection_ids(&self) -> Vec<NativeId> {
        self.selection.clone()
    }

    fn selection_sets(&self) -> Vec<SelectionSet> {
        self.selection_sets.clone()
    }

    fn family_symbols(&self) -> Vec<FamilySymbol> {
        self.family_symbols.clone()
    }

    fn elements_in_workset(&self, workset: WorksetId) -> Vec<Arc<Element>> {
        self.workset_index
            .get(&workset)
            .map(|positions| self.at(positions))
            .unwrap_or_default()
    }

    fn instances_of_symbol(&self, symbol: NativeId) -> Vec<Arc<Element>> {
        self.symbol_index
            .get(&symbol)
            .map(|positions| self.at(positions))
            .unwrap_or_default()
    }

    fn element_count(&self) -> usize {
        self.elements.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_bridge_model::{BridgeError, HostStoreExt};

    const TEST_DOC: &str = r#"{
        "categories": [
            {"id": -2000011, "name": "Walls"},
            {"id": -2000032, "name": "Floors"},
            {"id": -2000240, "name": "Levels"}
        ],
        "worksets": [
            {"id": 1, "name": "Shared Levels and Grids", "is_open": true},
            {"id": 2, "name": "Architecture", "is_open": false}
        ],
        "active_workset": 1,
        "elements": [
            {"id": 10, "persistent_id": "lvl-0", "class": "Level", "category": -2000240, "workset": 1, "name": "Level 0"},
            {"id": 11, "persistent_id": "wall-a", "class": "Wall", "category": -2000011, "workset": 2, "name": "Wall A", "references": [10]},
            {"id": 12, "persistent_id": "floor-a", "class": "Floor", "category": -2000032, "workset": 2, "name": "Floor A", "references": [10]},
            {"id": 13, "persistent_id": "roof-a", "class": "FootPrintRoof", "name": "Roof A"},
            {"id": 14, "persistent_id": "door-1", "class": "FamilyInstance", "name": "Door 1", "type_id": 90}
        ],
        "selection": [11, 999],
        "family_symbols": [{"id": 90, "family_name": "Single-Flush", "name": "0915 x 2134mm"}]
    }"#;

    #[test]
    fn test_load_document() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();
        assert_eq!(doc.element_count(), 5);
        assert_eq!(doc.active_workset_id(), Some(WorksetId(1)));
        assert_eq!(doc.open_workset_ids(), vec![WorksetId(1)]);
    }

    #[test]
    fn test_shared_persistent_id_fails_to_load() {
        let json = r#"{"elements": [
            {"id": 1, "persistent_id": "same", "class": "Wall", "name": "A"},
            {"id": 2, "persistent_id": "same", "class": "Wall", "name": "B"}
        ]}"#;
        assert!(matches!(
            MemoryDocument::from_json(json),
            Err(BridgeError::DuplicatePersistentId(_))
        ));
    }

    #[test]
    fn test_qualified_and_unknown_class_names_load() {
        let json = r#"{"elements": [
            {"id": 1, "persistent_id": "a", "class": "DB.Wall", "name": "A"},
            {"id": 2, "persistent_id": "b", "class": "TopographySurface", "name": "B"},
            {"id": 3, "persistent_id": "c", "class": "Railing", "name": "C"}
        ]}"#;
        let doc = MemoryDocument::from_json(json).unwrap();
        assert_eq!(doc.elements_of_class(&NativeClass::Wall).len(), 1);
        assert_eq!(doc.elements_of_class(&NativeClass::Topography).len(), 1);
        let railing = NativeClass::Other("Railing".into());
        assert_eq!(doc.elements_of_class(&railing)[0].id, NativeId(3));
    }

    #[test]
    fn test_lookup_by_ids() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();

        let wall = doc.element_by_id(NativeId(11)).unwrap();
        assert_eq!(wall.name, "Wall A");

        let floor = doc
            .element_by_persistent_id(&PersistentId::new("floor-a"))
            .unwrap();
        assert_eq!(floor.id, NativeId(12));

        assert!(doc.element_by_id(NativeId(999)).is_none());
        assert!(doc.get_or_err(NativeId(999)).is_err());
    }

    #[test]
    fn test_class_and_category_enumeration() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();

        let walls = doc.elements_of_class(&NativeClass::Wall);
        assert_eq!(walls.len(), 1);

        let roofs = doc.elements_of_class(&NativeClass::RoofBase);
        assert_eq!(roofs.len(), 1);
        assert_eq!(roofs[0].id, NativeId(13));

        let floors_cat = doc.category_id_by_name("Floors").unwrap();
        let floors = doc.elements_of_category(floors_cat);
        assert_eq!(floors[0].id, NativeId(12));

        assert!(doc.category_id_by_name("floors").is_none());
    }

    #[test]
    fn test_workset_and_symbol_indices() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();

        let arch = doc.workset_id_by_name("Architecture").unwrap();
        let ids: Vec<_> = doc
            .elements_in_workset(arch)
            .iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![NativeId(11), NativeId(12)]);

        let doors = doc.instances_of_symbol(NativeId(90));
        assert_eq!(doors.len(), 1);
    }

    #[test]
    fn test_resolve_references() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();
        let wall = doc.element_by_id(NativeId(11)).unwrap();
        let refs = doc.resolve_references(&wall);
        assert_eq!(refs.len(), 1);
        assert_eq!(refs[0].name, "Level 0");
    }

    #[test]
    fn test_enumeration_is_stable() {
        let doc = MemoryDocument::from_json(TEST_DOC).unwrap();
        let first: Vec<_> = doc.all_elements().iter().map(|e| e.id).collect();
        let second: Vec<_> = doc.all_elements().iter().map(|e| e.id).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_set_selection() {
        let mut doc = MemoryDocument::from_json(TEST_DOC).unwrap();
        assert_eq!(doc.current_selection_ids(), vec![NativeId(11), NativeId(999)]);
        doc.set_selection([NativeId(12)]);
        assert_eq!(doc.current_selection_ids(), vec![NativeId(12)]);
    }
}
