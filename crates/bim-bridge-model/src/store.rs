// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Host model store trait
//!
//! The narrow surface through which the query engine reads a host document.
//! The store owns its elements; everything handed out is shared through an
//! `Arc` and must not be assumed to outlive the host session.

use crate::{
    names_match, Category, CategoryId, Element, FamilySymbol, NativeClass, NativeId, PersistentId,
    SelectionSet, Workset, WorksetId,
};
use std::sync::Arc;

/// Element enumeration and table scans over one host document
///
/// Implementations should provide O(1) lookup by [`NativeId`] and return
/// elements in a stable order (the host's own enumeration order), so that
/// repeated queries over an unchanged document produce identical results.
///
/// # Example
///
/// ```ignore
/// use bim_bridge_model::{HostStore, NativeId};
///
/// fn print_level(store: &dyn HostStore, id: NativeId) {
///     if let Some(element) = store.element_by_id(id) {
///         for level in element.references.iter().filter_map(|r| store.element_by_id(*r)) {
///             println!("{} is on {}", element.name, level.name);
///         }
///     }
/// }
/// ```
pub trait HostStore: Send + Sync {
    /// Get element by numeric id
    fn element_by_id(&self, id: NativeId) -> Option<Arc<Element>>;

    /// Get element by persistent id
    fn element_by_persistent_id(&self, id: &PersistentId) -> Option<Arc<Element>>;

    /// Every element in the document, in enumeration order
    fn all_elements(&self) -> Vec<Arc<Element>>;

    /// All elements that are instances of `class`
    ///
    /// `RoofBase` also yields its subclasses (see [`NativeClass::is_a`]).
    fn elements_of_class(&self, class: &NativeClass) -> Vec<Arc<Element>>;

    /// All elements of a category
    fn elements_of_category(&self, category: CategoryId) -> Vec<Arc<Element>>;

    /// The document's category table
    fn categories(&self) -> Vec<Category>;

    /// The document's user worksets (empty when not workshared)
    fn worksets(&self) -> Vec<Workset>;

    /// Workset new elements are placed into, if the document is workshared
    fn active_workset_id(&self) -> Option<WorksetId>;

    /// Ids of the elements currently selected in the host UI
    fn current_selection_ids(&self) -> Vec<NativeId>;

    /// Saved selection sets
    fn selection_sets(&self) -> Vec<SelectionSet>;

    /// Loaded family types
    fn family_symbols(&self) -> Vec<FamilySymbol>;

    /// Ids of all open worksets
    fn open_workset_ids(&self) -> Vec<WorksetId> {
        self.worksets()
            .into_iter()
            .filter(|ws| ws.is_open)
            .map(|ws| ws.id)
            .collect()
    }

    /// Resolve a workset name to its id (exact match)
    fn workset_id_by_name(&self, name: &str) -> Option<WorksetId> {
        self.worksets()
            .into_iter()
            .find(|ws| ws.name == name)
            .map(|ws| ws.id)
    }

    /// All elements owned by a workset
    fn elements_in_workset(&self, workset: WorksetId) -> Vec<Arc<Element>> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.workset == Some(workset))
            .collect()
    }

    /// All instances of a family symbol
    fn instances_of_symbol(&self, symbol: NativeId) -> Vec<Arc<Element>> {
        self.all_elements()
            .into_iter()
            .filter(|e| e.type_id == Some(symbol))
            .collect()
    }

    /// All views (templates included)
    fn views(&self) -> Vec<Arc<Element>> {
        self.elements_of_class(&NativeClass::View)
    }

    /// View templates whose name matches
    fn view_templates_named(&self, name: &str, ignore_case: bool) -> Vec<Arc<Element>> {
        self.views()
            .into_iter()
            .filter(|v| v.is_view_template && names_match(&v.name, name, ignore_case))
            .collect()
    }

    /// Total element count
    fn element_count(&self) -> usize {
        self.all_elements().len()
    }
}

/// Extension methods for HostStore
pub trait HostStoreExt: HostStore {
    /// Check if an element exists
    fn exists(&self, id: NativeId) -> bool {
        self.element_by_id(id).is_some()
    }

    /// Get element or return error
    fn get_or_err(&self, id: NativeId) -> crate::Result<Arc<Element>> {
        self.element_by_id(id)
            .ok_or(crate::BridgeError::ElementNotFound(id))
    }

    /// Resolve a category name to its id by exact-name scan
    fn category_id_by_name(&self, name: &str) -> Option<CategoryId> {
        self.categories()
            .into_iter()
            .find(|c| c.name == name)
            .map(|c| c.id)
    }

    /// Resolve every referenced element of `element`, skipping dangling ids
    fn resolve_references(&self, element: &Element) -> Vec<Arc<Element>> {
        element
            .references
            .iter()
            .filter_map(|id| self.element_by_id(*id))
            .collect()
    }
}

// Blanket implementation for all HostStore types
impl<T: HostStore + ?Sized> HostStoreExt for T {}
