// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Criteria evaluator - resolves one leaf against a host store
//!
//! Each populated criterion of a leaf is resolved on its own and the results
//! are unioned in a fixed order: type, category, worksets, ids, persistent
//! ids, current selection, name, class name, family type, selection set,
//! view template. Nothing here fails: a criterion that matches nothing
//! contributes nothing.

use crate::{
    mapping_for, DomainType, ElementSet, EvaluatorOptions, FamilyTypeName, LeafFilter,
    MissingIdPolicy, WorksetSelector,
};
use bim_bridge_model::{
    names_match, Element, HostStore, HostStoreExt, NativeClass, NativeId, PersistentId,
};
use rustc_hash::FxHashSet;
use std::sync::Arc;

/// Leaf evaluator bound to one host document
pub struct CriteriaEvaluator<'s> {
    store: &'s dyn HostStore,
    options: EvaluatorOptions,
}

impl<'s> CriteriaEvaluator<'s> {
    /// Create an evaluator with default options
    pub fn new(store: &'s dyn HostStore) -> Self {
        Self::with_options(store, EvaluatorOptions::default())
    }

    /// Create an evaluator with explicit options
    pub fn with_options(store: &'s dyn HostStore, options: EvaluatorOptions) -> Self {
        Self { store, options }
    }

    pub fn store(&self) -> &'s dyn HostStore {
        self.store
    }

    pub fn options(&self) -> &EvaluatorOptions {
        &self.options
    }

    /// Elements matching any populated criterion of `leaf`
    pub fn evaluate_leaf(&self, leaf: &LeafFilter) -> ElementSet {
        let mut result = ElementSet::new();
        if leaf.is_empty() {
            log::debug!("empty leaf matches nothing");
            return result;
        }

        if let Some(domain) = leaf.domain_type {
            result.extend(self.by_domain_type(domain));
        }
        if let Some(category) = &leaf.category {
            result.extend(self.by_category_name(category));
        }
        if !leaf.worksets.is_empty() {
            result.extend(self.by_worksets(&leaf.worksets));
        }
        if !leaf.ids.is_empty() {
            result.extend(self.resolve_ids(&leaf.ids).into_iter().flatten());
        }
        if !leaf.persistent_ids.is_empty() {
            result.extend(self.by_persistent_ids(&leaf.persistent_ids));
        }
        if leaf.include_selection {
            result.extend(self.current_selection());
        }
        if let Some(name) = &leaf.name {
            result.extend(self.by_element_name(name));
        }
        if let Some(class_name) = &leaf.class_name {
            result.extend(self.by_class_name(class_name));
        }
        if let Some(family_type) = &leaf.family_type {
            result.extend(self.by_family_type(family_type));
        }
        if let Some(set_name) = &leaf.selection_set {
            result.extend(self.by_selection_set(set_name));
        }
        if let Some(template) = &leaf.view_template {
            result.extend(self.by_view_template(template));
        }

        log::debug!("leaf resolved to {} elements", result.len());
        result
    }

    /// Enumerate the native classes mapped to `domain`, restricted to the
    /// table's categories when it lists any
    pub fn by_domain_type(&self, domain: DomainType) -> Vec<Arc<Element>> {
        let Some(mapping) = mapping_for(domain) else {
            return Vec::new();
        };

        let allowed: Option<FxHashSet<_>> = if mapping.categories.is_empty() {
            None
        } else {
            Some(
                mapping
                    .categories
                    .iter()
                    .filter_map(|name| self.store.category_id_by_name(name))
                    .collect(),
            )
        };

        let elements: Vec<_> = mapping
            .classes
            .iter()
            .flat_map(|class| self.store.elements_of_class(class))
            .filter(|e| match &allowed {
                Some(categories) => e.category.is_some_and(|c| categories.contains(&c)),
                None => true,
            })
            .collect();

        log::trace!("type {domain}: {} elements", elements.len());
        elements
    }

    /// Elements of the category with exactly this name
    pub fn by_category_name(&self, name: &str) -> Vec<Arc<Element>> {
        match self.store.category_id_by_name(name) {
            Some(category) => self.store.elements_of_category(category),
            None => {
                log::trace!("category '{name}' not in document");
                Vec::new()
            }
        }
    }

    /// Elements owned by any workset the selector resolves to
    pub fn by_worksets(&self, selector: &WorksetSelector) -> Vec<Arc<Element>> {
        let worksets = selector.resolve(self.store);
        log::trace!("worksets resolved to {worksets:?}");
        worksets
            .into_iter()
            .flat_map(|ws| self.store.elements_in_workset(ws))
            .collect()
    }

    /// Positional lookup by numeric id
    ///
    /// With [`MissingIdPolicy::Placeholder`] the output has one slot per
    /// requested id; with `Skip` misses are dropped and every slot is `Some`.
    pub fn resolve_ids(&self, ids: &[NativeId]) -> Vec<Option<Arc<Element>>> {
        self.positional(ids.iter().map(|id| {
            let found = self.store.element_by_id(*id);
            if found.is_none() {
                log::debug!("no element {id}");
            }
            found
        }))
    }

    /// Positional lookup by persistent id, same miss policy as [`Self::resolve_ids`]
    pub fn resolve_persistent_ids(&self, ids: &[PersistentId]) -> Vec<Option<Arc<Element>>> {
        self.positional(ids.iter().map(|id| {
            let found = self.store.element_by_persistent_id(id);
            if found.is_none() {
                log::debug!("no element with persistent id {id}");
            }
            found
        }))
    }

    fn positional(
        &self,
        lookups: impl Iterator<Item = Option<Arc<Element>>>,
    ) -> Vec<Option<Arc<Element>>> {
        match self.options.missing_ids {
            MissingIdPolicy::Skip => lookups.filter(Option::is_some).collect(),
            MissingIdPolicy::Placeholder => lookups.collect(),
        }
    }

    /// Persistent-id criterion; misses are always skipped
    pub fn by_persistent_ids(&self, ids: &[PersistentId]) -> Vec<Arc<Element>> {
        ids.iter()
            .filter_map(|id| self.store.element_by_persistent_id(id))
            .collect()
    }

    /// Currently selected elements that still exist
    pub fn current_selection(&self) -> Vec<Arc<Element>> {
        self.store
            .current_selection_ids()
            .into_iter()
            .filter_map(|id| self.store.element_by_id(id))
            .collect()
    }

    /// Elements whose display name matches
    pub fn by_element_name(&self, name: &str) -> Vec<Arc<Element>> {
        self.store
            .all_elements()
            .into_iter()
            .filter(|e| names_match(&e.name, name, self.options.ignore_case))
            .collect()
    }

    /// Elements of the class named `name` (plain or qualified)
    ///
    /// Known classes enumerate through the store, so `RoofBase` also yields
    /// its subclasses. Classes the bridge does not know are found by scanning.
    pub fn by_class_name(&self, name: &str) -> Vec<Arc<Element>> {
        let short = name.rsplit('.').next().unwrap_or(name);
        let ignore_case = self.options.ignore_case;
        let mut elements: Vec<_> = NativeClass::KNOWN
            .iter()
            .filter(|class| names_match(class.name(), short, ignore_case))
            .flat_map(|class| self.store.elements_of_class(class))
            .collect();
        elements.extend(self.store.all_elements().into_iter().filter(|e| match &e.class {
            NativeClass::Other(other) => names_match(other, short, ignore_case),
            _ => false,
        }));
        elements
    }

    /// Instances of the family types matching family (and type) name
    pub fn by_family_type(&self, wanted: &FamilyTypeName) -> Vec<Arc<Element>> {
        let ignore_case = self.options.ignore_case;
        self.store
            .family_symbols()
            .into_iter()
            .filter(|symbol| {
                names_match(&symbol.family_name, &wanted.family, ignore_case)
                    && wanted
                        .type_name
                        .as_deref()
                        .map_or(true, |t| names_match(&symbol.name, t, ignore_case))
            })
            .flat_map(|symbol| self.store.instances_of_symbol(symbol.id))
            .collect()
    }

    /// Members of the selection sets with this name
    pub fn by_selection_set(&self, name: &str) -> Vec<Arc<Element>> {
        self.store
            .selection_sets()
            .into_iter()
            .filter(|set| names_match(&set.name, name, self.options.ignore_case))
            .flat_map(|set| set.element_ids)
            .filter_map(|id| self.store.element_by_id(id))
            .collect()
    }

    /// Views governed by the view templates with this name
    pub fn by_view_template(&self, name: &str) -> Vec<Arc<Element>> {
        let templates: FxHashSet<NativeId> = self
            .store
            .view_templates_named(name, self.options.ignore_case)
            .iter()
            .map(|t| t.id)
            .collect();
        if templates.is_empty() {
            return Vec::new();
        }
        self.store
            .views()
            .into_iter()
            .filter(|v| v.view_template.is_some_and(|t| templates.contains(&t)))
            .collect()
    }
}

/// Evaluate a single leaf with default options
pub fn evaluate_leaf(leaf: &LeafFilter, store: &dyn HostStore) -> ElementSet {
    CriteriaEvaluator::new(store).evaluate_leaf(leaf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bim_bridge_store::MemoryDocument;

    const TEST_DOC: &str = r#"{
        "categories": [
            {"id": 1, "name": "Walls"},
            {"id": 2, "name": "Structural Framing"},
            {"id": 3, "name": "Doors"},
            {"id": 4, "name": "Views"}
        ],
        "worksets": [
            {"id": 100, "name": "Core", "is_open": true},
            {"id": 200, "name": "Shell", "is_open": true},
            {"id": 300, "name": "Interiors", "is_open": false}
        ],
        "active_workset": 100,
        "elements": [
            {"id": 1, "persistent_id": "w1", "class": "Wall", "category": 1, "workset": 100, "name": "Basic Wall"},
            {"id": 2, "persistent_id": "w2", "class": "Wall", "category": 1, "workset": 200, "name": "Curtain Wall"},
            {"id": 3, "persistent_id": "b1", "class": "FamilyInstance", "category": 2, "workset": 100, "name": "W12x26", "type_id": 50},
            {"id": 4, "persistent_id": "d1", "class": "FamilyInstance", "category": 3, "workset": 300, "name": "Door", "type_id": 51},
            {"id": 5, "persistent_id": "f1", "class": "Floor", "workset": 200, "name": "Slab"},
            {"id": 6, "persistent_id": "r1", "class": "ExtrusionRoof", "name": "Roof"},
            {"id": 7, "persistent_id": "vt", "class": "View", "category": 4, "name": "Architectural Plan", "is_view_template": true},
            {"id": 8, "persistent_id": "v1", "class": "View", "category": 4, "name": "Level 1", "view_template": 7},
            {"id": 9, "persistent_id": "v2", "class": "View", "category": 4, "name": "Level 2"}
        ],
        "selection": [5, 404, 1],
        "selection_sets": [{"name": "Review", "element_ids": [2, 4, 505]}],
        "family_symbols": [
            {"id": 50, "family_name": "W-Wide Flange", "name": "W12x26"},
            {"id": 51, "family_name": "Single-Flush", "name": "36\" x 84\""}
        ]
    }"#;

    fn doc() -> MemoryDocument {
        MemoryDocument::from_json(TEST_DOC).unwrap()
    }

    fn ids(set: &ElementSet) -> Vec<i64> {
        set.ids().into_iter().map(|id| id.0).collect()
    }

    #[test]
    fn test_empty_leaf_matches_nothing() {
        let doc = doc();
        assert!(evaluate_leaf(&LeafFilter::new(), &doc).is_empty());
    }

    #[test]
    fn test_type_constraint() {
        let doc = doc();
        let walls = evaluate_leaf(&LeafFilter::new().of_type(DomainType::Wall), &doc);
        assert_eq!(ids(&walls), vec![1, 2]);

        let beams = evaluate_leaf(&LeafFilter::new().of_type(DomainType::Beam), &doc);
        assert_eq!(ids(&beams), vec![3]);

        let roofs = evaluate_leaf(&LeafFilter::new().of_type(DomainType::Roof), &doc);
        assert_eq!(ids(&roofs), vec![6]);
    }

    #[test]
    fn test_generic_element_type_spans_classes() {
        let doc = doc();
        let elements = evaluate_leaf(&LeafFilter::new().of_type(DomainType::Element), &doc);
        assert_eq!(ids(&elements), vec![1, 2, 5, 6, 3, 4]);
    }

    #[test]
    fn test_type_with_missing_category_is_empty() {
        let doc = doc();
        let columns = evaluate_leaf(&LeafFilter::new().of_type(DomainType::Column), &doc);
        assert!(columns.is_empty());
    }

    #[test]
    fn test_category_constraint() {
        let doc = doc();
        let walls = evaluate_leaf(&LeafFilter::new().in_category("Walls"), &doc);
        assert_eq!(ids(&walls), vec![1, 2]);

        // Category names are exact even with ignore_case
        let evaluator =
            CriteriaEvaluator::with_options(&doc, EvaluatorOptions::new().with_ignore_case(true));
        assert!(evaluator
            .evaluate_leaf(&LeafFilter::new().in_category("walls"))
            .is_empty());
    }

    #[test]
    fn test_nonexistent_category_is_empty() {
        let doc = doc();
        let result = evaluate_leaf(&LeafFilter::new().in_category("NonexistentCategory"), &doc);
        assert!(result.is_empty());
    }

    #[test]
    fn test_workset_selectors() {
        let doc = doc();

        let active = evaluate_leaf(
            &LeafFilter::new().with_worksets(WorksetSelector::active()),
            &doc,
        );
        assert_eq!(ids(&active), vec![1, 3]);

        let active_and_open = evaluate_leaf(
            &LeafFilter::new().with_worksets(WorksetSelector::active().and_open()),
            &doc,
        );
        assert_eq!(ids(&active_and_open), vec![1, 3, 2, 5]);

        let named = evaluate_leaf(
            &LeafFilter::new().with_worksets(WorksetSelector::named("Interiors")),
            &doc,
        );
        assert_eq!(ids(&named), vec![4]);

        let missing = evaluate_leaf(
            &LeafFilter::new().with_worksets(WorksetSelector::named("Nope")),
            &doc,
        );
        assert!(missing.is_empty());
    }

    #[test]
    fn test_explicit_ids_skip_misses() {
        let doc = doc();
        let result = evaluate_leaf(
            &LeafFilter::new().with_ids([NativeId(9), NativeId(404), NativeId(1)]),
            &doc,
        );
        assert_eq!(ids(&result), vec![9, 1]);

        let result = evaluate_leaf(&LeafFilter::new().with_persistent_ids(["b1", "zz"]), &doc);
        assert_eq!(ids(&result), vec![3]);
    }

    #[test]
    fn test_positional_placeholders() {
        let doc = doc();
        let requested = [NativeId(2), NativeId(404), NativeId(5)];

        let skip = CriteriaEvaluator::new(&doc).resolve_ids(&requested);
        assert_eq!(skip.len(), 2);
        assert!(skip.iter().all(Option::is_some));

        let placeholder = CriteriaEvaluator::with_options(
            &doc,
            EvaluatorOptions::new().with_missing_ids(MissingIdPolicy::Placeholder),
        );
        let slots = placeholder.resolve_ids(&requested);
        assert_eq!(slots.len(), 3);
        assert!(slots[1].is_none());
        assert_eq!(slots[2].as_ref().unwrap().id, NativeId(5));

        let slots =
            placeholder.resolve_persistent_ids(&[PersistentId::new("nope"), "w1".into()]);
        assert!(slots[0].is_none());
        assert_eq!(slots[1].as_ref().unwrap().id, NativeId(1));
    }

    #[test]
    fn test_current_selection_skips_deleted() {
        let doc = doc();
        let result = evaluate_leaf(&LeafFilter::new().with_current_selection(), &doc);
        assert_eq!(ids(&result), vec![5, 1]);
    }

    #[test]
    fn test_name_scans_respect_case_flag() {
        let doc = doc();
        let exact = CriteriaEvaluator::new(&doc);
        let loose =
            CriteriaEvaluator::with_options(&doc, EvaluatorOptions::new().with_ignore_case(true));

        let leaf = LeafFilter::new().named("basic wall");
        assert!(exact.evaluate_leaf(&leaf).is_empty());
        assert_eq!(ids(&loose.evaluate_leaf(&leaf)), vec![1]);

        let leaf = LeafFilter::new().in_selection_set("review");
        assert!(exact.evaluate_leaf(&leaf).is_empty());
        assert_eq!(ids(&loose.evaluate_leaf(&leaf)), vec![2, 4]);

        let leaf = LeafFilter::new().with_class_name("db.floor");
        assert!(exact.evaluate_leaf(&leaf).is_empty());
        assert_eq!(ids(&loose.evaluate_leaf(&leaf)), vec![5]);
    }

    #[test]
    fn test_class_name_qualified() {
        let doc = doc();
        let result = evaluate_leaf(&LeafFilter::new().with_class_name("DB.Wall"), &doc);
        assert_eq!(ids(&result), vec![1, 2]);
    }

    #[test]
    fn test_class_name_outside_known_classes() {
        let doc = MemoryDocument::from_json(
            r#"{"elements": [
                {"id": 1, "persistent_id": "a", "class": "Railing", "name": "Guard"},
                {"id": 2, "persistent_id": "b", "class": "Wall", "name": "Wall"},
                {"id": 3, "persistent_id": "c", "class": "DB.Railing", "name": "Stair Rail"}
            ]}"#,
        )
        .unwrap();

        let result = evaluate_leaf(&LeafFilter::new().with_class_name("DB.Railing"), &doc);
        assert_eq!(ids(&result), vec![1, 3]);

        let exact = evaluate_leaf(&LeafFilter::new().with_class_name("railing"), &doc);
        assert!(exact.is_empty());
        let loose =
            CriteriaEvaluator::with_options(&doc, EvaluatorOptions::new().with_ignore_case(true));
        let result = loose.evaluate_leaf(&LeafFilter::new().with_class_name("railing"));
        assert_eq!(ids(&result), vec![1, 3]);
    }

    #[test]
    fn test_family_type() {
        let doc = doc();
        let by_family = evaluate_leaf(
            &LeafFilter::new().with_family_type("W-Wide Flange", None),
            &doc,
        );
        assert_eq!(ids(&by_family), vec![3]);

        let wrong_type = evaluate_leaf(
            &LeafFilter::new().with_family_type("W-Wide Flange", Some("W10x12")),
            &doc,
        );
        assert!(wrong_type.is_empty());
    }

    #[test]
    fn test_view_template() {
        let doc = doc();
        let result = evaluate_leaf(
            &LeafFilter::new().with_view_template("Architectural Plan"),
            &doc,
        );
        assert_eq!(ids(&result), vec![8]);
    }

    #[test]
    fn test_fields_on_one_leaf_are_unioned() {
        let doc = doc();
        let leaf = LeafFilter::new()
            .in_category("Walls")
            .with_ids([NativeId(5), NativeId(2)]);
        assert_eq!(ids(&evaluate_leaf(&leaf, &doc)), vec![1, 2, 5]);
    }

    #[test]
    fn test_leaf_evaluation_is_idempotent() {
        let doc = doc();
        let leaf = LeafFilter::new()
            .of_type(DomainType::Element)
            .with_current_selection()
            .with_worksets(WorksetSelector::open());
        assert_eq!(
            evaluate_leaf(&leaf, &doc).ids(),
            evaluate_leaf(&leaf, &doc).ids()
        );
    }
}
