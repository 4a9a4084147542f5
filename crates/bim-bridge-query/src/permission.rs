// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Permission / visibility filter
//!
//! A predicate layer applied after resolution: an element can match a query
//! and still not be eligible for processing (outside the current selection,
//! on a closed workset, in an excluded category).

use crate::{ResolvedQuery, WorksetSelector};
use bim_bridge_model::{CategoryId, Element, HostStore, HostStoreExt, NativeId, WorksetId};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Which matched elements may be processed
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EligibilityRules {
    /// Only elements in the current UI selection
    pub selection_only: bool,
    /// Only elements on these worksets
    pub worksets: Option<WorksetSelector>,
    /// Only elements on open worksets
    pub open_worksets_only: bool,
    /// Category names whose elements are never eligible
    pub excluded_categories: Vec<String>,
    /// Skip view templates
    pub exclude_view_templates: bool,
}

impl EligibilityRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn selection_only(mut self) -> Self {
        self.selection_only = true;
        self
    }

    pub fn on_worksets(mut self, selector: WorksetSelector) -> Self {
        self.worksets = Some(selector);
        self
    }

    pub fn open_worksets_only(mut self) -> Self {
        self.open_worksets_only = true;
        self
    }

    pub fn excluding_category(mut self, name: impl Into<String>) -> Self {
        self.excluded_categories.push(name.into());
        self
    }

    pub fn excluding_view_templates(mut self) -> Self {
        self.exclude_view_templates = true;
        self
    }
}

/// Eligibility rules resolved against one document
///
/// Elements with no workset (non-workshared documents) are never excluded by
/// the workset rules.
#[derive(Clone, Debug)]
pub struct PermissionFilter {
    selection: Option<FxHashSet<NativeId>>,
    allowed_worksets: Option<FxHashSet<WorksetId>>,
    open_worksets: Option<FxHashSet<WorksetId>>,
    excluded_categories: FxHashSet<CategoryId>,
    exclude_view_templates: bool,
}

impl PermissionFilter {
    /// Resolve `rules` against `store`
    pub fn new(store: &dyn HostStore, rules: &EligibilityRules) -> Self {
        let selection = rules
            .selection_only
            .then(|| store.current_selection_ids().into_iter().collect());
        let allowed_worksets = rules
            .worksets
            .as_ref()
            .map(|selector| selector.resolve(store).into_iter().collect());
        let open_worksets = rules
            .open_worksets_only
            .then(|| store.open_workset_ids().into_iter().collect());
        let excluded_categories = rules
            .excluded_categories
            .iter()
            .filter_map(|name| store.category_id_by_name(name))
            .collect();

        Self {
            selection,
            allowed_worksets,
            open_worksets,
            excluded_categories,
            exclude_view_templates: rules.exclude_view_templates,
        }
    }

    /// A filter that lets everything through
    pub fn allow_all() -> Self {
        Self {
            selection: None,
            allowed_worksets: None,
            open_worksets: None,
            excluded_categories: FxHashSet::default(),
            exclude_view_templates: false,
        }
    }

    pub fn is_eligible(&self, element: &Element) -> bool {
        if let Some(selection) = &self.selection {
            if !selection.contains(&element.id) {
                return false;
            }
        }
        if let Some(workset) = element.workset {
            if let Some(allowed) = &self.allowed_worksets {
                if !allowed.contains(&workset) {
                    return false;
                }
            }
            if let Some(open) = &self.open_worksets {
                if !open.contains(&workset) {
                    return false;
                }
            }
        }
        if let Some(category) = element.category {
            if self.excluded_categories.contains(&category) {
                return false;
            }
        }
        !(self.exclude_view_templates && element.is_view_template)
    }

    /// Keep eligible elements, preserving order
    pub fn retain(&self, elements: Vec<Arc<Element>>) -> Vec<Arc<Element>> {
        elements
            .into_iter()
            .filter(|e| self.is_eligible(e))
            .collect()
    }

    /// Prune every entry of a resolved tree, keeping per-node provenance
    pub fn apply<'f>(&self, resolved: &ResolvedQuery<'f>) -> ResolvedQuery<'f> {
        let mut pruned = resolved.clone();
        pruned.map_mut().retain_elements(|e| self.is_eligible(e));
        log::debug!(
            "eligibility kept {} of {} elements",
            pruned.len(),
            resolved.len()
        );
        pruned
    }
}
