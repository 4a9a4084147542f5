// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Declarative filter trees
//!
//! A tree is built once and then only borrowed by the composer; result maps
//! refer back to its nodes by address, so a node must not move while a
//! resolution that borrows it is alive.

use crate::DomainType;
use bim_bridge_model::{BridgeError, HostStore, NativeId, PersistentId, Result, WorksetId};
use serde::{Deserialize, Serialize};

/// Which worksets a leaf (or an eligibility rule) refers to
///
/// The three selectors are resolved independently and their worksets
/// combined.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorksetSelector {
    /// The active workset
    pub active: bool,
    /// Every open workset
    pub open: bool,
    /// A workset by exact name
    pub named: Option<String>,
}

impl WorksetSelector {
    pub fn active() -> Self {
        Self {
            active: true,
            ..Self::default()
        }
    }

    pub fn open() -> Self {
        Self {
            open: true,
            ..Self::default()
        }
    }

    pub fn named(name: impl Into<String>) -> Self {
        Self {
            named: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn and_active(mut self) -> Self {
        self.active = true;
        self
    }

    pub fn and_open(mut self) -> Self {
        self.open = true;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.active && !self.open && self.named.is_none()
    }

    /// Resolve to distinct workset ids, in selector order
    ///
    /// Selectors that match nothing contribute nothing.
    pub fn resolve(&self, store: &dyn HostStore) -> Vec<WorksetId> {
        let mut ids = Vec::new();
        let mut push = |id: WorksetId| {
            if !ids.contains(&id) {
                ids.push(id);
            }
        };

        if self.active {
            if let Some(id) = store.active_workset_id() {
                push(id);
            }
        }
        if self.open {
            for id in store.open_workset_ids() {
                push(id);
            }
        }
        if let Some(name) = &self.named {
            if let Some(id) = store.workset_id_by_name(name) {
                push(id);
            }
        }
        ids
    }
}

/// Family name plus optional type name
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilyTypeName {
    pub family: String,
    #[serde(default)]
    pub type_name: Option<String>,
}

impl FamilyTypeName {
    pub fn new(family: impl Into<String>, type_name: Option<String>) -> Self {
        Self {
            family: family.into(),
            type_name,
        }
    }
}

/// Primitive criteria of one leaf
///
/// Every populated field contributes its own matches and the leaf matches
/// their union. A leaf with nothing populated matches nothing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LeafFilter {
    pub domain_type: Option<DomainType>,
    pub category: Option<String>,
    pub worksets: WorksetSelector,
    pub ids: Vec<NativeId>,
    pub persistent_ids: Vec<PersistentId>,
    pub include_selection: bool,
    /// Element display name
    pub name: Option<String>,
    /// Native class name, plain or qualified
    pub class_name: Option<String>,
    pub family_type: Option<FamilyTypeName>,
    pub selection_set: Option<String>,
    pub view_template: Option<String>,
}

impl LeafFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn of_type(mut self, domain: DomainType) -> Self {
        self.domain_type = Some(domain);
        self
    }

    pub fn in_category(mut self, name: impl Into<String>) -> Self {
        self.category = Some(name.into());
        self
    }

    pub fn with_worksets(mut self, selector: WorksetSelector) -> Self {
        self.worksets = selector;
        self
    }

    pub fn with_ids(mut self, ids: impl IntoIterator<Item = NativeId>) -> Self {
        self.ids.extend(ids);
        self
    }

    pub fn with_persistent_ids<I, P>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PersistentId>,
    {
        self.persistent_ids.extend(ids.into_iter().map(Into::into));
        self
    }

    pub fn with_current_selection(mut self) -> Self {
        self.include_selection = true;
        self
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = Some(name.into());
        self
    }

    pub fn with_family_type(mut self, family: impl Into<String>, type_name: Option<&str>) -> Self {
        self.family_type = Some(FamilyTypeName::new(
            family,
            type_name.map(str::to_string),
        ));
        self
    }

    pub fn in_selection_set(mut self, name: impl Into<String>) -> Self {
        self.selection_set = Some(name.into());
        self
    }

    pub fn with_view_template(mut self, name: impl Into<String>) -> Self {
        self.view_template = Some(name.into());
        self
    }

    /// True when no criterion is populated
    pub fn is_empty(&self) -> bool {
        self.domain_type.is_none()
            && self.category.is_none()
            && self.worksets.is_empty()
            && self.ids.is_empty()
            && self.persistent_ids.is_empty()
            && !self.include_selection
            && self.name.is_none()
            && self.class_name.is_none()
            && self.family_type.is_none()
            && self.selection_set.is_none()
            && self.view_template.is_none()
    }

    /// True when the only criteria are workset / current-selection ones,
    /// which select across the whole document without an element-level
    /// constraint
    pub fn is_unrestricted(&self) -> bool {
        let cross_link = !self.worksets.is_empty() || self.include_selection;
        let element_level = Self {
            worksets: WorksetSelector::default(),
            include_selection: false,
            ..self.clone()
        };
        cross_link && element_level.is_empty()
    }
}

/// Shape of a filter node
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterKind {
    Leaf(LeafFilter),
    And(Vec<FilterNode>),
    Or(Vec<FilterNode>),
    Not(Box<FilterNode>),
}

/// One node of a filter tree
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterNode {
    /// Caller's name for the node, used in logs and diagnostics
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(flatten)]
    pub kind: FilterKind,
}

impl FilterNode {
    pub fn new(kind: FilterKind) -> Self {
        Self { label: None, kind }
    }

    pub fn leaf(filter: LeafFilter) -> Self {
        Self::new(FilterKind::Leaf(filter))
    }

    pub fn and(children: Vec<FilterNode>) -> Self {
        Self::new(FilterKind::And(children))
    }

    pub fn or(children: Vec<FilterNode>) -> Self {
        Self::new(FilterKind::Or(children))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn not(child: FilterNode) -> Self {
        Self::new(FilterKind::Not(Box::new(child)))
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Parse a tree from JSON
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn as_leaf(&self) -> Option<&LeafFilter> {
        match &self.kind {
            FilterKind::Leaf(leaf) => Some(leaf),
            _ => None,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.as_leaf().is_some()
    }

    /// Direct children (empty for leaves)
    pub fn children(&self) -> Vec<&FilterNode> {
        match &self.kind {
            FilterKind::Leaf(_) => Vec::new(),
            FilterKind::And(children) | FilterKind::Or(children) => children.iter().collect(),
            FilterKind::Not(child) => vec![child.as_ref()],
        }
    }

    /// Every leaf under this node, depth-first
    pub fn leaves(&self) -> Vec<&FilterNode> {
        let mut out = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if node.is_leaf() {
                out.push(node);
            } else {
                stack.extend(node.children().into_iter().rev());
            }
        }
        out
    }

    /// Label, or the node kind when unlabeled
    pub fn display_name(&self) -> &str {
        if let Some(label) = &self.label {
            return label;
        }
        match &self.kind {
            FilterKind::Leaf(_) => "leaf",
            FilterKind::And(_) => "and",
            FilterKind::Or(_) => "or",
            FilterKind::Not(_) => "not",
        }
    }

    /// Structural checks callers run before submitting a tree
    ///
    /// Rejects empty leaves, empty `And`/`Or`, and a `Not` over a subtree
    /// containing a workset/selection-only leaf unless the `Not` has a
    /// sibling constraint inside an enclosing `And`. Resolution itself never
    /// validates.
    pub fn validate(&self) -> Result<()> {
        self.validate_in(false)
    }

    fn validate_in(&self, constrained_by_sibling: bool) -> Result<()> {
        match &self.kind {
            FilterKind::Leaf(leaf) => {
                if leaf.is_empty() {
                    return Err(BridgeError::invalid_filter(format!(
                        "leaf '{}' has no criteria",
                        self.display_name()
                    )));
                }
                Ok(())
            }
            FilterKind::And(children) | FilterKind::Or(children) => {
                if children.is_empty() {
                    return Err(BridgeError::invalid_filter(format!(
                        "'{}' has no children",
                        self.display_name()
                    )));
                }
                let has_siblings =
                    matches!(self.kind, FilterKind::And(_)) && children.len() > 1;
                children
                    .iter()
                    .try_for_each(|child| child.validate_in(has_siblings))
            }
            FilterKind::Not(child) => {
                let unrestricted = child
                    .leaves()
                    .iter()
                    .filter_map(|leaf| leaf.as_leaf())
                    .any(LeafFilter::is_unrestricted);
                if unrestricted && !constrained_by_sibling {
                    return Err(BridgeError::invalid_filter(format!(
                        "'{}' negates a workset/selection-only filter without a sibling constraint",
                        self.display_name()
                    )));
                }
                child.validate_in(false)
            }
        }
    }
}
