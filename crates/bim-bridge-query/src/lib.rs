// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM Bridge Query - Filter-query resolution engine
//!
//! Turns a declarative filter tree (leaves carrying type, category, workset,
//! selection, id and name criteria, composed with AND / OR / NOT) into the
//! concrete native elements of a host document.
//!
//! Resolution keeps provenance: the result is a map from every contributing
//! filter node to the elements it matched, so callers can ask which of their
//! filters selected a given element.
//!
//! # Example
//!
//! ```ignore
//! use bim_bridge_query::{resolve, matches, DomainType, FilterNode, LeafFilter};
//!
//! let walls = FilterNode::leaf(LeafFilter::new().of_type(DomainType::Wall));
//! let level = FilterNode::leaf(LeafFilter::new().in_category("Walls"));
//! let root = FilterNode::and(vec![walls, level]);
//!
//! let resolved = resolve(&root, &document);
//! for element in resolved.elements().iter() {
//!     println!("{} matched by {} filters", element.id, matches(&resolved, element.id).len());
//! }
//! ```

mod composer;
mod element_set;
mod evaluator;
mod filter;
mod options;
mod permission;
mod result_map;
mod type_table;

pub use composer::{matches, resolve, resolve_with, Composer, ResolvedQuery};
pub use element_set::ElementSet;
pub use evaluator::{evaluate_leaf, CriteriaEvaluator};
pub use filter::{FamilyTypeName, FilterKind, FilterNode, LeafFilter, WorksetSelector};
pub use options::{EvaluatorOptions, MissingIdPolicy};
pub use permission::{EligibilityRules, PermissionFilter};
pub use result_map::{NodeRef, ResultMap};
pub use type_table::{mapping_for, DomainType, TypeMapping, TYPE_TABLE};

/// Insertion-ordered map with the fast hasher used throughout the crate
pub(crate) type FxIndexMap<K, V> = indexmap::IndexMap<K, V, rustc_hash::FxBuildHasher>;
