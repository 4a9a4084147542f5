// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core types for native element representation
//!
//! These types describe what the bridge can observe about an element held in
//! the host model store. Elements are never owned by the bridge; stores hand
//! them out behind an `Arc`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Transient numeric element identity
///
/// Only valid for the lifetime of one host session. Used as the primary key
/// for result sets and the pull cache.
#[derive(
    Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default,
)]
#[serde(transparent)]
pub struct NativeId(pub i64);

impl fmt::Display for NativeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

impl From<i64> for NativeId {
    fn from(id: i64) -> Self {
        NativeId(id)
    }
}

impl From<NativeId> for i64 {
    fn from(id: NativeId) -> Self {
        id.0
    }
}

/// Identity that survives across sessions
///
/// Native elements carry one assigned by the host; domain objects carry one
/// assigned when they were first created.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct PersistentId(pub String);

impl PersistentId {
    pub fn new(id: impl Into<String>) -> Self {
        PersistentId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PersistentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PersistentId {
    fn from(id: &str) -> Self {
        PersistentId(id.to_string())
    }
}

impl From<String> for PersistentId {
    fn from(id: String) -> Self {
        PersistentId(id)
    }
}

/// Workset identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorksetId(pub i64);

impl fmt::Display for WorksetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ws{}", self.0)
    }
}

/// Category identity
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryId(pub i64);

impl fmt::Display for CategoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cat{}", self.0)
    }
}

/// Namespace prefix used by fully-qualified native class names
pub const CLASS_NAMESPACE: &str = "DB";

/// Native element class
///
/// The host's own class hierarchy, flattened to the classes the bridge
/// enumerates by. Unknown classes keep their original name.
///
/// Serialized as its short name, so snapshots accept the same spellings as
/// [`NativeClass::parse`].
#[derive(Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum NativeClass {
    // ========================================================================
    // Host objects
    // ========================================================================
    Wall,
    Floor,
    Ceiling,
    RoofBase,
    FootPrintRoof,
    ExtrusionRoof,
    Opening,
    Topography,

    // ========================================================================
    // Families
    // ========================================================================
    FamilyInstance,
    FamilySymbol,

    // ========================================================================
    // Datum and spatial elements
    // ========================================================================
    Level,
    Grid,
    Room,
    Space,

    // ========================================================================
    // MEP curves
    // ========================================================================
    Duct,
    Pipe,
    CableTray,
    Conduit,

    // ========================================================================
    // Annotation, views and detailing
    // ========================================================================
    View,
    ModelCurve,
    Rebar,

    /// Unknown class - stores the original class name
    Other(String),
}

impl FromStr for NativeClass {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Self::parse(s))
    }
}

impl From<String> for NativeClass {
    fn from(s: String) -> Self {
        Self::parse(&s)
    }
}

impl From<NativeClass> for String {
    fn from(class: NativeClass) -> Self {
        match class {
            NativeClass::Other(name) => name,
            known => known.name().to_string(),
        }
    }
}

impl NativeClass {
    /// Every known class, in declaration order
    pub const KNOWN: &'static [NativeClass] = &[
        NativeClass::Wall,
        NativeClass::Floor,
        NativeClass::Ceiling,
        NativeClass::RoofBase,
        NativeClass::FootPrintRoof,
        NativeClass::ExtrusionRoof,
        NativeClass::Opening,
        NativeClass::Topography,
        NativeClass::FamilyInstance,
        NativeClass::FamilySymbol,
        NativeClass::Level,
        NativeClass::Grid,
        NativeClass::Room,
        NativeClass::Space,
        NativeClass::Duct,
        NativeClass::Pipe,
        NativeClass::CableTray,
        NativeClass::Conduit,
        NativeClass::View,
        NativeClass::ModelCurve,
        NativeClass::Rebar,
    ];

    /// Parse a class name, plain (`Wall`) or qualified (`DB.Wall`)
    ///
    /// Matching is case-insensitive; unrecognized names become `Other`.
    pub fn parse(s: &str) -> Self {
        let short = s.rsplit('.').next().unwrap_or(s);
        Self::KNOWN
            .iter()
            .find(|class| class.name().eq_ignore_ascii_case(short))
            .cloned()
            .unwrap_or_else(|| NativeClass::Other(short.to_string()))
    }

    /// Short class name
    pub fn name(&self) -> &str {
        match self {
            NativeClass::Wall => "Wall",
            NativeClass::Floor => "Floor",
            NativeClass::Ceiling => "Ceiling",
            NativeClass::RoofBase => "RoofBase",
            NativeClass::FootPrintRoof => "FootPrintRoof",
            NativeClass::ExtrusionRoof => "ExtrusionRoof",
            NativeClass::Opening => "Opening",
            NativeClass::Topography => "TopographySurface",
            NativeClass::FamilyInstance => "FamilyInstance",
            NativeClass::FamilySymbol => "FamilySymbol",
            NativeClass::Level => "Level",
            NativeClass::Grid => "Grid",
            NativeClass::Room => "Room",
            NativeClass::Space => "Space",
            NativeClass::Duct => "Duct",
            NativeClass::Pipe => "Pipe",
            NativeClass::CableTray => "CableTray",
            NativeClass::Conduit => "Conduit",
            NativeClass::View => "View",
            NativeClass::ModelCurve => "ModelCurve",
            NativeClass::Rebar => "Rebar",
            NativeClass::Other(name) => name,
        }
    }

    /// Fully-qualified class name, e.g. `DB.Wall`
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", CLASS_NAMESPACE, self.name())
    }

    /// Roof classes all derive from `RoofBase` in the host hierarchy
    pub fn is_roof(&self) -> bool {
        matches!(
            self,
            NativeClass::RoofBase | NativeClass::FootPrintRoof | NativeClass::ExtrusionRoof
        )
    }

    /// Whether an element of class `self` is also an instance of `base`
    pub fn is_a(&self, base: &NativeClass) -> bool {
        self == base || (*base == NativeClass::RoofBase && self.is_roof())
    }
}

impl Default for NativeClass {
    fn default() -> Self {
        NativeClass::Other(String::new())
    }
}

impl fmt::Display for NativeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A native element as seen by the bridge
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Element {
    /// Session-scoped numeric identity
    pub id: NativeId,
    /// Cross-session identity
    pub persistent_id: PersistentId,
    /// Native class
    pub class: NativeClass,
    /// Owning category, if any
    #[serde(default)]
    pub category: Option<CategoryId>,
    /// Owning workset (absent in non-workshared documents)
    #[serde(default)]
    pub workset: Option<WorksetId>,
    /// Display name
    #[serde(default)]
    pub name: String,
    /// Type (family symbol) this element is an instance of
    #[serde(default)]
    pub type_id: Option<NativeId>,
    /// View template applied to this element (views only)
    #[serde(default)]
    pub view_template: Option<NativeId>,
    /// Whether this element is itself a view template
    #[serde(default)]
    pub is_view_template: bool,
    /// Other elements this one references (host, level, boundaries...)
    #[serde(default)]
    pub references: Vec<NativeId>,
}

impl Element {
    /// Create a new element with no category, workset, or references
    pub fn new(
        id: impl Into<NativeId>,
        persistent_id: impl Into<PersistentId>,
        class: NativeClass,
        name: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            persistent_id: persistent_id.into(),
            class,
            category: None,
            workset: None,
            name: name.into(),
            type_id: None,
            view_template: None,
            is_view_template: false,
            references: Vec::new(),
        }
    }

    pub fn with_category(mut self, category: CategoryId) -> Self {
        self.category = Some(category);
        self
    }

    pub fn with_workset(mut self, workset: WorksetId) -> Self {
        self.workset = Some(workset);
        self
    }

    pub fn with_type(mut self, type_id: NativeId) -> Self {
        self.type_id = Some(type_id);
        self
    }

    pub fn with_view_template(mut self, template: NativeId) -> Self {
        self.view_template = Some(template);
        self
    }

    pub fn as_view_template(mut self) -> Self {
        self.is_view_template = true;
        self
    }

    pub fn with_references(mut self, refs: impl IntoIterator<Item = NativeId>) -> Self {
        self.references.extend(refs);
        self
    }
}

/// Entry of the document's category table
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

/// User workset
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workset {
    pub id: WorksetId,
    pub name: String,
    /// Closed worksets are not loaded; their elements are not editable
    pub is_open: bool,
}

impl Workset {
    pub fn new(id: WorksetId, name: impl Into<String>, is_open: bool) -> Self {
        Self {
            id,
            name: name.into(),
            is_open,
        }
    }
}

/// Named, saved selection of elements
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSet {
    pub name: String,
    pub element_ids: Vec<NativeId>,
}

impl SelectionSet {
    pub fn new(name: impl Into<String>, element_ids: impl IntoIterator<Item = NativeId>) -> Self {
        Self {
            name: name.into(),
            element_ids: element_ids.into_iter().collect(),
        }
    }
}

/// Loaded family type
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FamilySymbol {
    pub id: NativeId,
    pub family_name: String,
    pub name: String,
}

impl FamilySymbol {
    pub fn new(id: NativeId, family_name: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id,
            family_name: family_name.into(),
            name: name.into(),
        }
    }
}

/// Compare two names exactly or ignoring case
pub fn names_match(a: &str, b: &str, ignore_case: bool) -> bool {
    if ignore_case {
        a.to_lowercase() == b.to_lowercase()
    } else {
        a == b
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_class_parse_plain_and_qualified() {
        assert_eq!(NativeClass::parse("Wall"), NativeClass::Wall);
        assert_eq!(NativeClass::parse("db.wall"), NativeClass::Wall);
        assert_eq!(NativeClass::parse("DB.FamilyInstance"), NativeClass::FamilyInstance);
        assert_eq!(
            NativeClass::parse("Whatever"),
            NativeClass::Other("Whatever".to_string())
        );
    }

    #[test]
    fn test_class_names_round_trip() {
        for class in NativeClass::KNOWN {
            assert_eq!(&NativeClass::parse(class.name()), class);
            assert_eq!(&NativeClass::parse(&class.qualified_name()), class);
        }
    }

    #[test]
    fn test_class_serde_uses_class_names() {
        let json = serde_json::to_string(&NativeClass::Topography).unwrap();
        assert_eq!(json, r#""TopographySurface""#);

        let parsed: Vec<NativeClass> =
            serde_json::from_str(r#"["TopographySurface", "DB.Wall", "Railing"]"#).unwrap();
        assert_eq!(
            parsed,
            vec![
                NativeClass::Topography,
                NativeClass::Wall,
                NativeClass::Other("Railing".to_string()),
            ]
        );
        assert_eq!(
            serde_json::to_string(&NativeClass::Other("Railing".to_string())).unwrap(),
            r#""Railing""#
        );
    }

    #[test]
    fn test_roof_hierarchy() {
        assert!(NativeClass::FootPrintRoof.is_a(&NativeClass::RoofBase));
        assert!(NativeClass::RoofBase.is_a(&NativeClass::RoofBase));
        assert!(!NativeClass::Wall.is_a(&NativeClass::RoofBase));
        assert!(!NativeClass::RoofBase.is_a(&NativeClass::FootPrintRoof));
    }

    #[test]
    fn test_names_match() {
        assert!(names_match("Level 1", "Level 1", false));
        assert!(!names_match("Level 1", "level 1", false));
        assert!(names_match("Level 1", "level 1", true));
    }

    #[test]
    fn test_ids_display() {
        assert_eq!(NativeId(42).to_string(), "#42");
        assert_eq!(PersistentId::new("abc-1").to_string(), "abc-1");
    }
}
