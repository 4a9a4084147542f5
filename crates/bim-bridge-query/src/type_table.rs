// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain type to native class lookup table

use bim_bridge_model::NativeClass;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Element types of the external domain model a query can ask for
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DomainType {
    Wall,
    Floor,
    Ceiling,
    Roof,
    Beam,
    Column,
    Brace,
    Door,
    Window,
    Level,
    Grid,
    Room,
    Space,
    Opening,
    View,
    Duct,
    Pipe,
    CableTray,
    Conduit,
    Topography,
    ModelCurve,
    Rebar,
    /// Generic wall-like element with a display mesh
    Element,
}

/// Native classes (and optional category restriction) for one domain type
#[derive(Debug, PartialEq, Eq)]
pub struct TypeMapping {
    pub domain: DomainType,
    /// Native classes whose instances may represent the domain type
    pub classes: &'static [NativeClass],
    /// Category names restricting the enumeration; empty means unrestricted
    pub categories: &'static [&'static str],
}

const STRUCTURAL_FRAMING: &[&str] = &["Structural Framing"];

/// Static lookup table, one row per [`DomainType`]
pub static TYPE_TABLE: &[TypeMapping] = &[
    TypeMapping {
        domain: DomainType::Wall,
        classes: &[NativeClass::Wall],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Floor,
        classes: &[NativeClass::Floor],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Ceiling,
        classes: &[NativeClass::Ceiling],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Roof,
        classes: &[NativeClass::RoofBase],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Beam,
        classes: &[NativeClass::FamilyInstance],
        categories: STRUCTURAL_FRAMING,
    },
    TypeMapping {
        domain: DomainType::Column,
        classes: &[NativeClass::FamilyInstance],
        categories: &["Columns", "Structural Columns"],
    },
    TypeMapping {
        domain: DomainType::Brace,
        classes: &[NativeClass::FamilyInstance],
        categories: STRUCTURAL_FRAMING,
    },
    TypeMapping {
        domain: DomainType::Door,
        classes: &[NativeClass::FamilyInstance],
        categories: &["Doors"],
    },
    TypeMapping {
        domain: DomainType::Window,
        classes: &[NativeClass::FamilyInstance],
        categories: &["Windows"],
    },
    TypeMapping {
        domain: DomainType::Level,
        classes: &[NativeClass::Level],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Grid,
        classes: &[NativeClass::Grid],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Room,
        classes: &[NativeClass::Room],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Space,
        classes: &[NativeClass::Space],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Opening,
        classes: &[NativeClass::Opening],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::View,
        classes: &[NativeClass::View],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Duct,
        classes: &[NativeClass::Duct],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Pipe,
        classes: &[NativeClass::Pipe],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::CableTray,
        classes: &[NativeClass::CableTray],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Conduit,
        classes: &[NativeClass::Conduit],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Topography,
        classes: &[NativeClass::Topography],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::ModelCurve,
        classes: &[NativeClass::ModelCurve],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Rebar,
        classes: &[NativeClass::Rebar],
        categories: &[],
    },
    TypeMapping {
        domain: DomainType::Element,
        classes: &[
            NativeClass::Wall,
            NativeClass::Floor,
            NativeClass::Ceiling,
            NativeClass::RoofBase,
            NativeClass::FamilyInstance,
        ],
        categories: &[],
    },
];

/// Look up the native classes for a domain type
///
/// Every variant has exactly one row; the `None` arm only guards against a
/// row being removed from the table.
pub fn mapping_for(domain: DomainType) -> Option<&'static TypeMapping> {
    TYPE_TABLE.iter().find(|row| row.domain == domain)
}

impl DomainType {
    /// Every domain type, in table order
    pub const ALL: &'static [DomainType] = &[
        DomainType::Wall,
        DomainType::Floor,
        DomainType::Ceiling,
        DomainType::Roof,
        DomainType::Beam,
        DomainType::Column,
        DomainType::Brace,
        DomainType::Door,
        DomainType::Window,
        DomainType::Level,
        DomainType::Grid,
        DomainType::Room,
        DomainType::Space,
        DomainType::Opening,
        DomainType::View,
        DomainType::Duct,
        DomainType::Pipe,
        DomainType::CableTray,
        DomainType::Conduit,
        DomainType::Topography,
        DomainType::ModelCurve,
        DomainType::Rebar,
        DomainType::Element,
    ];

    /// Parse a domain type name (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|t| t.name().eq_ignore_ascii_case(s))
    }

    pub fn name(&self) -> &'static str {
        match self {
            DomainType::Wall => "Wall",
            DomainType::Floor => "Floor",
            DomainType::Ceiling => "Ceiling",
            DomainType::Roof => "Roof",
            DomainType::Beam => "Beam",
            DomainType::Column => "Column",
            DomainType::Brace => "Brace",
            DomainType::Door => "Door",
            DomainType::Window => "Window",
            DomainType::Level => "Level",
            DomainType::Grid => "Grid",
            DomainType::Room => "Room",
            DomainType::Space => "Space",
            DomainType::Opening => "Opening",
            DomainType::View => "View",
            DomainType::Duct => "Duct",
            DomainType::Pipe => "Pipe",
            DomainType::CableTray => "CableTray",
            DomainType::Conduit => "Conduit",
            DomainType::Topography => "Topography",
            DomainType::ModelCurve => "ModelCurve",
            DomainType::Rebar => "Rebar",
            DomainType::Element => "Element",
        }
    }
}

impl FromStr for DomainType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown domain type: {s}"))
    }
}

impl fmt::Display for DomainType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
