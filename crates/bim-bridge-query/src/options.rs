// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Evaluator configuration

use serde::{Deserialize, Serialize};

/// What positional id lookups do with ids that match nothing
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingIdPolicy {
    /// Drop the miss; later results shift up
    #[default]
    Skip,
    /// Keep a `None` slot so results line up with the requested ids
    Placeholder,
}

/// Options for the criteria evaluator
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorOptions {
    /// Compare names ignoring case (selection sets, family and type names,
    /// class names, view templates, element names)
    ///
    /// Category names are always matched exactly.
    pub ignore_case: bool,
    /// Miss handling for positional bulk lookups
    pub missing_ids: MissingIdPolicy,
}

impl EvaluatorOptions {
    /// Create options with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Set case-insensitive name matching
    pub fn with_ignore_case(mut self, enabled: bool) -> Self {
        self.ignore_case = enabled;
        self
    }

    /// Set the miss policy for positional lookups
    pub fn with_missing_ids(mut self, policy: MissingIdPolicy) -> Self {
        self.missing_ids = policy;
        self
    }
}
