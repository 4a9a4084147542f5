// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for bridge operations
//!
//! Lookups that find nothing are not errors anywhere in the bridge; they
//! return `None` or an empty collection. The variants below cover the few
//! places where a caller has handed over something unusable.

use crate::{NativeId, PersistentId};
use thiserror::Error;

/// Result type alias for bridge operations
pub type Result<T> = std::result::Result<T, BridgeError>;

/// Errors that can occur in the bridge
#[derive(Error, Debug)]
pub enum BridgeError {
    /// Element not found (only raised by `HostStoreExt::get_or_err`)
    #[error("Element {0} not found")]
    ElementNotFound(NativeId),

    /// Two elements in one document share an identity
    #[error("Duplicate element id {0}")]
    DuplicateElement(NativeId),

    /// Two elements in one document share a persistent identity
    #[error("Duplicate persistent id {0}")]
    DuplicatePersistentId(PersistentId),

    /// A document snapshot refers to something it does not define
    #[error("Dangling reference from {from}: {target}")]
    DanglingReference { from: String, target: String },

    /// Filter tree violates a structural rule
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// A converter failed on an element
    #[error("Conversion failed for element {element}: {message}")]
    Conversion { element: NativeId, message: String },

    /// Snapshot (de)serialization error
    #[error("Snapshot error: {0}")]
    Snapshot(#[from] serde_json::Error),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error with message
    #[error("{0}")]
    Other(String),
}

impl BridgeError {
    /// Create a new invalid filter error
    pub fn invalid_filter(msg: impl Into<String>) -> Self {
        BridgeError::InvalidFilter(msg.into())
    }

    /// Create a new conversion error
    pub fn conversion(element: NativeId, msg: impl Into<String>) -> Self {
        BridgeError::Conversion {
            element,
            message: msg.into(),
        }
    }

    /// Create a new dangling reference error
    pub fn dangling(from: impl Into<String>, target: impl Into<String>) -> Self {
        BridgeError::DanglingReference {
            from: from.into(),
            target: target.into(),
        }
    }

    /// Create a generic error
    pub fn other(msg: impl Into<String>) -> Self {
        BridgeError::Other(msg.into())
    }
}
