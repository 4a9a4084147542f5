// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM Bridge Store - In-memory host document
//!
//! This crate provides [`MemoryDocument`], an implementation of the
//! `HostStore` trait from `bim-bridge-model` backed by plain indexed vectors.
//! It stands in for a live host session in tests, benchmarks and offline
//! tooling, and can be loaded from a JSON [`DocumentSnapshot`].
//!
//! # Example
//!
//! ```ignore
//! use bim_bridge_store::MemoryDocument;
//! use bim_bridge_model::{HostStore, NativeClass};
//!
//! let doc = MemoryDocument::from_json(snapshot_json)?;
//! let walls = doc.elements_of_class(&NativeClass::Wall);
//! println!("Found {} walls", walls.len());
//! ```

mod document;
mod snapshot;

pub use document::MemoryDocument;
pub use snapshot::DocumentSnapshot;

use bim_bridge_model::Result;

/// Load a document from snapshot JSON
pub fn load(json: &str) -> Result<MemoryDocument> {
    MemoryDocument::from_json(json)
}
