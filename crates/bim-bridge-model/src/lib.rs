// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM Bridge Model - Shared types and collaborator traits
//!
//! This crate provides the core abstractions the bridge uses to talk to a host
//! CAD model store and to an external conversion layer. It holds no
//! algorithms: the query engine lives in `bim-bridge-query` and the identity
//! caches in `bim-bridge-cache`.
//!
//! # Architecture
//!
//! - [`HostStore`] - element enumeration and table scans over a host document
//! - [`Converter`] - turns one native [`Element`] into domain objects
//! - [`HasOrigin`] - recovers the native identity a domain object came from
//!
//! # Example
//!
//! ```ignore
//! use bim_bridge_model::{HostStore, NativeClass, NativeId};
//!
//! let store: &dyn HostStore = get_document();
//! for wall in store.elements_of_class(&NativeClass::Wall) {
//!     println!("{} {}", wall.id, wall.name);
//! }
//! ```

pub mod convert;
pub mod error;
pub mod store;
pub mod types;

pub use convert::*;
pub use error::*;
pub use store::*;
pub use types::*;
