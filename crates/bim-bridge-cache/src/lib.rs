// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! BIM Bridge Cache - Conversion identity cache
//!
//! Memoizes the mapping between native elements and converted domain objects
//! for one conversion pass:
//!
//! - [`PullCache`]: native id to the domain objects produced from it
//! - [`PushCache`]: domain persistent id to the native ids created for it
//! - [`ConversionPass`]: drives a [`Converter`](bim_bridge_model::Converter)
//!   over elements, consulting the pull cache so reference cycles terminate
//!
//! Both caches are persistent values: every append returns a new version and
//! older versions stay valid. The free functions take `Option` caches so that
//! "no caching requested" propagates through a call chain.
//!
//! # Example
//!
//! ```ignore
//! use bim_bridge_cache::{append_to_pull_cache, find_in_pull_cache, PullCache};
//!
//! let cache = Some(PullCache::new());
//! let cache = append_to_pull_cache(cache, converted_level);
//! let hits = find_in_pull_cache(cache.as_ref(), level_id);
//! ```

mod pass;
mod pull;
mod push;

pub use pass::ConversionPass;
pub use pull::{append_to_pull_cache, find_in_pull_cache, PullCache};
pub use push::{append_to_push_cache, find_in_push_cache, PushCache};
