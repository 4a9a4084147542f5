// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Conversion layer collaborator traits
//!
//! The per-type conversion routines live outside the bridge. These traits
//! describe what the identity cache needs from them.

use crate::{Element, HostStore, NativeId, PersistentId, Result};

/// Origin data a domain object records about itself
pub trait HasOrigin {
    /// Native element this object was converted from, if any
    fn origin_id(&self) -> Option<NativeId>;

    /// The object's own persistent identity
    fn persistent_id(&self) -> Option<&PersistentId> {
        None
    }
}

impl<T: HasOrigin + ?Sized> HasOrigin for std::sync::Arc<T> {
    fn origin_id(&self) -> Option<NativeId> {
        (**self).origin_id()
    }

    fn persistent_id(&self) -> Option<&PersistentId> {
        (**self).persistent_id()
    }
}

/// State a converter sees while a conversion pass is running
///
/// Converters that walk into related elements must `register` what they
/// produced for the current element before calling `convert_related`, so
/// that reference cycles terminate on a cache hit.
pub trait ConversionContext<D> {
    /// The host document being converted
    fn store(&self) -> &dyn HostStore;

    /// Objects already produced for `id` in this pass (empty if none)
    fn lookup(&self, id: NativeId) -> Vec<D>;

    /// Record a converted object under its origin id
    fn register(&mut self, object: D);

    /// Convert a referenced element, or return its memoized result
    fn convert_related(&mut self, id: NativeId) -> Result<Vec<D>>;
}

/// Converts one native element into zero or more domain objects
///
/// # Example
///
/// ```ignore
/// struct LevelConverter;
///
/// impl Converter<DomainLevel> for LevelConverter {
///     fn convert(
///         &self,
///         element: &Element,
///         ctx: &mut dyn ConversionContext<DomainLevel>,
///     ) -> Result<Vec<DomainLevel>> {
///         Ok(vec![DomainLevel::from(element)])
///     }
/// }
/// ```
pub trait Converter<D>: Send + Sync {
    /// Convert an element
    fn convert(&self, element: &Element, ctx: &mut dyn ConversionContext<D>) -> Result<Vec<D>>;

    /// Whether this converter handles `element` at all
    fn can_convert(&self, _element: &Element) -> bool {
        true
    }
}
