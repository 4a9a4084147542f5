// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Memoizing conversion pass

use std::sync::Arc;

use bim_bridge_model::{
    ConversionContext, Converter, Element, HasOrigin, HostStore, NativeId, Result,
};
use rustc_hash::FxHashSet;

use crate::PullCache;

/// One pull-direction conversion pass over a host document
///
/// Each element is converted at most once. Converters reach related
/// elements through [`ConversionContext::convert_related`]; a cache hit or an
/// element already being converted further up the stack returns what is
/// known so far instead of recursing.
pub struct ConversionPass<'a, D: Clone, C: ?Sized> {
    store: &'a dyn HostStore,
    converter: &'a C,
    cache: PullCache<D>,
    in_progress: FxHashSet<NativeId>,
}

impl<'a, D, C> ConversionPass<'a, D, C>
where
    D: Clone + HasOrigin,
    C: Converter<D> + ?Sized,
{
    pub fn new(store: &'a dyn HostStore, converter: &'a C) -> Self {
        Self::with_cache(store, converter, PullCache::new())
    }

    /// Continue from an earlier cache version
    pub fn with_cache(store: &'a dyn HostStore, converter: &'a C, cache: PullCache<D>) -> Self {
        Self {
            store,
            converter,
            cache,
            in_progress: FxHashSet::default(),
        }
    }

    pub fn cache(&self) -> &PullCache<D> {
        &self.cache
    }

    /// Convert one element, or return its cached objects
    ///
    /// The objects the converter returns become the element's cache entry,
    /// replacing anything it registered for the element while recursing, so
    /// later hits return the same list. A converter that only registers and
    /// returns nothing keeps its registered objects. Converter errors
    /// propagate; the cache keeps every object appended before the failure.
    pub fn convert(&mut self, element: &Element) -> Result<Vec<D>> {
        let id = element.id;
        if self.cache.contains(id) {
            log::trace!("conversion cache hit for {id}");
            return Ok(self.cache.find(id));
        }
        if !self.in_progress.insert(id) {
            log::trace!("{id} is already being converted");
            return Ok(Vec::new());
        }

        let converter = self.converter;
        let outcome = converter.convert(element, self);
        self.in_progress.remove(&id);
        let objects = outcome?;

        if !objects.is_empty() {
            self.cache = self.cache.replace(id, objects);
        }
        let converted = self.cache.find(id);
        log::trace!("converted {id} into {} objects", converted.len());
        Ok(converted)
    }

    /// Convert the element with `id`; unknown ids and elements the converter
    /// declines produce nothing
    pub fn convert_id(&mut self, id: NativeId) -> Result<Vec<D>> {
        let Some(element) = self.store.element_by_id(id) else {
            log::debug!("related element {id} not in document");
            return Ok(Vec::new());
        };
        if !self.converter.can_convert(&element) {
            return Ok(Vec::new());
        }
        self.convert(&element)
    }

    /// Convert a batch of elements, e.g. the result of a filter query
    ///
    /// Elements converted earlier (directly or as a related element) are
    /// skipped, so the returned list holds each object once.
    pub fn convert_all<I>(&mut self, elements: I) -> Result<Vec<D>>
    where
        I: IntoIterator<Item = Arc<Element>>,
    {
        let mut converted = Vec::new();
        let mut skipped = 0usize;
        for element in elements {
            if self.cache.contains(element.id) || !self.converter.can_convert(&element) {
                skipped += 1;
                continue;
            }
            converted.extend(self.convert(&element)?);
        }
        log::debug!(
            "conversion pass: {} objects, {} elements skipped, {} cached ids",
            converted.len(),
            skipped,
            self.cache.len()
        );
        Ok(converted)
    }

    /// End the pass and hand back the final cache
    pub fn finish(self) -> PullCache<D> {
        self.cache
    }
}

impl<D, C> ConversionContext<D> for ConversionPass<'_, D, C>
where
    D: Clone + HasOrigin,
    C: Converter<D> + ?Sized,
{
    fn store(&self) -> &dyn HostStore {
        self.store
    }

    fn lookup(&self, id: NativeId) -> Vec<D> {
        self.cache.find(id)
    }

    fn register(&mut self, object: D) {
        self.cache = self.cache.with(object);
    }

    fn convert_related(&mut self, id: NativeId) -> Result<Vec<D>> {
        self.convert_id(id)
    }
}
