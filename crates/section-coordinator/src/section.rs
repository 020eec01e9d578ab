//! A single section of items with its decorations and measurement cache.
//!
//! `SectionMetric<T, P, M>` stores the items of one section in display order,
//! optional header/footer titles and payloads, an optional index title, grid
//! supplementary payloads, and a cache of measurements aligned with the items.
//!
//! # Bounds policy
//!
//! Reads return `Option` and never fail. Writes and cache accessors return
//! [`Result`] with a [`MetricError`] that names the operation, the offending
//! index and the accepted range. [`SectionMetric::remove_at`] is the one
//! lenient write.

use std::slice;

use crate::error::{Decoration, MetricError, Result};
use crate::index::Bound;
use crate::logging::targets;
use crate::measurement::ReorderPolicy;

/// One section of a sectioned list or grid.
///
/// `T` is the item type, `P` the payload type of custom header, footer and
/// supplementary views, and `M` the cached measurement (a row height by
/// default).
///
/// # Cache alignment
///
/// The cell measurement cache always has exactly one slot per item. Inserted
/// and replaced positions start empty; moved and exchanged positions follow
/// the [`ReorderPolicy`] passed to the operation (the plain variants
/// transport the measurement with the item).
///
/// # Example
///
/// ```
/// use section_coordinator::SectionMetric;
///
/// let mut section: SectionMetric<&str> = SectionMetric::new(vec!["a", "b", "c", "d"])
///     .with_header_title("Letters");
///
/// section.cache_measurement(0, 44.0).unwrap();
/// section.move_item(0, 2).unwrap();
///
/// assert_eq!(section.items(), &["b", "c", "a", "d"]);
/// assert_eq!(section.cached_measurement(2).unwrap(), Some(&44.0));
/// assert_eq!(section.header_title(), Some("Letters"));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "SectionSnapshot<T, P, M>")
)]
pub struct SectionMetric<T, P = (), M = f64> {
    pub(crate) items: Vec<T>,
    header_title: Option<String>,
    footer_title: Option<String>,
    header_payload: Option<P>,
    footer_payload: Option<P>,
    index_title: Option<String>,
    supplementary_headers: Vec<P>,
    supplementary_footers: Vec<P>,
    pub(crate) cell_cache: Vec<Option<M>>,
    header_cache: Option<M>,
    footer_cache: Option<M>,
}

/// Serialized form of a [`SectionMetric`], checked before it becomes one.
#[cfg(feature = "serde")]
#[derive(serde::Deserialize)]
struct SectionSnapshot<T, P, M> {
    items: Vec<T>,
    header_title: Option<String>,
    footer_title: Option<String>,
    header_payload: Option<P>,
    footer_payload: Option<P>,
    index_title: Option<String>,
    supplementary_headers: Vec<P>,
    supplementary_footers: Vec<P>,
    cell_cache: Vec<Option<M>>,
    header_cache: Option<M>,
    footer_cache: Option<M>,
}

#[cfg(feature = "serde")]
impl<T, P, M> TryFrom<SectionSnapshot<T, P, M>> for SectionMetric<T, P, M> {
    type Error = MetricError;

    fn try_from(snapshot: SectionSnapshot<T, P, M>) -> Result<Self> {
        if snapshot.cell_cache.len() != snapshot.items.len() {
            return Err(MetricError::misaligned(
                "deserialize",
                snapshot.items.len(),
                snapshot.cell_cache.len(),
            ));
        }
        Ok(Self {
            items: snapshot.items,
            header_title: snapshot.header_title,
            footer_title: snapshot.footer_title,
            header_payload: snapshot.header_payload,
            footer_payload: snapshot.footer_payload,
            index_title: snapshot.index_title,
            supplementary_headers: snapshot.supplementary_headers,
            supplementary_footers: snapshot.supplementary_footers,
            cell_cache: snapshot.cell_cache,
            header_cache: snapshot.header_cache,
            footer_cache: snapshot.footer_cache,
        })
    }
}

impl<T, P, M> Default for SectionMetric<T, P, M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, P, M> SectionMetric<T, P, M> {
    /// Creates a section holding `items`, with no decorations and an empty cache.
    pub fn new(items: Vec<T>) -> Self {
        let cell_cache = std::iter::repeat_with(|| None).take(items.len()).collect();
        Self {
            items,
            header_title: None,
            footer_title: None,
            header_payload: None,
            footer_payload: None,
            index_title: None,
            supplementary_headers: Vec::new(),
            supplementary_footers: Vec::new(),
            cell_cache,
            header_cache: None,
            footer_cache: None,
        }
    }

    /// Creates an empty section.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    // =========================================================================
    // Builders
    // =========================================================================

    /// Sets the header title.
    pub fn with_header_title(mut self, title: impl Into<String>) -> Self {
        self.set_header_title(Some(title.into()));
        self
    }

    /// Sets the footer title.
    pub fn with_footer_title(mut self, title: impl Into<String>) -> Self {
        self.set_footer_title(Some(title.into()));
        self
    }

    /// Sets the payload of a custom header view.
    pub fn with_header_payload(mut self, payload: P) -> Self {
        self.set_header_payload(Some(payload));
        self
    }

    /// Sets the payload of a custom footer view.
    pub fn with_footer_payload(mut self, payload: P) -> Self {
        self.set_footer_payload(Some(payload));
        self
    }

    /// Sets the fast-scroll index title.
    pub fn with_index_title(mut self, title: impl Into<String>) -> Self {
        self.index_title = Some(title.into());
        self
    }

    /// Sets the grid supplementary header payloads.
    pub fn with_supplementary_headers(mut self, payloads: Vec<P>) -> Self {
        self.set_supplementary_headers(payloads);
        self
    }

    /// Sets the grid supplementary footer payloads.
    pub fn with_supplementary_footers(mut self, payloads: Vec<P>) -> Self {
        self.set_supplementary_footers(payloads);
        self
    }

    // =========================================================================
    // Decorations
    // =========================================================================

    /// Returns the header title.
    pub fn header_title(&self) -> Option<&str> {
        self.header_title.as_deref()
    }

    /// Returns the footer title.
    pub fn footer_title(&self) -> Option<&str> {
        self.footer_title.as_deref()
    }

    /// Returns the custom header payload.
    pub fn header_payload(&self) -> Option<&P> {
        self.header_payload.as_ref()
    }

    /// Returns the custom footer payload.
    pub fn footer_payload(&self) -> Option<&P> {
        self.footer_payload.as_ref()
    }

    /// Returns the fast-scroll index title.
    pub fn index_title(&self) -> Option<&str> {
        self.index_title.as_deref()
    }

    /// Returns the grid supplementary header payloads.
    pub fn supplementary_headers(&self) -> &[P] {
        &self.supplementary_headers
    }

    /// Returns the grid supplementary footer payloads.
    pub fn supplementary_footers(&self) -> &[P] {
        &self.supplementary_footers
    }

    /// Returns the supplementary header payload at `index`.
    ///
    /// The supplementary sequence is independent of the item count.
    pub fn supplementary_header(&self, index: usize) -> Option<&P> {
        self.supplementary_headers.get(index)
    }

    /// Returns the supplementary footer payload at `index`.
    pub fn supplementary_footer(&self, index: usize) -> Option<&P> {
        self.supplementary_footers.get(index)
    }

    /// Returns `true` if the section has a header title, payload, or
    /// supplementary header.
    pub fn has_header(&self) -> bool {
        self.header_title.is_some()
            || self.header_payload.is_some()
            || !self.supplementary_headers.is_empty()
    }

    /// Returns `true` if the section has a footer title, payload, or
    /// supplementary footer.
    pub fn has_footer(&self) -> bool {
        self.footer_title.is_some()
            || self.footer_payload.is_some()
            || !self.supplementary_footers.is_empty()
    }

    /// Sets or clears the header title. Invalidates the header measurement.
    pub fn set_header_title(&mut self, title: Option<String>) {
        self.header_title = title;
        self.header_cache = None;
    }

    /// Sets or clears the footer title. Invalidates the footer measurement.
    pub fn set_footer_title(&mut self, title: Option<String>) {
        self.footer_title = title;
        self.footer_cache = None;
    }

    /// Sets or clears the header payload. Invalidates the header measurement.
    pub fn set_header_payload(&mut self, payload: Option<P>) {
        self.header_payload = payload;
        self.header_cache = None;
    }

    /// Sets or clears the footer payload. Invalidates the footer measurement.
    pub fn set_footer_payload(&mut self, payload: Option<P>) {
        self.footer_payload = payload;
        self.footer_cache = None;
    }

    /// Sets or clears the index title.
    pub fn set_index_title(&mut self, title: Option<String>) {
        self.index_title = title;
    }

    /// Replaces the supplementary header payloads. Invalidates the header measurement.
    pub fn set_supplementary_headers(&mut self, payloads: Vec<P>) {
        self.supplementary_headers = payloads;
        self.header_cache = None;
    }

    /// Replaces the supplementary footer payloads. Invalidates the footer measurement.
    pub fn set_supplementary_footers(&mut self, payloads: Vec<P>) {
        self.supplementary_footers = payloads;
        self.footer_cache = None;
    }

    // =========================================================================
    // Item reads
    // =========================================================================

    /// Returns the number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns `true` if the section has no items.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the item at `index`, or `None` if out of range.
    pub fn item(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Returns the first item.
    pub fn first(&self) -> Option<&T> {
        self.items.first()
    }

    /// Returns the last item.
    pub fn last(&self) -> Option<&T> {
        self.items.last()
    }

    /// Returns all items in display order.
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Returns an iterator over the items.
    pub fn iter(&self) -> slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Consumes the section and returns its items.
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the position of the first item equal to `item`.
    pub fn position(&self, item: &T) -> Option<usize>
    where
        T: PartialEq,
    {
        self.items.iter().position(|candidate| candidate == item)
    }

    /// Provides mutable access to an item via a closure.
    ///
    /// The item's cached measurement is invalidated since its content may
    /// have changed. Returns `None` if `index` is out of range.
    pub fn modify<F, R>(&mut self, index: usize, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        let item = self.items.get_mut(index)?;
        let result = f(item);
        self.cell_cache[index] = None;
        Some(result)
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    /// Appends an item with an empty cache slot.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.cell_cache.push(None);
        tracing::trace!(target: targets::SECTION, index = self.items.len() - 1, "push");
        self.debug_check_alignment();
    }

    /// Appends every item of `items`.
    pub fn extend<I>(&mut self, items: I)
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        self.items.extend(items);
        self.cell_cache.resize_with(self.items.len(), || None);
        tracing::trace!(
            target: targets::SECTION,
            count = self.items.len() - before,
            "extend"
        );
        self.debug_check_alignment();
    }

    /// Inserts `item` at `index`, shifting later items back.
    ///
    /// `index == len()` appends.
    pub fn insert(&mut self, index: usize, item: T) -> Result<()> {
        Bound::Insertion.check_item("insert", index, self.items.len())?;
        self.insert_slot(index, item, None);
        tracing::trace!(target: targets::SECTION, index, "insert");
        Ok(())
    }

    /// Inserts `items` starting at `index`, keeping their order.
    pub fn insert_all<I>(&mut self, index: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        Bound::Insertion.check_item("insert_all", index, self.items.len())?;
        let before = self.items.len();
        self.items.splice(index..index, items);
        let count = self.items.len() - before;
        self.cell_cache
            .splice(index..index, std::iter::repeat_with(|| None).take(count));
        tracing::trace!(target: targets::SECTION, index, count, "insert_all");
        self.debug_check_alignment();
        Ok(())
    }

    /// Replaces the item at `index`, returning the previous one.
    ///
    /// The cache slot is invalidated.
    pub fn replace(&mut self, index: usize, item: T) -> Result<T> {
        Bound::Existing.check_item("replace", index, self.items.len())?;
        self.cell_cache[index] = None;
        tracing::trace!(target: targets::SECTION, index, "replace");
        Ok(std::mem::replace(&mut self.items[index], item))
    }

    /// Replaces consecutive items starting at `index`, returning the previous ones.
    ///
    /// The whole replaced range must lie inside the section.
    pub fn replace_all<I>(&mut self, index: usize, items: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = T>,
    {
        let len = self.items.len();
        Bound::Existing.check_item("replace_all", index, len)?;
        let items: Vec<T> = items.into_iter().collect();
        let end = index + items.len();
        if end > len {
            Bound::Existing.check_item("replace_all", end - 1, len)?;
        }
        for slot in &mut self.cell_cache[index..end] {
            *slot = None;
        }
        tracing::trace!(target: targets::SECTION, index, count = end - index, "replace_all");
        Ok(self.items.splice(index..end, items).collect())
    }

    /// Removes and returns the first item.
    pub fn remove_first(&mut self) -> Result<T> {
        if self.items.is_empty() {
            return Err(MetricError::empty("remove_first"));
        }
        Ok(self.take_slot(0).0)
    }

    /// Removes and returns the last item.
    pub fn remove_last(&mut self) -> Result<T> {
        let (Some(item), Some(_)) = (self.items.pop(), self.cell_cache.pop()) else {
            return Err(MetricError::empty("remove_last"));
        };
        tracing::trace!(target: targets::SECTION, index = self.items.len(), "remove_last");
        Ok(item)
    }

    /// Removes and returns the item at `index`, or `None` if out of range.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index >= self.items.len() {
            return None;
        }
        Some(self.take_slot(index).0)
    }

    /// Removes every item and clears the cell cache.
    pub fn clear(&mut self) {
        self.items.clear();
        self.cell_cache.clear();
        tracing::trace!(target: targets::SECTION, "clear");
    }

    /// Swaps the items at `a` and `b`, transporting their measurements.
    pub fn exchange(&mut self, a: usize, b: usize) -> Result<()> {
        self.exchange_with(a, b, ReorderPolicy::Transport)
    }

    /// Swaps the items at `a` and `b` under the given cache policy.
    pub fn exchange_with(&mut self, a: usize, b: usize, policy: ReorderPolicy) -> Result<()> {
        let len = self.items.len();
        Bound::Existing.check_item("exchange", a, len)?;
        Bound::Existing.check_item("exchange", b, len)?;
        if a == b {
            return Ok(());
        }
        self.items.swap(a, b);
        match policy {
            ReorderPolicy::Transport => self.cell_cache.swap(a, b),
            ReorderPolicy::Invalidate => {
                self.cell_cache[a] = None;
                self.cell_cache[b] = None;
            }
        }
        tracing::trace!(target: targets::SECTION, a, b, ?policy, "exchange");
        Ok(())
    }

    /// Moves the item at `from` to `to`, shifting the items in between.
    ///
    /// The measurement travels with the item.
    pub fn move_item(&mut self, from: usize, to: usize) -> Result<()> {
        self.move_item_with(from, to, ReorderPolicy::Transport)
    }

    /// Moves the item at `from` to `to` under the given cache policy.
    pub fn move_item_with(&mut self, from: usize, to: usize, policy: ReorderPolicy) -> Result<()> {
        let len = self.items.len();
        Bound::Existing.check_item("move_item", from, len)?;
        Bound::Existing.check_item("move_item", to, len)?;
        if from == to {
            return Ok(());
        }
        let (item, cached) = self.take_slot(from);
        let cached = match policy {
            ReorderPolicy::Transport => cached,
            ReorderPolicy::Invalidate => None,
        };
        self.insert_slot(to, item, cached);
        tracing::trace!(target: targets::SECTION, from, to, ?policy, "move_item");
        Ok(())
    }

    // =========================================================================
    // Measurement cache
    // =========================================================================

    /// Stores a measurement for the item at `index`.
    pub fn cache_measurement(&mut self, index: usize, value: M) -> Result<()> {
        Bound::Existing.check_item("cache_measurement", index, self.items.len())?;
        self.cell_cache[index] = Some(value);
        Ok(())
    }

    /// Returns the cached measurement for the item at `index`, if any.
    pub fn cached_measurement(&self, index: usize) -> Result<Option<&M>> {
        Bound::Existing.check_item("cached_measurement", index, self.items.len())?;
        Ok(self.cell_cache[index].as_ref())
    }

    /// Clears the measurement for the item at `index`.
    ///
    /// Clearing an empty slot is a no-op.
    pub fn invalidate_measurement(&mut self, index: usize) -> Result<()> {
        Bound::Existing.check_item("invalidate_measurement", index, self.items.len())?;
        self.cell_cache[index] = None;
        Ok(())
    }

    /// Returns the cell cache, one slot per item.
    pub fn cached_measurements(&self) -> &[Option<M>] {
        &self.cell_cache
    }

    /// Stores the header measurement.
    pub fn cache_header_measurement(&mut self, value: M) -> Result<()> {
        self.require(Decoration::Header, "cache_header_measurement")?;
        self.header_cache = Some(value);
        Ok(())
    }

    /// Returns the cached header measurement, if any.
    pub fn header_measurement(&self) -> Result<Option<&M>> {
        self.require(Decoration::Header, "header_measurement")?;
        Ok(self.header_cache.as_ref())
    }

    /// Clears the header measurement.
    pub fn invalidate_header_measurement(&mut self) -> Result<()> {
        self.require(Decoration::Header, "invalidate_header_measurement")?;
        self.header_cache = None;
        Ok(())
    }

    /// Stores the footer measurement.
    pub fn cache_footer_measurement(&mut self, value: M) -> Result<()> {
        self.require(Decoration::Footer, "cache_footer_measurement")?;
        self.footer_cache = Some(value);
        Ok(())
    }

    /// Returns the cached footer measurement, if any.
    pub fn footer_measurement(&self) -> Result<Option<&M>> {
        self.require(Decoration::Footer, "footer_measurement")?;
        Ok(self.footer_cache.as_ref())
    }

    /// Clears the footer measurement.
    pub fn invalidate_footer_measurement(&mut self) -> Result<()> {
        self.require(Decoration::Footer, "invalidate_footer_measurement")?;
        self.footer_cache = None;
        Ok(())
    }

    /// Clears every cell, header and footer measurement.
    pub fn invalidate_all_measurements(&mut self) {
        self.cell_cache.iter_mut().for_each(|slot| *slot = None);
        self.header_cache = None;
        self.footer_cache = None;
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn require(&self, decoration: Decoration, operation: &'static str) -> Result<()> {
        let present = match decoration {
            Decoration::Header => self.has_header(),
            Decoration::Footer => self.has_footer(),
        };
        if present {
            Ok(())
        } else {
            Err(MetricError::missing(operation, decoration))
        }
    }

    /// Removes an item and its cache slot. `index` must be in range.
    pub(crate) fn take_slot(&mut self, index: usize) -> (T, Option<M>) {
        let item = self.items.remove(index);
        let cached = self.cell_cache.remove(index);
        self.debug_check_alignment();
        (item, cached)
    }

    /// Inserts an item with a known cache slot. `index` must be `<= len()`.
    pub(crate) fn insert_slot(&mut self, index: usize, item: T, cached: Option<M>) {
        self.items.insert(index, item);
        self.cell_cache.insert(index, cached);
        self.debug_check_alignment();
    }

    #[inline]
    fn debug_check_alignment(&self) {
        debug_assert_eq!(
            self.items.len(),
            self.cell_cache.len(),
            "cell cache out of step with items"
        );
    }
}

impl<T, P, M> From<Vec<T>> for SectionMetric<T, P, M> {
    fn from(items: Vec<T>) -> Self {
        Self::new(items)
    }
}

impl<T, P, M> FromIterator<T> for SectionMetric<T, P, M> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a, T, P, M> IntoIterator for &'a SectionMetric<T, P, M> {
    type Item = &'a T;
    type IntoIter = slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
