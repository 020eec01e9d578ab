//! The sectioned model that backs one list or grid widget.
//!
//! `GlobalMetric<T, P, M>` owns an ordered sequence of [`SectionMetric`]s and
//! translates [`IndexPath`]s into reads and writes on them. Widget glue asks
//! it for counts, items, decorations and cached measurements, and applies
//! user edits (delete, insert, drag-reorder) to it before telling the widget
//! about the same change.
//!
//! # Bounds policy
//!
//! - Reads (`item`, `item_count`, `header_title`, ...) return `None` for any
//!   out-of-range section or item, so speculative widget queries never fail.
//! - Section and item mutations, and every measurement-cache call, return a
//!   [`MetricError`] naming the operation, the offending index and the
//!   accepted range. A rejected call leaves the model unchanged.

use crate::error::{MetricError, Result};
use crate::index::{Bound, IndexPath};
use crate::logging::targets;
use crate::measurement::{MetricConfig, ReorderPolicy};
use crate::section::SectionMetric;

/// An ordered collection of sections addressed by [`IndexPath`].
///
/// # Example
///
/// ```
/// use section_coordinator::{GlobalMetric, IndexPath};
///
/// let mut metric: GlobalMetric<i32> = GlobalMetric::from_items(vec![vec![1, 2, 3], vec![4, 5]]);
///
/// assert_eq!(metric.section_count(), 2);
/// assert_eq!(metric.item(IndexPath::new(1, 1)), Some(&5));
/// assert_eq!(metric.item(IndexPath::new(9, 0)), None);
///
/// // Drag row 2 of section 0 to the top of section 1.
/// metric.move_item(IndexPath::new(0, 2), IndexPath::new(1, 0)).unwrap();
/// assert_eq!(metric.items_in(0), Some(&[1, 2][..]));
/// assert_eq!(metric.items_in(1), Some(&[3, 4, 5][..]));
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlobalMetric<T, P = (), M = f64> {
    sections: Vec<SectionMetric<T, P, M>>,
    config: MetricConfig,
}

impl<T, P, M> Default for GlobalMetric<T, P, M> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T, P, M> GlobalMetric<T, P, M> {
    /// Creates a model from `sections` with the default configuration.
    pub fn new(sections: Vec<SectionMetric<T, P, M>>) -> Self {
        Self::with_config(sections, MetricConfig::default())
    }

    /// Creates a model with no sections.
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Creates a model from `sections` with an explicit configuration.
    pub fn with_config(sections: Vec<SectionMetric<T, P, M>>, config: MetricConfig) -> Self {
        Self { sections, config }
    }

    /// Creates a model with one undecorated section per inner vector.
    pub fn from_items(sections: Vec<Vec<T>>) -> Self {
        Self::new(sections.into_iter().map(SectionMetric::new).collect())
    }

    /// Returns the configuration.
    pub fn config(&self) -> &MetricConfig {
        &self.config
    }

    /// Replaces the configuration. Existing cached measurements are kept.
    pub fn set_config(&mut self, config: MetricConfig) {
        self.config = config;
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Returns the number of sections.
    pub fn section_count(&self) -> usize {
        self.sections.len()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Returns the number of items across all sections.
    pub fn total_item_count(&self) -> usize {
        self.sections.iter().map(SectionMetric::len).sum()
    }

    /// Returns all sections.
    pub fn sections(&self) -> &[SectionMetric<T, P, M>] {
        &self.sections
    }

    /// Returns the section at `section`.
    pub fn section(&self, section: usize) -> Option<&SectionMetric<T, P, M>> {
        self.sections.get(section)
    }

    /// Returns the section at `section` for in-place edits.
    pub fn section_mut(&mut self, section: usize) -> Option<&mut SectionMetric<T, P, M>> {
        self.sections.get_mut(section)
    }

    /// Returns the number of items in `section`.
    pub fn item_count(&self, section: usize) -> Option<usize> {
        self.section(section).map(SectionMetric::len)
    }

    /// Returns the items of `section`.
    pub fn items_in(&self, section: usize) -> Option<&[T]> {
        self.section(section).map(SectionMetric::items)
    }

    /// Returns the item at `path`.
    pub fn item(&self, path: IndexPath) -> Option<&T> {
        self.section(path.section)?.item(path.item)
    }

    /// Returns the path of the first item equal to `item`, scanning sections
    /// in order.
    pub fn index_path_of(&self, item: &T) -> Option<IndexPath>
    where
        T: PartialEq,
    {
        self.sections
            .iter()
            .enumerate()
            .find_map(|(section, metric)| {
                metric
                    .position(item)
                    .map(|index| IndexPath::new(section, index))
            })
    }

    /// Provides mutable access to the item at `path` via a closure.
    ///
    /// The item's cached measurement is invalidated since its content may
    /// have changed. Returns `None` if `path` is out of range.
    pub fn modify<F, R>(&mut self, path: IndexPath, f: F) -> Option<R>
    where
        F: FnOnce(&mut T) -> R,
    {
        self.section_mut(path.section)?.modify(path.item, f)
    }

    /// Returns `true` if any section contains `item`.
    pub fn contains(&self, item: &T) -> bool
    where
        T: PartialEq,
    {
        self.index_path_of(item).is_some()
    }

    /// Iterates over every valid path in display order.
    pub fn index_paths(&self) -> impl Iterator<Item = IndexPath> + '_ {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section, metric)| {
                (0..metric.len()).map(move |item| IndexPath::new(section, item))
            })
    }

    /// Iterates over every item with its path.
    pub fn iter(&self) -> impl Iterator<Item = (IndexPath, &T)> + '_ {
        self.sections
            .iter()
            .enumerate()
            .flat_map(|(section, metric)| {
                metric
                    .iter()
                    .enumerate()
                    .map(move |(item, value)| (IndexPath::new(section, item), value))
            })
    }

    /// Returns the header title of `section`.
    pub fn header_title(&self, section: usize) -> Option<&str> {
        self.section(section)?.header_title()
    }

    /// Returns the footer title of `section`.
    pub fn footer_title(&self, section: usize) -> Option<&str> {
        self.section(section)?.footer_title()
    }

    /// Returns the custom header payload of `section`.
    pub fn header_payload(&self, section: usize) -> Option<&P> {
        self.section(section)?.header_payload()
    }

    /// Returns the custom footer payload of `section`.
    pub fn footer_payload(&self, section: usize) -> Option<&P> {
        self.section(section)?.footer_payload()
    }

    /// Returns the supplementary header payload `path.item` of `path.section`.
    pub fn supplementary_header(&self, path: IndexPath) -> Option<&P> {
        self.section(path.section)?.supplementary_header(path.item)
    }

    /// Returns the supplementary footer payload `path.item` of `path.section`.
    pub fn supplementary_footer(&self, path: IndexPath) -> Option<&P> {
        self.section(path.section)?.supplementary_footer(path.item)
    }

    /// Collects the index titles of every section that has one, in order.
    pub fn index_titles(&self) -> Vec<&str> {
        self.sections
            .iter()
            .filter_map(SectionMetric::index_title)
            .collect()
    }

    /// Returns the position of `payload` among the header payloads of the
    /// sections that have one.
    ///
    /// This is a position in the filtered sequence, not a section index: with
    /// headers on sections 0 and 2 only, the payload of section 2 is at 1.
    /// Use [`section_of_header_payload`](Self::section_of_header_payload) for
    /// the section index.
    pub fn header_payload_position(&self, payload: &P) -> Option<usize>
    where
        P: PartialEq,
    {
        self.sections
            .iter()
            .filter_map(SectionMetric::header_payload)
            .position(|candidate| candidate == payload)
    }

    /// Returns the position of `payload` among the footer payloads of the
    /// sections that have one.
    pub fn footer_payload_position(&self, payload: &P) -> Option<usize>
    where
        P: PartialEq,
    {
        self.sections
            .iter()
            .filter_map(SectionMetric::footer_payload)
            .position(|candidate| candidate == payload)
    }

    /// Returns the index of the first section whose header payload equals `payload`.
    pub fn section_of_header_payload(&self, payload: &P) -> Option<usize>
    where
        P: PartialEq,
    {
        self.sections
            .iter()
            .position(|metric| metric.header_payload() == Some(payload))
    }

    /// Returns the index of the first section whose footer payload equals `payload`.
    pub fn section_of_footer_payload(&self, payload: &P) -> Option<usize>
    where
        P: PartialEq,
    {
        self.sections
            .iter()
            .position(|metric| metric.footer_payload() == Some(payload))
    }

    // =========================================================================
    // Section mutations
    // =========================================================================

    /// Appends a section.
    pub fn append_section(&mut self, section: SectionMetric<T, P, M>) {
        self.sections.push(section);
        tracing::trace!(
            target: targets::GLOBAL,
            section = self.sections.len() - 1,
            "append_section"
        );
    }

    /// Appends every section of `sections`.
    pub fn append_sections<I>(&mut self, sections: I)
    where
        I: IntoIterator<Item = SectionMetric<T, P, M>>,
    {
        self.sections.extend(sections);
    }

    /// Inserts a section at `index`. `index == section_count()` appends.
    pub fn insert_section(&mut self, index: usize, section: SectionMetric<T, P, M>) -> Result<()> {
        Bound::Insertion.check_section("insert_section", index, self.sections.len())?;
        self.sections.insert(index, section);
        tracing::trace!(target: targets::GLOBAL, section = index, "insert_section");
        Ok(())
    }

    /// Replaces the section at `index`, returning the previous one.
    pub fn replace_section(
        &mut self,
        index: usize,
        section: SectionMetric<T, P, M>,
    ) -> Result<SectionMetric<T, P, M>> {
        Bound::Existing.check_section("replace_section", index, self.sections.len())?;
        tracing::trace!(target: targets::GLOBAL, section = index, "replace_section");
        Ok(std::mem::replace(&mut self.sections[index], section))
    }

    /// Removes and returns the section at `index`.
    pub fn remove_section(&mut self, index: usize) -> Result<SectionMetric<T, P, M>> {
        Bound::Existing.check_section("remove_section", index, self.sections.len())?;
        tracing::trace!(target: targets::GLOBAL, section = index, "remove_section");
        Ok(self.sections.remove(index))
    }

    /// Removes and returns the first section.
    pub fn remove_first_section(&mut self) -> Result<SectionMetric<T, P, M>> {
        if self.sections.is_empty() {
            return Err(MetricError::empty("remove_first_section"));
        }
        Ok(self.sections.remove(0))
    }

    /// Removes and returns the last section.
    pub fn remove_last_section(&mut self) -> Result<SectionMetric<T, P, M>> {
        self.sections
            .pop()
            .ok_or_else(|| MetricError::empty("remove_last_section"))
    }

    /// Removes and returns every section.
    pub fn remove_all_sections(&mut self) -> Vec<SectionMetric<T, P, M>> {
        tracing::trace!(
            target: targets::GLOBAL,
            count = self.sections.len(),
            "remove_all_sections"
        );
        std::mem::take(&mut self.sections)
    }

    /// Swaps the sections at `a` and `b`.
    pub fn exchange_sections(&mut self, a: usize, b: usize) -> Result<()> {
        let len = self.sections.len();
        Bound::Existing.check_section("exchange_sections", a, len)?;
        Bound::Existing.check_section("exchange_sections", b, len)?;
        self.sections.swap(a, b);
        Ok(())
    }

    /// Moves the section at `from` to `to`, shifting the sections in between.
    pub fn move_section(&mut self, from: usize, to: usize) -> Result<()> {
        let len = self.sections.len();
        Bound::Existing.check_section("move_section", from, len)?;
        Bound::Existing.check_section("move_section", to, len)?;
        if from != to {
            let section = self.sections.remove(from);
            self.sections.insert(to, section);
            tracing::trace!(target: targets::GLOBAL, from, to, "move_section");
        }
        Ok(())
    }

    // =========================================================================
    // Item mutations
    // =========================================================================

    /// Appends `item` to the last section.
    ///
    /// Fails if there are no sections.
    pub fn append(&mut self, item: T) -> Result<()> {
        match self.sections.last_mut() {
            Some(section) => {
                section.push(item);
                Ok(())
            }
            None => Err(MetricError::section("append", 0, 0, Bound::Existing)),
        }
    }

    /// Appends `item` to `section`.
    pub fn append_to(&mut self, section: usize, item: T) -> Result<()> {
        self.section_at_mut("append_to", section)?.push(item);
        Ok(())
    }

    /// Appends every item of `items` to `section`.
    pub fn append_all_to<I>(&mut self, section: usize, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.section_at_mut("append_all_to", section)?.extend(items);
        Ok(())
    }

    /// Inserts `item` at `path`. `path.item` may equal the section's length.
    pub fn insert(&mut self, path: IndexPath, item: T) -> Result<()> {
        self.section_at_mut("insert", path.section)?.insert(path.item, item)
    }

    /// Inserts `items` starting at `path`.
    pub fn insert_all<I>(&mut self, path: IndexPath, items: I) -> Result<()>
    where
        I: IntoIterator<Item = T>,
    {
        self.section_at_mut("insert_all", path.section)?
            .insert_all(path.item, items)
    }

    /// Replaces the item at `path`, returning the previous one.
    pub fn replace(&mut self, path: IndexPath, item: T) -> Result<T> {
        self.section_at_mut("replace", path.section)?
            .replace(path.item, item)
    }

    /// Removes and returns the item at `path`.
    pub fn remove(&mut self, path: IndexPath) -> Result<T> {
        let section = self.section_at_mut("remove", path.section)?;
        Bound::Existing.check_item("remove", path.item, section.len())?;
        tracing::trace!(target: targets::GLOBAL, %path, "remove");
        Ok(section.take_slot(path.item).0)
    }

    /// Swaps the items at `a` and `b`, which may be in different sections.
    ///
    /// Cached measurements follow the configured [`ReorderPolicy`].
    pub fn exchange(&mut self, a: IndexPath, b: IndexPath) -> Result<()> {
        let policy = self.config.reorder_policy;
        if a.section == b.section {
            return self
                .section_at_mut("exchange", a.section)?
                .exchange_with(a.item, b.item, policy);
        }

        let len = self.sections.len();
        Bound::Existing.check_section("exchange", a.section, len)?;
        Bound::Existing.check_section("exchange", b.section, len)?;
        let (first, second) = self.pair_mut(a.section, b.section);
        Bound::Existing.check_item("exchange", a.item, first.len())?;
        Bound::Existing.check_item("exchange", b.item, second.len())?;

        std::mem::swap(&mut first.items[a.item], &mut second.items[b.item]);
        match policy {
            ReorderPolicy::Transport => {
                std::mem::swap(&mut first.cell_cache[a.item], &mut second.cell_cache[b.item]);
            }
            ReorderPolicy::Invalidate => {
                first.cell_cache[a.item] = None;
                second.cell_cache[b.item] = None;
            }
        }
        tracing::trace!(target: targets::GLOBAL, %a, %b, ?policy, "exchange across sections");
        Ok(())
    }

    /// Moves the item at `from` to `to`, which may be in another section.
    ///
    /// Within one section `to.item` must name an existing position. Across
    /// sections `to.item` may equal the destination's length, appending the
    /// item there. The destination is validated before anything is removed.
    pub fn move_item(&mut self, from: IndexPath, to: IndexPath) -> Result<()> {
        let policy = self.config.reorder_policy;
        if from.section == to.section {
            return self
                .section_at_mut("move_item", from.section)?
                .move_item_with(from.item, to.item, policy);
        }

        let len = self.sections.len();
        Bound::Existing.check_section("move_item", from.section, len)?;
        Bound::Existing.check_section("move_item", to.section, len)?;
        let (source, destination) = self.pair_mut(from.section, to.section);
        Bound::Existing.check_item("move_item", from.item, source.len())?;
        Bound::Insertion.check_item("move_item", to.item, destination.len())?;

        let (item, cached) = source.take_slot(from.item);
        let cached = match policy {
            ReorderPolicy::Transport => cached,
            ReorderPolicy::Invalidate => None,
        };
        destination.insert_slot(to.item, item, cached);
        tracing::trace!(target: targets::GLOBAL, %from, %to, ?policy, "move across sections");
        Ok(())
    }

    // =========================================================================
    // Measurement cache
    // =========================================================================

    /// Stores a measurement for the item at `path`.
    pub fn cache_measurement(&mut self, path: IndexPath, value: M) -> Result<()> {
        self.section_at_mut("cache_measurement", path.section)?
            .cache_measurement(path.item, value)
    }

    /// Returns the cached measurement for the item at `path`, if any.
    pub fn cached_measurement(&self, path: IndexPath) -> Result<Option<&M>> {
        self.section_at("cached_measurement", path.section)?
            .cached_measurement(path.item)
    }

    /// Clears the measurement for the item at `path`.
    pub fn invalidate_measurement(&mut self, path: IndexPath) -> Result<()> {
        self.section_at_mut("invalidate_measurement", path.section)?
            .invalidate_measurement(path.item)
    }

    /// Returns the cached measurement at `path`, computing and storing it
    /// with `measure` on a miss.
    ///
    /// `measure` receives the item so glue code can bind it into an
    /// offscreen cell before measuring.
    ///
    /// # Example
    ///
    /// ```
    /// use section_coordinator::{GlobalMetric, IndexPath};
    ///
    /// let mut metric: GlobalMetric<&str> = GlobalMetric::from_items(vec![vec!["one", "three"]]);
    /// let path = IndexPath::new(0, 1);
    ///
    /// let height = *metric
    ///     .measurement_or_insert_with(path, |text| text.len() as f64 * 10.0)
    ///     .unwrap();
    /// assert_eq!(height, 50.0);
    ///
    /// // Served from the cache this time.
    /// let height = *metric.measurement_or_insert_with(path, |_| unreachable!()).unwrap();
    /// assert_eq!(height, 50.0);
    /// ```
    pub fn measurement_or_insert_with<F>(&mut self, path: IndexPath, measure: F) -> Result<&M>
    where
        F: FnOnce(&T) -> M,
    {
        let operation = "measurement_or_insert_with";
        let section = self.section_at_mut(operation, path.section)?;
        Bound::Existing.check_item(operation, path.item, section.len())?;
        let item = &section.items[path.item];
        let slot = &mut section.cell_cache[path.item];
        if slot.is_none() {
            tracing::trace!(target: targets::GLOBAL, %path, "measurement cache miss");
        }
        Ok(slot.get_or_insert_with(|| measure(item)))
    }

    /// Stores the header measurement of `section`.
    pub fn cache_header_measurement(&mut self, section: usize, value: M) -> Result<()> {
        self.section_at_mut("cache_header_measurement", section)?
            .cache_header_measurement(value)
    }

    /// Returns the cached header measurement of `section`, if any.
    pub fn header_measurement(&self, section: usize) -> Result<Option<&M>> {
        self.section_at("header_measurement", section)?
            .header_measurement()
    }

    /// Clears the header measurement of `section`.
    pub fn invalidate_header_measurement(&mut self, section: usize) -> Result<()> {
        self.section_at_mut("invalidate_header_measurement", section)?
            .invalidate_header_measurement()
    }

    /// Stores the footer measurement of `section`.
    pub fn cache_footer_measurement(&mut self, section: usize, value: M) -> Result<()> {
        self.section_at_mut("cache_footer_measurement", section)?
            .cache_footer_measurement(value)
    }

    /// Returns the cached footer measurement of `section`, if any.
    pub fn footer_measurement(&self, section: usize) -> Result<Option<&M>> {
        self.section_at("footer_measurement", section)?
            .footer_measurement()
    }

    /// Clears the footer measurement of `section`.
    pub fn invalidate_footer_measurement(&mut self, section: usize) -> Result<()> {
        self.section_at_mut("invalidate_footer_measurement", section)?
            .invalidate_footer_measurement()
    }

    /// Clears every cached measurement in every section.
    ///
    /// Call this when something global changes cell sizes, such as the
    /// widget width or the preferred text size.
    pub fn invalidate_all_measurements(&mut self) {
        self.sections
            .iter_mut()
            .for_each(SectionMetric::invalidate_all_measurements);
        tracing::trace!(target: targets::GLOBAL, "invalidate_all_measurements");
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn section_at(
        &self,
        operation: &'static str,
        section: usize,
    ) -> Result<&SectionMetric<T, P, M>> {
        Bound::Existing.check_section(operation, section, self.sections.len())?;
        Ok(&self.sections[section])
    }

    fn section_at_mut(
        &mut self,
        operation: &'static str,
        section: usize,
    ) -> Result<&mut SectionMetric<T, P, M>> {
        Bound::Existing.check_section(operation, section, self.sections.len())?;
        Ok(&mut self.sections[section])
    }

    /// Borrows two distinct, in-range sections mutably, in argument order.
    fn pair_mut(
        &mut self,
        a: usize,
        b: usize,
    ) -> (&mut SectionMetric<T, P, M>, &mut SectionMetric<T, P, M>) {
        debug_assert_ne!(a, b, "pair_mut needs two distinct sections");
        if a < b {
            let (head, tail) = self.sections.split_at_mut(b);
            (&mut head[a], &mut tail[0])
        } else {
            let (head, tail) = self.sections.split_at_mut(a);
            (&mut tail[0], &mut head[b])
        }
    }
}

impl<T, P, M> From<Vec<SectionMetric<T, P, M>>> for GlobalMetric<T, P, M> {
    fn from(sections: Vec<SectionMetric<T, P, M>>) -> Self {
        Self::new(sections)
    }
}

impl<T, P, M> FromIterator<SectionMetric<T, P, M>> for GlobalMetric<T, P, M> {
    fn from_iter<I: IntoIterator<Item = SectionMetric<T, P, M>>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_sections() -> GlobalMetric<char> {
        GlobalMetric::from_items(vec![vec!['a', 'b'], vec!['c', 'd']])
    }

    fn path(section: usize, item: usize) -> IndexPath {
        IndexPath::new(section, item)
    }

    #[test]
    fn test_counts_and_reads() {
        let metric = two_sections();
        assert_eq!(metric.section_count(), 2);
        assert_eq!(metric.total_item_count(), 4);
        assert_eq!(metric.item_count(1), Some(2));
        assert_eq!(metric.item_count(2), None);
        assert_eq!(metric.items_in(0), Some(&['a', 'b'][..]));
        assert_eq!(metric.item(path(1, 1)), Some(&'d'));
        assert_eq!(metric.item(path(1, 2)), None);
        assert_eq!(metric.item(path(9, 0)), None);
    }

    #[test]
    fn test_index_path_of() {
        let metric: GlobalMetric<char> = GlobalMetric::from_items(vec![vec!['a', 'b'], vec!['c']]);
        assert_eq!(metric.index_path_of(&'c'), Some(path(1, 0)));
        assert_eq!(metric.index_path_of(&'z'), None);
        assert!(metric.contains(&'a'));
    }

    #[test]
    fn test_index_path_of_returns_first_match() {
        let metric: GlobalMetric<i32> =
            GlobalMetric::from_items(vec![vec![1], vec![2, 7], vec![7]]);
        assert_eq!(metric.index_path_of(&7), Some(path(1, 1)));
    }

    #[test]
    fn test_iteration_order() {
        let metric = two_sections();
        let paths: Vec<IndexPath> = metric.index_paths().collect();
        assert_eq!(paths, vec![path(0, 0), path(0, 1), path(1, 0), path(1, 1)]);
        let items: Vec<char> = metric.iter().map(|(_, item)| *item).collect();
        assert_eq!(items, vec!['a', 'b', 'c', 'd']);
    }

    #[test]
    fn test_section_mutations() {
        let mut metric = two_sections();
        metric
            .insert_section(1, SectionMetric::new(vec!['x']))
            .unwrap();
        assert_eq!(metric.items_in(1), Some(&['x'][..]));
        metric
            .insert_section(3, SectionMetric::new(vec!['y']))
            .unwrap();
        assert_eq!(metric.section_count(), 4);

        let err = metric.insert_section(6, SectionMetric::empty()).unwrap_err();
        assert!(err.is_section_error());
        assert_eq!(err.valid_range(), Some(0..5));

        assert_eq!(metric.remove_first_section().unwrap().into_items(), vec!['a', 'b']);
        assert_eq!(metric.remove_last_section().unwrap().into_items(), vec!['y']);
        assert!(metric.remove_section(2).is_err());
        assert_eq!(metric.remove_section(0).unwrap().into_items(), vec!['x']);

        let old = metric
            .replace_section(0, SectionMetric::new(vec!['q']))
            .unwrap();
        assert_eq!(old.into_items(), vec!['c', 'd']);

        assert_eq!(metric.remove_all_sections().len(), 1);
        assert!(metric.is_empty());
        assert!(metric.remove_first_section().is_err());
        assert!(metric.remove_last_section().is_err());
    }

    #[test]
    fn test_move_and_exchange_sections() {
        let mut metric: GlobalMetric<i32> =
            GlobalMetric::from_items(vec![vec![0], vec![1], vec![2]]);
        metric.move_section(0, 2).unwrap();
        assert_eq!(metric.item(path(2, 0)), Some(&0));
        metric.exchange_sections(0, 2).unwrap();
        assert_eq!(metric.item(path(0, 0)), Some(&0));
        assert_eq!(metric.item(path(2, 0)), Some(&1));
        assert!(metric.move_section(0, 3).is_err());
        assert!(metric.exchange_sections(3, 0).is_err());
    }

    #[test]
    fn test_append_defaults_to_last_section() {
        let mut metric = two_sections();
        metric.append('e').unwrap();
        assert_eq!(metric.items_in(1), Some(&['c', 'd', 'e'][..]));
        metric.append_to(0, 'z').unwrap();
        metric.append_all_to(0, ['y', 'x']).unwrap();
        assert_eq!(metric.items_in(0), Some(&['a', 'b', 'z', 'y', 'x'][..]));
        assert!(metric.append_to(2, 'q').is_err());

        let mut empty: GlobalMetric<char> = GlobalMetric::empty();
        let err = empty.append('a').unwrap_err();
        assert_eq!(err.operation(), "append");
    }

    #[test]
    fn test_item_mutations_check_section() {
        let mut metric = two_sections();
        let err = metric.insert(path(2, 0), 'x').unwrap_err();
        assert!(err.is_section_error());
        assert_eq!(err.operation(), "insert");

        metric.insert(path(0, 2), 'x').unwrap();
        metric.insert_all(path(1, 0), ['p', 'q']).unwrap();
        assert_eq!(metric.items_in(0), Some(&['a', 'b', 'x'][..]));
        assert_eq!(metric.items_in(1), Some(&['p', 'q', 'c', 'd'][..]));

        assert_eq!(metric.replace(path(1, 0), 'P').unwrap(), 'p');
        assert!(metric.replace(path(1, 4), 'P').is_err());
    }

    #[test]
    fn test_remove_is_strict() {
        let mut metric = two_sections();
        assert_eq!(metric.remove(path(0, 1)).unwrap(), 'b');
        let err = metric.remove(path(0, 1)).unwrap_err();
        assert!(!err.is_section_error());
        assert_eq!(err.offending_index(), Some(1));
        assert!(metric.remove(path(5, 0)).unwrap_err().is_section_error());
    }

    #[test]
    fn test_cross_section_move() {
        let mut metric = two_sections();
        metric.cache_measurement(path(0, 1), 42.0).unwrap();
        metric.move_item(path(0, 1), path(1, 0)).unwrap();
        assert_eq!(metric.items_in(0), Some(&['a'][..]));
        assert_eq!(metric.items_in(1), Some(&['b', 'c', 'd'][..]));
        assert_eq!(metric.cached_measurement(path(1, 0)).unwrap(), Some(&42.0));
    }

    #[test]
    fn test_cross_section_move_to_end() {
        let mut metric = two_sections();
        metric.move_item(path(1, 0), path(0, 2)).unwrap();
        assert_eq!(metric.items_in(0), Some(&['a', 'b', 'c'][..]));
        assert_eq!(metric.items_in(1), Some(&['d'][..]));
    }

    #[test]
    fn test_failed_move_leaves_model_unchanged() {
        let mut metric = two_sections();
        let before = metric.clone();
        assert!(metric.move_item(path(0, 0), path(1, 3)).is_err());
        assert!(metric.move_item(path(0, 2), path(1, 0)).is_err());
        assert!(metric.move_item(path(0, 0), path(4, 0)).is_err());
        assert!(metric.move_item(path(0, 0), path(0, 2)).is_err());
        assert_eq!(metric, before);
    }

    #[test]
    fn test_same_section_move_delegates() {
        let mut metric: GlobalMetric<char> =
            GlobalMetric::from_items(vec![vec!['a', 'b', 'c', 'd']]);
        metric.move_item(path(0, 0), path(0, 2)).unwrap();
        assert_eq!(metric.items_in(0), Some(&['b', 'c', 'a', 'd'][..]));
    }

    #[test]
    fn test_cross_section_exchange_transports_cache() {
        let mut metric = two_sections();
        metric.cache_measurement(path(0, 0), 1.0).unwrap();
        metric.cache_measurement(path(1, 1), 2.0).unwrap();
        metric.exchange(path(0, 0), path(1, 1)).unwrap();
        assert_eq!(metric.items_in(0), Some(&['d', 'b'][..]));
        assert_eq!(metric.items_in(1), Some(&['c', 'a'][..]));
        assert_eq!(metric.cached_measurement(path(0, 0)).unwrap(), Some(&2.0));
        assert_eq!(metric.cached_measurement(path(1, 1)).unwrap(), Some(&1.0));

        // Reverse argument order exercises the other branch of pair_mut.
        metric.exchange(path(1, 1), path(0, 0)).unwrap();
        assert_eq!(metric, {
            let mut fresh = two_sections();
            fresh.cache_measurement(path(0, 0), 1.0).unwrap();
            fresh.cache_measurement(path(1, 1), 2.0).unwrap();
            fresh
        });
    }

    #[test]
    fn test_exchange_within_section() {
        let mut metric: GlobalMetric<char> =
            GlobalMetric::from_items(vec![vec!['a', 'b', 'c', 'd']]);
        metric.exchange(path(0, 0), path(0, 2)).unwrap();
        assert_eq!(metric.items_in(0), Some(&['c', 'b', 'a', 'd'][..]));
        assert!(metric.exchange(path(0, 0), path(0, 4)).is_err());
        assert!(metric.exchange(path(0, 0), path(1, 0)).is_err());
    }

    #[test]
    fn test_invalidate_policy_applies_to_reorders() {
        let config = MetricConfig::new().with_reorder_policy(ReorderPolicy::Invalidate);
        let mut metric: GlobalMetric<char> = GlobalMetric::with_config(
            vec![
                SectionMetric::new(vec!['a', 'b']),
                SectionMetric::new(vec!['c']),
            ],
            config,
        );
        metric.cache_measurement(path(0, 0), 1.0).unwrap();
        metric.cache_measurement(path(0, 1), 2.0).unwrap();
        metric.cache_measurement(path(1, 0), 3.0).unwrap();

        metric.exchange(path(0, 0), path(1, 0)).unwrap();
        assert_eq!(metric.cached_measurement(path(0, 0)).unwrap(), None);
        assert_eq!(metric.cached_measurement(path(1, 0)).unwrap(), None);

        metric.move_item(path(0, 1), path(1, 0)).unwrap();
        assert_eq!(metric.cached_measurement(path(1, 0)).unwrap(), None);

        metric.cache_measurement(path(1, 0), 5.0).unwrap();
        metric.move_item(path(1, 0), path(1, 1)).unwrap();
        assert_eq!(metric.cached_measurement(path(1, 1)).unwrap(), None);
    }

    #[test]
    fn test_cache_passthroughs_check_section() {
        let mut metric = two_sections();
        let err = metric.cache_measurement(path(2, 0), 1.0).unwrap_err();
        assert!(err.is_section_error());
        assert_eq!(err.operation(), "cache_measurement");
        assert!(metric.cached_measurement(path(2, 0)).is_err());
        assert!(metric.invalidate_measurement(path(2, 0)).is_err());
        assert!(metric.cached_measurement(path(0, 2)).is_err());
        assert!(metric.header_measurement(2).is_err());
        assert!(metric.cache_footer_measurement(9, 1.0).is_err());

        metric.invalidate_measurement(path(0, 0)).unwrap();
        metric.invalidate_measurement(path(0, 0)).unwrap();
    }

    #[test]
    fn test_header_footer_measurements() {
        let mut metric: GlobalMetric<char> = GlobalMetric::new(vec![
            SectionMetric::new(vec!['a']).with_header_title("A"),
            SectionMetric::new(vec!['b']),
        ]);
        metric.cache_header_measurement(0, 28.0).unwrap();
        assert_eq!(metric.header_measurement(0).unwrap(), Some(&28.0));
        assert!(metric.cache_header_measurement(1, 28.0).is_err());
        metric.invalidate_header_measurement(0).unwrap();
        assert_eq!(metric.header_measurement(0).unwrap(), None);
        assert!(metric.footer_measurement(0).is_err());
        assert!(metric.invalidate_footer_measurement(1).is_err());
    }

    #[test]
    fn test_measurement_or_insert_with() {
        let mut metric = two_sections();
        let mut calls = 0;
        let value = *metric
            .measurement_or_insert_with(path(1, 0), |_| {
                calls += 1;
                17.0
            })
            .unwrap();
        assert_eq!(value, 17.0);
        let value = *metric
            .measurement_or_insert_with(path(1, 0), |_| {
                calls += 1;
                99.0
            })
            .unwrap();
        assert_eq!(value, 17.0);
        assert_eq!(calls, 1);
        assert!(metric.measurement_or_insert_with(path(1, 2), |_| 0.0).is_err());

        metric.invalidate_all_measurements();
        assert_eq!(metric.cached_measurement(path(1, 0)).unwrap(), None);
    }

    #[test]
    fn test_decoration_reads() {
        let metric: GlobalMetric<char, &str> = GlobalMetric::new(vec![
            SectionMetric::new(vec!['a'])
                .with_header_title("First")
                .with_header_payload("banner-a")
                .with_index_title("A"),
            SectionMetric::new(vec!['b']).with_footer_title("Second footer"),
            SectionMetric::new(vec!['c'])
                .with_header_payload("banner-c")
                .with_footer_payload("foot-c")
                .with_index_title("C")
                .with_supplementary_headers(vec!["s0", "s1"]),
        ]);

        assert_eq!(metric.header_title(0), Some("First"));
        assert_eq!(metric.header_title(1), None);
        assert_eq!(metric.header_title(7), None);
        assert_eq!(metric.footer_title(1), Some("Second footer"));
        assert_eq!(metric.header_payload(2), Some(&"banner-c"));
        assert_eq!(metric.footer_payload(2), Some(&"foot-c"));
        assert_eq!(metric.footer_payload(9), None);
        assert_eq!(metric.supplementary_header(path(2, 1)), Some(&"s1"));
        assert_eq!(metric.supplementary_header(path(2, 2)), None);
        assert_eq!(metric.supplementary_footer(path(2, 0)), None);
        assert_eq!(metric.supplementary_header(path(5, 0)), None);
        assert_eq!(metric.index_titles(), vec!["A", "C"]);
    }

    #[test]
    fn test_payload_positions() {
        let metric: GlobalMetric<char, &str> = GlobalMetric::new(vec![
            SectionMetric::new(vec![]).with_header_payload("h0"),
            SectionMetric::new(vec![]).with_footer_payload("f1"),
            SectionMetric::new(vec![])
                .with_header_payload("h2")
                .with_footer_payload("f2"),
        ]);

        assert_eq!(metric.header_payload_position(&"h2"), Some(1));
        assert_eq!(metric.section_of_header_payload(&"h2"), Some(2));
        assert_eq!(metric.footer_payload_position(&"f2"), Some(1));
        assert_eq!(metric.section_of_footer_payload(&"f1"), Some(1));
        assert_eq!(metric.header_payload_position(&"nope"), None);
        assert_eq!(metric.section_of_footer_payload(&"nope"), None);
    }

    #[test]
    fn test_modify_invalidates_measurement() {
        let mut metric: GlobalMetric<String> = GlobalMetric::from_items(vec![
            vec!["a".to_string()],
            vec!["short".to_string(), "b".to_string()],
        ]);
        metric.cache_measurement(path(1, 0), 20.0).unwrap();
        metric.cache_measurement(path(1, 1), 30.0).unwrap();

        let len = metric.modify(path(1, 0), |text| {
            text.push_str(" but longer");
            text.len()
        });
        assert_eq!(len, Some(16));
        assert_eq!(
            metric.item(path(1, 0)).map(String::as_str),
            Some("short but longer")
        );
        assert_eq!(metric.cached_measurement(path(1, 0)).unwrap(), None);
        assert_eq!(metric.cached_measurement(path(1, 1)).unwrap(), Some(&30.0));

        assert_eq!(metric.modify(path(1, 2), |_| ()), None);
        assert_eq!(metric.modify(path(5, 0), |_| ()), None);
    }

    #[test]
    fn test_section_mut_edits_in_place() {
        let mut metric = two_sections();
        if let Some(section) = metric.section_mut(0) {
            section.set_header_title(Some("Edited".into()));
            section.push('z');
        }
        assert_eq!(metric.header_title(0), Some("Edited"));
        assert_eq!(metric.item_count(0), Some(3));
        assert!(metric.section_mut(3).is_none());
    }
}
