//! Two-level addressing for sectioned data.
//!
//! An [`IndexPath`] locates one item inside a [`GlobalMetric`](crate::GlobalMetric)
//! by section and by position within that section. List and grid widgets hand
//! these out in every data-source callback.

use std::fmt;
use std::ops::Range;

use crate::error::{MetricError, Result};

/// A `(section, item)` position.
///
/// Paths order section-major, which matches display order.
///
/// # Index Validity
///
/// Like any positional index, a path is only meaningful against the model it
/// was computed for. After an insert, remove or move, paths at or behind the
/// edited position refer to different items.
///
/// # Example
///
/// ```
/// use section_coordinator::IndexPath;
///
/// let path = IndexPath::new(1, 3);
/// assert_eq!(path.section, 1);
/// assert_eq!(path.item, 3);
/// assert!(IndexPath::new(0, 9) < path);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IndexPath {
    /// The section index.
    pub section: usize,
    /// The item index within the section.
    pub item: usize,
}

impl IndexPath {
    /// Creates a new path.
    #[inline]
    pub const fn new(section: usize, item: usize) -> Self {
        Self { section, item }
    }

    /// Returns the path of the same item position in another section.
    #[inline]
    pub const fn with_section(self, section: usize) -> Self {
        Self { section, ..self }
    }

    /// Returns the path of another item in the same section.
    #[inline]
    pub const fn with_item(self, item: usize) -> Self {
        Self { item, ..self }
    }
}

impl From<(usize, usize)> for IndexPath {
    fn from((section, item): (usize, usize)) -> Self {
        Self::new(section, item)
    }
}

impl From<IndexPath> for (usize, usize) {
    fn from(path: IndexPath) -> Self {
        (path.section, path.item)
    }
}

impl fmt::Display for IndexPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.section, self.item)
    }
}

/// The rule an index argument is checked against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bound {
    /// The index must name an existing element: `0..len`.
    Existing,
    /// The index may also name the end of the sequence: `0..=len`.
    Insertion,
}

impl Bound {
    /// Returns `true` if `index` is acceptable for a sequence of `len` elements.
    #[inline]
    pub fn contains(self, index: usize, len: usize) -> bool {
        match self {
            Self::Existing => index < len,
            Self::Insertion => index <= len,
        }
    }

    /// Returns the accepted half-open range for a sequence of `len` elements.
    pub fn range(self, len: usize) -> Range<usize> {
        match self {
            Self::Existing => 0..len,
            Self::Insertion => 0..len + 1,
        }
    }

    pub(crate) fn describe(self, len: usize) -> String {
        match self {
            Self::Existing => format!("[0, {len})"),
            Self::Insertion => format!("[0, {len}]"),
        }
    }

    /// Checks an item index, building the error for `operation` on failure.
    pub(crate) fn check_item(
        self,
        operation: &'static str,
        index: usize,
        len: usize,
    ) -> Result<()> {
        if self.contains(index, len) {
            Ok(())
        } else {
            let err = MetricError::index(operation, index, len, self);
            tracing::debug!(target: crate::logging::targets::BOUNDS, %err, "rejected item index");
            Err(err)
        }
    }

    /// Checks a section index, building the error for `operation` on failure.
    pub(crate) fn check_section(
        self,
        operation: &'static str,
        section: usize,
        len: usize,
    ) -> Result<()> {
        if self.contains(section, len) {
            Ok(())
        } else {
            let err = MetricError::section(operation, section, len, self);
            tracing::debug!(
                target: crate::logging::targets::BOUNDS,
                %err,
                "rejected section index"
            );
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_ordering() {
        let mut paths = vec![
            IndexPath::new(1, 0),
            IndexPath::new(0, 2),
            IndexPath::new(0, 1),
        ];
        paths.sort();
        assert_eq!(
            paths,
            vec![
                IndexPath::new(0, 1),
                IndexPath::new(0, 2),
                IndexPath::new(1, 0)
            ]
        );
    }

    #[test]
    fn test_path_conversions() {
        let path: IndexPath = (2, 7).into();
        assert_eq!(path, IndexPath::new(2, 7));
        assert_eq!(<(usize, usize)>::from(path), (2, 7));
        assert_eq!(path.to_string(), "[2, 7]");
        assert_eq!(path.with_item(0), IndexPath::new(2, 0));
        assert_eq!(path.with_section(0), IndexPath::new(0, 7));
    }

    #[test]
    fn test_bounds() {
        assert!(Bound::Existing.contains(1, 2));
        assert!(!Bound::Existing.contains(2, 2));
        assert!(Bound::Insertion.contains(2, 2));
        assert!(!Bound::Insertion.contains(3, 2));
        assert!(!Bound::Existing.contains(0, 0));
        assert!(Bound::Insertion.contains(0, 0));
        assert_eq!(Bound::Insertion.range(2), 0..3);
        assert_eq!(Bound::Existing.range(2), 0..2);
    }

    #[test]
    fn test_check_reports_operation() {
        let err = Bound::Insertion.check_item("insert", 5, 2).unwrap_err();
        assert_eq!(err.operation(), "insert");
        assert!(Bound::Insertion.check_item("insert", 2, 2).is_ok());
        assert!(Bound::Existing.check_section("remove_section", 0, 0).is_err());
    }
}
