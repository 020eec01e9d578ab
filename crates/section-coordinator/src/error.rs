//! Error types for section and item mutations.

use std::fmt;
use std::ops::Range;

use crate::index::Bound;

/// Result type alias for strict metric operations.
pub type Result<T> = std::result::Result<T, MetricError>;

/// Which decoration of a section an operation addressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Decoration {
    /// The section header.
    Header,
    /// The section footer.
    Footer,
}

impl fmt::Display for Decoration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Header => f.write_str("header"),
            Self::Footer => f.write_str("footer"),
        }
    }
}

fn describe_range(bound: &Bound, len: &usize) -> String {
    bound.describe(*len)
}

/// Errors returned by strict (mutating or cache) operations.
///
/// Every variant names the operation that rejected the call so the caller
/// can tell which piece of glue computed a bad index.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MetricError {
    /// An item index was outside the accepted range.
    #[error("{operation}: index {index} out of bounds, valid range {}", describe_range(.bound, .len))]
    IndexOutOfBounds {
        operation: &'static str,
        index: usize,
        len: usize,
        bound: Bound,
    },

    /// A section index was outside the accepted range.
    #[error("{operation}: section {section} out of bounds, valid range {}", describe_range(.bound, .len))]
    SectionOutOfBounds {
        operation: &'static str,
        section: usize,
        len: usize,
        bound: Bound,
    },

    /// The sequence was empty.
    #[error("{operation}: sequence is empty")]
    Empty { operation: &'static str },

    /// A restored section had a different number of cache slots than items.
    #[error("{operation}: {slots} cache slots for {items} items")]
    MisalignedCache {
        operation: &'static str,
        items: usize,
        slots: usize,
    },

    /// The section has no header or footer to attach a measurement to.
    #[error("{operation}: section has no {decoration}")]
    MissingDecoration {
        operation: &'static str,
        decoration: Decoration,
    },
}

impl MetricError {
    /// Create an item index error.
    pub fn index(operation: &'static str, index: usize, len: usize, bound: Bound) -> Self {
        Self::IndexOutOfBounds {
            operation,
            index,
            len,
            bound,
        }
    }

    /// Create a section index error.
    pub fn section(operation: &'static str, section: usize, len: usize, bound: Bound) -> Self {
        Self::SectionOutOfBounds {
            operation,
            section,
            len,
            bound,
        }
    }

    /// Create an empty-sequence error.
    pub fn empty(operation: &'static str) -> Self {
        Self::Empty { operation }
    }

    /// Create a misaligned-cache error.
    pub fn misaligned(operation: &'static str, items: usize, slots: usize) -> Self {
        Self::MisalignedCache {
            operation,
            items,
            slots,
        }
    }

    /// Create a missing-decoration error.
    pub fn missing(operation: &'static str, decoration: Decoration) -> Self {
        Self::MissingDecoration {
            operation,
            decoration,
        }
    }

    /// Returns the name of the operation that failed.
    pub fn operation(&self) -> &'static str {
        match self {
            Self::IndexOutOfBounds { operation, .. }
            | Self::SectionOutOfBounds { operation, .. }
            | Self::Empty { operation }
            | Self::MisalignedCache { operation, .. }
            | Self::MissingDecoration { operation, .. } => *operation,
        }
    }

    /// Returns the offending item or section index, if any.
    pub fn offending_index(&self) -> Option<usize> {
        match self {
            Self::IndexOutOfBounds { index, .. } => Some(*index),
            Self::SectionOutOfBounds { section, .. } => Some(*section),
            _ => None,
        }
    }

    /// Returns the range of indices the operation would have accepted.
    pub fn valid_range(&self) -> Option<Range<usize>> {
        match self {
            Self::IndexOutOfBounds { len, bound, .. }
            | Self::SectionOutOfBounds { len, bound, .. } => Some(bound.range(*len)),
            _ => None,
        }
    }

    /// Returns `true` if this error came from a section index check.
    pub fn is_section_error(&self) -> bool {
        matches!(self, Self::SectionOutOfBounds { .. })
    }
}
