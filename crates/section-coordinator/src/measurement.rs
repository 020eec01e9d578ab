//! Measurement values and cache policy.
//!
//! The caches in [`SectionMetric`](crate::SectionMetric) store opaque
//! measurements. List widgets usually cache a row height as `f64`; grid
//! widgets cache a [`Size`].

/// A two-dimensional measurement for grid cells and supplementary views.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Size {
    /// Width in logical pixels.
    pub width: f64,
    /// Height in logical pixels.
    pub height: f64,
}

impl Size {
    /// A size with zero width and height.
    pub const ZERO: Self = Self::new(0.0, 0.0);

    /// Creates a new size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns the area covered by this size.
    pub fn area(&self) -> f64 {
        self.width * self.height
    }
}

/// What happens to a cached measurement when its item is repositioned.
///
/// Insertions and replacements always start with an empty slot. This policy
/// only governs moves and exchanges, where the item itself is unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReorderPolicy {
    /// The cached measurement moves with the item.
    ///
    /// Correct when a cell's size depends only on its content.
    #[default]
    Transport,
    /// Repositioned slots are reset and must be measured again.
    ///
    /// Use this when a cell's size depends on its position, for example
    /// first/last rows with different insets.
    Invalidate,
}

/// Configuration for a [`GlobalMetric`](crate::GlobalMetric).
///
/// # Example
///
/// ```
/// use section_coordinator::{MetricConfig, ReorderPolicy};
///
/// let config = MetricConfig::new().with_reorder_policy(ReorderPolicy::Invalidate);
/// assert_eq!(config.reorder_policy, ReorderPolicy::Invalidate);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricConfig {
    /// Cache behaviour for moves and exchanges.
    pub reorder_policy: ReorderPolicy,
}

impl MetricConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the reorder policy.
    pub fn with_reorder_policy(mut self, policy: ReorderPolicy) -> Self {
        self.reorder_policy = policy;
        self
    }
}
