//! Sectioned data models for list and grid widgets.
//!
//! This crate holds the data side of a list/grid coordinator: the items of
//! every section in display order, the optional decorations of each section,
//! and a cache of measured cell, header and footer sizes aligned with the
//! items. Widget glue answers "how many sections / rows", "what goes in this
//! cell" and "how tall is this row" from it, and applies user edits to it
//! before animating the same change on screen.
//!
//! - [`SectionMetric`]: one section's items, titles, payloads and caches.
//! - [`GlobalMetric`]: the ordered sections, addressed by [`IndexPath`],
//!   including cross-section moves and exchanges.
//! - [`SharedMetric`]: a thread-safe handle for swapping whole models built
//!   off the UI thread.
//! - [`MetricConfig`] / [`ReorderPolicy`]: whether cached measurements follow
//!   items when they are repositioned.
//!
//! The crate does not know about pixels, views or widget identifiers, and it
//! never calls out: it is queried and mutated, nothing else.
//!
//! # Example
//!
//! ```
//! use section_coordinator::{GlobalMetric, IndexPath, SectionMetric};
//!
//! let mut metric: GlobalMetric<&str> = GlobalMetric::new(vec![
//!     SectionMetric::new(vec!["Inbox", "Drafts"]).with_header_title("Mail"),
//!     SectionMetric::new(vec!["Trash"]).with_index_title("T"),
//! ]);
//!
//! // Data-source callbacks.
//! assert_eq!(metric.section_count(), 2);
//! assert_eq!(metric.item_count(0), Some(2));
//! assert_eq!(metric.header_title(0), Some("Mail"));
//!
//! // Measure on first display, then serve from the cache.
//! let row = IndexPath::new(0, 1);
//! metric.measurement_or_insert_with(row, |_| 44.0).unwrap();
//! assert_eq!(metric.cached_measurement(row).unwrap(), Some(&44.0));
//!
//! // A swipe-to-delete edit.
//! assert_eq!(metric.remove(IndexPath::new(0, 0)).unwrap(), "Inbox");
//! assert_eq!(metric.cached_measurement(IndexPath::new(0, 0)).unwrap(), Some(&44.0));
//!
//! // Out-of-range reads are just absent; out-of-range writes are errors.
//! assert_eq!(metric.item(IndexPath::new(5, 0)), None);
//! assert!(metric.insert(IndexPath::new(1, 3), "Spam").is_err());
//! ```
//!
//! # Errors
//!
//! Reads return `Option`. Writes and cache accessors return
//! [`Result`]`<_, `[`MetricError`]`>`. A rejected call leaves the model as
//! it was.
//!
//! # Logging
//!
//! Edits are instrumented with `tracing`; see [`logging::targets`].

mod error;
mod global;
mod index;
pub mod logging;
mod measurement;
mod section;
mod shared;

pub use error::{Decoration, MetricError, Result};
pub use global::GlobalMetric;
pub use index::{Bound, IndexPath};
pub use measurement::{MetricConfig, ReorderPolicy, Size};
pub use section::SectionMetric;
pub use shared::SharedMetric;
