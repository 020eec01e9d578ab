//! A shareable handle for swapping whole models between threads.
//!
//! [`GlobalMetric`] itself has no interior synchronization. When fresh data is
//! prepared off the UI thread, build a new model there and swap it into a
//! [`SharedMetric`]; the UI thread keeps reading consistent snapshots.
//!
//! # Example
//!
//! ```
//! use section_coordinator::{GlobalMetric, IndexPath, SharedMetric};
//!
//! let shared: SharedMetric<u32> = SharedMetric::new(GlobalMetric::from_items(vec![vec![1, 2]]));
//! let before = shared.snapshot();
//!
//! let worker = shared.clone();
//! std::thread::spawn(move || {
//!     worker.replace(GlobalMetric::from_items(vec![vec![10, 20, 30]]));
//! })
//! .join()
//! .unwrap();
//!
//! assert_eq!(before.item_count(0), Some(2));
//! assert_eq!(shared.snapshot().item(IndexPath::new(0, 2)), Some(&30));
//! assert_eq!(shared.generation(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::global::GlobalMetric;
use crate::logging::targets;

struct Slot<T, P, M> {
    metric: Arc<GlobalMetric<T, P, M>>,
    generation: u64,
}

/// A cloneable, thread-safe handle to the current [`GlobalMetric`].
///
/// Readers take cheap [`snapshot`](Self::snapshot)s. Writers either swap in
/// a whole new model with [`replace`](Self::replace) or edit a private copy
/// with [`update`](Self::update); snapshots taken earlier never observe the
/// change.
pub struct SharedMetric<T, P = (), M = f64> {
    slot: Arc<RwLock<Slot<T, P, M>>>,
}

impl<T, P, M> SharedMetric<T, P, M> {
    /// Creates a handle around `metric`.
    pub fn new(metric: GlobalMetric<T, P, M>) -> Self {
        Self {
            slot: Arc::new(RwLock::new(Slot {
                metric: Arc::new(metric),
                generation: 0,
            })),
        }
    }

    /// Returns the current model.
    pub fn snapshot(&self) -> Arc<GlobalMetric<T, P, M>> {
        Arc::clone(&self.slot.read().metric)
    }

    /// Runs `f` against the current model under the read lock.
    pub fn read<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&GlobalMetric<T, P, M>) -> R,
    {
        f(&self.slot.read().metric)
    }

    /// Swaps in `metric`, returning the previous model.
    pub fn replace(&self, metric: GlobalMetric<T, P, M>) -> Arc<GlobalMetric<T, P, M>> {
        let mut slot = self.slot.write();
        slot.generation += 1;
        tracing::debug!(
            target: targets::SHARED,
            generation = slot.generation,
            sections = metric.section_count(),
            "replaced model"
        );
        std::mem::replace(&mut slot.metric, Arc::new(metric))
    }

    /// Returns how many times the model has been replaced or updated.
    pub fn generation(&self) -> u64 {
        self.slot.read().generation
    }

    /// Returns `true` if both handles share the same slot.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.slot, &other.slot)
    }
}

impl<T: Clone, P: Clone, M: Clone> SharedMetric<T, P, M> {
    /// Edits the model in place under the write lock.
    ///
    /// If snapshots of the current model are still alive, the edit is
    /// applied to a copy so those snapshots stay unchanged.
    pub fn update<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&mut GlobalMetric<T, P, M>) -> R,
    {
        let mut slot = self.slot.write();
        slot.generation += 1;
        if Arc::strong_count(&slot.metric) > 1 {
            tracing::trace!(target: targets::SHARED, generation = slot.generation, "copy on write");
        }
        f(Arc::make_mut(&mut slot.metric))
    }
}

impl<T, P, M> Clone for SharedMetric<T, P, M> {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

impl<T, P, M> Default for SharedMetric<T, P, M> {
    fn default() -> Self {
        Self::new(GlobalMetric::empty())
    }
}

impl<T, P, M> From<GlobalMetric<T, P, M>> for SharedMetric<T, P, M> {
    fn from(metric: GlobalMetric<T, P, M>) -> Self {
        Self::new(metric)
    }
}

impl<T, P, M> fmt::Debug for SharedMetric<T, P, M> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.slot.read();
        f.debug_struct("SharedMetric")
            .field("generation", &slot.generation)
            .field("sections", &slot.metric.section_count())
            .finish_non_exhaustive()
    }
}

static_assertions::assert_impl_all!(SharedMetric<String, String, f64>: Send, Sync);
static_assertions::assert_impl_all!(GlobalMetric<String, String, f64>: Send, Sync);
