//! Query invalidation.
//!
//! Attaching, detaching or moving a view can change what a live query
//! matches, or the order of its results. The container operations report
//! every query matched inside the affected view to a [`QueryInvalidator`].
//! Re-evaluation itself happens later, in a separate pass.
//!
//! # Key Types
//!
//! - [`QueryInvalidator`] - Receives "mark dirty" signals
//! - [`DirtyQueries`] - An idempotent collector of dirty queries
//!
//! Any `FnMut(QueryId, ViewId)` closure is also a [`QueryInvalidator`]:
//!
//! ```
//! use horizon_lattice_views::{QueryId, QueryInvalidator, ViewId};
//!
//! let mut seen = Vec::new();
//! let mut record = |query: QueryId, _view: ViewId| seen.push(query);
//! record.dirty_query(QueryId(3), ViewId::default());
//! assert_eq!(seen, vec![QueryId(3)]);
//! ```

use std::collections::{BTreeMap, BTreeSet};

use crate::logging::targets;
use crate::view::{QueryId, ViewId};

/// Marks queries for re-evaluation.
pub trait QueryInvalidator {
    /// Mark `query` dirty because `view` changed attachment.
    ///
    /// Must tolerate being called several times for the same query before
    /// the next evaluation pass.
    fn dirty_query(&mut self, query: QueryId, view: ViewId);
}

impl<F> QueryInvalidator for F
where
    F: FnMut(QueryId, ViewId),
{
    fn dirty_query(&mut self, query: QueryId, view: ViewId) {
        self(query, view)
    }
}

/// Collects dirty queries until the next evaluation pass.
///
/// Marking the same query more than once is harmless; the query is
/// re-evaluated once, scoped to every view that reported it.
#[derive(Debug, Default, Clone)]
pub struct DirtyQueries {
    dirty: BTreeMap<QueryId, BTreeSet<ViewId>>,
    signals: u64,
}

impl DirtyQueries {
    /// Create an empty collector.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether `query` is waiting for re-evaluation.
    pub fn is_dirty(&self, query: QueryId) -> bool {
        self.dirty.contains_key(&query)
    }

    /// Whether nothing is waiting for re-evaluation.
    pub fn is_empty(&self) -> bool {
        self.dirty.is_empty()
    }

    /// The dirty queries in ascending order.
    pub fn queries(&self) -> impl Iterator<Item = QueryId> + '_ {
        self.dirty.keys().copied()
    }

    /// The views that reported `query` dirty.
    pub fn views_for(&self, query: QueryId) -> impl Iterator<Item = ViewId> + '_ {
        self.dirty.get(&query).into_iter().flatten().copied()
    }

    /// Total number of dirty signals received, including repeats.
    pub fn signal_count(&self) -> u64 {
        self.signals
    }

    /// Drain the dirty set for an evaluation pass.
    pub fn take_dirty(&mut self) -> BTreeMap<QueryId, BTreeSet<ViewId>> {
        std::mem::take(&mut self.dirty)
    }
}

impl QueryInvalidator for DirtyQueries {
    fn dirty_query(&mut self, query: QueryId, view: ViewId) {
        self.signals += 1;
        let newly_dirty = self.dirty.entry(query).or_default().insert(view);
        tracing::trace!(target: targets::QUERY, %query, ?view, newly_dirty, "marked query dirty");
    }
}
