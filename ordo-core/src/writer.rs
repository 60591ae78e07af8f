//! Order Writer
//!
//! Applies an [`OrderAssignment`] to the external store that owns the
//! persisted order values, touching only units whose value changed.
//!
//! # Batching
//!
//! All writes of one pass go through a single [`BatchGuard`]. The guard
//! calls [`OrderStore::begin_batch`] when opened and
//! [`OrderStore::end_batch`] when dropped, so observers of the store are
//! invalidated once per pass instead of once per unit. When nothing changed
//! no batch is opened.

use std::hash::Hash;

use indexmap::IndexMap;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::model::OrderAssignment;

/// External owner of per-unit order values.
///
/// Methods take `&self` so a store can be shared between the code that
/// triggers resolution and the code that reads orders back.
pub trait OrderStore<U>: Send + Sync {
    /// Currently stored order of `unit`, if it has one.
    fn current_order(&self, unit: &U) -> Option<i64>;

    /// Start a write batch.
    fn begin_batch(&self);

    /// Stage a new order for `unit`.
    fn set_order(&self, unit: &U, order: i64);

    /// Finish the current write batch.
    fn end_batch(&self);
}

/// An open write batch. Dropping the guard ends the batch.
pub struct BatchGuard<'a, U, S: OrderStore<U> + ?Sized> {
    store: &'a S,
    staged: usize,
    _unit: std::marker::PhantomData<fn(&U)>,
}

impl<'a, U, S: OrderStore<U> + ?Sized> BatchGuard<'a, U, S> {
    /// Begin a batch on `store`.
    pub fn open(store: &'a S) -> Self {
        store.begin_batch();
        Self {
            store,
            staged: 0,
            _unit: std::marker::PhantomData,
        }
    }

    /// Stage one write.
    pub fn set(&mut self, unit: &U, order: i64) {
        self.store.set_order(unit, order);
        self.staged += 1;
    }

    /// Number of writes staged so far.
    pub fn staged(&self) -> usize {
        self.staged
    }
}

impl<U, S: OrderStore<U> + ?Sized> Drop for BatchGuard<'_, U, S> {
    fn drop(&mut self) {
        self.store.end_batch();
    }
}

/// What [`apply`] did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport<U> {
    /// Units whose stored order was changed, in assignment order.
    pub written: Vec<U>,
    /// Units whose stored order already matched.
    pub unchanged: usize,
}

impl<U> WriteReport<U> {
    /// Check whether nothing was written.
    pub fn is_empty(&self) -> bool {
        self.written.is_empty()
    }
}

/// Write every changed value of `assignment` to `store` in one batch.
pub fn apply<U, S>(store: &S, assignment: &OrderAssignment<U>) -> WriteReport<U>
where
    U: Clone + Hash + Eq,
    S: OrderStore<U> + ?Sized,
{
    let changes: Vec<(&U, i64)> = assignment
        .iter()
        .filter(|(unit, order)| store.current_order(unit) != Some(*order))
        .collect();
    let unchanged = assignment.len() - changes.len();

    if changes.is_empty() {
        debug!(unchanged, "stored orders already up to date");
        return WriteReport {
            written: Vec::new(),
            unchanged,
        };
    }

    let mut batch = BatchGuard::open(store);
    for (unit, order) in &changes {
        batch.set(unit, *order);
    }
    let staged = batch.staged();
    drop(batch);

    info!(written = staged, unchanged, "applied execution order changes");

    WriteReport {
        written: changes.into_iter().map(|(unit, _)| unit.clone()).collect(),
        unchanged,
    }
}

#[derive(Debug)]
struct StoreState<U> {
    orders: IndexMap<U, i64>,
    staged: Option<Vec<(U, i64)>>,
    batches: usize,
    writes: usize,
}

/// In-memory [`OrderStore`].
///
/// Writes made inside a batch become visible when the batch ends. Counters
/// for batches and writes make the store's traffic observable.
#[derive(Debug)]
pub struct MemoryOrderStore<U> {
    state: RwLock<StoreState<U>>,
}

impl<U: Clone + Hash + Eq> MemoryOrderStore<U> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::with_orders(std::iter::empty())
    }

    /// Create a store holding the given orders.
    pub fn with_orders(orders: impl IntoIterator<Item = (U, i64)>) -> Self {
        Self {
            state: RwLock::new(StoreState {
                orders: orders.into_iter().collect(),
                staged: None,
                batches: 0,
                writes: 0,
            }),
        }
    }

    /// Get the committed order of `unit`.
    pub fn get(&self, unit: &U) -> Option<i64> {
        self.state.read().orders.get(unit).copied()
    }

    /// Overwrite a stored order outside of any batch, without counting it.
    pub fn insert(&self, unit: U, order: i64) {
        self.state.write().orders.insert(unit, order);
    }

    /// Copy of all committed orders.
    pub fn snapshot(&self) -> IndexMap<U, i64> {
        self.state.read().orders.clone()
    }

    /// Number of batches committed so far.
    pub fn batches(&self) -> usize {
        self.state.read().batches
    }

    /// Number of individual writes committed so far.
    pub fn writes(&self) -> usize {
        self.state.read().writes
    }

    /// Check whether a batch is currently open.
    pub fn in_batch(&self) -> bool {
        self.state.read().staged.is_some()
    }
}

impl<U: Clone + Hash + Eq> Default for MemoryOrderStore<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> OrderStore<U> for MemoryOrderStore<U>
where
    U: Clone + Hash + Eq + Send + Sync,
{
    fn current_order(&self, unit: &U) -> Option<i64> {
        self.state.read().orders.get(unit).copied()
    }

    fn begin_batch(&self) {
        let mut state = self.state.write();
        if state.staged.is_none() {
            state.staged = Some(Vec::new());
        }
    }

    fn set_order(&self, unit: &U, order: i64) {
        let mut state = self.state.write();
        match state.staged.as_mut() {
            Some(staged) => staged.push((unit.clone(), order)),
            None => {
                state.orders.insert(unit.clone(), order);
                state.writes += 1;
            }
        }
    }

    fn end_batch(&self) {
        let mut state = self.state.write();
        let Some(staged) = state.staged.take() else {
            return;
        };
        state.writes += staged.len();
        state.batches += 1;
        state.orders.extend(staged);
    }
}
