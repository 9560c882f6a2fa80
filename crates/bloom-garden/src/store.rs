#![forbid(unsafe_code)]

//! The flower store collaborator.
//!
//! The session never talks to a store directly; it emits commands that a
//! runtime executes against a [`FlowerStore`]. Implementations accept or
//! reject an insert as a whole.

use std::collections::VecDeque;

use crate::error::StoreError;
use crate::flower::Flower;

/// Minimal CRUD surface the garden needs.
pub trait FlowerStore {
    /// Fetch every stored flower. Ordering by `created_at` is preferred but
    /// not required; the session sorts.
    fn load_all(&mut self) -> Result<Vec<Flower>, StoreError>;

    /// Persist one flower atomically.
    fn insert(&mut self, flower: &Flower) -> Result<(), StoreError>;
}

impl<S: FlowerStore + ?Sized> FlowerStore for Box<S> {
    fn load_all(&mut self) -> Result<Vec<Flower>, StoreError> {
        (**self).load_all()
    }

    fn insert(&mut self, flower: &Flower) -> Result<(), StoreError> {
        (**self).insert(flower)
    }
}

/// In-process store with scripted failures and call accounting.
///
/// Rows are returned in storage order, which need not be chronological.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    rows: Vec<Flower>,
    load_failures: VecDeque<StoreError>,
    insert_failures: VecDeque<StoreError>,
    load_calls: usize,
    insert_calls: usize,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A store pre-seeded with rows in the given storage order.
    #[must_use]
    pub fn with_rows(rows: impl IntoIterator<Item = Flower>) -> Self {
        Self {
            rows: rows.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Fail the next `load_all` with `error`. Queues if called repeatedly.
    pub fn fail_loads_with(&mut self, error: StoreError) -> &mut Self {
        self.load_failures.push_back(error);
        self
    }

    /// Fail the next `insert` with `error`. Queues if called repeatedly.
    pub fn fail_inserts_with(&mut self, error: StoreError) -> &mut Self {
        self.insert_failures.push_back(error);
        self
    }

    #[must_use]
    pub fn rows(&self) -> &[Flower] {
        &self.rows
    }

    #[must_use]
    pub const fn load_calls(&self) -> usize {
        self.load_calls
    }

    #[must_use]
    pub const fn insert_calls(&self) -> usize {
        self.insert_calls
    }
}

impl FlowerStore for MemoryStore {
    fn load_all(&mut self) -> Result<Vec<Flower>, StoreError> {
        self.load_calls += 1;
        if let Some(error) = self.load_failures.pop_front() {
            return Err(error);
        }
        Ok(self.rows.clone())
    }

    fn insert(&mut self, flower: &Flower) -> Result<(), StoreError> {
        self.insert_calls += 1;
        if let Some(error) = self.insert_failures.pop_front() {
            return Err(error);
        }
        if self.rows.iter().any(|row| row.id == flower.id) {
            return Err(StoreError::rejected(
                409,
                format!("duplicate key value violates unique constraint on id {}", flower.id),
            ));
        }
        self.rows.push(flower.clone());
        Ok(())
    }
}
