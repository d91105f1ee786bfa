//! Persistence abstraction
//!
//! Every service talks to the data through a [`Store`]. A store hands out
//! consistent read snapshots and runs each mutation as a single transaction:
//! the closure works on a private copy of the [`Dataset`] and the copy is
//! committed only when the closure returns `Ok`. Votes, counter deltas and
//! cascading deletes rely on that to stay consistent.
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use turftap_core::store::{MemoryStore, Store, StoreExt};
//!
//! let store: Arc<dyn Store> = Arc::new(MemoryStore::new());
//! let count = store.read(|data| Ok(data.comments.len()))?;
//! ```

mod dataset;
mod memory;
pub mod migration;

pub use dataset::Dataset;
pub use memory::MemoryStore;
pub use migration::{DataFile, DataMigrator, CURRENT_SCHEMA_VERSION};

use crate::error::{Result, TurftapError};

/// Trait for store implementations
pub trait Store: Send + Sync {
    /// Run `op` against a consistent snapshot
    fn view(&self, op: &mut dyn FnMut(&Dataset) -> Result<()>) -> Result<()>;

    /// Run `op` as one transaction; nothing is committed if it fails
    fn update(&self, op: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()>;
}

/// Typed helpers over [`Store`]
pub trait StoreExt: Store {
    /// Read a value out of a snapshot
    fn read<R>(&self, op: impl FnOnce(&Dataset) -> Result<R>) -> Result<R> {
        let mut op = Some(op);
        let mut out = None;
        self.view(&mut |data: &Dataset| {
            let op = op.take().ok_or_else(reentered)?;
            out = Some(op(data)?);
            Ok(())
        })?;
        out.ok_or_else(no_result)
    }

    /// Run a transaction and return its value
    fn write<R>(&self, op: impl FnOnce(&mut Dataset) -> Result<R>) -> Result<R> {
        let mut op = Some(op);
        let mut out = None;
        self.update(&mut |data: &mut Dataset| {
            let op = op.take().ok_or_else(reentered)?;
            out = Some(op(data)?);
            Ok(())
        })?;
        out.ok_or_else(no_result)
    }
}

impl<S: Store + ?Sized> StoreExt for S {}

fn reentered() -> TurftapError {
    TurftapError::Store("transaction body invoked twice".to_string())
}

fn no_result() -> TurftapError {
    TurftapError::Store("transaction finished without a result".to_string())
}
