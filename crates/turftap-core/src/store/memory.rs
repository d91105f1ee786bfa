//! In-memory store

use super::{Dataset, Store};
use crate::error::{Result, TurftapError};
use std::sync::RwLock;

/// In-memory store, used by tests and as a scratch backend
#[derive(Debug, Default)]
pub struct MemoryStore {
    data: RwLock<Dataset>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with `data`
    pub fn with_data(data: Dataset) -> Self {
        Self {
            data: RwLock::new(data),
        }
    }

    /// Copy of the committed state
    pub fn snapshot(&self) -> Result<Dataset> {
        self.data
            .read()
            .map(|data| data.clone())
            .map_err(|_| poisoned())
    }
}

impl Store for MemoryStore {
    fn view(&self, op: &mut dyn FnMut(&Dataset) -> Result<()>) -> Result<()> {
        let data = self.data.read().map_err(|_| poisoned())?;
        op(&data)
    }

    fn update(&self, op: &mut dyn FnMut(&mut Dataset) -> Result<()>) -> Result<()> {
        let mut data = self.data.write().map_err(|_| poisoned())?;
        let mut working = data.clone();
        op(&mut working)?;
        *data = working;
        Ok(())
    }
}

fn poisoned() -> TurftapError {
    TurftapError::Store("memory store lock poisoned".to_string())
}
