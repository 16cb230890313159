use std::collections::HashMap;

use parking_lot::RwLock;

use crate::error::Result;
use crate::ports::outbound::GridStore;

/// In-memory cell store for unit tests.
pub struct MemoryGridStore<G> {
    cells: RwLock<HashMap<(usize, usize), G>>,
}

impl<G> MemoryGridStore<G> {
    pub fn new() -> Self {
        Self {
            cells: RwLock::new(HashMap::new()),
        }
    }

    /// Number of cells written so far
    pub fn len(&self) -> usize {
        self.cells.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.read().is_empty()
    }
}

impl<G> Default for MemoryGridStore<G> {
    fn default() -> Self {
        Self::new()
    }
}

impl<G: Clone + Send + Sync> GridStore<G> for MemoryGridStore<G> {
    fn read(&self, x: usize, y: usize) -> Result<Option<G>> {
        Ok(self.cells.read().get(&(x, y)).cloned())
    }

    fn write(&self, x: usize, y: usize, value: &G) -> Result<()> {
        self.cells.write().insert((x, y), value.clone());
        Ok(())
    }
}
