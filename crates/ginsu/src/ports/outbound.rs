//! Outbound Ports (Driven Ports)
//!
//! Storage of grid cells outside memory-resident grids.
//!
//! Production: `FileGridStore` (one file per cell)
//! Testing: `MemoryGridStore`

use crate::error::Result;

/// Abstract interface for per-cell grid storage.
///
/// Implementations use interior locking, so a store can be shared between
/// threads behind a plain reference.
pub trait GridStore<G>: Send + Sync {
    /// Read cell `(x, y)`; `None` when it was never written.
    fn read(&self, x: usize, y: usize) -> Result<Option<G>>;

    /// Write (or overwrite) cell `(x, y)`.
    fn write(&self, x: usize, y: usize, value: &G) -> Result<()>;
}
