//! Storage Adapters
//!
//! Implementations of the `GridStore` trait.

mod file;
mod memory;

pub use file::FileGridStore;
pub use memory::MemoryGridStore;
