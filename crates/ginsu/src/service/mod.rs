//! Service Layer
//!
//! Orchestrates the domain: slicing whole geometries into grids, merging
//! grids back, the divide-and-conquer driver for binary operations and
//! store-backed grids.

pub mod merger;
pub mod parallel;
pub mod slicer;
pub mod stored;

pub use merger::Merger;
pub use slicer::{Slicer, PARALLEL_THRESHOLD};
pub use stored::StoredGrid;
