//! # Ginsu
//!
//! Cuts planar geometries into rectangular grids of cells along
//! axis-aligned knives and puts them back together.
//!
//! ## Architecture
//!
//! This crate follows Hexagonal Architecture (Ports & Adapters):
//!
//! - **Domain Layer** (`domain/`): Pure geometry, no I/O
//!   - `Knife`, `Slice`: cutting lines and the closed bands between them
//!   - `clip`: polygon, line string and point clipping against a band
//!   - `merge`: reassembly of cut pieces with vertex snapping
//!   - `Grid`: persistent grid of cells backed by `im::Vector`
//!   - `wkt`: WKT reader and writer
//!   - `SlicerConfig`, `ParallelConfig`: configuration with validation
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `GridSlicer`, `GridMerger`: driving ports
//!   - `GridStore`: driven port for per-cell storage
//!
//! - **Service Layer** (`service/`): Orchestration
//!   - `Slicer`: implements `GridSlicer`, cuts on rayon for wide grids
//!   - `Merger`: implements `GridMerger`
//!   - `parallel`: divide-and-conquer binary polygon operations
//!   - `StoredGrid`: grid whose cells live in a `GridStore`
//!
//! - **Adapters Layer** (`adapters/`): Storage
//!   - `MemoryGridStore`: `HashMap` behind a lock
//!   - `FileGridStore`: one bincode file per cell
//!
//! ## Invariants
//!
//! - Slicing a polygon conserves its area.
//! - Merging a grid cut with plain (non-extruded) knives gives back the
//!   input geometry, up to vertex order.
//! - Cells are closed: a vertex on a knife belongs to both neighbours.
//!
//! ## Usage Example
//!
//! ```ignore
//! use ginsu::{read_wkt, Slicer, ToWkt};
//!
//! let slicer = Slicer::new(&[0.0, 10.0], &[5.0])?;
//! let grid = slicer.slice(&read_wkt("POLYGON ((-5 0, 15 0, 15 8, -5 8, -5 0))")?)?;
//! println!("{}", grid.to_wkt());
//!
//! let whole = slicer.merger().merge(&grid)?;
//! ```

pub mod adapters;
pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;
pub mod service;

// Re-exports for convenience
pub use adapters::{FileGridStore, MemoryGridStore};
pub use domain::{
    read_multi_line_string, read_multi_point, read_multi_polygon, read_polygon, read_wkt, Entry, Grid, GridPattern,
    Knife, Order, ParallelConfig, SlicedGrid, SlicerConfig, SlicerConfigBuilder, ToWkt,
};
pub use error::{GinsuError, Result};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::{GridMerger, GridSlicer, GridStore};
pub use service::{parallel, Merger, Slicer, StoredGrid};
