//! Metrics and tracing hooks for slicing and merging
//!
//! ## Usage
//!
//! ```ignore
//! use std::sync::Arc;
//! use ginsu::metrics::Metrics;
//!
//! let metrics = Arc::new(Metrics::new());
//! let slicer = Slicer::new(&[0.0], &[0.0])?.with_metrics(metrics.clone());
//! slicer.polygonal(&polygon)?;
//! println!("{:?}", metrics.snapshot());
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

/// Metrics collector for slicer and merger operations
///
/// Thread-safe counters, shared by every rayon worker of a slicing run.
#[derive(Default)]
pub struct Metrics {
    /// Geometries sliced
    pub geometries_sliced: AtomicU64,
    /// Cells produced by slicing
    pub cells_produced: AtomicU64,
    /// Cells that came out empty
    pub empty_cells: AtomicU64,
    /// Grids merged back into one geometry
    pub grids_merged: AtomicU64,
    /// Pieces consumed by merges
    pub pieces_merged: AtomicU64,
    /// Cumulative slicing time in nanoseconds
    pub slice_time_ns: AtomicU64,
    /// Cumulative merge time in nanoseconds
    pub merge_time_ns: AtomicU64,
}

impl Metrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one sliced geometry
    ///
    /// # Arguments
    /// * `cells` - Number of cells of the produced grid
    /// * `empty` - How many of them are empty
    /// * `duration` - Time taken
    pub fn record_slice(&self, cells: usize, empty: usize, duration: Duration) {
        self.geometries_sliced.fetch_add(1, Ordering::Relaxed);
        self.cells_produced.fetch_add(cells as u64, Ordering::Relaxed);
        self.empty_cells.fetch_add(empty as u64, Ordering::Relaxed);
        self.slice_time_ns.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    /// Record one merged grid
    ///
    /// # Arguments
    /// * `pieces` - Number of pieces read from the grid
    /// * `duration` - Time taken
    pub fn record_merge(&self, pieces: usize, duration: Duration) {
        self.grids_merged.fetch_add(1, Ordering::Relaxed);
        self.pieces_merged.fetch_add(pieces as u64, Ordering::Relaxed);
        self.merge_time_ns.fetch_add(duration.as_nanos() as u64, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            geometries_sliced: self.geometries_sliced.load(Ordering::Relaxed),
            cells_produced: self.cells_produced.load(Ordering::Relaxed),
            empty_cells: self.empty_cells.load(Ordering::Relaxed),
            grids_merged: self.grids_merged.load(Ordering::Relaxed),
            pieces_merged: self.pieces_merged.load(Ordering::Relaxed),
            avg_slice_ns: average(&self.slice_time_ns, &self.geometries_sliced),
            avg_merge_ns: average(&self.merge_time_ns, &self.grids_merged),
        }
    }

    pub fn reset(&self) {
        self.geometries_sliced.store(0, Ordering::Relaxed);
        self.cells_produced.store(0, Ordering::Relaxed);
        self.empty_cells.store(0, Ordering::Relaxed);
        self.grids_merged.store(0, Ordering::Relaxed);
        self.pieces_merged.store(0, Ordering::Relaxed);
        self.slice_time_ns.store(0, Ordering::Relaxed);
        self.merge_time_ns.store(0, Ordering::Relaxed);
    }
}

fn average(total: &AtomicU64, count: &AtomicU64) -> u64 {
    let total = total.load(Ordering::Relaxed);
    let count = count.load(Ordering::Relaxed);
    if count > 0 {
        total / count
    } else {
        0
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub geometries_sliced: u64,
    pub cells_produced: u64,
    pub empty_cells: u64,
    pub grids_merged: u64,
    pub pieces_merged: u64,
    pub avg_slice_ns: u64,
    pub avg_merge_ns: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward counters to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    fn record_slice(&self, cells: usize, empty: usize, duration: Duration);

    fn record_merge(&self, pieces: usize, duration: Duration);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_slice(&self, _: usize, _: usize, _: Duration) {}
    fn record_merge(&self, _: usize, _: Duration) {}
}

impl MetricsRecorder for Metrics {
    fn record_slice(&self, cells: usize, empty: usize, duration: Duration) {
        Metrics::record_slice(self, cells, empty, duration);
    }

    fn record_merge(&self, pieces: usize, duration: Duration) {
        Metrics::record_merge(self, pieces, duration);
    }
}
