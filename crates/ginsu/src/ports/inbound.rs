//! Inbound Ports (Driving Ports)
//!
//! The API callers use to cut geometries into grids and put them back
//! together. `Slicer` and `Merger` in the service layer implement these.

use geo_types::Geometry;

use crate::domain::SlicedGrid;
use crate::error::Result;

/// Cuts a geometry into a grid of cells (Driving Port)
pub trait GridSlicer: Send + Sync {
    /// Slice any supported geometry.
    ///
    /// # Errors
    /// `Unsupported` for geometry kinds without a grid representation
    /// (e.g. mixed collections), `Topology` for invalid polygons.
    fn slice_geometry(&self, geometry: &Geometry<f64>) -> Result<SlicedGrid>;

    /// Grid dimensions as `(width, height)`
    fn dimensions(&self) -> (usize, usize);
}

/// Reassembles a sliced grid into one geometry (Driving Port)
pub trait GridMerger: Send + Sync {
    /// # Errors
    /// `InvalidGridSize` when the grid does not match the knives.
    fn merge_grid(&self, grid: &SlicedGrid) -> Result<Geometry<f64>>;
}
