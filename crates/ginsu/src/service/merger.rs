//! Grid merger
//!
//! Reassembles a grid produced by a [`Slicer`](super::Slicer) with the same
//! knives. Pieces of neighbouring cells must meet along the knife lines, so
//! grids cut with extruded knives cannot be merged.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use geo_types::{Geometry, MultiLineString, MultiPoint, MultiPolygon};
use tracing::debug;

use super::slicer::check_sequence;
use crate::domain::knife::{knives, Dimension, Knife, DEFAULT_OFFSET};
use crate::domain::merge::{merge_lines, merge_points, merge_polygons};
use crate::domain::{Grid, SlicedGrid};
use crate::error::Result;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::inbound::GridMerger;

#[derive(Clone)]
pub struct Merger {
    xs: Vec<f64>,
    ys: Vec<f64>,
    knives: Vec<Knife>,
    offset: f64,
    metrics: Arc<dyn MetricsRecorder>,
}

impl fmt::Debug for Merger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Merger")
            .field("xs", &self.xs)
            .field("ys", &self.ys)
            .field("offset", &self.offset)
            .finish()
    }
}

impl Merger {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Self::with_offset(xs, ys, DEFAULT_OFFSET)
    }

    pub fn with_offset(xs: &[f64], ys: &[f64], offset: f64) -> Result<Self> {
        check_sequence(xs, offset, "x")?;
        check_sequence(ys, offset, "y")?;
        Ok(Self::from_knives(xs.to_vec(), ys.to_vec(), offset))
    }

    /// Knives already checked by a slicer
    pub(crate) fn from_knives(xs: Vec<f64>, ys: Vec<f64>, offset: f64) -> Self {
        let mut all = knives(&xs, offset, 0.0, Dimension::X);
        all.extend(knives(&ys, offset, 0.0, Dimension::Y));
        Self {
            xs,
            ys,
            knives: all,
            offset,
            metrics: Arc::new(NoOpMetrics),
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn width(&self) -> usize {
        self.xs.len() + 1
    }

    pub fn height(&self) -> usize {
        self.ys.len() + 1
    }

    fn record(&self, pieces: usize, started: Instant) {
        self.metrics.record_merge(pieces, started.elapsed());
        debug!(pieces, "[ginsu] grid merged");
    }

    pub fn polygonal(&self, grid: &Grid<MultiPolygon<f64>>) -> Result<MultiPolygon<f64>> {
        grid.expect_size(self.width(), self.height())?;
        let started = Instant::now();
        let pieces = grid.values().flat_map(|cell| cell.0.iter());
        let merged = merge_polygons(pieces, &self.knives, self.offset)?;
        self.record(grid.values().map(|cell| cell.0.len()).sum(), started);
        Ok(merged)
    }

    pub fn lineal(&self, grid: &Grid<MultiLineString<f64>>) -> Result<MultiLineString<f64>> {
        grid.expect_size(self.width(), self.height())?;
        let started = Instant::now();
        let pieces = grid.values().flat_map(|cell| cell.0.iter());
        let merged = merge_lines(pieces, &self.knives, self.offset);
        self.record(grid.values().map(|cell| cell.0.len()).sum(), started);
        Ok(merged)
    }

    pub fn puntal(&self, grid: &Grid<MultiPoint<f64>>) -> Result<MultiPoint<f64>> {
        grid.expect_size(self.width(), self.height())?;
        let started = Instant::now();
        let points = grid.values().flat_map(|cell| cell.0.iter());
        let merged = merge_points(points, &self.knives, self.offset);
        self.record(grid.values().map(|cell| cell.0.len()).sum(), started);
        Ok(merged)
    }

    pub fn merge(&self, grid: &SlicedGrid) -> Result<Geometry<f64>> {
        match grid {
            SlicedGrid::Polygonal(grid) => self.polygonal(grid).map(Geometry::MultiPolygon),
            SlicedGrid::Lineal(grid) => self.lineal(grid).map(Geometry::MultiLineString),
            SlicedGrid::Puntal(grid) => self.puntal(grid).map(Geometry::MultiPoint),
        }
    }
}

impl GridMerger for Merger {
    fn merge_grid(&self, grid: &SlicedGrid) -> Result<Geometry<f64>> {
        self.merge(grid)
    }
}
