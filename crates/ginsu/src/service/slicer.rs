//! Grid slicer
//!
//! Cuts a geometry with X knives and Y knives into a
//! `(xs.len() + 1) x (ys.len() + 1)` grid. The geometry is first cut into
//! strips along the dimension that comes first in the grid order, then every
//! strip is cut along the other dimension. Strips are independent and are
//! processed on rayon when there are enough of them.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use geo_types::{Geometry, LineString, MultiLineString, MultiPoint, MultiPolygon, Point};
use rayon::prelude::*;
use tracing::{debug, info};

use super::merger::Merger;
use crate::domain::clip::{clip_multi_line_string, clip_multi_point, clip_multi_polygon};
use crate::domain::knife::{compare_with_offset, knives, Dimension, Knife};
use crate::domain::ring::to_multi_polygon;
use crate::domain::{Grid, Order, Slice, SlicedGrid, SlicerConfig};
use crate::error::{GinsuError, Result};
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::inbound::GridSlicer;

/// Strip count from which strips are cut in parallel
pub const PARALLEL_THRESHOLD: usize = 4;

/// Check that knife values are strictly increasing under the tolerance.
pub(crate) fn check_sequence(values: &[f64], offset: f64, axis: &str) -> Result<()> {
    if let Some(value) = values.iter().find(|v| !v.is_finite()) {
        return Err(GinsuError::InvalidSequence(format!("{axis} knife {value} is not finite")));
    }

    for pair in values.windows(2) {
        if compare_with_offset(pair[0], offset, pair[1]) != std::cmp::Ordering::Less {
            return Err(GinsuError::InvalidSequence(format!(
                "{axis} knives {} and {} are not increasing",
                pair[0], pair[1]
            )));
        }
    }
    Ok(())
}

#[derive(Clone)]
pub struct Slicer {
    xs: Vec<Knife>,
    ys: Vec<Knife>,
    config: SlicerConfig,
    metrics: Arc<dyn MetricsRecorder>,
}

impl fmt::Debug for Slicer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slicer")
            .field("xs", &self.xs)
            .field("ys", &self.ys)
            .field("config", &self.config)
            .finish()
    }
}

impl Slicer {
    pub fn new(xs: &[f64], ys: &[f64]) -> Result<Self> {
        Self::with_config(xs, ys, SlicerConfig::default())
    }

    pub fn with_config(xs: &[f64], ys: &[f64], config: SlicerConfig) -> Result<Self> {
        config.validate()?;
        check_sequence(xs, config.offset, "x")?;
        check_sequence(ys, config.offset, "y")?;

        Ok(Self {
            xs: knives(xs, config.offset, config.extrusion, Dimension::X),
            ys: knives(ys, config.offset, config.extrusion, Dimension::Y),
            config,
            metrics: Arc::new(NoOpMetrics),
        })
    }

    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn config(&self) -> &SlicerConfig {
        &self.config
    }

    pub fn x_knives(&self) -> &[Knife] {
        &self.xs
    }

    pub fn y_knives(&self) -> &[Knife] {
        &self.ys
    }

    pub fn width(&self) -> usize {
        self.xs.len() + 1
    }

    pub fn height(&self) -> usize {
        self.ys.len() + 1
    }

    /// Same knives with the given extrusion; neighbouring cells then overlap.
    pub fn extrude(&self, extrusion: f64) -> Result<Self> {
        let config = self.config.clone().with_extrusion(extrusion);
        config.validate()?;
        Ok(Self {
            xs: self.xs.iter().map(|k| k.extrude(extrusion)).collect(),
            ys: self.ys.iter().map(|k| k.extrude(extrusion)).collect(),
            config,
            metrics: Arc::clone(&self.metrics),
        })
    }

    /// Merger for grids produced by this slicer
    pub fn merger(&self) -> Merger {
        let values = |knives: &[Knife]| knives.iter().map(Knife::value).collect::<Vec<_>>();
        Merger::from_knives(values(&self.xs), values(&self.ys), self.config.offset)
            .with_metrics(Arc::clone(&self.metrics))
    }

    fn cut<G, F>(&self, geometry: &G, clip: F) -> Result<Grid<G>>
    where
        G: Clone + Send + Sync,
        F: Fn(&G, &Slice) -> Result<G> + Sync,
    {
        let order = self.config.order.resolve(self.width(), self.height());
        let (outer, inner) = match order {
            Order::YX => (Slice::from_knives(&self.ys), Slice::from_knives(&self.xs)),
            _ => (Slice::from_knives(&self.xs), Slice::from_knives(&self.ys)),
        };

        let strip = |slice: &Slice| -> Result<Vec<G>> {
            let strip = clip(geometry, slice)?;
            inner.iter().map(|cell| clip(&strip, cell)).collect()
        };

        let strips: Vec<Vec<G>> = if outer.len() < PARALLEL_THRESHOLD {
            outer.iter().map(strip).collect::<Result<_>>()?
        } else {
            outer.par_iter().map(strip).collect::<Result<_>>()?
        };

        Grid::new(self.width(), self.height(), order, strips.into_iter().flatten())
    }

    fn record<G: Clone>(&self, grid: &Grid<G>, started: Instant, is_empty: impl Fn(&G) -> bool) {
        let empty = grid.values().filter(|g| is_empty(g)).count();
        self.metrics.record_slice(grid.len(), empty, started.elapsed());
        debug!(
            width = grid.width(),
            height = grid.height(),
            empty,
            "[ginsu] geometry sliced"
        );
    }

    pub fn polygonal(&self, geometry: &MultiPolygon<f64>) -> Result<Grid<MultiPolygon<f64>>> {
        let started = Instant::now();
        let offset = self.config.offset;
        let grid = self.cut(geometry, |g, slice| clip_multi_polygon(g, slice, offset))?;
        self.record(&grid, started, |g| g.0.is_empty());
        Ok(grid)
    }

    pub fn lineal(&self, geometry: &MultiLineString<f64>) -> Result<Grid<MultiLineString<f64>>> {
        let started = Instant::now();
        let grid = self.cut(geometry, |g, slice| Ok(clip_multi_line_string(g, slice)))?;
        self.record(&grid, started, |g| g.0.is_empty());
        Ok(grid)
    }

    pub fn puntal(&self, geometry: &MultiPoint<f64>) -> Result<Grid<MultiPoint<f64>>> {
        let started = Instant::now();
        let grid = self.cut(geometry, |g, slice| Ok(clip_multi_point(g, slice)))?;
        self.record(&grid, started, |g| g.0.is_empty());
        Ok(grid)
    }

    /// Slice any polygonal, lineal or puntal geometry.
    pub fn slice(&self, geometry: &Geometry<f64>) -> Result<SlicedGrid> {
        info!(
            x_knives = self.xs.len(),
            y_knives = self.ys.len(),
            "[ginsu] slicing geometry"
        );

        if let Some(multi) = to_multi_polygon(geometry) {
            return self.polygonal(&multi).map(SlicedGrid::Polygonal);
        }

        match geometry {
            Geometry::LineString(line) => self
                .lineal(&MultiLineString(vec![line.clone()]))
                .map(SlicedGrid::Lineal),
            Geometry::Line(line) => self
                .lineal(&MultiLineString(vec![LineString(vec![line.start, line.end])]))
                .map(SlicedGrid::Lineal),
            Geometry::MultiLineString(multi) => self.lineal(multi).map(SlicedGrid::Lineal),
            Geometry::Point(point) => self
                .puntal(&MultiPoint(vec![*point]))
                .map(SlicedGrid::Puntal),
            Geometry::MultiPoint(multi) => self.puntal(multi).map(SlicedGrid::Puntal),
            Geometry::GeometryCollection(collection) => self.slice_collection(&collection.0),
            _ => Err(GinsuError::Unsupported(format!("{geometry:?}"))),
        }
    }

    /// A collection is sliceable when all its members are of one kind.
    fn slice_collection(&self, members: &[Geometry<f64>]) -> Result<SlicedGrid> {
        let mut polygons = Vec::new();
        let mut lines = Vec::new();
        let mut points: Vec<Point<f64>> = Vec::new();

        for member in members {
            if let Some(multi) = to_multi_polygon(member) {
                polygons.extend(multi.0);
                continue;
            }
            match member {
                Geometry::LineString(line) => lines.push(line.clone()),
                Geometry::MultiLineString(multi) => lines.extend(multi.0.iter().cloned()),
                Geometry::Point(point) => points.push(*point),
                Geometry::MultiPoint(multi) => points.extend(multi.0.iter().copied()),
                other => return Err(GinsuError::Unsupported(format!("collection member {other:?}"))),
            }
        }

        match (polygons.is_empty(), lines.is_empty(), points.is_empty()) {
            (_, true, true) => self.polygonal(&MultiPolygon(polygons)).map(SlicedGrid::Polygonal),
            (true, false, true) => self.lineal(&MultiLineString(lines)).map(SlicedGrid::Lineal),
            (true, true, false) => self.puntal(&MultiPoint(points)).map(SlicedGrid::Puntal),
            _ => Err(GinsuError::Unsupported(
                "collection mixing geometry dimensions".to_string(),
            )),
        }
    }
}

impl GridSlicer for Slicer {
    fn slice_geometry(&self, geometry: &Geometry<f64>) -> Result<SlicedGrid> {
        self.slice(geometry)
    }

    fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }
}
