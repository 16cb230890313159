//! Divide-and-conquer driver for binary polygon operations
//!
//! Large operands are cut on a grid laid over their joint envelope; the
//! first operand with plain knives, the second with extruded knives so every
//! cell of it reaches a little past the cell border. The operation runs per
//! cell (recursively, on rayon), each result is clipped back to its cell and
//! the cells are merged.
//!
//! ```ignore
//! let config = ParallelConfig::default().with_pattern(2, 2).with_limit(500);
//! let result = parallel::polygonal(&config, &a, &b, |a, b| a.difference(b))?;
//! ```

use geo_types::MultiPolygon;
use rayon::prelude::*;
use tracing::{debug, info, warn};

use super::slicer::Slicer;
use crate::domain::clip::clip_multi_polygon;
use crate::domain::ring::{multi_polygon_envelope, multi_polygon_points, union_envelope};
use crate::domain::{Grid, GridPattern, Order, ParallelConfig, Slice, SlicerConfig};
use crate::error::Result;

/// Apply `op` to `a` and `b`, splitting them on a grid while they are large.
pub fn polygonal<F>(config: &ParallelConfig, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, op: F) -> Result<MultiPolygon<f64>>
where
    F: Fn(&MultiPolygon<f64>, &MultiPolygon<f64>) -> MultiPolygon<f64> + Sync,
{
    config.validate()?;
    info!(
        points = multi_polygon_points(a) + multi_polygon_points(b),
        limit = config.limit,
        "[ginsu] parallel polygonal operation"
    );
    run(config, a, b, &op, 0)
}

fn knife_values(min: f64, max: f64, n: usize, offset: f64) -> Vec<f64> {
    if n == 0 || (max - min) / (n + 1) as f64 <= offset {
        return Vec::new();
    }
    GridPattern::spread(min, max, n)
}

fn run<F>(config: &ParallelConfig, a: &MultiPolygon<f64>, b: &MultiPolygon<f64>, op: &F, depth: usize) -> Result<MultiPolygon<f64>>
where
    F: Fn(&MultiPolygon<f64>, &MultiPolygon<f64>) -> MultiPolygon<f64> + Sync,
{
    let points = multi_polygon_points(a) + multi_polygon_points(b);
    if points <= config.limit {
        return Ok(op(a, b));
    }
    if depth >= config.max_depth {
        warn!(depth, points, limit = config.limit, "[ginsu] depth limit reached above the point limit");
        return Ok(op(a, b));
    }

    let Some(envelope) = union_envelope(multi_polygon_envelope(a), multi_polygon_envelope(b)) else {
        return Ok(op(a, b));
    };
    let (min, max) = (envelope.min(), envelope.max());
    let xs = knife_values(min.x, max.x, config.pattern.x, config.offset);
    let ys = knife_values(min.y, max.y, config.pattern.y, config.offset);
    if xs.is_empty() && ys.is_empty() {
        return Ok(op(a, b));
    }

    debug!(depth, points, x_knives = xs.len(), y_knives = ys.len(), "[ginsu] splitting operands");

    let slicer = Slicer::with_config(&xs, &ys, SlicerConfig::default().with_offset(config.offset))?;
    let extruded = slicer.extrude(config.extrusion)?;
    let (a_grid, b_grid) = rayon::join(|| slicer.polygonal(a), || extruded.polygonal(b));
    let (a_grid, b_grid) = (a_grid?, b_grid?);

    let x_slices = Slice::from_knives(slicer.x_knives());
    let y_slices = Slice::from_knives(slicer.y_knives());
    let cells: Vec<(usize, usize)> = a_grid.iter().map(|entry| (entry.x, entry.y)).collect();

    let results: Vec<MultiPolygon<f64>> = cells
        .par_iter()
        .map(|&(x, y)| -> Result<MultiPolygon<f64>> {
            let result = run(config, a_grid.get(x, y)?, b_grid.get(x, y)?, op, depth + 1)?;
            let column = clip_multi_polygon(&result, &x_slices[x], config.offset)?;
            clip_multi_polygon(&column, &y_slices[y], config.offset)
        })
        .collect::<Result<_>>()?;

    // results follow grid iteration order, x varying fastest
    let grid = Grid::new(slicer.width(), slicer.height(), Order::YX, results)?;
    slicer.merger().polygonal(&grid)
}
