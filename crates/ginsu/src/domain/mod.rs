//! Domain Layer - Pure geometry logic
//!
//! This layer contains:
//! - Knives and slices (axis-aligned cutting lines and the bands between them)
//! - Clipping of polygons, line strings and points against a slice
//! - Persistent grids of cells
//! - Merging of cut pieces back into whole geometries
//! - WKT reading and writing
//! - Configuration
//!
//! RULES:
//! - No I/O operations outside configuration loading
//! - No threads; parallelism lives in the service layer

pub mod clip;
pub mod config;
pub mod grid;
pub mod knife;
pub mod merge;
pub mod ring;
pub mod slice;
pub mod wkt;

pub use clip::{clip_line_string, clip_multi_line_string, clip_multi_point, clip_multi_polygon, clip_polygon};
pub use config::{GridPattern, ParallelConfig, SlicerConfig, SlicerConfigBuilder, DEFAULT_PARALLEL_EXTRUSION};
pub use grid::{Entry, Grid, Order, SlicedGrid};
pub use knife::{knives, Dimension, Knife, DEFAULT_EXTRUSION, DEFAULT_OFFSET};
pub use merge::{merge_lines, merge_points, merge_polygons};
pub use ring::{multi_polygon_area, normalize};
pub use slice::{Coverage, Location, Side, Slice};
pub use wkt::{read_multi_line_string, read_multi_point, read_multi_polygon, read_polygon, read_wkt, ToWkt};
