//! Shared test geometries

use geo_types::{polygon, Coord, LineString, MultiPolygon, Polygon};
use tracing_subscriber::EnvFilter;

/// Install a test-friendly subscriber honouring `RUST_LOG`; repeated calls
/// are harmless.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

/// Regular polygon centred on `(cx, cy)`, counter-clockwise.
pub fn regular_polygon(vertices: usize, radius: f64, cx: f64, cy: f64, phase: f64) -> Polygon<f64> {
    let mut coords: Vec<Coord<f64>> = (0..vertices)
        .map(|i| {
            let angle = phase + std::f64::consts::TAU * i as f64 / vertices as f64;
            Coord {
                x: cx + radius * angle.cos(),
                y: cy + radius * angle.sin(),
            }
        })
        .collect();
    coords.push(coords[0]);
    Polygon::new(LineString(coords), vec![])
}

/// Axis-aligned square `[min, max]²`.
pub fn square(min: f64, max: f64) -> Polygon<f64> {
    polygon![
        (x: min, y: min),
        (x: max, y: min),
        (x: max, y: max),
        (x: min, y: max)
    ]
}

/// A square with a square hole, `outer` and `inner` being half sides.
pub fn framed_square(outer: f64, inner: f64) -> MultiPolygon<f64> {
    let shell = square(-outer, outer).exterior().clone();
    let mut hole = square(-inner, inner).exterior().0.clone();
    hole.reverse();
    MultiPolygon(vec![Polygon::new(shell, vec![LineString(hole)])])
}
