//! # Property Tests
//!
//! Random convex polygons cut by random knives: area is conserved cell by
//! cell and merging restores the polygon. Monotone paths on the integer
//! lattice, which often run along integer knives, merge back into one line.

#[cfg(test)]
mod tests {
    use geo_types::{Coord, LineString, MultiLineString, MultiPolygon, Polygon};
    use proptest::prelude::*;

    use ginsu::domain::ring::{multi_polygon_area, normalize};
    use ginsu::Slicer;

    /// Sorted knife positions at least `gap` apart
    fn spaced(mut values: Vec<f64>, gap: f64) -> Vec<f64> {
        values.sort_by(f64::total_cmp);
        let mut out: Vec<f64> = Vec::new();
        for value in values {
            if out.last().map_or(true, |last| value - last >= gap) {
                out.push(value);
            }
        }
        out
    }

    fn convex(angles: Vec<f64>, radius: f64, cx: f64, cy: f64) -> Option<MultiPolygon<f64>> {
        let angles = spaced(angles, 0.05);
        if angles.len() < 3 || angles[0] + std::f64::consts::TAU - angles[angles.len() - 1] < 0.05 {
            return None;
        }
        let mut coords: Vec<Coord<f64>> = angles
            .iter()
            .map(|a| Coord {
                x: cx + radius * a.cos(),
                y: cy + radius * a.sin(),
            })
            .collect();
        coords.push(coords[0]);
        Some(MultiPolygon(vec![Polygon::new(LineString(coords), vec![])]))
    }

    fn knives() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-12.0..12.0f64, 0..5).prop_map(|v| spaced(v, 0.25))
    }

    fn lattice_knives() -> impl Strategy<Value = Vec<f64>> {
        prop::collection::vec(-4i32..10, 0..4).prop_map(|mut v| {
            v.sort_unstable();
            v.dedup();
            v.into_iter().map(f64::from).collect()
        })
    }

    /// Path from `start` taking non-negative integer steps, never standing still
    fn lattice_path(start: (i32, i32), steps: &[(i32, i32)]) -> LineString<f64> {
        let mut at = Coord { x: f64::from(start.0), y: f64::from(start.1) };
        let mut coords = vec![at];
        for &(dx, dy) in steps.iter().filter(|&&(dx, dy)| dx > 0 || dy > 0) {
            at = Coord { x: at.x + f64::from(dx), y: at.y + f64::from(dy) };
            coords.push(at);
        }
        LineString(coords)
    }

    fn length(line: &LineString<f64>) -> f64 {
        line.0.windows(2).map(|w| (w[1].x - w[0].x).hypot(w[1].y - w[0].y)).sum()
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn prop_slicing_conserves_area(
            angles in prop::collection::vec(0.0..std::f64::consts::TAU, 3..24),
            radius in 1.0..10.0f64,
            cx in -3.0..3.0f64,
            cy in -3.0..3.0f64,
            xs in knives(),
            ys in knives(),
        ) {
            let polygon = convex(angles, radius, cx, cy);
            prop_assume!(polygon.is_some());
            let polygon = polygon.unwrap();

            let slicer = Slicer::new(&xs, &ys).unwrap();
            let grid = slicer.polygonal(&polygon).unwrap();
            let total: f64 = grid.values().map(multi_polygon_area).sum();
            let expected = multi_polygon_area(&polygon);
            prop_assert!((total - expected).abs() <= 1e-9 * expected.max(1.0));
        }

        #[test]
        fn prop_merge_restores_polygon(
            angles in prop::collection::vec(0.0..std::f64::consts::TAU, 3..24),
            radius in 1.0..10.0f64,
            xs in knives(),
            ys in knives(),
        ) {
            let polygon = convex(angles, radius, 0.37, -0.21);
            prop_assume!(polygon.is_some());
            let polygon = polygon.unwrap();

            let slicer = Slicer::new(&xs, &ys).unwrap();
            let grid = slicer.polygonal(&polygon).unwrap();
            let merged = slicer.merger().polygonal(&grid).unwrap();

            prop_assert_eq!(merged.0.len(), 1);
            let (merged, original) = (normalize(&merged), normalize(&polygon));
            prop_assert_eq!(merged.0[0].exterior().0.len(), original.0[0].exterior().0.len());
            prop_assert!((multi_polygon_area(&merged) - multi_polygon_area(&original)).abs() <= 1e-9 * multi_polygon_area(&original).max(1.0));
        }

        #[test]
        fn prop_line_merge_restores_lattice_path(
            start in (-4i32..4, -4i32..4),
            steps in prop::collection::vec((0i32..3, 0i32..3), 1..10),
            xs in lattice_knives(),
            ys in lattice_knives(),
        ) {
            let path = lattice_path(start, &steps);
            prop_assume!(path.0.len() >= 2);

            let slicer = Slicer::new(&xs, &ys).unwrap();
            let grid = slicer.lineal(&MultiLineString(vec![path.clone()])).unwrap();
            let merged = slicer.merger().lineal(&grid).unwrap();

            prop_assert_eq!(merged.0.len(), 1);
            let line = &merged.0[0];
            prop_assert_eq!(line.0.first(), path.0.first());
            prop_assert_eq!(line.0.last(), path.0.last());
            prop_assert!((length(line) - length(&path)).abs() <= 1e-9 * length(&path).max(1.0));
        }
    }
}
