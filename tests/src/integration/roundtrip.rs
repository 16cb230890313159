//! # Slice / Merge Roundtrips
//!
//! Cutting a geometry with a `Slicer` and merging the grid with the matching
//! `Merger` must give the input back. Cells are checked along the way.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use geo_types::{Geometry, MultiLineString, MultiPolygon};

    use ginsu::domain::ring::{multi_polygon_area, normalize};
    use ginsu::{
        read_wkt, GinsuError, GridMerger, GridSlicer, Metrics, Order, SlicedGrid, Slicer, SlicerConfig, ToWkt,
    };

    use crate::fixtures::{framed_square, init_tracing, regular_polygon};

    // =============================================================================
    // POLYGONS
    // =============================================================================

    #[test]
    fn test_framed_square_roundtrip() {
        init_tracing();
        let frame = framed_square(10.0, 3.0);
        let slicer = Slicer::new(&[-5.0, 0.0, 5.0], &[-5.0, 5.0]).unwrap();

        let grid = slicer.polygonal(&frame).unwrap();
        assert_eq!((grid.width(), grid.height()), (4, 3));

        let total: f64 = grid.values().map(multi_polygon_area).sum();
        assert!((total - 364.0).abs() < 1e-9);

        // the hole splits across the centre knife, leaving a U in the cell
        let centre_left = grid.get(1, 1).unwrap();
        assert_eq!(centre_left.0.len(), 1);
        assert!(centre_left.0[0].interiors().is_empty());
        assert!((multi_polygon_area(centre_left) - 32.0).abs() < 1e-9);

        let merged = slicer.merger().polygonal(&grid).unwrap();
        assert_eq!(normalize(&merged), normalize(&frame));
    }

    #[test]
    fn test_many_sided_polygon_roundtrip_through_ports() {
        let polygon = MultiPolygon(vec![regular_polygon(40, 7.0, 1.0, -2.0, 0.3)]);
        let slicer = Slicer::new(&[-4.25, -1.5, 2.75, 5.5], &[-6.5, -2.25, 1.0]).unwrap();

        let ports_slicer: &dyn GridSlicer = &slicer;
        let ports_merger: &dyn GridMerger = &slicer.merger();
        assert_eq!(ports_slicer.dimensions(), (5, 4));

        let grid = ports_slicer.slice_geometry(&Geometry::MultiPolygon(polygon.clone())).unwrap();
        let merged = match ports_merger.merge_grid(&grid).unwrap() {
            Geometry::MultiPolygon(multi) => multi,
            other => panic!("unexpected {other:?}"),
        };
        assert_eq!(normalize(&merged), normalize(&polygon));
    }

    #[test]
    fn test_storage_order_does_not_change_cells() {
        let polygon = MultiPolygon(vec![regular_polygon(12, 5.0, 0.0, 0.0, 0.1)]);
        let xs = [-2.0, 1.0, 3.0];
        let ys = [-1.0];
        let xy = Slicer::with_config(&xs, &ys, SlicerConfig::default().with_order(Order::XY)).unwrap();
        let yx = Slicer::with_config(&xs, &ys, SlicerConfig::default().with_order(Order::YX)).unwrap();

        let a = xy.polygonal(&polygon).unwrap();
        let b = yx.polygonal(&polygon).unwrap();
        assert_eq!(a.order(), Order::XY);
        assert_eq!(b.order(), Order::YX);

        for (left, right) in a.iter().zip(b.iter()) {
            assert_eq!((left.x, left.y), (right.x, right.y));
            assert!((multi_polygon_area(left.value) - multi_polygon_area(right.value)).abs() < 1e-9);
        }
    }

    #[test]
    fn test_extruded_cells_overlap() {
        let frame = framed_square(10.0, 3.0);
        let slicer = Slicer::new(&[0.0], &[0.0]).unwrap().extrude(0.5).unwrap();
        let grid = slicer.polygonal(&frame).unwrap();

        let total: f64 = grid.values().map(multi_polygon_area).sum();
        assert!(total > 364.0);
    }

    #[test]
    fn test_shared_metrics_count_both_directions() {
        let metrics = Arc::new(Metrics::new());
        let slicer = Slicer::new(&[0.0], &[]).unwrap().with_metrics(metrics.clone());
        let merger = slicer.merger().with_metrics(metrics.clone());

        let grid = slicer.slice(&read_wkt("POLYGON ((-1 -1, 1 -1, 1 1, -1 1, -1 -1))").unwrap()).unwrap();
        merger.merge(&grid).unwrap();

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.geometries_sliced, 1);
        assert_eq!(snapshot.cells_produced, 2);
        assert_eq!(snapshot.grids_merged, 1);
        assert_eq!(snapshot.pieces_merged, 2);
    }

    // =============================================================================
    // LINES AND POINTS
    // =============================================================================

    #[test]
    fn test_crossing_lines_roundtrip() {
        let lines = read_wkt("MULTILINESTRING ((-8 -8, 8 8), (-8 8, 8 -8))").unwrap();
        let slicer = Slicer::new(&[1.5], &[-2.5]).unwrap();
        let grid = slicer.slice(&lines).unwrap();
        assert!(matches!(grid, SlicedGrid::Lineal(_)));

        let mut merged = match slicer.merger().merge(&grid).unwrap() {
            Geometry::MultiLineString(multi) => multi,
            other => panic!("unexpected {other:?}"),
        };
        merged.0.sort_by(|a, b| a.0[0].y.total_cmp(&b.0[0].y));
        assert_eq!(
            MultiLineString(merged.0).to_wkt(),
            "MULTILINESTRING ((-8 -8, 8 8), (-8 8, 8 -8))"
        );
    }

    #[test]
    fn test_line_running_along_knives_roundtrip() {
        let slicer = Slicer::new(&[0.0, 3.0], &[1.0]).unwrap();
        let line = read_wkt("LINESTRING (-2 -2, 0 0, 0 3, 5 3, 5 -1)").unwrap();
        let grid = slicer.slice(&line).unwrap();
        // the stretch up x = 0 lands in the columns on both sides of it
        let pieces: usize = match &grid {
            SlicedGrid::Lineal(grid) => grid.values().map(|cell| cell.0.len()).sum(),
            other => panic!("unexpected {other:?}"),
        };
        assert!(pieces > 3);

        let merged = slicer.merger().merge(&grid).unwrap();
        assert_eq!(merged.to_wkt(), "MULTILINESTRING ((-2 -2, 0 0, 0 3, 5 3, 5 -1))");
    }

    #[test]
    fn test_grid_wkt_lists_every_cell() {
        let points = read_wkt("MULTIPOINT ((0 0), (4 0))").unwrap();
        let slicer = Slicer::new(&[2.0], &[]).unwrap();
        let grid = slicer.slice(&points).unwrap();
        assert_eq!(
            grid.to_wkt(),
            "GEOMETRYCOLLECTION (MULTIPOINT ((0 0)), MULTIPOINT ((4 0)))"
        );
    }

    #[test]
    fn test_mixed_collection_is_unsupported() {
        let mixed = read_wkt("GEOMETRYCOLLECTION (POINT (1 1), LINESTRING (0 0, 2 2))").unwrap();
        let slicer = Slicer::new(&[1.0], &[1.0]).unwrap();
        assert!(matches!(slicer.slice(&mixed), Err(GinsuError::Unsupported(_))));
    }
}
