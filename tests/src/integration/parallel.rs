//! # Parallel Boolean Operations
//!
//! `ginsu::parallel::polygonal` driving `geo` boolean operations must agree
//! with running the same operation on the whole operands.

#[cfg(test)]
mod tests {
    use geo::{Area, BooleanOps};
    use geo_types::MultiPolygon;

    use ginsu::{parallel, ParallelConfig};

    use crate::fixtures::{init_tracing, regular_polygon, square};

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() <= 1e-6 * b.abs().max(1.0)
    }

    fn config() -> ParallelConfig {
        ParallelConfig::default()
            .with_pattern(2, 2)
            .with_limit(16)
            .with_max_depth(4)
    }

    #[test]
    fn test_difference_punches_a_hole() {
        init_tracing();
        let circle = MultiPolygon(vec![regular_polygon(32, 100.0, 0.0, 0.0, 0.0)]);
        let hole = MultiPolygon(vec![square(-30.0, 30.0)]);

        let result = parallel::polygonal(&config(), &circle, &hole, |a, b| a.difference(b)).unwrap();

        let expected = circle.unsigned_area() - 3600.0;
        assert!(close(result.unsigned_area(), expected));
        assert_eq!(result.0.len(), 1);
        assert_eq!(result.0[0].interiors().len(), 1);
    }

    #[test]
    fn test_union_matches_direct_union() {
        let a = MultiPolygon(vec![regular_polygon(32, 50.0, 0.0, 0.0, 0.05)]);
        let b = MultiPolygon(vec![regular_polygon(24, 30.0, 40.0, 5.0, 0.02)]);

        let direct = a.union(&b);
        let result = parallel::polygonal(&config(), &a, &b, |a, b| a.union(b)).unwrap();

        assert!(close(result.unsigned_area(), direct.unsigned_area()));
        assert_eq!(result.0.len(), 1);
    }

    #[test]
    fn test_intersection_matches_direct_intersection() {
        let a = MultiPolygon(vec![regular_polygon(40, 50.0, 0.0, 0.0, 0.05)]);
        let b = MultiPolygon(vec![regular_polygon(36, 30.0, 40.0, 5.0, 0.02)]);

        let direct = a.intersection(&b);
        let result = parallel::polygonal(&config(), &a, &b, |a, b| a.intersection(b)).unwrap();

        assert!(close(result.unsigned_area(), direct.unsigned_area()));
    }

    #[test]
    fn test_disjoint_difference_keeps_first_operand() {
        let a = MultiPolygon(vec![regular_polygon(20, 10.0, 0.0, 0.0, 0.1)]);
        let b = MultiPolygon(vec![regular_polygon(20, 10.0, 50.0, 50.0, 0.1)]);

        let result = parallel::polygonal(&config(), &a, &b, |a, b| a.difference(b)).unwrap();
        assert!(close(result.unsigned_area(), a.unsigned_area()));
    }
}
