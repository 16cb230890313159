//! # Store-Backed Grids on Disk
//!
//! A sliced grid written cell by cell through `FileGridStore`, read back by
//! a fresh store on the same directory and merged.

#[cfg(test)]
mod tests {
    use geo_types::MultiPolygon;

    use ginsu::domain::ring::{multi_polygon_area, normalize};
    use ginsu::{FileGridStore, GinsuError, GridStore, Slicer, StoredGrid};

    use crate::fixtures::{framed_square, square};

    #[test]
    fn test_sliced_grid_survives_the_disk() {
        let dir = tempfile::tempdir().unwrap();
        let frame = framed_square(8.0, 2.0);
        let slicer = Slicer::new(&[-4.0, 0.5, 4.0], &[0.5]).unwrap();
        let grid = slicer.polygonal(&frame).unwrap();

        let stored = StoredGrid::new(grid.width(), grid.height(), FileGridStore::new(dir.path()));
        stored.generate(|x, y| grid.get(x, y).cloned()).unwrap();
        assert!(dir.path().join("3").join("1").is_file());

        let reopened: StoredGrid<MultiPolygon<f64>, _> =
            StoredGrid::new(grid.width(), grid.height(), FileGridStore::new(dir.path()));
        let loaded = reopened.load().unwrap();
        for entry in grid.iter() {
            assert_eq!(loaded.get(entry.x, entry.y).unwrap(), entry.value);
        }

        let merged = slicer.merger().polygonal(&loaded).unwrap();
        assert_eq!(normalize(&merged), normalize(&frame));
    }

    #[test]
    fn test_update_with_accumulates_cells() {
        let dir = tempfile::tempdir().unwrap();
        let slicer = Slicer::new(&[0.0], &[]).unwrap();
        let left = slicer.polygonal(&MultiPolygon(vec![square(-4.0, -1.0)])).unwrap();
        let right = slicer.polygonal(&MultiPolygon(vec![square(1.0, 4.0)])).unwrap();

        let stored = StoredGrid::new(2, 1, FileGridStore::new(dir.path()));
        stored.generate(|x, y| left.get(x, y).cloned()).unwrap();
        stored
            .update_with(&right, |_, _, mut cell, other| {
                cell.0.extend(other.0.iter().cloned());
                Ok(cell)
            })
            .unwrap();

        assert!((multi_polygon_area(&stored.get(0, 0).unwrap()) - 9.0).abs() < 1e-9);
        assert!((multi_polygon_area(&stored.get(1, 0).unwrap()) - 9.0).abs() < 1e-9);

        let merged = slicer.merger().polygonal(&stored.load().unwrap()).unwrap();
        assert_eq!(merged.0.len(), 2);
    }

    #[test]
    fn test_unwritten_cell_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let store: FileGridStore<MultiPolygon<f64>> = FileGridStore::new(dir.path());
        store.write(0, 0, &MultiPolygon(vec![])).unwrap();

        let stored: StoredGrid<MultiPolygon<f64>, _> = StoredGrid::new(2, 1, store);
        assert!(matches!(stored.load(), Err(GinsuError::MissingCell { x: 1, y: 0 })));
    }
}
