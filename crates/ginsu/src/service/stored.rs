//! Grids whose cells live in a [`GridStore`]
//!
//! Used for grids too large to keep in memory: cells are produced, read and
//! updated one at a time through the store.

use std::marker::PhantomData;

use rayon::prelude::*;
use tracing::debug;

use crate::domain::wkt::ToWkt;
use crate::domain::{Grid, Order};
use crate::error::{GinsuError, Result};
use crate::ports::outbound::GridStore;

pub struct StoredGrid<G, S> {
    width: usize,
    height: usize,
    store: S,
    _cells: PhantomData<fn() -> G>,
}

impl<G, S> StoredGrid<G, S>
where
    G: Clone + Send,
    S: GridStore<G>,
{
    pub fn new(width: usize, height: usize, store: S) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
            store,
            _cells: PhantomData,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    fn cells(&self) -> Vec<(usize, usize)> {
        (0..self.width)
            .flat_map(|x| (0..self.height).map(move |y| (x, y)))
            .collect()
    }

    fn check(&self, x: usize, y: usize) -> Result<()> {
        if x >= self.width || y >= self.height {
            return Err(GinsuError::InvalidIndex {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }

    /// Compute and store every cell.
    pub fn generate<F>(&self, f: F) -> Result<()>
    where
        F: Fn(usize, usize) -> Result<G> + Sync,
    {
        debug!(width = self.width, height = self.height, "[ginsu] generating stored grid");
        self.cells()
            .into_par_iter()
            .try_for_each(|(x, y)| self.store.write(x, y, &f(x, y)?))
    }

    pub fn get(&self, x: usize, y: usize) -> Result<G> {
        self.check(x, y)?;
        self.store.read(x, y)?.ok_or(GinsuError::MissingCell { x, y })
    }

    pub fn set(&self, x: usize, y: usize, value: &G) -> Result<()> {
        self.check(x, y)?;
        self.store.write(x, y, value)
    }

    /// Replace every cell with `combiner(x, y, stored, other)`.
    pub fn update_with<T, F>(&self, other: &Grid<T>, combiner: F) -> Result<()>
    where
        T: Clone + Send + Sync,
        F: Fn(usize, usize, G, &T) -> Result<G> + Sync,
    {
        other.expect_size(self.width, self.height)?;

        self.cells().into_par_iter().try_for_each(|(x, y)| {
            let current = self.get(x, y)?;
            let updated = combiner(x, y, current, other.get(x, y)?)?;
            self.store.write(x, y, &updated)
        })
    }

    /// Read every cell into an in-memory grid.
    pub fn load(&self) -> Result<Grid<G>> {
        let values = self
            .cells()
            .into_iter()
            .map(|(x, y)| self.get(x, y))
            .collect::<Result<Vec<G>>>()?;
        Grid::new(self.width, self.height, Order::XY, values)
    }
}

impl<G, S> StoredGrid<G, S>
where
    G: Clone + Send + ToWkt,
    S: GridStore<G>,
{
    pub fn to_wkt(&self) -> Result<String> {
        Ok(self.load()?.to_wkt())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{FileGridStore, MemoryGridStore};
    use geo_types::{MultiPoint, Point};

    fn point(x: usize, y: usize) -> MultiPoint<f64> {
        MultiPoint(vec![Point::new(x as f64, y as f64)])
    }

    #[test]
    fn test_generate_and_get() {
        let grid = StoredGrid::new(3, 2, MemoryGridStore::new());
        grid.generate(|x, y| Ok(point(x, y))).unwrap();
        assert_eq!(grid.store().len(), 6);
        assert_eq!(grid.get(2, 1).unwrap(), point(2, 1));
        assert!(matches!(grid.get(3, 0), Err(GinsuError::InvalidIndex { x: 3, .. })));
    }

    #[test]
    fn test_missing_cell() {
        let grid: StoredGrid<MultiPoint<f64>, _> = StoredGrid::new(2, 2, MemoryGridStore::new());
        assert!(matches!(grid.get(1, 1), Err(GinsuError::MissingCell { x: 1, y: 1 })));
    }

    #[test]
    fn test_set_overwrites_a_single_cell() {
        let grid = StoredGrid::new(2, 2, MemoryGridStore::new());
        grid.generate(|x, y| Ok(point(x, y))).unwrap();

        grid.set(1, 0, &point(7, 7)).unwrap();
        assert_eq!(grid.get(1, 0).unwrap(), point(7, 7));
        assert_eq!(grid.get(0, 1).unwrap(), point(0, 1));
        assert_eq!(grid.store().len(), 4);

        assert!(matches!(
            grid.set(5, 0, &point(0, 0)),
            Err(GinsuError::InvalidIndex { x: 5, y: 0, width: 2, height: 2 })
        ));
        assert!(matches!(grid.set(0, 2, &point(0, 0)), Err(GinsuError::InvalidIndex { y: 2, .. })));
        assert_eq!(grid.store().len(), 4);
    }

    #[test]
    fn test_set_fills_a_missing_cell() {
        let grid: StoredGrid<MultiPoint<f64>, _> = StoredGrid::new(1, 2, MemoryGridStore::new());
        assert!(matches!(grid.get(0, 1), Err(GinsuError::MissingCell { .. })));
        grid.set(0, 1, &point(3, 4)).unwrap();
        assert_eq!(grid.get(0, 1).unwrap(), point(3, 4));
    }

    #[test]
    fn test_update_with_combines_cells() {
        let grid = StoredGrid::new(2, 2, MemoryGridStore::new());
        grid.generate(|x, y| Ok(point(x, y))).unwrap();
        let offsets = Grid::from_fn(2, 2, Order::YX, |x, y| (x * 10 + y) as f64);

        grid.update_with(&offsets, |_, _, mut cell, offset| {
            cell.0.push(Point::new(*offset, *offset));
            Ok(cell)
        })
        .unwrap();

        let cell = grid.get(1, 0).unwrap();
        assert_eq!(cell.0, vec![Point::new(1.0, 0.0), Point::new(10.0, 10.0)]);
    }

    #[test]
    fn test_update_with_requires_same_size() {
        let grid = StoredGrid::new(2, 2, MemoryGridStore::new());
        grid.generate(|x, y| Ok(point(x, y))).unwrap();
        let other = Grid::from_fn(3, 2, Order::XY, |_, _| 0.0);
        assert!(matches!(
            grid.update_with(&other, |_, _, cell, _| Ok(cell)),
            Err(GinsuError::InvalidGridSize { width: 3, .. })
        ));
    }

    #[test]
    fn test_file_backed_grid_loads_and_prints() {
        let dir = tempfile::tempdir().unwrap();
        let grid = StoredGrid::new(2, 1, FileGridStore::new(dir.path()));
        grid.generate(|x, y| Ok(point(x, y))).unwrap();

        let loaded = grid.load().unwrap();
        assert_eq!(loaded.get(1, 0).unwrap(), &point(1, 0));
        assert_eq!(grid.to_wkt().unwrap(), "GEOMETRYCOLLECTION (MULTIPOINT ((0 0)), MULTIPOINT ((1 0)))");
    }
}
