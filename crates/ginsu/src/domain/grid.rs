//! Persistent rectangular grids of cells
//!
//! A `Grid<T>` holds `width * height` values in an `im::Vector`, so
//! [`Grid::update`] returns a new grid sharing structure with the old one.
//! Cells are addressed by `(x, y)`; the storage order decides which of the
//! two indices varies fastest in memory, iteration always goes row by row
//! with `x` varying fastest.

use geo_types::{Geometry, MultiLineString, MultiPoint, MultiPolygon};
use im::Vector;
use serde::{Deserialize, Serialize};

use super::wkt::ToWkt;
use crate::error::{GinsuError, Result};

/// Storage (and slicing) order of a grid
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Order {
    /// Cell `(x, y)` stored at `x * height + y`
    XY,
    /// Cell `(x, y)` stored at `y * width + x`
    YX,
    /// XY when the grid is at least as wide as it is high, YX otherwise
    #[default]
    Automatic,
}

impl Order {
    /// Concrete order for a `width x height` grid
    pub fn resolve(self, width: usize, height: usize) -> Order {
        match self {
            Order::Automatic if width >= height => Order::XY,
            Order::Automatic => Order::YX,
            order => order,
        }
    }
}

/// A cell value with its coordinates
#[derive(Clone, Debug, PartialEq)]
pub struct Entry<T> {
    pub x: usize,
    pub y: usize,
    pub value: T,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T: Clone> {
    width: usize,
    height: usize,
    order: Order,
    cells: Vector<T>,
}

impl<T: Clone> Grid<T> {
    /// Build a grid from values given in storage order.
    pub fn new<I>(width: usize, height: usize, order: Order, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = T>,
    {
        let (width, height) = (width.max(1), height.max(1));
        let cells: Vector<T> = values.into_iter().collect();
        if cells.len() != width * height {
            return Err(GinsuError::InvalidArgument(format!(
                "a {width}x{height} grid needs {} cells, got {}",
                width * height,
                cells.len()
            )));
        }

        Ok(Self {
            width,
            height,
            order: order.resolve(width, height),
            cells,
        })
    }

    /// Build a grid by computing every cell.
    pub fn from_fn(width: usize, height: usize, order: Order, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let (width, height) = (width.max(1), height.max(1));
        let order = order.resolve(width, height);
        let cells = (0..width * height)
            .map(|index| {
                let (x, y) = Self::position(order, width, height, index);
                f(x, y)
            })
            .collect();

        Self {
            width,
            height,
            order,
            cells,
        }
    }

    fn position(order: Order, width: usize, height: usize, index: usize) -> (usize, usize) {
        match order {
            Order::YX => (index % width, index / width),
            _ => (index / height, index % height),
        }
    }

    fn index(&self, x: usize, y: usize) -> Result<usize> {
        if x >= self.width || y >= self.height {
            return Err(GinsuError::InvalidIndex {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }

        Ok(match self.order {
            Order::YX => y * self.width + x,
            _ => x * self.height + y,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn order(&self) -> Order {
        self.order
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn get(&self, x: usize, y: usize) -> Result<&T> {
        let index = self.index(x, y)?;
        self.cells.get(index).ok_or(GinsuError::InvalidIndex {
            x,
            y,
            width: self.width,
            height: self.height,
        })
    }

    /// Cells row by row, `x` varying fastest
    pub fn iter(&self) -> impl Iterator<Item = Entry<&T>> + '_ {
        (0..self.height).flat_map(move |y| {
            (0..self.width).filter_map(move |x| {
                self.get(x, y).ok().map(|value| Entry { x, y, value })
            })
        })
    }

    /// Values in storage order
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.cells.iter()
    }

    /// Same shape, transformed cells
    pub fn map<U: Clone>(&self, mut f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            order: self.order,
            cells: self.cells.iter().map(&mut f).collect(),
        }
    }

    /// Cell-by-cell combination of two grids of the same size
    pub fn combine<U: Clone, V: Clone>(
        &self,
        other: &Grid<U>,
        mut f: impl FnMut(&T, &U) -> V,
    ) -> Result<Grid<V>> {
        other.expect_size(self.width, self.height)?;
        let mut cells = Vector::new();
        for entry in self.iter() {
            cells.push_back(f(entry.value, other.get(entry.x, entry.y)?));
        }

        // cells are in iteration order, which is YX storage
        Ok(Grid {
            width: self.width,
            height: self.height,
            order: Order::YX,
            cells,
        }
        .reordered(self.order))
    }

    /// New grid with one cell replaced; `self` is left untouched.
    pub fn update(&self, x: usize, y: usize, value: T) -> Result<Self> {
        let index = self.index(x, y)?;
        let mut grid = self.clone();
        grid.cells.set(index, value);
        Ok(grid)
    }

    /// Same cells stored in another order
    pub fn reordered(self, order: Order) -> Self {
        let order = order.resolve(self.width, self.height);
        if order == self.order {
            return self;
        }
        Self::from_fn(self.width, self.height, order, |x, y| {
            // indices come from from_fn, always in range
            let index = match self.order {
                Order::YX => y * self.width + x,
                _ => x * self.height + y,
            };
            self.cells[index].clone()
        })
    }

    /// `InvalidGridSize` unless this grid is `width x height`
    pub(crate) fn expect_size(&self, width: usize, height: usize) -> Result<()> {
        if self.width != width || self.height != height {
            return Err(GinsuError::InvalidGridSize {
                expected_width: width,
                expected_height: height,
                width: self.width,
                height: self.height,
            });
        }
        Ok(())
    }
}

impl<T: Clone + ToWkt> Grid<T> {
    /// Every cell as a `GEOMETRYCOLLECTION`, in iteration order
    pub fn to_wkt(&self) -> String {
        let mut out = String::from("GEOMETRYCOLLECTION (");
        for (i, entry) in self.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            entry.value.write_wkt(&mut out);
        }
        out.push(')');
        out
    }

    /// One `Entry(x, y, WKT)` line per cell
    pub fn describe(&self) -> String {
        self.iter()
            .map(|entry| format!("Entry({}, {}, {})", entry.x, entry.y, entry.value.to_wkt()))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

/// Grid produced by slicing, tagged by geometry kind
#[derive(Clone, Debug, PartialEq)]
pub enum SlicedGrid {
    Polygonal(Grid<MultiPolygon<f64>>),
    Lineal(Grid<MultiLineString<f64>>),
    Puntal(Grid<MultiPoint<f64>>),
}

impl SlicedGrid {
    pub fn width(&self) -> usize {
        match self {
            SlicedGrid::Polygonal(grid) => grid.width(),
            SlicedGrid::Lineal(grid) => grid.width(),
            SlicedGrid::Puntal(grid) => grid.width(),
        }
    }

    pub fn height(&self) -> usize {
        match self {
            SlicedGrid::Polygonal(grid) => grid.height(),
            SlicedGrid::Lineal(grid) => grid.height(),
            SlicedGrid::Puntal(grid) => grid.height(),
        }
    }

    pub fn to_wkt(&self) -> String {
        match self {
            SlicedGrid::Polygonal(grid) => grid.to_wkt(),
            SlicedGrid::Lineal(grid) => grid.to_wkt(),
            SlicedGrid::Puntal(grid) => grid.to_wkt(),
        }
    }

    /// Cell `(x, y)` as a geometry
    pub fn get(&self, x: usize, y: usize) -> Result<Geometry<f64>> {
        Ok(match self {
            SlicedGrid::Polygonal(grid) => Geometry::MultiPolygon(grid.get(x, y)?.clone()),
            SlicedGrid::Lineal(grid) => Geometry::MultiLineString(grid.get(x, y)?.clone()),
            SlicedGrid::Puntal(grid) => Geometry::MultiPoint(grid.get(x, y)?.clone()),
        })
    }
}
