//! Axis-aligned cutting lines
//!
//! A knife is the vertical line `x = value` ([`Dimension::X`]) or the
//! horizontal line `y = value` ([`Dimension::Y`]). Every comparison against a
//! knife is made with its `offset` as tolerance: ordinates closer than the
//! offset are considered to lie on the knife.

use std::cmp::Ordering;

use geo_types::Coord;
use serde::{Deserialize, Serialize};

/// Default tolerance used when comparing ordinates
pub const DEFAULT_OFFSET: f64 = 1e-8;

/// Default knife extrusion (none)
pub const DEFAULT_EXTRUSION: f64 = 0.0;

/// Axis a knife cuts across
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Dimension {
    /// Vertical knives, `x = value`
    X,
    /// Horizontal knives, `y = value`
    Y,
}

/// Compare `reference` with `value`, treating differences up to `offset` as equal.
pub fn compare_with_offset(reference: f64, offset: f64, value: f64) -> Ordering {
    if (reference - value).abs() > offset {
        reference.partial_cmp(&value).unwrap_or(Ordering::Equal)
    } else {
        Ordering::Equal
    }
}

/// A cutting line
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Knife {
    value: f64,
    offset: f64,
    dimension: Dimension,
    extrusion: f64,
}

impl Knife {
    pub fn new(value: f64, offset: f64, dimension: Dimension, extrusion: f64) -> Self {
        Self {
            value,
            offset,
            dimension,
            extrusion,
        }
    }

    /// Vertical knife at `x = value`
    pub fn x(value: f64, offset: f64) -> Self {
        Self::new(value, offset, Dimension::X, 0.0)
    }

    /// Horizontal knife at `y = value`
    pub fn y(value: f64, offset: f64) -> Self {
        Self::new(value, offset, Dimension::Y, 0.0)
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    pub fn offset(&self) -> f64 {
        self.offset
    }

    pub fn dimension(&self) -> Dimension {
        self.dimension
    }

    pub fn extrusion(&self) -> f64 {
        self.extrusion
    }

    /// Same knife with a new extrusion
    pub fn extrude(&self, extrusion: f64) -> Self {
        Self {
            extrusion,
            ..*self
        }
    }

    /// The knife moved down by its extrusion (itself when not extruded)
    pub fn lower(&self) -> Self {
        self.shifted(-self.extrusion)
    }

    /// The knife moved up by its extrusion (itself when not extruded)
    pub fn upper(&self) -> Self {
        self.shifted(self.extrusion)
    }

    fn shifted(&self, delta: f64) -> Self {
        if self.extrusion != 0.0 {
            Self::new(self.value + delta, self.offset, self.dimension, 0.0)
        } else {
            *self
        }
    }

    /// Ordering of two knives of the same dimension
    pub fn compare(&self, other: &Knife) -> Ordering {
        compare_with_offset(self.value, self.offset, other.value)
    }

    /// Ordinate the knife cuts across (x for X knives)
    pub fn cross_ordinate(&self, coord: Coord<f64>) -> f64 {
        match self.dimension {
            Dimension::X => coord.x,
            Dimension::Y => coord.y,
        }
    }

    /// Ordinate along the knife line (y for X knives)
    pub fn ordinate_of(&self, coord: Coord<f64>) -> f64 {
        match self.dimension {
            Dimension::X => coord.y,
            Dimension::Y => coord.x,
        }
    }

    /// Position of a coordinate relative to the knife, with tolerance
    pub fn position_of(&self, coord: Coord<f64>) -> Ordering {
        compare_with_offset(self.cross_ordinate(coord), self.offset, self.value)
    }

    /// Whether the coordinate lies on the knife line
    pub fn touches(&self, coord: Coord<f64>) -> bool {
        self.position_of(coord) == Ordering::Equal
    }

    /// Point where the segment `origin -> target` crosses the knife.
    ///
    /// The cross ordinate of the result is exactly the knife value.
    pub fn intersection(&self, origin: Coord<f64>, target: Coord<f64>) -> Coord<f64> {
        match self.dimension {
            Dimension::X => Coord {
                x: self.value,
                y: ((target.y - origin.y) * (self.value - origin.x)) / (target.x - origin.x)
                    + origin.y,
            },
            Dimension::Y => Coord {
                x: ((target.x - origin.x) * (self.value - origin.y)) / (target.y - origin.y)
                    + origin.x,
                y: self.value,
            },
        }
    }

    /// Move a coordinate onto the knife line
    pub fn snap(&self, coord: Coord<f64>) -> Coord<f64> {
        self.point_at(self.ordinate_of(coord))
    }

    /// Point of the knife line at the given along ordinate
    pub fn point_at(&self, ordinate: f64) -> Coord<f64> {
        match self.dimension {
            Dimension::X => Coord {
                x: self.value,
                y: ordinate,
            },
            Dimension::Y => Coord {
                x: ordinate,
                y: self.value,
            },
        }
    }

    /// Same point with its along ordinate replaced
    pub fn slide(&self, coord: Coord<f64>, ordinate: f64) -> Coord<f64> {
        match self.dimension {
            Dimension::X => Coord { x: coord.x, y: ordinate },
            Dimension::Y => Coord { x: ordinate, y: coord.y },
        }
    }
}

/// Build knives from raw values
pub fn knives(values: &[f64], offset: f64, extrusion: f64, dimension: Dimension) -> Vec<Knife> {
    values
        .iter()
        .map(|&value| Knife::new(value, offset, dimension, extrusion))
        .collect()
}
