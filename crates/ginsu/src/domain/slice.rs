//! Closed bands between consecutive knives

use std::cmp::Ordering;

use geo_types::Coord;

use super::knife::{compare_with_offset, Dimension, Knife};

/// Where a coordinate lies relative to a slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Location {
    Below,
    LowerBorder,
    Inside,
    UpperBorder,
    Above,
}

impl Location {
    /// Strictly outside the closed band
    pub fn is_outside(self) -> bool {
        matches!(self, Location::Below | Location::Above)
    }

    /// Border the location lies on, if any
    pub fn border(self) -> Option<Side> {
        match self {
            Location::LowerBorder => Some(Side::Lower),
            Location::UpperBorder => Some(Side::Upper),
            _ => None,
        }
    }

    /// Border facing an outside location
    pub fn facing(self) -> Option<Side> {
        match self {
            Location::Below => Some(Side::Lower),
            Location::Above => Some(Side::Upper),
            _ => None,
        }
    }
}

/// One of the two border lines of a slice
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    Lower,
    Upper,
}

/// How an envelope relates to a slice
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Coverage {
    Inside,
    Outside,
    Crossing,
}

/// A band along one dimension, borders included
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Slice {
    /// The whole plane, used when a dimension has no knives
    Inner,
    /// Everything up to `upper`
    Lower { upper: Knife },
    /// Everything between `lower` and `upper`
    Middle { lower: Knife, upper: Knife },
    /// Everything from `lower` on
    Upper { lower: Knife },
}

impl Slice {
    /// `n + 1` slices for `n` knives; extruded knives make neighbours overlap.
    pub fn from_knives(knives: &[Knife]) -> Vec<Slice> {
        let Some((first, rest)) = knives.split_first() else {
            return vec![Slice::Inner];
        };

        let mut slices = Vec::with_capacity(knives.len() + 1);
        slices.push(Slice::Lower {
            upper: first.upper(),
        });

        let mut previous = first;
        for current in rest {
            slices.push(Slice::Middle {
                lower: previous.lower(),
                upper: current.upper(),
            });
            previous = current;
        }

        slices.push(Slice::Upper {
            lower: previous.lower(),
        });
        slices
    }

    pub fn lower_knife(&self) -> Option<&Knife> {
        match self {
            Slice::Middle { lower, .. } | Slice::Upper { lower } => Some(lower),
            _ => None,
        }
    }

    pub fn upper_knife(&self) -> Option<&Knife> {
        match self {
            Slice::Lower { upper } | Slice::Middle { upper, .. } => Some(upper),
            _ => None,
        }
    }

    pub fn knife(&self, side: Side) -> Option<&Knife> {
        match side {
            Side::Lower => self.lower_knife(),
            Side::Upper => self.upper_knife(),
        }
    }

    pub fn dimension(&self) -> Option<Dimension> {
        self.lower_knife()
            .or_else(|| self.upper_knife())
            .map(Knife::dimension)
    }

    pub fn location(&self, coord: Coord<f64>) -> Location {
        if let Some(lower) = self.lower_knife() {
            match lower.position_of(coord) {
                Ordering::Less => return Location::Below,
                Ordering::Equal => return Location::LowerBorder,
                Ordering::Greater => {}
            }
        }

        if let Some(upper) = self.upper_knife() {
            match upper.position_of(coord) {
                Ordering::Less => Location::Inside,
                Ordering::Equal => Location::UpperBorder,
                Ordering::Greater => Location::Above,
            }
        } else {
            Location::Inside
        }
    }

    /// Position of a border point in counter-clockwise order around the band.
    ///
    /// Walking a border by increasing key keeps the band on the left.
    pub fn border_key(&self, side: Side, coord: Coord<f64>) -> f64 {
        match (self.dimension(), side) {
            (Some(Dimension::X), Side::Upper) => coord.y,
            (Some(Dimension::X), Side::Lower) => -coord.y,
            (Some(Dimension::Y), Side::Lower) => coord.x,
            (Some(Dimension::Y), Side::Upper) => -coord.x,
            (None, _) => 0.0,
        }
    }

    /// Classify the cross-ordinate range `[min, max]` of an envelope
    pub fn coverage(&self, min: f64, max: f64) -> Coverage {
        let below = self
            .lower_knife()
            .is_some_and(|k| compare_with_offset(max, k.offset(), k.value()) == Ordering::Less);
        let above = self
            .upper_knife()
            .is_some_and(|k| compare_with_offset(min, k.offset(), k.value()) == Ordering::Greater);

        if below || above {
            return Coverage::Outside;
        }

        let inside_lower = self
            .lower_knife()
            .map_or(true, |k| compare_with_offset(min, k.offset(), k.value()) != Ordering::Less);
        let inside_upper = self
            .upper_knife()
            .map_or(true, |k| compare_with_offset(max, k.offset(), k.value()) != Ordering::Greater);

        if inside_lower && inside_upper {
            Coverage::Inside
        } else {
            Coverage::Crossing
        }
    }
}
