//! Clipping of geometries against a single slice
//!
//! Polygon rings are walked segment by segment. A ring that never leaves the
//! closed band is kept whole; otherwise it is split into chains, each one
//! entering the band at one border point and leaving it at another. Chains are
//! stitched back into rings by following the band border counter-clockwise
//! from every exit to the next entry on the same border.
//!
//! Shells are oriented counter-clockwise and holes clockwise before walking,
//! so the polygon interior is always on the left of a chain.

use geo_types::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Polygon};

use super::ring::{clean_ring, envelope, open, oriented, ring_inside, signed_area};
use super::slice::{Coverage, Location, Side, Slice};
use crate::error::{GinsuError, Result};

/// Piece of a ring inside the band
#[derive(Clone, Debug)]
struct Chain {
    coords: Vec<Coord<f64>>,
    entry: Side,
    entry_key: f64,
    exit: Side,
    exit_key: f64,
}

enum RingClip {
    Whole,
    Outside,
    Chains(Vec<Chain>),
}

fn crossing(slice: &Slice, side: Side, p: Coord<f64>, q: Coord<f64>) -> Coord<f64> {
    match slice.knife(side) {
        Some(knife) => knife.intersection(p, q),
        None => p,
    }
}

fn chain(slice: &Slice, mut coords: Vec<Coord<f64>>, entry: Side, exit: Side) -> Option<Chain> {
    let on = |coord: &Coord<f64>, side: Side| slice.location(*coord).border() == Some(side);

    if entry == exit && coords.iter().all(|c| on(c, entry)) {
        return None;
    }

    while coords.len() > 2 && on(&coords[1], entry) {
        coords.remove(0);
    }
    while coords.len() > 2 && on(&coords[coords.len() - 2], exit) {
        coords.pop();
    }

    let first = *coords.first()?;
    let last = *coords.last()?;
    Some(Chain {
        entry_key: slice.border_key(entry, first),
        exit_key: slice.border_key(exit, last),
        coords,
        entry,
        exit,
    })
}

fn split_ring(ring: &[Coord<f64>], slice: &Slice) -> RingClip {
    let points = open(ring);
    let n = points.len();
    let locations: Vec<Location> = points.iter().map(|&c| slice.location(c)).collect();

    let Some(start) = locations.iter().position(|l| l.is_outside()) else {
        return RingClip::Whole;
    };

    let mut chains = Vec::new();
    let mut current: Option<(Vec<Coord<f64>>, Side)> = None;

    for k in 0..n {
        let i = (start + k) % n;
        let j = (i + 1) % n;
        let (p, q) = (points[i], points[j]);
        let (lp, lq) = (locations[i], locations[j]);

        match (lp.facing(), lq.facing()) {
            (None, None) => {
                if let Some((coords, _)) = current.as_mut() {
                    coords.push(q);
                }
            }
            (None, Some(exit)) => {
                if let Some((mut coords, entry)) = current.take() {
                    if lp.border() != Some(exit) {
                        coords.push(crossing(slice, exit, p, q));
                    }
                    chains.extend(chain(slice, coords, entry, exit));
                }
            }
            (Some(entry), None) => {
                let mut coords = Vec::new();
                if lq.border() != Some(entry) {
                    coords.push(crossing(slice, entry, p, q));
                }
                coords.push(q);
                current = Some((coords, entry));
            }
            (Some(entry), Some(exit)) => {
                if entry != exit {
                    let coords = vec![
                        crossing(slice, entry, p, q),
                        crossing(slice, exit, p, q),
                    ];
                    chains.extend(chain(slice, coords, entry, exit));
                }
            }
        }
    }

    if chains.is_empty() {
        RingClip::Outside
    } else {
        RingClip::Chains(chains)
    }
}

fn stitch(chains: &[Chain], offset: f64) -> Result<Vec<Vec<Coord<f64>>>> {
    let mut used = vec![false; chains.len()];
    let mut rings = Vec::new();

    for start in 0..chains.len() {
        if used[start] {
            continue;
        }

        let mut ring: Vec<Coord<f64>> = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            ring.extend_from_slice(&chains[current].coords);

            let exit = &chains[current];
            let next = chains
                .iter()
                .enumerate()
                .filter(|(j, c)| {
                    (!used[*j] || *j == start)
                        && c.entry == exit.exit
                        && c.entry_key >= exit.exit_key - offset
                })
                .min_by(|(_, a), (_, b)| a.entry_key.total_cmp(&b.entry_key))
                .map(|(j, _)| j)
                .ok_or_else(|| {
                    GinsuError::Topology(format!(
                        "no border entry after exit at {:?}",
                        exit.coords.last()
                    ))
                })?;

            if next == start {
                break;
            }
            current = next;
        }

        rings.push(ring);
    }

    Ok(rings)
}

/// Attach holes to the smallest shell containing them.
pub(crate) fn assemble(
    shells: Vec<Vec<Coord<f64>>>,
    holes: Vec<Vec<Coord<f64>>>,
) -> Result<Vec<Polygon<f64>>> {
    let areas: Vec<f64> = shells.iter().map(|s| signed_area(s).abs()).collect();
    let mut assigned: Vec<Vec<LineString<f64>>> = vec![Vec::new(); shells.len()];

    for hole in holes {
        let owner = shells
            .iter()
            .enumerate()
            .filter(|(_, shell)| ring_inside(&hole, shell))
            .min_by(|(a, _), (b, _)| areas[*a].total_cmp(&areas[*b]))
            .map(|(i, _)| i)
            .ok_or_else(|| GinsuError::Topology("hole outside every shell".to_string()))?;
        assigned[owner].push(LineString(hole));
    }

    Ok(shells
        .into_iter()
        .zip(assigned)
        .map(|(shell, holes)| Polygon::new(LineString(shell), holes))
        .collect())
}

fn cross_range(slice: &Slice, coords: &[Coord<f64>]) -> Option<(f64, f64)> {
    let rect = envelope(coords.iter())?;
    match slice.dimension()? {
        super::knife::Dimension::X => Some((rect.min().x, rect.max().x)),
        super::knife::Dimension::Y => Some((rect.min().y, rect.max().y)),
    }
}

/// Intersection of a polygon with the closed band.
pub fn clip_polygon(polygon: &Polygon<f64>, slice: &Slice, offset: f64) -> Result<Vec<Polygon<f64>>> {
    if polygon.exterior().0.is_empty() {
        return Ok(Vec::new());
    }

    match cross_range(slice, &polygon.exterior().0) {
        None => return Ok(vec![polygon.clone()]),
        Some((min, max)) => match slice.coverage(min, max) {
            Coverage::Inside => return Ok(vec![polygon.clone()]),
            Coverage::Outside => return Ok(Vec::new()),
            Coverage::Crossing => {}
        },
    }

    let mut chains = Vec::new();
    let mut shells = Vec::new();
    let mut holes = Vec::new();

    let rings = std::iter::once((oriented(polygon.exterior(), true), true)).chain(
        polygon
            .interiors()
            .iter()
            .filter(|hole| !hole.0.is_empty())
            .map(|hole| (oriented(hole, false), false)),
    );

    for (ring, is_shell) in rings {
        match split_ring(&ring, slice) {
            RingClip::Whole => {
                if let Some(cleaned) = clean_ring(&ring, offset) {
                    if is_shell {
                        shells.push(cleaned);
                    } else {
                        holes.push(cleaned);
                    }
                }
            }
            RingClip::Outside => {}
            RingClip::Chains(found) => chains.extend(found),
        }
    }

    for ring in stitch(&chains, offset)? {
        if let Some(cleaned) = clean_ring(&ring, offset) {
            if signed_area(&cleaned) > 0.0 {
                shells.push(cleaned);
            } else {
                holes.push(cleaned);
            }
        }
    }

    assemble(shells, holes)
}

pub fn clip_multi_polygon(multi: &MultiPolygon<f64>, slice: &Slice, offset: f64) -> Result<MultiPolygon<f64>> {
    let mut polygons = Vec::new();
    for polygon in &multi.0 {
        polygons.extend(clip_polygon(polygon, slice, offset)?);
    }
    Ok(MultiPolygon(polygons))
}

/// Runs of a line string inside the closed band.
pub fn clip_line_string(line: &LineString<f64>, slice: &Slice) -> Vec<LineString<f64>> {
    let points = &line.0;
    if points.len() < 2 {
        return Vec::new();
    }

    if let Some((min, max)) = cross_range(slice, points) {
        match slice.coverage(min, max) {
            Coverage::Inside => return vec![line.clone()],
            Coverage::Outside => return Vec::new(),
            Coverage::Crossing => {}
        }
    } else {
        return vec![line.clone()];
    }

    let locations: Vec<Location> = points.iter().map(|&c| slice.location(c)).collect();
    let mut pieces = Vec::new();
    let mut current: Option<Vec<Coord<f64>>> = if locations[0].is_outside() {
        None
    } else {
        Some(vec![points[0]])
    };

    for i in 0..points.len() - 1 {
        let (p, q) = (points[i], points[i + 1]);
        let (lp, lq) = (locations[i], locations[i + 1]);

        match (lp.facing(), lq.facing()) {
            (None, None) => {
                if let Some(coords) = current.as_mut() {
                    coords.push(q);
                }
            }
            (None, Some(exit)) => {
                if let Some(mut coords) = current.take() {
                    if lp.border() != Some(exit) {
                        coords.push(crossing(slice, exit, p, q));
                    }
                    pieces.push(coords);
                }
            }
            (Some(entry), None) => {
                let mut coords = Vec::new();
                if lq.border() != Some(entry) {
                    coords.push(crossing(slice, entry, p, q));
                }
                coords.push(q);
                current = Some(coords);
            }
            (Some(entry), Some(exit)) => {
                if entry != exit {
                    pieces.push(vec![crossing(slice, entry, p, q), crossing(slice, exit, p, q)]);
                }
            }
        }
    }
    pieces.extend(current);

    pieces
        .into_iter()
        .filter_map(|mut coords| {
            coords.dedup();
            (coords.len() >= 2).then(|| LineString(coords))
        })
        .collect()
}

pub fn clip_multi_line_string(multi: &MultiLineString<f64>, slice: &Slice) -> MultiLineString<f64> {
    MultiLineString(
        multi
            .0
            .iter()
            .flat_map(|line| clip_line_string(line, slice))
            .collect(),
    )
}

/// Points inside the closed band
pub fn clip_multi_point(multi: &MultiPoint<f64>, slice: &Slice) -> MultiPoint<f64> {
    MultiPoint(
        multi
            .0
            .iter()
            .filter(|point| !slice.location(point.0).is_outside())
            .copied()
            .collect(),
    )
}
