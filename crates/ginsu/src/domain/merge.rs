//! Reassembly of pieces cut along knife lines
//!
//! Polygons are merged as a set of directed edges: pieces of neighbouring
//! cells share the border segments they were cut along, traversed in opposite
//! directions, so those pairs cancel and the remaining edges are traced back
//! into rings. Before that, every vertex near a knife line is snapped onto it
//! and border segments are split at every vertex the line carries, so a long
//! edge on one side still cancels against several short edges on the other.

use std::collections::{HashMap, HashSet};
use std::f64::consts::TAU;

use geo_types::{Coord, LineString, MultiLineString, MultiPoint, MultiPolygon, Point, Polygon};

use super::clip::assemble;
use super::knife::Knife;
use super::ring::{clean_ring, cross, open, oriented, signed_area};
use crate::error::{GinsuError, Result};

type Key = (u64, u64);

fn key(coord: Coord<f64>) -> Key {
    (coord.x.to_bits(), coord.y.to_bits())
}

fn positive_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

/// Moves vertices onto the knife lines they touch
struct Snapper<'a> {
    knives: &'a [Knife],
    offset: f64,
    /// Per knife, sorted representatives of the along ordinates seen on it
    stops: Vec<Vec<f64>>,
}

impl<'a> Snapper<'a> {
    fn new(knives: &'a [Knife], offset: f64, coords: impl Iterator<Item = Coord<f64>> + Clone) -> Self {
        let stops = knives
            .iter()
            .map(|knife| {
                let mut along: Vec<f64> = coords
                    .clone()
                    .filter(|&c| knife.touches(c))
                    .map(|c| knife.ordinate_of(c))
                    .collect();
                along.sort_by(f64::total_cmp);

                let mut representatives: Vec<f64> = Vec::new();
                for value in along {
                    if representatives.last().map_or(true, |&r| value - r > offset) {
                        representatives.push(value);
                    }
                }
                representatives
            })
            .collect();

        Self {
            knives,
            offset,
            stops,
        }
    }

    fn snap(&self, coord: Coord<f64>) -> Coord<f64> {
        let mut coord = coord;
        for (knife, stops) in self.knives.iter().zip(&self.stops) {
            if knife.touches(coord) {
                let along = knife.ordinate_of(coord);
                let index = stops.partition_point(|&s| s < along - self.offset);
                if let Some(&representative) = stops.get(index) {
                    if (representative - along).abs() <= self.offset {
                        coord = knife.slide(coord, representative);
                    }
                }
            }
        }

        // cross ordinates last, so vertices on two knives land exactly on both
        for knife in self.knives {
            if knife.touches(coord) {
                coord = knife.snap(coord);
            }
        }

        Coord {
            x: positive_zero(coord.x),
            y: positive_zero(coord.y),
        }
    }
}

fn touches_any(knives: &[Knife], coord: Coord<f64>) -> bool {
    knives.iter().any(|knife| knife.touches(coord))
}

fn on_line(knife: &Knife, coord: Coord<f64>) -> bool {
    knife.cross_ordinate(coord) == knife.value()
}

/// `v` lies within `offset` of the segment `p -> n` and between its ends
fn collinear(p: Coord<f64>, v: Coord<f64>, n: Coord<f64>, offset: f64) -> bool {
    let length = (n.x - p.x).hypot(n.y - p.y);
    if length == 0.0 {
        return false;
    }
    let forward = (v.x - p.x) * (n.x - v.x) + (v.y - p.y) * (n.y - v.y) >= 0.0;
    forward && cross(p, v, n).abs() / length <= offset
}

/// Split an edge lying on a knife line at every station strictly inside it.
fn split_edge(
    a: Coord<f64>,
    b: Coord<f64>,
    knives: &[Knife],
    stations: &[Vec<f64>],
    edges: &mut Vec<(Coord<f64>, Coord<f64>)>,
) {
    for (knife, stops) in knives.iter().zip(stations) {
        if !(on_line(knife, a) && on_line(knife, b)) {
            continue;
        }

        let (from, to) = (knife.ordinate_of(a), knife.ordinate_of(b));
        let (low, high) = (from.min(to), from.max(to));
        let first = stops.partition_point(|&s| s <= low);
        let last = stops.partition_point(|&s| s < high);
        let mut inner: Vec<f64> = stops[first..last.max(first)].to_vec();
        if from > to {
            inner.reverse();
        }

        let mut previous = a;
        for ordinate in inner {
            let station = knife.point_at(ordinate);
            edges.push((previous, station));
            previous = station;
        }
        edges.push((previous, b));
        return;
    }

    edges.push((a, b));
}

/// Clockwise angle swept from `reference` to `candidate`, in `(0, 2pi]`
fn clockwise_angle(reference: Coord<f64>, candidate: Coord<f64>) -> f64 {
    let angle = (reference.y.atan2(reference.x) - candidate.y.atan2(candidate.x)).rem_euclid(TAU);
    if angle == 0.0 {
        TAU
    } else {
        angle
    }
}

fn trace(edges: &[(Coord<f64>, Coord<f64>)]) -> Result<Vec<Vec<Coord<f64>>>> {
    let mut outgoing: HashMap<Key, Vec<usize>> = HashMap::new();
    for (index, (from, _)) in edges.iter().enumerate() {
        outgoing.entry(key(*from)).or_default().push(index);
    }

    let mut used = vec![false; edges.len()];
    let mut rings = Vec::new();

    for start in 0..edges.len() {
        if used[start] {
            continue;
        }

        let mut ring = Vec::new();
        let mut current = start;
        loop {
            used[current] = true;
            let (from, at) = edges[current];
            ring.push(from);

            let back = Coord {
                x: from.x - at.x,
                y: from.y - at.y,
            };
            let next = outgoing
                .get(&key(at))
                .into_iter()
                .flatten()
                .copied()
                .filter(|&e| !used[e] || e == start)
                .min_by(|&l, &r| {
                    let angle = |e: usize| {
                        let (_, to) = edges[e];
                        clockwise_angle(back, Coord { x: to.x - at.x, y: to.y - at.y })
                    };
                    angle(l).total_cmp(&angle(r))
                })
                .ok_or_else(|| GinsuError::Topology(format!("dangling edge ending at {at:?}")))?;

            if next == start {
                break;
            }
            current = next;
        }

        rings.push(ring);
    }

    Ok(rings)
}

/// Drop vertices on knife lines that sit on the straight line through their neighbours.
fn remove_collinear(mut ring: Vec<Coord<f64>>, knives: &[Knife], offset: f64) -> Vec<Coord<f64>> {
    let mut changed = true;
    while changed && ring.len() > 3 {
        changed = false;
        let mut i = 0;
        while i < ring.len() && ring.len() > 3 {
            let n = ring.len();
            let (p, v, q) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            if touches_any(knives, v) && collinear(p, v, q, offset) {
                ring.remove(i);
                changed = true;
            } else {
                i += 1;
            }
        }
    }
    ring
}

fn touches_polygon(polygon: &Polygon<f64>, knives: &[Knife]) -> bool {
    std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.0.iter())
        .any(|&c| touches_any(knives, c))
}

/// Reassemble polygons cut along `knives`.
///
/// Polygons with no vertex on a knife line are passed through unchanged.
pub fn merge_polygons<'a, I>(pieces: I, knives: &[Knife], offset: f64) -> Result<MultiPolygon<f64>>
where
    I: IntoIterator<Item = &'a Polygon<f64>>,
{
    let (touching, untouched): (Vec<&Polygon<f64>>, Vec<&Polygon<f64>>) = pieces
        .into_iter()
        .filter(|polygon| !polygon.exterior().0.is_empty())
        .partition(|polygon| touches_polygon(polygon, knives));

    let mut rings: Vec<Vec<Coord<f64>>> = Vec::new();
    for polygon in &touching {
        rings.push(oriented(polygon.exterior(), true));
        rings.extend(
            polygon
                .interiors()
                .iter()
                .filter(|hole| !hole.0.is_empty())
                .map(|hole| oriented(hole, false)),
        );
    }

    let snapper = Snapper::new(knives, offset, rings.iter().flat_map(|r| r.iter().copied()));
    let rings: Vec<Vec<Coord<f64>>> = rings
        .iter()
        .map(|ring| {
            let mut snapped: Vec<Coord<f64>> = open(ring).iter().map(|&c| snapper.snap(c)).collect();
            snapped.dedup();
            while snapped.len() > 1 && snapped.first() == snapped.last() {
                snapped.pop();
            }
            snapped
        })
        .filter(|ring| ring.len() >= 3)
        .collect();

    let stations = knife_stations(knives, rings.iter().flatten());

    let mut edges = Vec::new();
    for ring in &rings {
        for i in 0..ring.len() {
            split_edge(ring[i], ring[(i + 1) % ring.len()], knives, &stations, &mut edges);
        }
    }

    let mut counts: HashMap<(Key, Key), isize> = HashMap::new();
    for &(a, b) in &edges {
        *counts.entry((key(a), key(b))).or_default() += 1;
    }
    let mut budget: HashMap<(Key, Key), isize> = counts
        .iter()
        .map(|(&(a, b), &count)| ((a, b), count - counts.get(&(b, a)).copied().unwrap_or(0)))
        .collect();
    let kept: Vec<(Coord<f64>, Coord<f64>)> = edges
        .into_iter()
        .filter(|&(a, b)| match budget.get_mut(&(key(a), key(b))) {
            Some(left) if *left > 0 => {
                *left -= 1;
                true
            }
            _ => false,
        })
        .collect();

    let mut shells = Vec::new();
    let mut holes = Vec::new();
    for ring in trace(&kept)? {
        let ring = remove_collinear(ring, knives, offset);
        if let Some(cleaned) = clean_ring(&ring, offset) {
            if signed_area(&cleaned) > 0.0 {
                shells.push(cleaned);
            } else {
                holes.push(cleaned);
            }
        }
    }

    let mut polygons = assemble(shells, holes)?;
    polygons.extend(untouched.into_iter().cloned());
    Ok(MultiPolygon(polygons))
}

fn on_knife_line(knives: &[Knife], a: Coord<f64>, b: Coord<f64>) -> bool {
    knives.iter().any(|knife| on_line(knife, a) && on_line(knife, b))
}

fn undirected(a: Coord<f64>, b: Coord<f64>) -> (Key, Key) {
    let (a, b) = (key(a), key(b));
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Sorted along ordinates of every vertex lying exactly on each knife line
fn knife_stations<'a>(knives: &[Knife], coords: impl Iterator<Item = &'a Coord<f64>> + Clone) -> Vec<Vec<f64>> {
    knives
        .iter()
        .map(|knife| {
            let mut stops: Vec<f64> = coords
                .clone()
                .filter(|&&c| on_line(knife, c))
                .map(|&c| knife.ordinate_of(c))
                .collect();
            stops.sort_by(f64::total_cmp);
            stops.dedup();
            stops
        })
        .collect()
}

/// Drop interior vertices on knife lines that sit between their neighbours.
fn simplify_line(coords: Vec<Coord<f64>>, knives: &[Knife], offset: f64) -> Vec<Coord<f64>> {
    let mut out: Vec<Coord<f64>> = Vec::with_capacity(coords.len());
    for (i, &coord) in coords.iter().enumerate() {
        if i > 0 && i + 1 < coords.len() {
            if let Some(&previous) = out.last() {
                if touches_any(knives, coord) && collinear(previous, coord, coords[i + 1], offset) {
                    continue;
                }
            }
        }
        out.push(coord);
    }
    out
}

/// Reassemble line strings cut along `knives`.
///
/// A stretch of line running along a knife line lands in the cells on both
/// sides of it; one copy of every such segment is kept. Runs meeting end to
/// start on a knife line are then joined, dropping the vertices on knife
/// lines that the joins leave collinear.
pub fn merge_lines<'a, I>(pieces: I, knives: &[Knife], offset: f64) -> MultiLineString<f64>
where
    I: IntoIterator<Item = &'a LineString<f64>>,
{
    let pieces: Vec<&LineString<f64>> = pieces.into_iter().filter(|l| l.0.len() >= 2).collect();
    let snapper = Snapper::new(knives, offset, pieces.iter().flat_map(|l| l.0.iter().copied()));

    let snapped: Vec<Vec<Coord<f64>>> = pieces
        .iter()
        .map(|line| {
            let mut coords: Vec<Coord<f64>> = line.0.iter().map(|&c| snapper.snap(c)).collect();
            coords.dedup();
            coords
        })
        .filter(|coords| coords.len() >= 2)
        .collect();

    let stations = knife_stations(knives, snapped.iter().flatten());
    let segmented: Vec<Vec<(Coord<f64>, Coord<f64>)>> = snapped
        .iter()
        .map(|coords| {
            let mut edges = Vec::new();
            for pair in coords.windows(2) {
                split_edge(pair[0], pair[1], knives, &stations, &mut edges);
            }
            edges
        })
        .collect();

    let mut copies: HashMap<(Key, Key), usize> = HashMap::new();
    for &(a, b) in segmented.iter().flatten() {
        if on_knife_line(knives, a, b) {
            *copies.entry(undirected(a, b)).or_default() += 1;
        }
    }
    // every segment on a knife line was emitted by both neighbouring cells
    let mut budget: HashMap<(Key, Key), usize> = copies.into_iter().map(|(k, n)| (k, (n + 1) / 2)).collect();

    let mut lines: Vec<Vec<Coord<f64>>> = Vec::new();
    for edges in segmented {
        let mut run: Vec<Coord<f64>> = Vec::new();
        for (a, b) in edges {
            let keep = !on_knife_line(knives, a, b)
                || match budget.get_mut(&undirected(a, b)) {
                    Some(left) if *left > 0 => {
                        *left -= 1;
                        true
                    }
                    _ => false,
                };

            if keep {
                if run.is_empty() {
                    run.push(a);
                }
                run.push(b);
            } else if run.len() >= 2 {
                lines.push(std::mem::take(&mut run));
            } else {
                run.clear();
            }
        }
        if run.len() >= 2 {
            lines.push(run);
        }
    }

    let mut starts: HashMap<Key, Vec<usize>> = HashMap::new();
    let mut ends: HashSet<Key> = HashSet::new();
    for (index, coords) in lines.iter().enumerate() {
        if touches_any(knives, coords[0]) {
            starts.entry(key(coords[0])).or_default().push(index);
        }
        if let Some(&last) = coords.last() {
            if touches_any(knives, last) {
                ends.insert(key(last));
            }
        }
    }

    // runs nobody continues into go first, so chains are walked from their head
    let (heads, rest): (Vec<usize>, Vec<usize>) =
        (0..lines.len()).partition(|&i| !ends.contains(&key(lines[i][0])));

    let mut consumed = vec![false; lines.len()];
    let mut merged = Vec::new();
    for index in heads.into_iter().chain(rest) {
        if consumed[index] {
            continue;
        }
        consumed[index] = true;
        let mut coords = lines[index].clone();

        loop {
            let Some(&end) = coords.last() else { break };
            if !touches_any(knives, end) {
                break;
            }
            let next = starts
                .get(&key(end))
                .and_then(|candidates| candidates.iter().copied().find(|&j| !consumed[j]));
            let Some(next) = next else { break };

            consumed[next] = true;
            coords.extend_from_slice(&lines[next][1..]);
        }

        merged.push(LineString(simplify_line(coords, knives, offset)));
    }

    MultiLineString(merged)
}

/// Reassemble points, dropping the copies of points lying on knife lines.
pub fn merge_points<'a, I>(points: I, knives: &[Knife], offset: f64) -> MultiPoint<f64>
where
    I: IntoIterator<Item = &'a Point<f64>>,
{
    let points: Vec<&Point<f64>> = points.into_iter().collect();
    let snapper = Snapper::new(knives, offset, points.iter().map(|p| p.0));

    let mut seen: HashSet<Key> = HashSet::new();
    let mut merged = Vec::with_capacity(points.len());
    for point in points {
        if touches_any(knives, point.0) {
            let snapped = snapper.snap(point.0);
            if seen.insert(key(snapped)) {
                merged.push(Point(snapped));
            }
        } else {
            merged.push(*point);
        }
    }

    MultiPoint(merged)
}
