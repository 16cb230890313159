//! Ring and coordinate helpers shared by slicing and merging

use geo_types::{Coord, Geometry, LineString, MultiPolygon, Polygon, Rect};

/// Position of a point relative to a ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RingLocation {
    Interior,
    Boundary,
    Exterior,
}

/// Shoelace signed area; positive for counter-clockwise rings.
///
/// Works on open or closed coordinate lists.
pub fn signed_area(coords: &[Coord<f64>]) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }

    let mut sum = 0.0;
    for i in 0..coords.len() {
        let a = coords[i];
        let b = coords[(i + 1) % coords.len()];
        sum += a.x * b.y - b.x * a.y;
    }
    sum / 2.0
}

/// Closed ring with the requested orientation
pub fn oriented(ring: &LineString<f64>, counter_clockwise: bool) -> Vec<Coord<f64>> {
    let mut coords = ring.0.clone();
    let area = signed_area(&coords);
    if (area > 0.0) != counter_clockwise && area != 0.0 {
        coords.reverse();
    }
    close(&mut coords);
    coords
}

/// Append the first coordinate when the ring is open.
pub fn close(coords: &mut Vec<Coord<f64>>) {
    if let (Some(&first), Some(&last)) = (coords.first(), coords.last()) {
        if first != last {
            coords.push(first);
        }
    }
}

/// Ring coordinates without the closing point
pub fn open(coords: &[Coord<f64>]) -> &[Coord<f64>] {
    match (coords.first(), coords.last()) {
        (Some(first), Some(last)) if coords.len() > 1 && first == last => {
            &coords[..coords.len() - 1]
        }
        _ => coords,
    }
}

pub fn near(a: Coord<f64>, b: Coord<f64>, offset: f64) -> bool {
    (a.x - b.x).abs() <= offset && (a.y - b.y).abs() <= offset
}

/// Remove consecutive repeated points (cyclically) and close the ring.
///
/// Returns `None` when fewer than three distinct vertices remain or the
/// ring encloses no area.
pub fn clean_ring(coords: &[Coord<f64>], offset: f64) -> Option<Vec<Coord<f64>>> {
    let mut cleaned: Vec<Coord<f64>> = Vec::with_capacity(coords.len() + 1);
    for &coord in open(coords) {
        if cleaned.last().map_or(true, |&last| !near(last, coord, offset)) {
            cleaned.push(coord);
        }
    }

    while cleaned.len() > 1 && near(cleaned[0], cleaned[cleaned.len() - 1], offset) {
        cleaned.pop();
    }

    if cleaned.len() < 3 || signed_area(&cleaned).abs() <= offset * offset {
        return None;
    }

    close(&mut cleaned);
    Some(cleaned)
}

/// Ray crossing point-in-ring test with boundary detection.
pub fn locate_in_ring(point: Coord<f64>, ring: &[Coord<f64>]) -> RingLocation {
    let ring = open(ring);
    let n = ring.len();
    if n < 3 {
        return RingLocation::Exterior;
    }

    let mut crossings = 0usize;
    for i in 0..n {
        let a = ring[i];
        let b = ring[(i + 1) % n];

        if on_segment(point, a, b) {
            return RingLocation::Boundary;
        }

        if (a.y > point.y) != (b.y > point.y) {
            let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
            if x > point.x {
                crossings += 1;
            }
        }
    }

    if crossings % 2 == 1 {
        RingLocation::Interior
    } else {
        RingLocation::Exterior
    }
}

fn on_segment(point: Coord<f64>, a: Coord<f64>, b: Coord<f64>) -> bool {
    let cross = (b.x - a.x) * (point.y - a.y) - (b.y - a.y) * (point.x - a.x);
    if cross != 0.0 {
        return false;
    }
    point.x >= a.x.min(b.x)
        && point.x <= a.x.max(b.x)
        && point.y >= a.y.min(b.y)
        && point.y <= a.y.max(b.y)
}

/// Whether `ring` lies inside `shell`, decided by its first vertex off the shell boundary.
pub fn ring_inside(ring: &[Coord<f64>], shell: &[Coord<f64>]) -> bool {
    for &coord in ring {
        match locate_in_ring(coord, shell) {
            RingLocation::Boundary => continue,
            location => return location == RingLocation::Interior,
        }
    }
    false
}

/// Twice the signed area of the triangle `a, b, c`
pub fn cross(a: Coord<f64>, b: Coord<f64>, c: Coord<f64>) -> f64 {
    (b.x - a.x) * (c.y - a.y) - (b.y - a.y) * (c.x - a.x)
}

/// Bounding rectangle of a list of coordinates
pub fn envelope<'a, I>(coords: I) -> Option<Rect<f64>>
where
    I: IntoIterator<Item = &'a Coord<f64>>,
{
    let mut iter = coords.into_iter();
    let first = *iter.next()?;
    let (mut min, mut max) = (first, first);
    for coord in iter {
        min.x = min.x.min(coord.x);
        min.y = min.y.min(coord.y);
        max.x = max.x.max(coord.x);
        max.y = max.y.max(coord.y);
    }
    Some(Rect::new(min, max))
}

pub fn polygon_envelope(polygon: &Polygon<f64>) -> Option<Rect<f64>> {
    envelope(polygon.exterior().0.iter())
}

pub fn multi_polygon_envelope(multi: &MultiPolygon<f64>) -> Option<Rect<f64>> {
    envelope(multi.0.iter().flat_map(|p| p.exterior().0.iter()))
}

/// Expand `a` to include `b`
pub fn union_envelope(a: Option<Rect<f64>>, b: Option<Rect<f64>>) -> Option<Rect<f64>> {
    match (a, b) {
        (Some(a), Some(b)) => envelope([a.min(), a.max(), b.min(), b.max()].iter()),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Number of coordinates, closing points included
pub fn polygon_points(polygon: &Polygon<f64>) -> usize {
    polygon.exterior().0.len() + polygon.interiors().iter().map(|r| r.0.len()).sum::<usize>()
}

pub fn multi_polygon_points(multi: &MultiPolygon<f64>) -> usize {
    multi.0.iter().map(polygon_points).sum()
}

/// Promote a polygonal geometry to a multipolygon
pub fn to_multi_polygon(geometry: &Geometry<f64>) -> Option<MultiPolygon<f64>> {
    match geometry {
        Geometry::Polygon(polygon) => Some(MultiPolygon(vec![polygon.clone()])),
        Geometry::MultiPolygon(multi) => Some(multi.clone()),
        Geometry::Rect(rect) => Some(MultiPolygon(vec![rect.to_polygon()])),
        Geometry::Triangle(triangle) => Some(MultiPolygon(vec![triangle.to_polygon()])),
        _ => None,
    }
}

/// Total unsigned area
pub fn multi_polygon_area(multi: &MultiPolygon<f64>) -> f64 {
    multi
        .0
        .iter()
        .map(|polygon| {
            signed_area(&polygon.exterior().0).abs()
                - polygon
                    .interiors()
                    .iter()
                    .map(|hole| signed_area(&hole.0).abs())
                    .sum::<f64>()
        })
        .sum()
}

/// Canonical form for comparisons: shells counter-clockwise, holes clockwise,
/// every ring starting at its smallest coordinate, holes and polygons sorted.
pub fn normalize(multi: &MultiPolygon<f64>) -> MultiPolygon<f64> {
    let mut polygons: Vec<Polygon<f64>> = multi
        .0
        .iter()
        .filter(|polygon| !polygon.exterior().0.is_empty())
        .map(|polygon| {
            let shell = rotate_to_min(oriented(polygon.exterior(), true));
            let mut holes: Vec<Vec<Coord<f64>>> = polygon
                .interiors()
                .iter()
                .map(|hole| rotate_to_min(oriented(hole, false)))
                .collect();
            holes.sort_by(|a, b| compare_coords(a[0], b[0]));
            Polygon::new(
                LineString(shell),
                holes.into_iter().map(LineString).collect(),
            )
        })
        .collect();

    polygons.sort_by(|a, b| compare_coords(a.exterior().0[0], b.exterior().0[0]));
    MultiPolygon(polygons)
}

fn rotate_to_min(coords: Vec<Coord<f64>>) -> Vec<Coord<f64>> {
    let ring = open(&coords);
    let Some(start) = (0..ring.len()).min_by(|&a, &b| compare_coords(ring[a], ring[b])) else {
        return coords;
    };
    let mut rotated: Vec<Coord<f64>> = ring[start..].iter().chain(ring[..start].iter()).copied().collect();
    close(&mut rotated);
    rotated
}

pub fn compare_coords(a: Coord<f64>, b: Coord<f64>) -> std::cmp::Ordering {
    a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y))
}
