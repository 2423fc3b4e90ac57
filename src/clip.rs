//! Viewport clipping.
//!
//! Polygons are clipped with Sutherland-Hodgeman, one pass per box edge in the
//! fixed order LEFT, RIGHT, TOP, BOTTOM, with Cohen-Sutherland outcodes
//! deciding which side of an edge each vertex is on. Open polylines are split
//! into the runs that fall inside the box.
//!
//! Everything is generic over [`ClipVertex`], so screen-space polygons clip
//! against a [`PixelBox`](crate::pixel_box::PixelBox) exactly as geographic
//! ones clip against a [`BoundingBox`].

use log::debug;

use crate::bbox::{BoundingBox, Outcode};
use crate::coord::{Coordinate, Point};

/// A vertex that can be clipped against a [`BoundingBox`].
///
/// The vertex is viewed as a coordinate: latitude is the vertical axis and
/// longitude the horizontal one.
pub trait ClipVertex: Copy + PartialEq {
    fn to_coordinate(self) -> Coordinate;
    fn from_coordinate(coord: Coordinate) -> Self;
}

impl ClipVertex for Coordinate {
    #[inline]
    fn to_coordinate(self) -> Coordinate {
        self
    }

    #[inline]
    fn from_coordinate(coord: Coordinate) -> Self {
        coord
    }
}

impl ClipVertex for Point {
    #[inline]
    fn to_coordinate(self) -> Coordinate {
        Coordinate::new(self.y, self.x)
    }

    #[inline]
    fn from_coordinate(coord: Coordinate) -> Self {
        Point::new(coord.lon, coord.lat)
    }
}

/// Box edges in the order the passes run.
const PASSES: [Outcode; 4] = [Outcode::LEFT, Outcode::RIGHT, Outcode::TOP, Outcode::BOTTOM];

/// Every edge of a closed polygon as `(previous, current)`, starting with the
/// edge from the last vertex back to the first.
pub fn closed_edges<V: Copy>(vertices: &[V]) -> impl Iterator<Item = (V, V)> + '_ {
    let last = vertices.last().copied();
    last.into_iter()
        .chain(vertices.iter().copied())
        .zip(vertices.iter().copied())
}

/// Reusable clipper. Keeps its buffers between calls so clipping many
/// polygons in a loop does not allocate per polygon.
#[derive(Debug, Default)]
pub struct ClipEngine<V> {
    front: Vec<V>,
    back: Vec<V>,
}

impl<V: ClipVertex> ClipEngine<V> {
    pub fn new() -> Self {
        Self {
            front: Vec::new(),
            back: Vec::new(),
        }
    }

    /// Clip a closed polygon to `bbox`. Returns `None` when fewer than three
    /// vertices remain after any pass.
    ///
    /// The result borrows the engine's buffer and is valid until the next
    /// call.
    pub fn clip(&mut self, bbox: &BoundingBox, vertices: &[V]) -> Option<&[V]> {
        if vertices.len() < 3 {
            debug!("clip: degenerate input with {} vertices", vertices.len());
            return None;
        }

        let mut all = Outcode::INSIDE;
        let mut common = Outcode::LEFT | Outcode::RIGHT | Outcode::TOP | Outcode::BOTTOM;
        for v in vertices {
            let code = bbox.outcode(v.to_coordinate());
            all |= code;
            common = common & code;
        }
        self.front.clear();
        self.front.extend_from_slice(vertices);
        if all.is_inside() {
            return Some(&self.front);
        }
        if !common.is_inside() {
            // Every vertex is beyond the same edge.
            return None;
        }

        for boundary in PASSES {
            if !all.has(boundary) {
                continue;
            }
            self.back.clear();
            clip_to_boundary(bbox, boundary, &self.front, &mut self.back);
            std::mem::swap(&mut self.front, &mut self.back);
            if self.front.len() < 3 {
                debug!("clip: polygon vanished at {boundary:?} edge");
                return None;
            }
        }
        Some(&self.front)
    }
}

/// One Sutherland-Hodgeman pass against a single box edge.
fn clip_to_boundary<V: ClipVertex>(
    bbox: &BoundingBox,
    boundary: Outcode,
    input: &[V],
    output: &mut Vec<V>,
) {
    for (prev, curr) in closed_edges(input) {
        let p = prev.to_coordinate();
        let c = curr.to_coordinate();
        let prev_inside = !bbox.outcode(p).has(boundary);
        let curr_inside = !bbox.outcode(c).has(boundary);
        match (prev_inside, curr_inside) {
            (true, true) => output.push(curr),
            (true, false) => {
                if let Some(hit) = bbox.boundary_intersection(p, c, boundary) {
                    output.push(V::from_coordinate(hit));
                }
            }
            (false, true) => {
                if let Some(hit) = bbox.boundary_intersection(p, c, boundary) {
                    output.push(V::from_coordinate(hit));
                }
                output.push(curr);
            }
            (false, false) => {}
        }
    }
}

/// Clip a closed polygon to `bbox`, see [`ClipEngine::clip`].
pub fn clip_polygon<V: ClipVertex>(bbox: &BoundingBox, vertices: &[V]) -> Option<Vec<V>> {
    ClipEngine::new().clip(bbox, vertices).map(<[V]>::to_vec)
}

fn first_boundary(code: Outcode) -> Outcode {
    [Outcode::LEFT, Outcode::RIGHT, Outcode::BOTTOM, Outcode::TOP]
        .into_iter()
        .find(|&b| code.has(b))
        .unwrap_or(Outcode::INSIDE)
}

/// Cohen-Sutherland clip of one segment. `None` when nothing of it lies in
/// the box.
pub fn clip_segment<V: ClipVertex>(bbox: &BoundingBox, a: V, b: V) -> Option<(V, V)> {
    let mut a = a.to_coordinate();
    let mut b = b.to_coordinate();
    let mut code_a = bbox.outcode(a);
    let mut code_b = bbox.outcode(b);
    // Each step pins one coordinate to an edge; rounding can at worst
    // re-flag the other axis once per endpoint.
    for _ in 0..8 {
        if (code_a | code_b).is_inside() {
            return Some((V::from_coordinate(a), V::from_coordinate(b)));
        }
        if !(code_a & code_b).is_inside() {
            return None;
        }
        let outside_a = !code_a.is_inside();
        let boundary = first_boundary(if outside_a { code_a } else { code_b });
        let hit = bbox.boundary_intersection(a, b, boundary)?;
        if outside_a {
            a = hit;
            code_a = bbox.outcode(a);
        } else {
            b = hit;
            code_b = bbox.outcode(b);
        }
    }
    None
}

/// Split an open polyline into the runs that lie inside `bbox`.
pub fn clip_polyline<V: ClipVertex>(bbox: &BoundingBox, vertices: &[V]) -> Vec<Vec<V>> {
    let mut pieces: Vec<Vec<V>> = Vec::new();
    let mut current: Vec<V> = Vec::new();
    for pair in vertices.windows(2) {
        let Some((start, end)) = clip_segment(bbox, pair[0], pair[1]) else {
            continue;
        };
        if current.last() != Some(&start) {
            if current.len() >= 2 {
                pieces.push(std::mem::take(&mut current));
            }
            current.clear();
            current.push(start);
        }
        current.push(end);
    }
    if current.len() >= 2 {
        pieces.push(current);
    }
    pieces
}

/// Intersection of segments `a1`-`a2` and `b1`-`b2`, endpoints included.
/// `None` for parallel segments or when the crossing lies outside either one.
pub fn segment_intersection<V: ClipVertex>(a1: V, a2: V, b1: V, b2: V) -> Option<V> {
    let (a1, a2) = (a1.to_coordinate(), a2.to_coordinate());
    let (b1, b2) = (b1.to_coordinate(), b2.to_coordinate());
    let alpha = a2.lat.wrapping_sub(a1.lat) as i64;
    let beta = a2.lon.wrapping_sub(a1.lon) as i64;
    let gamma = b2.lat.wrapping_sub(b1.lat) as i64;
    let theta = b2.lon.wrapping_sub(b1.lon) as i64;

    let denominator = theta * alpha - gamma * beta;
    if denominator == 0 {
        return None;
    }
    let dy = a1.lon.wrapping_sub(b1.lon) as i64;
    let dx = b1.lat.wrapping_sub(a1.lat) as i64;
    let s = (dy * alpha + dx * beta) as f64 / denominator as f64;
    let t = (dx * theta + dy * gamma) as f64 / denominator as f64;
    if !(0.0..=1.0).contains(&s) || !(0.0..=1.0).contains(&t) {
        return None;
    }
    Some(V::from_coordinate(Coordinate::new(
        b1.lat.wrapping_add((s * gamma as f64).round() as i32),
        b1.lon.wrapping_add((s * theta as f64).round() as i32),
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixel_box::PixelBox;

    fn unit_box() -> BoundingBox {
        BoundingBox::from_bounds(100, 0, 0, 100)
    }

    fn c(lat: i32, lon: i32) -> Coordinate {
        Coordinate::new(lat, lon)
    }

    #[test]
    fn test_closed_edges_wrap_around() {
        let edges: Vec<_> = closed_edges(&[1, 2, 3]).collect();
        assert_eq!(edges, vec![(3, 1), (1, 2), (2, 3)]);
        assert_eq!(closed_edges::<i32>(&[]).count(), 0);
    }

    #[test]
    fn test_too_few_vertices() {
        assert!(clip_polygon(&unit_box(), &[c(10, 10), c(20, 20)]).is_none());
    }

    #[test]
    fn test_inside_polygon_is_unchanged() {
        let poly = vec![c(10, 10), c(10, 90), c(90, 90), c(90, 10)];
        assert_eq!(clip_polygon(&unit_box(), &poly), Some(poly));
    }

    #[test]
    fn test_outside_polygon_is_dropped() {
        let poly = [c(200, 10), c(200, 90), c(300, 50)];
        assert!(clip_polygon(&unit_box(), &poly).is_none());
        // Around a corner without entering: no shared outside bit, but every
        // vertex ends up clipped away.
        let poly = [c(150, -10), c(150, 40), c(120, -50)];
        assert!(clip_polygon(&unit_box(), &poly).is_none());
    }

    #[test]
    fn test_straddling_square() {
        let poly = [c(-50, -50), c(-50, 50), c(50, 50), c(50, -50)];
        let out = clip_polygon(&unit_box(), &poly).unwrap();
        assert_eq!(out.len(), 4);
        for v in &out {
            assert!(unit_box().contains(*v), "{v:?} outside");
        }
        for corner in [c(0, 0), c(0, 50), c(50, 50), c(50, 0)] {
            assert!(out.contains(&corner), "missing {corner:?} in {out:?}");
        }
    }

    #[test]
    fn test_covering_triangle_gives_box() {
        let poly = [c(-1000, -1000), c(-1000, 3000), c(3000, -1000)];
        let out = clip_polygon(&unit_box(), &poly).unwrap();
        assert_eq!(out.len(), 4);
        for v in &out {
            assert!(unit_box().on_border(*v));
        }
    }

    #[test]
    fn test_clip_points_against_pixel_box() {
        let screen = PixelBox::from_size(200, 100);
        let poly = [
            Point::new(-20, 50),
            Point::new(100, -20),
            Point::new(220, 50),
            Point::new(100, 120),
        ];
        let out = clip_polygon(screen.as_bbox(), &poly).unwrap();
        assert!(out.len() >= 6);
        assert!(out.iter().all(|p| screen.contains(*p)));
    }

    #[test]
    fn test_engine_reuse() {
        let mut engine = ClipEngine::new();
        let bbox = unit_box();
        let big = [c(-50, -50), c(-50, 150), c(150, 150), c(150, -50)];
        assert_eq!(engine.clip(&bbox, &big).map(|v| v.len()), Some(4));
        let small = [c(10, 10), c(10, 20), c(20, 20)];
        assert_eq!(engine.clip(&bbox, &small), Some(&small[..]));
        assert!(engine.clip(&bbox, &[c(500, 500), c(500, 600), c(600, 600)]).is_none());
    }

    #[test]
    fn test_clip_segment() {
        let bbox = unit_box();
        assert_eq!(
            clip_segment(&bbox, c(50, -50), c(50, 150)),
            Some((c(50, 0), c(50, 100)))
        );
        assert_eq!(clip_segment(&bbox, c(10, 10), c(20, 20)), Some((c(10, 10), c(20, 20))));
        assert!(clip_segment(&bbox, c(150, -50), c(150, 150)).is_none());
    }

    #[test]
    fn test_polyline_splits_into_pieces() {
        let bbox = unit_box();
        // In, out over the top, back in, and out the right side.
        let line = [c(50, 10), c(150, 30), c(50, 50), c(50, 150)];
        let pieces = clip_polyline(&bbox, &line);
        assert_eq!(pieces.len(), 2);
        assert_eq!(pieces[0], vec![c(50, 10), c(100, 20)]);
        assert_eq!(pieces[1], vec![c(100, 40), c(50, 50), c(50, 100)]);
    }

    #[test]
    fn test_polyline_fully_outside() {
        let line = [c(500, 10), c(600, 30)];
        assert!(clip_polyline(&unit_box(), &line).is_empty());
    }

    #[test]
    fn test_segment_intersection() {
        assert_eq!(
            segment_intersection(c(0, 0), c(100, 100), c(0, 100), c(100, 0)),
            Some(c(50, 50))
        );
        // Parallel.
        assert!(segment_intersection(c(0, 0), c(100, 100), c(10, 0), c(110, 100)).is_none());
        // Lines cross, segments do not.
        assert!(segment_intersection(c(0, 0), c(10, 10), c(0, 100), c(100, 0)).is_none());
        // Touching at an endpoint counts.
        assert_eq!(
            segment_intersection(c(0, 0), c(50, 50), c(50, 50), c(100, 0)),
            Some(c(50, 50))
        );
    }
}
