//! Axis-aligned geographic bounding box in MC2 units.
//!
//! Latitude comparisons are plain integer comparisons. Longitude comparisons
//! go through wrapping subtraction, so a box may straddle the ±180° seam as
//! long as it spans less than half the globe.

use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

use crate::clip::segment_intersection;
use crate::coord::{Coordinate, METER_TO_MC2, MC2_TO_RADIANS, SQUARE_MC2_TO_SQUARE_METER};

/// Latitude stored in both latitude fields of an empty box.
pub const EMPTY_LAT: i32 = i32::MAX - 1;

/// Cohen-Sutherland region code of a position relative to a box.
///
/// LEFT and RIGHT are mutually exclusive, as are BOTTOM and TOP. A code of
/// zero means the position lies inside the closed box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Outcode(u8);

impl Outcode {
    pub const INSIDE: Outcode = Outcode(0);
    /// West of `min_lon`.
    pub const LEFT: Outcode = Outcode(0x1);
    /// East of `max_lon`.
    pub const RIGHT: Outcode = Outcode(0x2);
    /// South of `min_lat`.
    pub const BOTTOM: Outcode = Outcode(0x4);
    /// North of `max_lat`.
    pub const TOP: Outcode = Outcode(0x8);

    pub fn bits(self) -> u8 {
        self.0
    }

    pub fn is_inside(self) -> bool {
        self.0 == 0
    }

    /// True when every bit of `other` is set in `self`.
    pub fn has(self, other: Outcode) -> bool {
        other.0 != 0 && self.0 & other.0 == other.0
    }
}

impl BitOr for Outcode {
    type Output = Outcode;
    fn bitor(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 | rhs.0)
    }
}

impl BitOrAssign for Outcode {
    fn bitor_assign(&mut self, rhs: Outcode) {
        self.0 |= rhs.0;
    }
}

impl BitAnd for Outcode {
    type Output = Outcode;
    fn bitand(self, rhs: Outcode) -> Outcode {
        Outcode(self.0 & rhs.0)
    }
}

/// Box corners, numbered in the order used by tile renderers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomLeft = 2,
    BottomRight = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub max_lat: i32,
    pub min_lat: i32,
    pub max_lon: i32,
    pub min_lon: i32,
    /// Cosine of the mean latitude, used to foreshorten longitude.
    pub cos_lat: f64,
}

impl Default for BoundingBox {
    fn default() -> Self {
        Self {
            max_lat: EMPTY_LAT,
            min_lat: EMPTY_LAT,
            max_lon: 0,
            min_lon: 0,
            cos_lat: 0.0,
        }
    }
}

impl BoundingBox {
    /// An empty box; the first `update` seeds it.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_bounds(max_lat: i32, min_lon: i32, min_lat: i32, max_lon: i32) -> Self {
        let mut bbox = Self {
            max_lat,
            min_lat,
            max_lon,
            min_lon,
            cos_lat: 0.0,
        };
        bbox.update_cos_lat();
        bbox
    }

    /// Smallest box holding both coordinates.
    pub fn from_corners(c1: Coordinate, c2: Coordinate) -> Self {
        let mut bbox = Self::new();
        bbox.update_deferred(c1);
        bbox.update(c2);
        bbox
    }

    /// Box reaching `radius_m` meters from `center` in every direction.
    pub fn around(center: Coordinate, radius_m: u32) -> Self {
        let mut bbox = Self::new();
        bbox.update(center);
        bbox.increase_meters(radius_m);
        bbox
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn is_valid(&self) -> bool {
        self.max_lat != EMPTY_LAT && self.min_lat != EMPTY_LAT
    }

    /// Grow the box to include `coord` and refresh the cos-lat.
    pub fn update(&mut self, coord: Coordinate) {
        if self.grow_to(coord) {
            self.update_cos_lat();
        }
    }

    /// Grow the box without refreshing the cos-lat. Call
    /// [`update_cos_lat`](Self::update_cos_lat) once the batch is done.
    pub fn update_deferred(&mut self, coord: Coordinate) {
        self.grow_to(coord);
    }

    pub fn update_bbox(&mut self, other: &BoundingBox) {
        if !other.is_valid() {
            return;
        }
        self.update_deferred(Coordinate::new(other.min_lat, other.min_lon));
        self.update(Coordinate::new(other.max_lat, other.max_lon));
    }

    fn grow_to(&mut self, coord: Coordinate) -> bool {
        if self.min_lat == EMPTY_LAT {
            self.max_lat = coord.lat;
            self.min_lat = coord.lat;
            self.max_lon = coord.lon;
            self.min_lon = coord.lon;
            return true;
        }
        let mut changed = false;
        if coord.lat > self.max_lat {
            self.max_lat = coord.lat;
            changed = true;
        }
        if coord.lat < self.min_lat {
            self.min_lat = coord.lat;
            changed = true;
        }
        if coord.lon.wrapping_sub(self.max_lon) > 0 {
            self.max_lon = coord.lon;
            changed = true;
        }
        if coord.lon.wrapping_sub(self.min_lon) < 0 {
            self.min_lon = coord.lon;
            changed = true;
        }
        changed
    }

    /// Recompute `cos_lat` from the mean latitude. The halves are summed
    /// separately so extreme latitudes cannot overflow.
    pub fn update_cos_lat(&mut self) {
        let mean = (self.max_lat / 2) + (self.min_lat / 2);
        self.cos_lat = (MC2_TO_RADIANS * mean as f64).cos();
    }

    pub fn set_cos_lat(&mut self, cos_lat: f64) {
        self.cos_lat = cos_lat;
    }

    pub fn cos_lat(&self) -> f64 {
        self.cos_lat
    }

    /// Closed containment: the border counts as inside.
    pub fn contains(&self, coord: Coordinate) -> bool {
        coord.lat >= self.min_lat
            && coord.lat <= self.max_lat
            && coord.lon.wrapping_sub(self.max_lon) <= 0
            && coord.lon.wrapping_sub(self.min_lon) >= 0
    }

    /// Open containment: the border counts as outside.
    pub fn inside(&self, coord: Coordinate) -> bool {
        coord.lat > self.min_lat
            && coord.lat < self.max_lat
            && coord.lon.wrapping_sub(self.max_lon) < 0
            && coord.lon.wrapping_sub(self.min_lon) > 0
    }

    /// True when this whole box lies within `other`.
    pub fn inside_of(&self, other: &BoundingBox) -> bool {
        other.contains(Coordinate::new(self.min_lat, self.min_lon))
            && other.contains(Coordinate::new(self.max_lat, self.max_lon))
    }

    pub fn on_border(&self, coord: Coordinate) -> bool {
        self.contains(coord) && !self.inside(coord)
    }

    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        fn in_range(a: i32, b: i32, c: i32) -> bool {
            a.wrapping_sub(b) <= 0 && b.wrapping_sub(c) <= 0
        }
        other.max_lat >= self.min_lat
            && self.max_lat >= other.min_lat
            && (in_range(self.min_lon, other.min_lon, self.max_lon)
                || in_range(self.min_lon, other.max_lon, self.max_lon)
                || in_range(other.min_lon, self.min_lon, other.max_lon)
                || in_range(other.min_lon, self.max_lon, other.max_lon))
    }

    /// The overlapping part of two boxes, if any.
    pub fn intersection(&self, other: &BoundingBox) -> Option<BoundingBox> {
        if !self.overlaps(other) {
            return None;
        }
        let min_lon = if self.min_lon.wrapping_sub(other.min_lon) < 0 {
            other.min_lon
        } else {
            self.min_lon
        };
        let max_lon = if self.max_lon.wrapping_sub(other.max_lon) > 0 {
            other.max_lon
        } else {
            self.max_lon
        };
        Some(BoundingBox::from_bounds(
            self.max_lat.min(other.max_lat),
            min_lon,
            self.min_lat.max(other.min_lat),
            max_lon,
        ))
    }

    pub fn outcode(&self, coord: Coordinate) -> Outcode {
        let mut code = Outcode::INSIDE;
        if coord.lon.wrapping_sub(self.min_lon) < 0 {
            code = Outcode::LEFT;
        } else if coord.lon.wrapping_sub(self.max_lon) > 0 {
            code = Outcode::RIGHT;
        }
        if coord.lat < self.min_lat {
            code |= Outcode::BOTTOM;
        } else if coord.lat > self.max_lat {
            code |= Outcode::TOP;
        }
        code
    }

    /// Where the segment `p1`-`p2` crosses the line of one box edge.
    ///
    /// `boundary` must name exactly one edge. Returns `None` when it does not
    /// or when the segment runs parallel to that edge.
    pub fn boundary_intersection(
        &self,
        p1: Coordinate,
        p2: Coordinate,
        boundary: Outcode,
    ) -> Option<Coordinate> {
        let lon_step = p2.lon.wrapping_sub(p1.lon) as f64;
        let lat_step = p2.lat as f64 - p1.lat as f64;
        match boundary {
            Outcode::LEFT | Outcode::RIGHT => {
                if p1.lon == p2.lon {
                    return None;
                }
                let lon = if boundary == Outcode::LEFT {
                    self.min_lon
                } else {
                    self.max_lon
                };
                let along = lon.wrapping_sub(p1.lon) as f64;
                let lat = p1.lat.wrapping_add((lat_step / lon_step * along).round() as i32);
                Some(Coordinate::new(lat, lon))
            }
            Outcode::TOP | Outcode::BOTTOM => {
                if p1.lat == p2.lat {
                    return None;
                }
                let lat = if boundary == Outcode::TOP {
                    self.max_lat
                } else {
                    self.min_lat
                };
                let along = lat as f64 - p1.lat as f64;
                let lon = p1.lon.wrapping_add((lon_step / lat_step * along).round() as i32);
                Some(Coordinate::new(lat, lon))
            }
            _ => None,
        }
    }

    /// Squared distance from `coord` to the nearest point of the box, in MC2
    /// units. Zero for points inside. `cos_lat` overrides the box's own.
    pub fn square_mc2_dist_to(&self, coord: Coordinate, cos_lat: Option<f64>) -> i64 {
        let cos_lat = cos_lat.unwrap_or(self.cos_lat);
        let lat_part = if coord.lat < self.min_lat {
            self.min_lat as i64 - coord.lat as i64
        } else if coord.lat > self.max_lat {
            coord.lat as i64 - self.max_lat as i64
        } else {
            0
        };
        let west = self.min_lon.wrapping_sub(coord.lon);
        let east = coord.lon.wrapping_sub(self.max_lon);
        let lon_part = if west > 0 {
            (cos_lat * west as f64) as i64
        } else if east > 0 {
            (cos_lat * east as f64) as i64
        } else {
            0
        };
        lat_part * lat_part + lon_part * lon_part
    }

    /// Squared distance in square meters.
    pub fn square_dist_to(&self, coord: Coordinate, cos_lat: Option<f64>) -> i64 {
        (SQUARE_MC2_TO_SQUARE_METER * self.square_mc2_dist_to(coord, cos_lat) as f64) as i64
    }

    /// Squared distance from `coord` to the farthest corner of the box, in MC2
    /// units.
    pub fn max_square_mc2_dist_to(&self, coord: Coordinate, cos_lat: Option<f64>) -> i64 {
        let cos_lat = cos_lat.unwrap_or(self.cos_lat);
        let mid_lon = self.min_lon.wrapping_add(self.lon_diff() / 2);
        let mid_lat = ((self.max_lat as i64 + self.min_lat as i64) / 2) as i32;
        let lon_part = if coord.lon.wrapping_sub(mid_lon) < 0 {
            (cos_lat * self.max_lon.wrapping_sub(coord.lon) as f64) as i64
        } else {
            (cos_lat * coord.lon.wrapping_sub(self.min_lon) as f64) as i64
        };
        let far_lat = if mid_lat > coord.lat {
            self.max_lat
        } else {
            self.min_lat
        };
        let lat_part = far_lat as i64 - coord.lat as i64;
        lon_part * lon_part + lat_part * lat_part
    }

    pub fn max_square_dist_to(&self, coord: Coordinate, cos_lat: Option<f64>) -> i64 {
        (SQUARE_MC2_TO_SQUARE_METER * self.max_square_mc2_dist_to(coord, cos_lat) as f64) as i64
    }

    /// Push every edge out by `meters`. Longitude grows by the latitude step
    /// divided by the cos-lat.
    pub fn increase_meters(&mut self, meters: u32) {
        let lat_inc = (meters as f64 * METER_TO_MC2) as i32;
        let lon_inc = if self.cos_lat > 0.0 {
            (meters as f64 * METER_TO_MC2 / self.cos_lat) as i32
        } else {
            lat_inc
        };
        self.max_lat = self.max_lat.saturating_add(lat_inc);
        self.min_lat = self.min_lat.saturating_sub(lat_inc);
        self.max_lon = self.max_lon.wrapping_add(lon_inc);
        self.min_lon = self.min_lon.wrapping_sub(lon_inc);
        self.update_cos_lat();
    }

    /// Grow (or shrink, for negative `percent`) each dimension by the given
    /// fraction, split evenly between both sides.
    pub fn increase_factor(&mut self, percent: f64) {
        let lat_inc = (self.height() as f64 * percent / 2.0) as i32;
        let lon_inc = (self.lon_diff() as f64 * percent / 2.0) as i32;
        self.max_lat = self.max_lat.saturating_add(lat_inc);
        self.min_lat = self.min_lat.saturating_sub(lat_inc);
        self.max_lon = self.max_lon.wrapping_add(lon_inc);
        self.min_lon = self.min_lon.wrapping_sub(lon_inc);
        self.update_cos_lat();
    }

    /// Copy scaled by `factor` around its center; `2.0` doubles each side.
    pub fn scaled(&self, factor: f64) -> BoundingBox {
        let mut bbox = *self;
        bbox.increase_factor(factor - 1.0);
        bbox
    }

    /// Push every edge out by a fixed number of MC2 units.
    pub fn grow(&mut self, units: i32) {
        self.max_lat = self.max_lat.saturating_add(units);
        self.min_lat = self.min_lat.saturating_sub(units);
        self.max_lon = self.max_lon.wrapping_add(units);
        self.min_lon = self.min_lon.wrapping_sub(units);
    }

    pub fn center(&self) -> Option<Coordinate> {
        if !self.is_valid() {
            return None;
        }
        let half_lon = (self.lon_diff() as f64 / 2.0).round() as i32;
        let half_lat = ((self.max_lat as f64 - self.min_lat as f64) / 2.0).round() as i32;
        Some(Coordinate::new(
            self.min_lat.wrapping_add(half_lat),
            self.min_lon.wrapping_add(half_lon),
        ))
    }

    /// Longitude span scaled by the cos-lat.
    pub fn width(&self) -> i32 {
        (self.cos_lat * self.lon_diff() as f64) as i32
    }

    pub fn lon_diff(&self) -> i32 {
        self.max_lon.wrapping_sub(self.min_lon)
    }

    pub fn height(&self) -> i32 {
        self.max_lat.wrapping_sub(self.min_lat)
    }

    /// Area in square MC2 units, longitude foreshortened.
    pub fn area(&self) -> i64 {
        self.width() as i64 * self.height() as i64
    }

    pub fn corner(&self, corner: Corner) -> Coordinate {
        match corner {
            Corner::TopLeft => Coordinate::new(self.max_lat, self.min_lon),
            Corner::TopRight => Coordinate::new(self.max_lat, self.max_lon),
            Corner::BottomLeft => Coordinate::new(self.min_lat, self.min_lon),
            Corner::BottomRight => Coordinate::new(self.min_lat, self.max_lon),
        }
    }

    /// Which corner `coord` sits on, if any.
    pub fn corner_of(&self, coord: Coordinate) -> Option<Corner> {
        let west = coord.lon == self.min_lon;
        let east = coord.lon == self.max_lon;
        if coord.lat == self.min_lat {
            if west {
                return Some(Corner::BottomLeft);
            } else if east {
                return Some(Corner::BottomRight);
            }
        } else if coord.lat == self.max_lat {
            if west {
                return Some(Corner::TopLeft);
            } else if east {
                return Some(Corner::TopRight);
            }
        }
        None
    }

    fn edges(&self) -> [(Coordinate, Coordinate); 4] {
        [
            (self.corner(Corner::TopLeft), self.corner(Corner::BottomLeft)),
            (self.corner(Corner::TopRight), self.corner(Corner::BottomRight)),
            (self.corner(Corner::TopLeft), self.corner(Corner::TopRight)),
            (self.corner(Corner::BottomLeft), self.corner(Corner::BottomRight)),
        ]
    }

    /// True when any part of the segment `start`-`end` touches the box.
    pub fn segment_intersects(&self, start: Coordinate, end: Coordinate) -> bool {
        if self.contains(start) || self.contains(end) {
            return true;
        }
        let start_code = self.outcode(start);
        let end_code = self.outcode(end);
        if !(start_code & end_code).is_inside() {
            return false;
        }
        let both = start_code | end_code;
        if both == (Outcode::TOP | Outcode::BOTTOM) || both == (Outcode::LEFT | Outcode::RIGHT) {
            return true;
        }
        let [left, right, _, _] = self.edges();
        segment_intersection(start, end, left.0, left.1).is_some()
            || segment_intersection(start, end, right.0, right.1).is_some()
    }

    /// The crossing of `start`-`end` with a box edge that lies closest to
    /// `start`, or `None` when the segment crosses no edge.
    pub fn first_edge_intersection(&self, start: Coordinate, end: Coordinate) -> Option<Coordinate> {
        let mut best: Option<(f64, Coordinate)> = None;
        for (i, (e1, e2)) in self.edges().into_iter().enumerate() {
            let Some(hit) = segment_intersection(start, end, e1, e2) else {
                continue;
            };
            // Vertical edges are measured along longitude, horizontal ones
            // along latitude, which cannot be constant for a crossing.
            let t = if i < 2 {
                hit.lon.wrapping_sub(start.lon) as f64 / end.lon.wrapping_sub(start.lon) as f64
            } else {
                (hit.lat as f64 - start.lat as f64) / (end.lat as f64 - start.lat as f64)
            };
            if best.map_or(true, |(best_t, _)| t < best_t) {
                best = Some((t, hit));
            }
        }
        best.map(|(_, hit)| hit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::MC2_PER_DEGREE;
    use approx::assert_relative_eq;

    fn sample() -> BoundingBox {
        BoundingBox::from_bounds(1000, 0, 0, 2000)
    }

    #[test]
    fn test_empty_box_is_invalid() {
        let bbox = BoundingBox::new();
        assert!(!bbox.is_valid());
        assert!(bbox.center().is_none());
    }

    #[test]
    fn test_update_is_monotonic() {
        let mut bbox = BoundingBox::new();
        let points = [
            Coordinate::new(10, 20),
            Coordinate::new(-50, 300),
            Coordinate::new(400, -70),
            Coordinate::new(0, 0),
        ];
        let mut previous: Option<BoundingBox> = None;
        for p in points {
            bbox.update(p);
            assert!(bbox.contains(p));
            if let Some(prev) = previous {
                assert!(prev.inside_of(&bbox));
            }
            previous = Some(bbox);
        }
        assert_eq!(bbox.max_lat, 400);
        assert_eq!(bbox.min_lat, -50);
        assert_eq!(bbox.max_lon, 300);
        assert_eq!(bbox.min_lon, -70);
    }

    #[test]
    fn test_update_across_antimeridian() {
        let west = Coordinate::new(0, i32::MAX - 10);
        let east = Coordinate::new(0, i32::MIN + 10);
        let bbox = BoundingBox::from_corners(west, east);
        assert_eq!(bbox.min_lon, i32::MAX - 10);
        assert_eq!(bbox.max_lon, i32::MIN + 10);
        assert_eq!(bbox.lon_diff(), 21);
        assert!(bbox.contains(Coordinate::new(0, i32::MAX)));
        assert!(bbox.contains(Coordinate::new(0, i32::MIN)));
        assert!(!bbox.contains(Coordinate::new(0, 0)));
    }

    #[test]
    fn test_deferred_update_keeps_cos_lat() {
        let mut bbox = BoundingBox::new();
        bbox.update_deferred(Coordinate::from_degrees(60.0, 0.0));
        bbox.update_deferred(Coordinate::from_degrees(60.0, 1.0));
        assert_eq!(bbox.cos_lat(), 0.0);
        bbox.update_cos_lat();
        assert_relative_eq!(bbox.cos_lat(), 0.5, epsilon = 1e-6);
    }

    #[test]
    fn test_closed_vs_open_containment() {
        let bbox = sample();
        let edge = Coordinate::new(1000, 500);
        assert!(bbox.contains(edge));
        assert!(!bbox.inside(edge));
        assert!(bbox.on_border(edge));
        let middle = Coordinate::new(500, 500);
        assert!(bbox.contains(middle));
        assert!(bbox.inside(middle));
        assert!(!bbox.on_border(middle));
    }

    #[test]
    fn test_outcodes() {
        let bbox = sample();
        assert_eq!(bbox.outcode(Coordinate::new(500, 1000)), Outcode::INSIDE);
        assert_eq!(bbox.outcode(Coordinate::new(500, -1)), Outcode::LEFT);
        assert_eq!(bbox.outcode(Coordinate::new(500, 2001)), Outcode::RIGHT);
        assert_eq!(bbox.outcode(Coordinate::new(-1, 1000)), Outcode::BOTTOM);
        assert_eq!(bbox.outcode(Coordinate::new(1001, 1000)), Outcode::TOP);
        assert_eq!(
            bbox.outcode(Coordinate::new(1001, -1)),
            Outcode::TOP | Outcode::LEFT
        );
        assert_eq!(
            bbox.outcode(Coordinate::new(-1, 2001)),
            Outcode::BOTTOM | Outcode::RIGHT
        );
    }

    #[test]
    fn test_boundary_intersection() {
        let bbox = sample();
        let hit = bbox
            .boundary_intersection(Coordinate::new(0, -1000), Coordinate::new(1000, 1000), Outcode::LEFT)
            .unwrap();
        assert_eq!(hit, Coordinate::new(500, 0));
        let hit = bbox
            .boundary_intersection(Coordinate::new(500, 1000), Coordinate::new(1500, 2000), Outcode::TOP)
            .unwrap();
        assert_eq!(hit, Coordinate::new(1000, 1500));
    }

    #[test]
    fn test_boundary_intersection_rounds_negative_offsets_to_nearest() {
        let bbox = BoundingBox::from_bounds(100, 1, -100, 100);
        let origin = Coordinate::new(0, 0);
        // One unit along a slope of -1.7 lands nearer -2 than -1.
        let down = bbox
            .boundary_intersection(origin, Coordinate::new(-17, 10), Outcode::LEFT)
            .unwrap();
        assert_eq!(down, Coordinate::new(-2, 1));
        let up = bbox
            .boundary_intersection(origin, Coordinate::new(17, 10), Outcode::LEFT)
            .unwrap();
        assert_eq!(up, Coordinate::new(2, 1));
        let left = bbox
            .boundary_intersection(origin, Coordinate::new(10, -17), Outcode::TOP)
            .unwrap();
        assert_eq!(left, Coordinate::new(100, -170));
        let hit = bbox
            .boundary_intersection(Coordinate::new(0, 0), Coordinate::new(-10, -17), Outcode::BOTTOM)
            .unwrap();
        assert_eq!(hit, Coordinate::new(-100, -170));
    }

    #[test]
    fn test_boundary_intersection_rejects_parallel_and_combined_codes() {
        let bbox = sample();
        let a = Coordinate::new(100, -10);
        let b = Coordinate::new(900, -10);
        assert!(bbox.boundary_intersection(a, b, Outcode::LEFT).is_none());
        assert!(bbox
            .boundary_intersection(a, Coordinate::new(100, 50), Outcode::TOP)
            .is_none());
        assert!(bbox
            .boundary_intersection(a, Coordinate::new(500, 50), Outcode::TOP | Outcode::LEFT)
            .is_none());
    }

    #[test]
    fn test_overlaps_and_intersection() {
        let a = sample();
        let b = BoundingBox::from_bounds(1500, 1000, 500, 3000);
        assert!(a.overlaps(&b));
        let i = a.intersection(&b).unwrap();
        assert_eq!((i.max_lat, i.min_lon, i.min_lat, i.max_lon), (1000, 1000, 500, 2000));

        let far = BoundingBox::from_bounds(5000, 5000, 4000, 6000);
        assert!(!a.overlaps(&far));
        assert!(a.intersection(&far).is_none());
    }

    #[test]
    fn test_square_distances() {
        let mut bbox = sample();
        bbox.set_cos_lat(1.0);
        assert_eq!(bbox.square_mc2_dist_to(Coordinate::new(500, 500), None), 0);
        assert_eq!(bbox.square_mc2_dist_to(Coordinate::new(1003, 2004), None), 9 + 16);
        assert_eq!(bbox.square_mc2_dist_to(Coordinate::new(500, -10), Some(0.5)), 25);
        // Farthest corner from the bottom-left corner is the top-right one.
        assert_eq!(
            bbox.max_square_mc2_dist_to(Coordinate::new(0, 0), None),
            2000 * 2000 + 1000 * 1000
        );
        let meters = bbox.square_dist_to(Coordinate::new(101_000, 1000), None);
        assert_relative_eq!(
            meters as f64,
            100_000.0 * 100_000.0 * SQUARE_MC2_TO_SQUARE_METER,
            max_relative = 1e-6
        );
    }

    #[test]
    fn test_increase_meters_scales_longitude_by_cos_lat() {
        let center = Coordinate::from_degrees(60.0, 10.0);
        let bbox = BoundingBox::around(center, 1000);
        let lat_inc = bbox.max_lat - center.lat;
        let lon_inc = bbox.max_lon - center.lon;
        assert_relative_eq!(lat_inc as f64, 1000.0 * METER_TO_MC2, epsilon = 1.0);
        assert_relative_eq!(lon_inc as f64 / lat_inc as f64, 2.0, epsilon = 1e-3);
    }

    #[test]
    fn test_increase_factor_and_scaled() {
        let bbox = sample();
        let bigger = bbox.scaled(2.0);
        assert_eq!(bigger.height(), 2000);
        assert_eq!(bigger.lon_diff(), 4000);
        assert_eq!(bigger.center(), bbox.center());
        let smaller = bbox.scaled(0.5);
        assert_eq!(smaller.height(), 500);
        assert_eq!(smaller.lon_diff(), 1000);
    }

    #[test]
    fn test_latitude_growth_saturates() {
        let mut wide = BoundingBox::from_bounds(1_000_000_000, 0, -1_000_000_000, 1000);
        wide.increase_factor(2.0);
        assert_eq!(wide.max_lat, i32::MAX);
        assert_eq!(wide.min_lat, i32::MIN);

        let mut bbox = BoundingBox::from_bounds(1000, 0, -1000, 2000);
        bbox.grow(i32::MAX);
        assert_eq!(bbox.max_lat, i32::MAX);
        assert_eq!(bbox.min_lat, i32::MIN);
        assert_eq!(bbox.max_lon, 2000i32.wrapping_add(i32::MAX));
    }

    #[test]
    fn test_center_width_and_area() {
        let mut bbox = sample();
        assert_eq!(bbox.center(), Some(Coordinate::new(500, 1000)));
        bbox.set_cos_lat(0.5);
        assert_eq!(bbox.width(), 1000);
        assert_eq!(bbox.area(), 1000 * 1000);
    }

    #[test]
    fn test_corners() {
        let bbox = sample();
        for corner in [
            Corner::TopLeft,
            Corner::TopRight,
            Corner::BottomLeft,
            Corner::BottomRight,
        ] {
            assert_eq!(bbox.corner_of(bbox.corner(corner)), Some(corner));
        }
        assert_eq!(bbox.corner(Corner::TopLeft), Coordinate::new(1000, 0));
        assert_eq!(bbox.corner_of(Coordinate::new(500, 0)), None);
    }

    #[test]
    fn test_segment_intersects() {
        let bbox = sample();
        // Straight through, both endpoints outside on opposite sides.
        assert!(bbox.segment_intersects(Coordinate::new(500, -100), Coordinate::new(500, 2100)));
        // Diagonal cutting a corner.
        assert!(bbox.segment_intersects(Coordinate::new(900, -100), Coordinate::new(1100, 100)));
        // Entirely to the left.
        assert!(!bbox.segment_intersects(Coordinate::new(0, -100), Coordinate::new(1000, -50)));
        // Passing beside a corner without touching.
        assert!(!bbox.segment_intersects(Coordinate::new(1500, -100), Coordinate::new(1100, -500)));
    }

    #[test]
    fn test_first_edge_intersection() {
        let bbox = sample();
        let hit = bbox
            .first_edge_intersection(Coordinate::new(500, -1000), Coordinate::new(500, 3000))
            .unwrap();
        assert_eq!(hit, Coordinate::new(500, 0));
        let hit = bbox
            .first_edge_intersection(Coordinate::new(500, 3000), Coordinate::new(500, -1000))
            .unwrap();
        assert_eq!(hit, Coordinate::new(500, 2000));
        assert!(bbox
            .first_edge_intersection(Coordinate::new(500, 100), Coordinate::new(600, 200))
            .is_none());
    }

    #[test]
    fn test_cos_lat_of_degree_box() {
        let bbox = BoundingBox::from_bounds(
            (61.0 * MC2_PER_DEGREE) as i32,
            0,
            (59.0 * MC2_PER_DEGREE) as i32,
            MC2_PER_DEGREE as i32,
        );
        assert_relative_eq!(bbox.cos_lat(), 60f64.to_radians().cos(), epsilon = 1e-6);
    }
}
