//! Screen-space rectangle.
//!
//! A [`PixelBox`] is a [`BoundingBox`] whose latitude axis is screen `y` and
//! whose longitude axis is screen `x`, with the cos-lat pinned to 1. Screen
//! `y` grows downward, so the top edge is `min_y`.

use serde::{Deserialize, Serialize};

use crate::bbox::{BoundingBox, Corner, Outcode};
use crate::coord::{Coordinate, Point};

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PixelBox {
    bbox: BoundingBox,
}

fn to_coord(p: Point) -> Coordinate {
    Coordinate::new(p.y, p.x)
}

impl PixelBox {
    /// Smallest box holding both points.
    pub fn new(p1: Point, p2: Point) -> Self {
        let mut bbox = BoundingBox::new();
        bbox.update_deferred(to_coord(p1));
        bbox.update_deferred(to_coord(p2));
        bbox.set_cos_lat(1.0);
        Self { bbox }
    }

    /// Box spanning a whole `width` x `height` screen.
    pub fn from_size(width: u32, height: u32) -> Self {
        Self::new(Point::new(0, 0), Point::new(width as i32, height as i32))
    }

    pub fn min_x(&self) -> i32 {
        self.bbox.min_lon
    }

    pub fn max_x(&self) -> i32 {
        self.bbox.max_lon
    }

    pub fn min_y(&self) -> i32 {
        self.bbox.min_lat
    }

    pub fn max_y(&self) -> i32 {
        self.bbox.max_lat
    }

    pub fn width(&self) -> i32 {
        self.bbox.lon_diff()
    }

    pub fn height(&self) -> i32 {
        self.bbox.height()
    }

    pub fn update(&mut self, p: Point) {
        self.bbox.update_deferred(to_coord(p));
    }

    pub fn contains(&self, p: Point) -> bool {
        self.bbox.contains(to_coord(p))
    }

    /// Region code with the box roles kept: `TOP` means past `max_y`.
    pub fn outcode(&self, p: Point) -> Outcode {
        self.bbox.outcode(to_coord(p))
    }

    /// Corner as seen on screen: top is the smaller `y`.
    pub fn corner(&self, corner: Corner) -> Point {
        match corner {
            Corner::TopLeft => Point::new(self.min_x(), self.min_y()),
            Corner::TopRight => Point::new(self.max_x(), self.min_y()),
            Corner::BottomLeft => Point::new(self.min_x(), self.max_y()),
            Corner::BottomRight => Point::new(self.max_x(), self.max_y()),
        }
    }

    pub fn center(&self) -> Point {
        Point::new(
            self.min_x() + self.width() / 2,
            self.min_y() + self.height() / 2,
        )
    }

    pub fn move_by(&mut self, dx: i32, dy: i32) {
        self.bbox.min_lon = self.bbox.min_lon.saturating_add(dx);
        self.bbox.max_lon = self.bbox.max_lon.saturating_add(dx);
        self.bbox.min_lat = self.bbox.min_lat.saturating_add(dy);
        self.bbox.max_lat = self.bbox.max_lat.saturating_add(dy);
    }

    /// Translate so the center lands on `center`.
    pub fn move_to(&mut self, center: Point) {
        let current = self.center();
        self.move_by(center.x - current.x, center.y - current.y);
    }

    /// Translate the box so it lies within `other`. On an axis where the box
    /// is larger than `other` it is centered on `other` instead.
    pub fn snap_into(&mut self, other: &PixelBox) {
        let dx = snap_axis(self.min_x(), self.max_x(), other.min_x(), other.max_x());
        let dy = snap_axis(self.min_y(), self.max_y(), other.min_y(), other.max_y());
        self.move_by(dx, dy);
    }

    pub fn as_bbox(&self) -> &BoundingBox {
        &self.bbox
    }
}

fn snap_axis(min: i32, max: i32, outer_min: i32, outer_max: i32) -> i32 {
    if max - min > outer_max - outer_min {
        (outer_min + (outer_max - outer_min) / 2) - (min + (max - min) / 2)
    } else if min < outer_min {
        outer_min - min
    } else if max > outer_max {
        outer_max - max
    } else {
        0
    }
}

impl From<PixelBox> for BoundingBox {
    fn from(pb: PixelBox) -> Self {
        pb.bbox
    }
}
