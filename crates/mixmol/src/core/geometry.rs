//! Geometry primitives
//!
//! Canvas coordinates have y growing downwards, so angles sweep clockwise on
//! screen: 0 points east, 90° south, 180° west, 270° north.
//!
//! A spirit hexagon has six corners at 60° increments starting east:
//!
//! ```text
//!        4 (NW)   5 (NE)
//!   3 (W)     ⬡      0 (E)
//!        2 (SW)   1 (SE)
//! ```

use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Number of corners on a spirit hexagon
pub const CORNER_COUNT: usize = 6;

/// Corner angles in degrees, indexed by corner
pub const CORNER_ANGLES_DEG: [f64; CORNER_COUNT] = [0.0, 60.0, 120.0, 180.0, 240.0, 300.0];

/// A point on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point
    pub fn distance(&self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }

    /// Angle (radians) of the vector from this point to `other`
    pub fn angle_to(&self, other: Point) -> f64 {
        (other.y - self.y).atan2(other.x - self.x)
    }

    /// Move `distance` along `angle` (radians)
    pub fn offset(&self, angle: f64, distance: f64) -> Point {
        Point::new(
            self.x + distance * angle.cos(),
            self.y + distance * angle.sin(),
        )
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Point {
        Point::new(self.x + dx, self.y + dy)
    }
}

/// Angle of a hexagon corner in radians
pub fn corner_angle(corner: usize) -> f64 {
    CORNER_ANGLES_DEG[corner % CORNER_COUNT].to_radians()
}

/// Position of a hexagon vertex
pub fn hex_vertex(center: Point, radius: f64, corner: usize) -> Point {
    center.offset(corner_angle(corner), radius)
}

/// Point reached by extending `distance` outward past a hexagon corner
pub fn extend_from_vertex(center: Point, hex_radius: f64, corner: usize, distance: f64) -> Point {
    center.offset(corner_angle(corner), hex_radius + distance)
}

/// Vertices of a regular hexagon, corner 0 first
pub fn hexagon_points(center: Point, radius: f64) -> [Point; 6] {
    std::array::from_fn(|corner| hex_vertex(center, radius, corner))
}

/// Vertices of an equilateral triangle with its apex pointing up
pub fn triangle_points(center: Point, radius: f64) -> [Point; 3] {
    std::array::from_fn(|i| center.offset(-PI / 2.0 + i as f64 * TAU / 3.0, radius))
}

/// Normalize an angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    let a = angle.rem_euclid(TAU);
    if a >= TAU {
        0.0
    } else {
        a
    }
}

/// Smallest absolute difference between two angles, in `[0, π]`
pub fn angular_distance(a: f64, b: f64) -> f64 {
    let diff = normalize_angle(a - b);
    diff.min(TAU - diff)
}

/// Corner whose angle is closest to `angle`
pub fn nearest_corner(angle: f64) -> usize {
    let steps = (normalize_angle(angle) / (PI / 3.0)).round() as usize;
    steps % CORNER_COUNT
}

/// Circumradius of a regular polygon with `sides` sides of length `side`
pub fn regular_polygon_radius(side: f64, sides: usize) -> f64 {
    let sides = sides.max(3) as f64;
    side / (2.0 * (PI / sides).sin())
}

/// Arithmetic mean of a set of points
pub fn centroid(points: &[Point]) -> Option<Point> {
    if points.is_empty() {
        return None;
    }
    let n = points.len() as f64;
    let (sx, sy) = points
        .iter()
        .fold((0.0, 0.0), |(sx, sy), p| (sx + p.x, sy + p.y));
    Some(Point::new(sx / n, sy / n))
}
