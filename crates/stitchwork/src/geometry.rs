//! Core geometry types for stitchwork.
//!
//! ## Rust Lesson #3: Structs & Derives
//!
//! In JS you'd write: `const point = { x: 1.0, y: 2.0 }`
//! In Rust, we define a `struct` with explicit types.
//!
//! The `#[derive(...)]` macro auto-generates common functionality:
//! - `Debug` = like console.log, lets you print with `{:?}`
//! - `Clone` = can duplicate the value (like spread: `{...obj}`)
//! - `Copy` = can copy implicitly (small stack values only)
//! - `PartialEq` = can compare with `==`
//!
//! 2D chart space uses our own [`Point`]. 3D scene space uses `glam`'s
//! double-precision types, re-exported here so callers don't need to
//! depend on glam directly.

use std::ops::{Add, Mul, Sub};

use serde::{Deserialize, Serialize};

pub use glam::{DAffine3, DQuat, DVec3};

/// A 2D point with x,y coordinates (chart or screen space).
///
/// `f64` = 64-bit float (like JS's `number` but explicitly sized)
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

// ============================================================================
// IMPLEMENTATIONS (methods)
// ============================================================================
//
// ## Rust Lesson #5: impl blocks
//
// In JS you'd use class methods: `class Point { distance() {...} }`
// In Rust, we separate data (struct) from behavior (impl).

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    /// Create a new point. This is a common pattern instead of constructors.
    #[inline]
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Point at `radius` from `center` in direction `angle` (radians).
    #[inline]
    pub fn polar(center: Point, radius: f64, angle: f64) -> Self {
        Self::new(center.x + radius * angle.cos(), center.y + radius * angle.sin())
    }

    /// Distance to another point.
    ///
    /// Point is `Copy`, so `other` is implicitly copied rather than moved.
    #[inline]
    pub fn distance(&self, other: Point) -> f64 {
        (*self - other).length()
    }

    /// Length of the vector from the origin to this point.
    #[inline]
    pub fn length(&self) -> f64 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, or `None` for a zero vector.
    #[inline]
    pub fn normalized(&self) -> Option<Point> {
        let len = self.length();
        if len > f64::EPSILON {
            Some(Point::new(self.x / len, self.y / len))
        } else {
            None
        }
    }

    #[inline]
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Lift into 3D on the z = `z` plane.
    #[inline]
    pub fn extend(&self, z: f64) -> DVec3 {
        DVec3::new(self.x, self.y, z)
    }
}

// ## Rust Lesson #8: Operator Overloading
//
// Implementing `Add`/`Sub`/`Mul` lets us write `a + b` for our own types.
// There's no magic: `a + b` just calls `Add::add(a, b)`.

impl Add for Point {
    type Output = Point;

    #[inline]
    fn add(self, rhs: Point) -> Point {
        Point::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Point {
    type Output = Point;

    #[inline]
    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    #[inline]
    fn mul(self, rhs: f64) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

/// Get the 3D bounding box of a point set as (min, max).
///
/// ## Rust Lesson #6: Option<T>
///
/// Rust has no `null` or `undefined`. An empty point set has no bounds,
/// so we return `None` instead of a box full of infinities.
pub fn bounding_box_3d(points: &[DVec3]) -> Option<(DVec3, DVec3)> {
    let first = *points.first()?;
    Some(points.iter().fold((first, first), |(lo, hi), p| (lo.min(*p), hi.max(*p))))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_distance() {
        let p1 = Point::new(0.0, 0.0);
        let p2 = Point::new(3.0, 4.0);
        assert_eq!(p1.distance(p2), 5.0); // 3-4-5 triangle
    }

    #[test]
    fn polar_points_start_at_three_oclock() {
        let p = Point::polar(Point::new(10.0, 10.0), 5.0, 0.0);
        assert!((p.x - 15.0).abs() < 1e-12);
        assert!((p.y - 10.0).abs() < 1e-12);
    }

    #[test]
    fn point_arithmetic() {
        let a = Point::new(1.0, 2.0);
        let b = Point::new(3.0, 5.0);
        assert_eq!(a + b, Point::new(4.0, 7.0));
        assert_eq!(b - a, Point::new(2.0, 3.0));
        assert_eq!(a * 2.0, Point::new(2.0, 4.0));
    }

    #[test]
    fn zero_vector_has_no_direction() {
        assert_eq!(Point::ORIGIN.normalized(), None);
        let unit = Point::new(0.0, 3.0).normalized().unwrap();
        assert_eq!(unit, Point::new(0.0, 1.0));
    }

    #[test]
    fn empty_bbox() {
        assert_eq!(bounding_box_3d(&[]), None);
    }

    #[test]
    fn bbox_3d() {
        let pts = [DVec3::new(1.0, -2.0, 3.0), DVec3::new(-1.0, 4.0, 0.0)];
        let (lo, hi) = bounding_box_3d(&pts).unwrap();
        assert_eq!(lo, DVec3::new(-1.0, -2.0, 0.0));
        assert_eq!(hi, DVec3::new(1.0, 4.0, 3.0));
    }
}
