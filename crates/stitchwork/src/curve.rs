//! Catmull-Rom curves through control points.
//!
//! A uniform Catmull-Rom spline is a chain of cubic Béziers, so we convert
//! each span once up front and let `lyon_geom` do the evaluation. Both
//! curves the solid generator sweeps along (the stitch spine and the
//! connector ellipse) lie in the XY plane, which is why a 2D curve type
//! is enough here.
//!
//! For span `P1 → P2` with neighbors `P0` and `P3`:
//!
//! ```text
//! ctrl1 = P1 + (P2 − P0) / 6
//! ctrl2 = P2 − (P3 − P1) / 6
//! ```
//!
//! Open curves extrapolate the missing end neighbors (`2·P0 − P1`), closed
//! curves wrap around.

use lyon_geom::CubicBezierSegment;

use crate::geometry::Point;

/// A Catmull-Rom spline stored as Bézier spans.
#[derive(Debug, Clone)]
pub struct CatmullRom {
    spans: Vec<CubicBezierSegment<f64>>,
    closed: bool,
}

impl CatmullRom {
    /// Build a curve through `points`.
    ///
    /// Returns `None` with fewer than two points (nothing to interpolate).
    /// A closed curve gets one extra span from the last point back to the
    /// first; don't repeat the first point at the end.
    pub fn new(points: &[Point], closed: bool) -> Option<Self> {
        let n = points.len();
        if n < 2 {
            return None;
        }

        let at = |i: isize| -> Point {
            if closed {
                points[i.rem_euclid(n as isize) as usize]
            } else if i < 0 {
                points[0] * 2.0 - points[1]
            } else if i as usize >= n {
                points[n - 1] * 2.0 - points[n - 2]
            } else {
                points[i as usize]
            }
        };

        let span_count = if closed { n } else { n - 1 };
        let spans = (0..span_count as isize)
            .map(|i| {
                let (p0, p1, p2, p3) = (at(i - 1), at(i), at(i + 1), at(i + 2));
                let ctrl1 = p1 + (p2 - p0) * (1.0 / 6.0);
                let ctrl2 = p2 - (p3 - p1) * (1.0 / 6.0);
                CubicBezierSegment {
                    from: to_lyon(p1),
                    ctrl1: to_lyon(ctrl1),
                    ctrl2: to_lyon(ctrl2),
                    to: to_lyon(p2),
                }
            })
            .collect();

        Some(Self { spans, closed })
    }

    #[inline]
    pub fn span_count(&self) -> usize {
        self.spans.len()
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Point at global parameter `t ∈ [0, 1]` (clamped; closed curves wrap).
    pub fn sample(&self, t: f64) -> Point {
        let (span, local) = self.locate(t);
        let p = span.sample(local);
        Point::new(p.x, p.y)
    }

    /// Unit tangent at `t`, or `None` where the curve is degenerate.
    pub fn tangent(&self, t: f64) -> Option<Point> {
        let (span, local) = self.locate(t);
        let d = span.derivative(local);
        Point::new(d.x, d.y).normalized()
    }

    // Map a global parameter to (span, local parameter).
    fn locate(&self, t: f64) -> (&CubicBezierSegment<f64>, f64) {
        let n = self.spans.len();
        let t = if !t.is_finite() {
            0.0
        } else if self.closed {
            t.rem_euclid(1.0)
        } else {
            t.clamp(0.0, 1.0)
        };

        let scaled = t * n as f64;
        let index = (scaled.floor() as usize).min(n - 1);
        (&self.spans[index], scaled - index as f64)
    }
}

#[inline]
fn to_lyon(p: Point) -> lyon_geom::Point<f64> {
    lyon_geom::point(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(n: usize) -> Vec<Point> {
        (0..n).map(|i| Point::new(i as f64, 2.0 * i as f64)).collect()
    }

    #[test]
    fn needs_two_points() {
        assert!(CatmullRom::new(&[], false).is_none());
        assert!(CatmullRom::new(&[Point::ORIGIN], true).is_none());
        assert!(CatmullRom::new(&line(2), false).is_some());
    }

    #[test]
    fn passes_through_control_points() {
        let pts = vec![
            Point::new(0.0, 0.0),
            Point::new(1.0, 2.0),
            Point::new(3.0, 1.0),
            Point::new(4.0, 4.0),
        ];
        let curve = CatmullRom::new(&pts, false).unwrap();
        assert_eq!(curve.span_count(), 3);
        for (i, p) in pts.iter().enumerate() {
            let q = curve.sample(i as f64 / 3.0);
            assert!(q.distance(*p) < 1e-9, "point {} off curve: {:?}", i, q);
        }
    }

    #[test]
    fn collinear_points_stay_on_the_line() {
        let curve = CatmullRom::new(&line(21), false).unwrap();
        for i in 0..=40 {
            let p = curve.sample(i as f64 / 40.0);
            assert!((p.y - 2.0 * p.x).abs() < 1e-9);
        }
        let t = curve.tangent(0.5).unwrap();
        let expected = Point::new(1.0, 2.0).normalized().unwrap();
        assert!(t.distance(expected) < 1e-9);
    }

    #[test]
    fn parameter_is_clamped() {
        let curve = CatmullRom::new(&line(3), false).unwrap();
        assert!(curve.sample(-1.0).distance(Point::ORIGIN) < 1e-12);
        assert!(curve.sample(9.0).distance(Point::new(2.0, 4.0)) < 1e-12);
        assert!(curve.sample(f64::NAN).distance(Point::ORIGIN) < 1e-12);
    }

    #[test]
    fn closed_curve_wraps() {
        let square = [
            Point::new(1.0, 0.0),
            Point::new(0.0, 1.0),
            Point::new(-1.0, 0.0),
            Point::new(0.0, -1.0),
        ];
        let curve = CatmullRom::new(&square, true).unwrap();
        assert!(curve.is_closed());
        assert_eq!(curve.span_count(), 4);
        assert!(curve.sample(1.0).distance(square[0]) < 1e-9);
        assert!(curve.sample(1.25).distance(square[1]) < 1e-9);
        assert!(curve.sample(-0.25).distance(square[3]) < 1e-9);
    }
}
