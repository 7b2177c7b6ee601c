//! Trigger shapes: oriented line segments and simple polygons.

use crate::geometry::point::Point;

/// An oriented line segment used as a crossing trigger.
///
/// The segment's orientation (p1 → p2) defines which side of the line a
/// point is on via the sign of [`TriggerLine::side_of`]; a track crossing
/// the line flips that sign.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TriggerLine {
    pub p1: Point,
    pub p2: Point,
}

impl TriggerLine {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    /// Signed area of the parallelogram spanned by the segment vector and
    /// the vector from `p1` to `p`. Positive on one side of the (infinite)
    /// line, negative on the other, zero on it.
    #[inline]
    pub fn side_of(&self, p: &Point) -> f32 {
        let seg = self.p1.displacement(&self.p2);
        let to_p = self.p1.displacement(p);
        seg.x * to_p.y - seg.y * to_p.x
    }

    /// Distance from a point to the segment (not the infinite line).
    pub fn distance_to(&self, p: &Point) -> f32 {
        let seg = self.p1.displacement(&self.p2);
        let len_sq = seg.norm_squared();
        if len_sq <= f32::EPSILON {
            return self.p1.distance(p);
        }
        let t = (self.p1.displacement(p).dot(&seg) / len_sq).clamp(0.0, 1.0);
        let closest = Point::new(self.p1.x + t * seg.x, self.p1.y + t * seg.y);
        closest.distance(p)
    }
}

/// A simple polygon in normalized coordinates, at least 3 vertices.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    points: Vec<Point>,
}

impl Polygon {
    /// Build a polygon from its vertex ring. Returns `None` for fewer than
    /// 3 vertices.
    pub fn new(points: Vec<Point>) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        Some(Self { points })
    }

    pub fn points(&self) -> &[Point] {
        &self.points
    }

    /// Even-odd point-in-polygon test.
    pub fn contains(&self, p: &Point) -> bool {
        let mut inside = false;
        let n = self.points.len();
        let mut j = n - 1;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[j];
            if (a.y > p.y) != (b.y > p.y) {
                let x_at_y = a.x + (p.y - a.y) / (b.y - a.y) * (b.x - a.x);
                if p.x < x_at_y {
                    inside = !inside;
                }
            }
            j = i;
        }
        inside
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_of_sign_flip() {
        // Horizontal line at y = 0.5
        let line = TriggerLine::new(Point::new(0.0, 0.5), Point::new(1.0, 0.5));
        let above = line.side_of(&Point::new(0.5, 0.4));
        let below = line.side_of(&Point::new(0.5, 0.6));
        assert!(above * below < 0.0);
        assert_eq!(line.side_of(&Point::new(0.3, 0.5)), 0.0);
    }

    #[test]
    fn test_distance_to_segment() {
        let line = TriggerLine::new(Point::new(0.2, 0.5), Point::new(0.8, 0.5));
        // Perpendicular to the middle of the segment
        assert!((line.distance_to(&Point::new(0.5, 0.6)) - 0.1).abs() < 1e-6);
        // Beyond the endpoint, distance is to the endpoint itself
        assert!((line.distance_to(&Point::new(0.9, 0.5)) - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_polygon_requires_three_vertices() {
        assert!(Polygon::new(vec![Point::new(0.0, 0.0), Point::new(1.0, 1.0)]).is_none());
    }

    #[test]
    fn test_polygon_contains() {
        let tri = Polygon::new(vec![
            Point::new(0.2, 0.2),
            Point::new(0.8, 0.2),
            Point::new(0.5, 0.8),
        ])
        .unwrap();
        assert!(tri.contains(&Point::new(0.5, 0.4)));
        assert!(!tri.contains(&Point::new(0.1, 0.1)));
        assert!(!tri.contains(&Point::new(0.5, 0.9)));
    }
}
