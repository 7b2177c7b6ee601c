use crate::geometry::point::Point;

/// Axis-aligned bounding box in normalized frame coordinates.
///
/// Invariant: `x1 < x2` and `y1 < y2`. Constructors normalize corner order
/// so the invariant holds for any pair of opposite corners.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Left edge
    pub x1: f32,
    /// Top edge
    pub y1: f32,
    /// Right edge
    pub x2: f32,
    /// Bottom edge
    pub y2: f32,
}

impl BoundingBox {
    /// Create a box from two opposite corners, normalizing their order.
    #[inline]
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self {
            x1: x1.min(x2),
            y1: y1.min(y2),
            x2: x1.max(x2),
            y2: y1.max(y2),
        }
    }

    /// Create a box from a center point and full width/height.
    #[inline]
    pub fn from_center(center: Point, width: f32, height: f32) -> Self {
        Self::new(
            center.x - width / 2.0,
            center.y - height / 2.0,
            center.x + width / 2.0,
            center.y + height / 2.0,
        )
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.x2 - self.x1
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.y2 - self.y1
    }

    #[inline]
    pub fn center(&self) -> Point {
        Point::new((self.x1 + self.x2) / 2.0, (self.y1 + self.y2) / 2.0)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Whether a point lies inside the box (edges inclusive).
    #[inline]
    pub fn contains(&self, p: &Point) -> bool {
        p.x >= self.x1 && p.x <= self.x2 && p.y >= self.y1 && p.y <= self.y2
    }

    /// Clamp all edges into the unit square.
    #[inline]
    pub fn clamp_unit(&self) -> BoundingBox {
        BoundingBox {
            x1: self.x1.clamp(0.0, 1.0),
            y1: self.y1.clamp(0.0, 1.0),
            x2: self.x2.clamp(0.0, 1.0),
            y2: self.y2.clamp(0.0, 1.0),
        }
    }

    /// Calculate Intersection over Union (IoU) with another box.
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let inter_area = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union_area = self.area() + other.area() - inter_area;

        if union_area > 0.0 {
            inter_area / union_area
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corner_normalization() {
        let b = BoundingBox::new(0.8, 0.6, 0.2, 0.1);
        assert_eq!(b, BoundingBox::new(0.2, 0.1, 0.8, 0.6));
        assert!(b.x1 < b.x2 && b.y1 < b.y2);
    }

    #[test]
    fn test_center_and_area() {
        let b = BoundingBox::new(0.2, 0.2, 0.6, 0.4);
        assert_eq!(b.center(), Point::new(0.4, 0.3));
        assert!((b.area() - 0.08).abs() < 1e-6);
    }

    #[test]
    fn test_contains() {
        let b = BoundingBox::new(0.1, 0.1, 0.5, 0.5);
        assert!(b.contains(&Point::new(0.3, 0.3)));
        assert!(b.contains(&Point::new(0.1, 0.5)));
        assert!(!b.contains(&Point::new(0.6, 0.3)));
    }

    #[test]
    fn test_iou() {
        let a = BoundingBox::new(0.0, 0.0, 0.5, 0.5);
        let b = BoundingBox::new(0.25, 0.25, 0.75, 0.75);
        // Intersection 0.0625, union 0.4375
        assert!((a.iou(&b) - 0.0625 / 0.4375).abs() < 1e-6);
    }

    #[test]
    fn test_iou_no_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 0.2, 0.2);
        let b = BoundingBox::new(0.5, 0.5, 0.7, 0.7);
        assert_eq!(a.iou(&b), 0.0);
    }
}
