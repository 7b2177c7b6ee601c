use nalgebra::Vector2;

/// A position in normalized frame coordinates, each component in `[0, 1]`.
///
/// All tracking and trigger math happens in this space so that shape
/// configuration survives camera resolution changes.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    #[inline]
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    #[inline]
    pub fn distance(&self, other: &Point) -> f32 {
        (self.to_vector() - other.to_vector()).norm()
    }

    /// Displacement vector from `self` to `other`.
    #[inline]
    pub fn displacement(&self, other: &Point) -> Vector2<f32> {
        other.to_vector() - self.to_vector()
    }

    /// Clamp both components into the unit square.
    #[inline]
    pub fn clamp_unit(&self) -> Point {
        Point::new(self.x.clamp(0.0, 1.0), self.y.clamp(0.0, 1.0))
    }

    #[inline]
    pub fn to_vector(self) -> Vector2<f32> {
        Vector2::new(self.x, self.y)
    }
}

impl From<Vector2<f32>> for Point {
    fn from(v: Vector2<f32>) -> Self {
        Point::new(v.x, v.y)
    }
}
