use foundation::math::{Coordinate, ProjectedPoint, Projection};

/// The only path between geographic and projected coordinates.
///
/// Bounds and overlay code go through this wrapper so they never depend on a
/// concrete projection; the math itself belongs to whatever the rendering
/// surface uses.
pub struct CoordinateTransform<'a, P: Projection + ?Sized> {
    projection: &'a P,
}

impl<'a, P: Projection + ?Sized> CoordinateTransform<'a, P> {
    pub fn new(projection: &'a P) -> Self {
        Self { projection }
    }

    pub fn to_projected(&self, c: Coordinate) -> ProjectedPoint {
        self.projection.project(c)
    }

    pub fn to_geographic(&self, p: ProjectedPoint) -> Coordinate {
        self.projection.unproject(p)
    }
}
