use serde::{Deserialize, Serialize};

use crate::math::Vec2;

/// Axis-aligned bounding box in a planar coordinate space.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    pub min: [f64; 2],
    pub max: [f64; 2],
}

/// Visible rectangle of the map in projected coordinates.
pub type ViewportExtent = Aabb2;

impl Aabb2 {
    pub fn new(min: [f64; 2], max: [f64; 2]) -> Self {
        Aabb2 { min, max }
    }

    /// Box centered on `center` with the given full width and height.
    pub fn from_center_size(center: Vec2, width: f64, height: f64) -> Self {
        let hw = width / 2.0;
        let hh = height / 2.0;
        Aabb2::new([center.x - hw, center.y - hh], [center.x + hw, center.y + hh])
    }

    pub fn width(&self) -> f64 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> f64 {
        self.max[1] - self.min[1]
    }

    /// A box is usable when all members are finite and it has positive area.
    pub fn is_usable(&self) -> bool {
        self.min.iter().chain(self.max.iter()).all(|v| v.is_finite())
            && self.width() > 0.0
            && self.height() > 0.0
    }

    pub fn bottom_left(&self) -> Vec2 {
        Vec2::new(self.min[0], self.min[1])
    }

    pub fn top_right(&self) -> Vec2 {
        Vec2::new(self.max[0], self.max[1])
    }
}

#[cfg(test)]
mod tests {
    use super::Aabb2;
    use crate::math::Vec2;

    #[test]
    fn corners_and_size() {
        let b = Aabb2::new([-2.0, -1.0], [4.0, 3.0]);
        assert_eq!(b.bottom_left(), Vec2::new(-2.0, -1.0));
        assert_eq!(b.top_right(), Vec2::new(4.0, 3.0));
        assert_eq!(b.width(), 6.0);
        assert_eq!(b.height(), 4.0);
    }

    #[test]
    fn from_center_size_is_symmetric() {
        let b = Aabb2::from_center_size(Vec2::new(10.0, 20.0), 4.0, 2.0);
        assert_eq!(b, Aabb2::new([8.0, 19.0], [12.0, 21.0]));
    }

    #[test]
    fn degenerate_boxes_are_not_usable() {
        assert!(Aabb2::new([0.0, 0.0], [1.0, 1.0]).is_usable());
        assert!(!Aabb2::new([0.0, 0.0], [0.0, 1.0]).is_usable());
        assert!(!Aabb2::new([0.0, 0.0], [1.0, 0.0]).is_usable());
        assert!(!Aabb2::new([1.0, 0.0], [0.0, 1.0]).is_usable());
        assert!(!Aabb2::new([f64::NAN, 0.0], [1.0, 1.0]).is_usable());
    }
}
