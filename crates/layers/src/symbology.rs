use serde::{Deserialize, Serialize};

/// Translucent red used to highlight the query overlay region.
pub const OVERLAY_FILL: [f32; 4] = [1.0, 0.0, 0.0, 0.3];

#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerStyle {
    pub visible: bool,
    pub color: [f32; 4],
}

impl LayerStyle {
    pub const fn new(visible: bool, color: [f32; 4]) -> Self {
        Self { visible, color }
    }

    pub const fn overlay() -> Self {
        Self::new(true, OVERLAY_FILL)
    }

    /// CSS `rgba()` form, with 8-bit channels and the alpha kept as a fraction.
    pub fn to_css_rgba(&self) -> String {
        let [r, g, b, a] = self.color;
        let ch = |v: f32| (v.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!("rgba({}, {}, {}, {})", ch(r), ch(g), ch(b), a.clamp(0.0, 1.0))
    }
}

impl Default for LayerStyle {
    fn default() -> Self {
        Self {
            visible: true,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}
