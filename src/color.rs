use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Sequential colour scale
// ---------------------------------------------------------------------------

/// Stops of the ColorBrewer `YlOrRd` scale, light to dark.
const YL_OR_RD: [(u8, u8, u8); 9] = [
    (255, 255, 204),
    (255, 237, 160),
    (254, 217, 118),
    (254, 178, 76),
    (253, 141, 60),
    (252, 78, 42),
    (227, 26, 28),
    (189, 0, 38),
    (128, 0, 38),
];

/// Maps values in `[min, max]` onto the `YlOrRd` scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorScale {
    pub min: f64,
    pub max: f64,
}

impl ColorScale {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Scale spanning the given values, `None` when there are none.
    pub fn spanning(values: impl IntoIterator<Item = f64>) -> Option<Self> {
        crate::data::view::min_max(values).map(|(lo, hi)| Self::new(lo, hi))
    }

    /// Position of `value` on the scale, clamped to `[0, 1]`. A degenerate
    /// range maps everything to the low end.
    pub fn normalize(&self, value: f64) -> f32 {
        if self.max > self.min {
            ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0) as f32
        } else {
            0.0
        }
    }

    pub fn color_for(&self, value: f64) -> Color32 {
        sample(self.normalize(value))
    }
}

/// Colour at position `t ∈ [0, 1]`, interpolated in linear RGB.
pub fn sample(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let segments = (YL_OR_RD.len() - 1) as f32;
    let pos = t * segments;
    let i = (pos.floor() as usize).min(YL_OR_RD.len() - 2);
    let frac = pos - i as f32;

    let a = linear(YL_OR_RD[i]);
    let b = linear(YL_OR_RD[i + 1]);
    let rgb: Srgb<u8> = Srgb::from_linear(a.mix(b, frac));
    Color32::from_rgb(rgb.red, rgb.green, rgb.blue)
}

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_linear()
}
