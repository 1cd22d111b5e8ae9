use serde::{Deserialize, Serialize};

/// An sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BLACK: Color = Color(0, 0, 0);
    pub const WHITE: Color = Color(255, 255, 255);
    pub const RED: Color = Color(214, 39, 40);
    pub const BLUE: Color = Color(31, 119, 180);
    pub const GREEN: Color = Color(44, 160, 44);
    pub const ORANGE: Color = Color(255, 127, 14);
    pub const PURPLE: Color = Color(148, 103, 189);
    pub const GRAY: Color = Color(127, 127, 127);

    /// Linear blend, `t = 0` gives `self`.
    pub fn lerp(self, other: Color, t: f64) -> Color {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Color(mix(self.0, other.0), mix(self.1, other.1), mix(self.2, other.2))
    }

    /// Relative luminance in `[0, 1]`, used to pick readable annotation text.
    pub fn luminance(self) -> f64 {
        (0.2126 * self.0 as f64 + 0.7152 * self.1 as f64 + 0.0722 * self.2 as f64) / 255.0
    }
}

/// Colors assigned to series that do not pick their own.
pub const PALETTE: [Color; 6] = [
    Color::RED,
    Color::BLUE,
    Color::GREEN,
    Color::ORANGE,
    Color::PURPLE,
    Color::GRAY,
];

const BLUES: [Color; 9] = [
    Color(247, 251, 255),
    Color(222, 235, 247),
    Color(198, 219, 239),
    Color(158, 202, 225),
    Color(107, 174, 214),
    Color(66, 146, 198),
    Color(33, 113, 181),
    Color(8, 81, 156),
    Color(8, 48, 107),
];

/// Sequential blue scale for heat maps, sampled at `t` in `[0, 1]` (clamped).
pub fn blues(t: f64) -> Color {
    let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
    let scaled = t * (BLUES.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(BLUES.len() - 2);
    BLUES[i].lerp(BLUES[i + 1], scaled - i as f64)
}
