//! Group colors: a reversed rainbow colormap sampled evenly over the groups.

use std::f64::consts::PI;

use plotters::style::{RGBAColor, RGBColor};

/// Alpha of depiction highlights, out of 255.
pub const HIGHLIGHT_ALPHA: u8 = 150;

const LUT_SIZE: usize = 256;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl GroupColor {
    pub fn rgb(&self) -> RGBColor {
        RGBColor(self.r, self.g, self.b)
    }

    pub fn with_alpha(&self, alpha: u8) -> RGBAColor {
        RGBAColor(self.r, self.g, self.b, f64::from(alpha) / 255.0)
    }

    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

fn rainbow(x: f64) -> [f64; 3] {
    [
        (2.0 * x - 0.5).abs().clamp(0.0, 1.0),
        (x * PI).sin().clamp(0.0, 1.0),
        (x * PI / 2.0).cos().clamp(0.0, 1.0),
    ]
}

/// Reversed rainbow at `x ∈ [0, 1]`, quantized to a 256-entry table.
pub fn rainbow_r(x: f64) -> GroupColor {
    let idx = ((x.clamp(0.0, 1.0) * LUT_SIZE as f64) as usize).min(LUT_SIZE - 1);
    let t = (LUT_SIZE - 1 - idx) as f64 / (LUT_SIZE - 1) as f64;
    let [r, g, b] = rainbow(t);
    GroupColor {
        r: (r * 255.0) as u8,
        g: (g * 255.0) as u8,
        b: (b * 255.0) as u8,
    }
}

/// `n` colors at `linspace(0, 1, n)`.
pub fn group_colors(n: usize) -> Vec<GroupColor> {
    match n {
        0 => Vec::new(),
        1 => vec![rainbow_r(0.0)],
        _ => (0..n)
            .map(|i| rainbow_r(i as f64 / (n - 1) as f64))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ends_of_reversed_rainbow() {
        // rainbow(1) is red, rainbow(0) is violet-blue.
        assert_eq!(rainbow_r(0.0), GroupColor { r: 255, g: 0, b: 0 });
        let last = rainbow_r(1.0);
        assert_eq!((last.r, last.b), (127, 255));
    }

    #[test]
    fn one_color_per_group() {
        let colors = group_colors(26);
        assert_eq!(colors.len(), 26);
        assert_eq!(colors[0], rainbow_r(0.0));
        assert_eq!(colors[25], rainbow_r(1.0));
    }

    #[test]
    fn highlight_alpha() {
        let c = rainbow_r(0.5).with_alpha(HIGHLIGHT_ALPHA);
        assert!((c.3 - 150.0 / 255.0).abs() < 1e-12);
        assert_eq!(GroupColor { r: 255, g: 0, b: 16 }.hex(), "#ff0010");
    }
}
