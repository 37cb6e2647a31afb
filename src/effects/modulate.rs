use image::RgbImage;
use rayon::prelude::*;

use crate::foundation::math::round_u8;
use crate::style::model::FilterSpec;

/// Map a hue rotation in degrees onto the `0..=200` modulate convention (100 = unchanged).
pub fn hue_param(hue_rotate_deg: f64) -> f64 {
    hue_rotate_deg * 100.0 / 180.0 + 100.0
}

/// Brightness/saturation/hue percentages applied in HSL space.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Modulation {
    /// Lightness percentage (100 = unchanged).
    pub brightness: f64,
    /// Saturation percentage (100 = unchanged).
    pub saturation: f64,
    /// Hue parameter on the `0..=200` scale (100 = unchanged, 200 = half turn).
    pub hue: f64,
}

impl Default for Modulation {
    fn default() -> Self {
        Self {
            brightness: 100.0,
            saturation: 100.0,
            hue: 100.0,
        }
    }
}

impl Modulation {
    /// Parameters for a request's filters.
    pub fn from_filters(filters: &FilterSpec) -> Self {
        Self {
            brightness: filters.brightness,
            saturation: filters.saturate,
            hue: hue_param(filters.hue_rotate),
        }
    }

    /// Hue offset in turns; whole turns collapse to zero.
    pub fn hue_shift(&self) -> f64 {
        ((self.hue - 100.0) % 200.0) / 200.0
    }

    /// No channel changes.
    pub fn is_identity(&self) -> bool {
        self.brightness == 100.0 && self.saturation == 100.0 && self.hue_shift() == 0.0
    }

    /// Modulate one RGB pixel.
    pub fn apply_pixel(&self, rgb: [u8; 3]) -> [u8; 3] {
        let (h, s, l) = rgb_to_hsl(rgb.map(|c| f64::from(c) / 255.0));
        let h = (h + self.hue_shift()).rem_euclid(1.0);
        let s = s * self.saturation / 100.0;
        let l = l * self.brightness / 100.0;
        hsl_to_rgb(h, s, l).map(|c| round_u8(c * 255.0))
    }
}

/// `(hue in turns, saturation, lightness)` of an RGB triple in `0..=1`.
pub fn rgb_to_hsl([r, g, b]: [f64; 3]) -> (f64, f64, f64) {
    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let c = max - min;
    let l = (max + min) / 2.0;
    if c <= 0.0 {
        return (0.0, 0.0, l);
    }
    let sector = if max == r {
        let h = (g - b) / c;
        if g < b { h + 6.0 } else { h }
    } else if max == g {
        2.0 + (b - r) / c
    } else {
        4.0 + (r - g) / c
    };
    let s = if l <= 0.5 {
        c / (2.0 * l)
    } else {
        c / (2.0 - 2.0 * l)
    };
    (sector / 6.0, s, l)
}

/// RGB triple in `0..=1` for `(hue in turns, saturation, lightness)`; out-of-range results are clamped.
pub fn hsl_to_rgb(h: f64, s: f64, l: f64) -> [f64; 3] {
    let hp = h.rem_euclid(1.0) * 6.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - (hp % 2.0 - 1.0).abs());
    let m = l - c / 2.0;
    let (r, g, b) = match hp as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };
    [r + m, g + m, b + m].map(|v| v.clamp(0.0, 1.0))
}

/// Apply `m` to every pixel of `img` in place.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn modulate(img: &mut RgbImage, m: &Modulation) {
    if m.is_identity() {
        return;
    }
    img.as_mut().par_chunks_mut(3).for_each(|px| {
        let out = m.apply_pixel([px[0], px[1], px[2]]);
        px.copy_from_slice(&out);
    });
}

#[cfg(test)]
#[path = "../../tests/unit/effects/modulate.rs"]
mod tests;
