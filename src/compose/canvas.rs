use crate::foundation::core::Canvas;
use crate::style::model::StyleSpec;

/// Linear downscale applied to every canvas dimension in preview mode.
pub const PREVIEW_FACTOR: u32 = 10;

/// Brick edge length for full-size output.
pub const BRICK_SIZE: u32 = 80;

/// Brick edge length in preview mode.
pub const PREVIEW_BRICK_SIZE: u32 = BRICK_SIZE / PREVIEW_FACTOR;

/// Output canvas for a style, divided by [`PREVIEW_FACTOR`] (floor) in preview mode.
pub fn nominal_canvas(style: &StyleSpec, preview: bool) -> Canvas {
    let full = style.size.canvas(style.orient);
    if preview {
        Canvas::new(full.width / PREVIEW_FACTOR, full.height / PREVIEW_FACTOR)
    } else {
        full
    }
}

/// Rotation magnitude folded into `[0, 90]` degrees.
pub fn folded_angle(rotation_deg: f64) -> f64 {
    if rotation_deg > 90.0 {
        (rotation_deg - 180.0).abs()
    } else if rotation_deg < -90.0 {
        (rotation_deg + 180.0).abs()
    } else {
        rotation_deg.abs()
    }
}

/// Canvas to fetch so that rotating by `rotation_deg` and cropping back to `canvas` leaves no empty corner.
pub fn fetch_canvas(canvas: Canvas, rotation_deg: f64) -> Canvas {
    if rotation_deg == 0.0 {
        return canvas;
    }
    let (sin, cos) = folded_angle(rotation_deg).to_radians().sin_cos();
    let (w, h) = (f64::from(canvas.width), f64::from(canvas.height));
    let bx = (w * cos + h * sin).abs().floor();
    let by = (w * sin + h * cos).abs().floor();
    Canvas::new(bx as u32, by as u32)
}

/// Brick size for the mosaic effect.
pub fn brick_size(preview: bool) -> u32 {
    if preview {
        PREVIEW_BRICK_SIZE
    } else {
        BRICK_SIZE
    }
}

#[cfg(test)]
#[path = "../../tests/unit/compose/canvas.rs"]
mod tests;
