use image::RgbImage;
use kurbo::{Affine, Point, Vec2};
use rayon::prelude::*;

const SIZE_SNAP: f64 = 1e-9;

/// Canvas size that holds a `width` x `height` image rotated by `degrees` without clipping.
pub fn expanded_size(width: u32, height: u32, degrees: f64) -> (u32, u32) {
    let (sin, cos) = degrees.to_radians().sin_cos();
    let (w, h) = (f64::from(width), f64::from(height));
    let ew = (w * cos.abs() + h * sin.abs() - SIZE_SNAP).ceil().max(0.0);
    let eh = (w * sin.abs() + h * cos.abs() - SIZE_SNAP).ceil().max(0.0);
    (ew as u32, eh as u32)
}

/// Source-to-destination mapping for a counter-clockwise rotation about the image centers.
fn rotation_transform(src: (u32, u32), dst: (u32, u32), degrees: f64) -> Affine {
    let src_c = Vec2::new(f64::from(src.0) / 2.0, f64::from(src.1) / 2.0);
    let dst_c = Vec2::new(f64::from(dst.0) / 2.0, f64::from(dst.1) / 2.0);
    // y points down, so a visual counter-clockwise turn is a negative kurbo angle.
    Affine::translate(dst_c) * Affine::rotate(-degrees.to_radians()) * Affine::translate(-src_c)
}

/// Rotate `img` counter-clockwise by `degrees`, expanding the canvas.
///
/// Nearest-neighbour sampling; uncovered pixels are black.
#[tracing::instrument(skip(img), fields(width = img.width(), height = img.height()))]
pub fn rotate_expand(img: &RgbImage, degrees: f64) -> RgbImage {
    if degrees == 0.0 {
        return img.clone();
    }
    let src = img.dimensions();
    let (ow, oh) = expanded_size(src.0, src.1, degrees);
    let mut out = RgbImage::new(ow, oh);
    if ow == 0 || oh == 0 || src.0 == 0 || src.1 == 0 {
        return out;
    }
    let inv = rotation_transform(src, (ow, oh), degrees).inverse();
    let row_stride = ow as usize * 3;

    out.as_mut()
        .par_chunks_mut(row_stride)
        .enumerate()
        .for_each(|(y, row)| {
            for x in 0..ow as usize {
                let p = inv * Point::new(x as f64 + 0.5, y as f64 + 0.5);
                let (sx, sy) = (p.x.floor(), p.y.floor());
                if sx < 0.0 || sy < 0.0 || sx >= f64::from(src.0) || sy >= f64::from(src.1) {
                    continue;
                }
                let px = img.get_pixel(sx as u32, sy as u32).0;
                row[x * 3..x * 3 + 3].copy_from_slice(&px);
            }
        });
    tracing::debug!(out_width = ow, out_height = oh, "rotated");
    out
}

/// Crop the `width` x `height` box centered on `img`.
///
/// The box always has the requested size; regions outside `img` are black.
pub fn center_crop(img: &RgbImage, width: u32, height: u32) -> RgbImage {
    let left = (i64::from(img.width()) - i64::from(width)).div_euclid(2);
    let top = (i64::from(img.height()) - i64::from(height)).div_euclid(2);
    RgbImage::from_fn(width, height, |x, y| {
        let sx = left + i64::from(x);
        let sy = top + i64::from(y);
        if sx < 0 || sy < 0 || sx >= i64::from(img.width()) || sy >= i64::from(img.height()) {
            image::Rgb([0, 0, 0])
        } else {
            *img.get_pixel(sx as u32, sy as u32)
        }
    })
}

#[cfg(test)]
#[path = "../../tests/unit/effects/rotate.rs"]
mod tests;
