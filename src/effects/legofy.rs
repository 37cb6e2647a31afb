use image::{Rgb, RgbImage};
use rayon::prelude::*;

use crate::assets::bricks::BrickSet;
use crate::assets::decode::MosaicInput;
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::clip_u8;

/// Block boundaries `(offset, size)` covering `0..total` in steps of `chop`.
///
/// The last block is shorter when `total` is not a multiple of `chop`.
pub fn dims(total: u32, chop: u32) -> impl Iterator<Item = (u32, u32)> {
    let count = if chop == 0 { 0 } else { total.div_ceil(chop) };
    (0..count).map(move |k| {
        let offset = k * chop;
        (offset, chop.min(total - offset))
    })
}

/// Tone curve applied per channel; `overlay` is the texture value, `color` the block average.
pub fn overlay_effect(color: u8, overlay: u8) -> u8 {
    let (c, o) = (i32::from(color), i32::from(overlay));
    if c < 33 {
        clip_u8(o - 100)
    } else if c > 233 {
        clip_u8(o + 100)
    } else {
        clip_u8(o - 133 + c)
    }
}

/// Tint a brick texture with `color`.
pub fn apply_color_overlay(brick: &RgbImage, color: Rgb<u8>) -> RgbImage {
    let mut out = brick.clone();
    for px in out.pixels_mut() {
        for (ch, &c) in px.0.iter_mut().zip(color.0.iter()) {
            *ch = overlay_effect(c, *ch);
        }
    }
    out
}

/// Average color of the `w` x `h` block at `(x0, y0)`, rounded to nearest.
pub fn block_average(img: &RgbImage, x0: u32, y0: u32, w: u32, h: u32) -> Rgb<u8> {
    let mut sum = [0u64; 3];
    for y in y0..y0 + h {
        for x in x0..x0 + w {
            let p = img.get_pixel(x, y).0;
            for (s, v) in sum.iter_mut().zip(p) {
                *s += u64::from(v);
            }
        }
    }
    let n = u64::from(w) * u64::from(h);
    if n == 0 {
        return Rgb([0, 0, 0]);
    }
    Rgb(sum.map(|s| ((s + n / 2) / n) as u8))
}

/// Replace every `brick_w` x `brick_h` block of `input` with a brick tinted to its average color.
///
/// The output has the input's dimensions. Edge blocks use the top-left crop of the texture.
#[tracing::instrument(skip(input, bricks))]
pub fn legofy(
    input: MosaicInput,
    brick_w: u32,
    brick_h: u32,
    bricks: &BrickSet,
) -> PosterResult<RgbImage> {
    if brick_w == 0 || brick_h == 0 {
        return Err(PosterError::input(format!(
            "brick size must be non-zero, got {brick_w}x{brick_h}"
        )));
    }
    let brick = bricks.get(brick_w, brick_h)?;
    let img = input.resolve()?;
    let (width, height) = img.dimensions();
    tracing::debug!(width, height, brick_w, brick_h, "legofy");

    let mut out = RgbImage::new(width, height);
    if width == 0 || height == 0 {
        return Ok(out);
    }

    let row_stride = width as usize * 3;
    let strip_len = row_stride * brick_h as usize;
    let brick_img: &RgbImage = &brick;
    out.as_mut()
        .par_chunks_mut(strip_len)
        .enumerate()
        .for_each(|(k, strip)| {
            let y0 = k as u32 * brick_h;
            let bh = (strip.len() / row_stride) as u32;
            for (x0, bw) in dims(width, brick_w) {
                let color = block_average(&img, x0, y0, bw, bh);
                for dy in 0..bh {
                    let row = &mut strip[dy as usize * row_stride..][..row_stride];
                    for dx in 0..bw {
                        let tex = brick_img.get_pixel(dx, dy).0;
                        let at = (x0 + dx) as usize * 3;
                        for ch in 0..3 {
                            row[at + ch] = overlay_effect(color.0[ch], tex[ch]);
                        }
                    }
                }
            }
        });
    Ok(out)
}

#[cfg(test)]
#[path = "../../tests/unit/effects/legofy.rs"]
mod tests;
