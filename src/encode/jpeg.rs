use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;

use crate::foundation::error::{PosterError, PosterResult};

/// Maximum JPEG quality; the encoder keeps full-resolution chroma.
pub const JPEG_QUALITY: u8 = 100;

/// Encode `img` as a baseline JPEG at `quality` (1..=100).
pub fn encode_jpeg(img: &RgbImage, quality: u8) -> PosterResult<Vec<u8>> {
    if !(1..=100).contains(&quality) {
        return Err(PosterError::encode(format!(
            "jpeg quality must be in [1, 100], got {quality}"
        )));
    }
    if img.width() == 0 || img.height() == 0 {
        return Err(PosterError::encode("cannot encode an empty image"));
    }
    let mut buf = Vec::new();
    let encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    img.write_with_encoder(encoder).map_err(|e| {
        PosterError::encode(format!("jpeg encode {}x{}: {e}", img.width(), img.height()))
    })?;
    tracing::debug!(bytes = buf.len(), quality, "encoded jpeg");
    Ok(buf)
}

#[cfg(test)]
#[path = "../../tests/unit/encode/jpeg.rs"]
mod tests;
