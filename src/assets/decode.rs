use std::path::PathBuf;

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::{PosterError, PosterResult};

/// Image handed to the brick mosaic engine.
#[derive(Clone, Debug)]
pub enum MosaicInput {
    /// Image file on disk.
    FilePath(PathBuf),
    /// Already decoded pixels.
    InMemory(RgbImage),
}

impl MosaicInput {
    /// Resolve into RGB pixels, decoding from disk when needed.
    pub fn resolve(self) -> PosterResult<RgbImage> {
        match self {
            Self::InMemory(img) => Ok(img),
            Self::FilePath(path) => Ok(image::open(&path)
                .with_context(|| format!("open mosaic input '{}'", path.display()))
                .map_err(|e| PosterError::asset(format!("{e:#}")))?
                .to_rgb8()),
        }
    }
}

impl From<RgbImage> for MosaicInput {
    fn from(img: RgbImage) -> Self {
        Self::InMemory(img)
    }
}

impl From<PathBuf> for MosaicInput {
    fn from(path: PathBuf) -> Self {
        Self::FilePath(path)
    }
}

/// Decode encoded image bytes into RGB pixels.
pub fn decode_rgb(bytes: &[u8]) -> PosterResult<RgbImage> {
    let img = image::load_from_memory(bytes).context("decode image from memory")?;
    Ok(img.to_rgb8())
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
