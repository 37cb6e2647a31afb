use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, OnceLock};

use anyhow::Context as _;
use image::RgbImage;

use crate::foundation::error::{PosterError, PosterResult};

/// Brick textures compiled into the crate, keyed by `"<W>x<H>"`.
const BUNDLED: &[(&str, &[u8])] = &[
    ("80x80", include_bytes!("../../assets/bricks/80x80.png")),
    ("8x8", include_bytes!("../../assets/bricks/8x8.png")),
];

/// Asset key for a brick of `width` x `height` pixels.
pub fn brick_key(width: u32, height: u32) -> String {
    format!("{width}x{height}")
}

/// Immutable registry of brick textures.
///
/// Textures are reference-counted so a set can be shared across threads and requests.
#[derive(Clone, Debug, Default)]
pub struct BrickSet {
    textures: BTreeMap<(u32, u32), Arc<RgbImage>>,
}

impl BrickSet {
    /// The bundled textures, decoded once per process.
    pub fn bundled() -> PosterResult<&'static BrickSet> {
        static SET: OnceLock<Result<BrickSet, String>> = OnceLock::new();
        SET.get_or_init(|| Self::from_encoded(BUNDLED).map_err(|e| e.to_string()))
            .as_ref()
            .map_err(|e| PosterError::asset(e.clone()))
    }

    /// Decode `(key, bytes)` pairs into a set.
    pub fn from_encoded(entries: &[(&str, &[u8])]) -> PosterResult<Self> {
        let mut set = Self::default();
        for (key, bytes) in entries {
            let (w, h) = parse_key(key)?;
            let img = image::load_from_memory(bytes)
                .with_context(|| format!("decode brick texture {key}"))
                .map_err(|e| PosterError::asset(format!("{e:#}")))?
                .to_rgb8();
            set.insert(w, h, img)?;
        }
        Ok(set)
    }

    /// Load every `<W>x<H>.png` file in `dir`.
    pub fn from_dir(dir: impl AsRef<Path>) -> PosterResult<Self> {
        let dir = dir.as_ref();
        let entries = std::fs::read_dir(dir)
            .with_context(|| format!("read brick directory '{}'", dir.display()))
            .map_err(|e| PosterError::asset(format!("{e:#}")))?;

        let mut set = Self::default();
        for entry in entries {
            let path = entry
                .with_context(|| format!("list brick directory '{}'", dir.display()))
                .map_err(|e| PosterError::asset(format!("{e:#}")))?
                .path();
            if path.extension().and_then(|e| e.to_str()) != Some("png") {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };
            let Ok((w, h)) = parse_key(stem) else {
                continue;
            };
            let img = image::open(&path)
                .with_context(|| format!("open brick texture '{}'", path.display()))
                .map_err(|e| PosterError::asset(format!("{e:#}")))?
                .to_rgb8();
            set.insert(w, h, img)?;
        }
        Ok(set)
    }

    /// Register a texture; its pixel size must match the key.
    pub fn insert(&mut self, width: u32, height: u32, img: RgbImage) -> PosterResult<()> {
        if img.dimensions() != (width, height) {
            return Err(PosterError::asset(format!(
                "brick texture {} is {}x{}",
                brick_key(width, height),
                img.width(),
                img.height()
            )));
        }
        self.textures.insert((width, height), Arc::new(img));
        Ok(())
    }

    /// Texture for a brick of `width` x `height`.
    pub fn get(&self, width: u32, height: u32) -> PosterResult<Arc<RgbImage>> {
        self.textures
            .get(&(width, height))
            .cloned()
            .ok_or_else(|| {
                PosterError::asset(format!(
                    "no brick texture for tile size {}",
                    brick_key(width, height)
                ))
            })
    }

    /// Registered keys in ascending size order.
    pub fn keys(&self) -> Vec<String> {
        self.textures
            .keys()
            .map(|&(w, h)| brick_key(w, h))
            .collect()
    }
}

fn parse_key(key: &str) -> PosterResult<(u32, u32)> {
    let parse = |s: &str| s.parse::<u32>().ok().filter(|&v| v > 0);
    key.split_once('x')
        .and_then(|(w, h)| Some((parse(w)?, parse(h)?)))
        .ok_or_else(|| PosterError::asset(format!("invalid brick key \"{key}\"")))
}

#[cfg(test)]
#[path = "../../tests/unit/assets/bricks.rs"]
mod tests;
