use serde::{Deserialize, Serialize};

use crate::foundation::error::{PosterError, PosterResult};

/// Wrap a longitude into the `[-180, 180)` range.
///
/// Applying this twice yields the same value as applying it once.
pub fn normalize_lon(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Geographic bounding box `(west, south, east, north)` in EPSG:4326 degrees.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f64; 4]", into = "[f64; 4]")]
pub struct Bounds {
    /// Western longitude.
    pub west: f64,
    /// Southern latitude.
    pub south: f64,
    /// Eastern longitude.
    pub east: f64,
    /// Northern latitude.
    pub north: f64,
}

impl From<[f64; 4]> for Bounds {
    fn from([west, south, east, north]: [f64; 4]) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }
}

impl From<Bounds> for [f64; 4] {
    fn from(b: Bounds) -> Self {
        [b.west, b.south, b.east, b.north]
    }
}

impl Bounds {
    /// Create bounds from `[west, south, east, north]` without normalization.
    pub fn new(west: f64, south: f64, east: f64, north: f64) -> Self {
        Self {
            west,
            south,
            east,
            north,
        }
    }

    /// Longitude-normalize west/east and validate the result.
    ///
    /// An east edge that lands exactly on the antimeridian is kept at `+180` so that boxes ending
    /// at the date line stay non-empty.
    pub fn normalized(self) -> PosterResult<Self> {
        let raw = [self.west, self.south, self.east, self.north];
        if raw.iter().any(|v| !v.is_finite()) {
            return Err(PosterError::input(format!(
                "bounds must be finite, got {raw:?}"
            )));
        }

        let west = normalize_lon(self.west);
        let mut east = normalize_lon(self.east);
        if east == -180.0 && self.east > self.west {
            east = 180.0;
        }

        let out = Self {
            west,
            south: self.south,
            east,
            north: self.north,
        };
        out.validate()?;
        Ok(out)
    }

    /// Check `west < east`, `south < north` and latitudes within `[-90, 90]`.
    pub fn validate(&self) -> PosterResult<()> {
        if !(self.west < self.east) {
            return Err(PosterError::input(format!(
                "bounds west ({}) must be < east ({}) after normalization",
                self.west, self.east
            )));
        }
        if !(self.south < self.north) {
            return Err(PosterError::input(format!(
                "bounds south ({}) must be < north ({})",
                self.south, self.north
            )));
        }
        if self.south < -90.0 || self.north > 90.0 {
            return Err(PosterError::input(format!(
                "bounds latitudes must lie in [-90, 90], got [{}, {}]",
                self.south, self.north
            )));
        }
        Ok(())
    }

    /// Width of the box in source units.
    pub fn width(&self) -> f64 {
        self.east - self.west
    }

    /// Height of the box in source units.
    pub fn height(&self) -> f64 {
        self.north - self.south
    }
}

/// Shape of a band-major pixel read: `(bands, height, width)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OutputShape {
    /// Number of bands.
    pub bands: usize,
    /// Rows.
    pub height: u32,
    /// Columns.
    pub width: u32,
}

impl OutputShape {
    /// Create a validated shape; every dimension must be positive.
    pub fn new(bands: usize, height: u32, width: u32) -> PosterResult<Self> {
        if bands == 0 || height == 0 || width == 0 {
            return Err(PosterError::transform(format!(
                "output shape must be positive, got ({bands}, {height}, {width})"
            )));
        }
        Ok(Self {
            bands,
            height,
            width,
        })
    }

    /// Pixels per band.
    pub fn plane_len(&self) -> usize {
        (self.width as usize) * (self.height as usize)
    }
}

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Create a canvas of `width` x `height`.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
