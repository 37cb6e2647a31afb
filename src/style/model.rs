use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::foundation::core::{Bounds, Canvas};
use crate::foundation::error::{PosterError, PosterResult};

/// Print size key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PosterSize {
    /// 5400 x 3600 landscape.
    #[serde(rename = "s")]
    Small,
    /// 7200 x 5400 landscape.
    #[serde(rename = "l")]
    Large,
    /// 10800 x 7200 landscape.
    #[serde(rename = "xl")]
    ExtraLarge,
}

/// Canvas orientation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Wider than tall.
    Landscape,
    /// Taller than wide.
    Portrait,
}

impl PosterSize {
    /// Parse a size key (`s`, `l`, `xl`).
    pub fn parse(key: &str) -> PosterResult<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "s" => Ok(Self::Small),
            "l" => Ok(Self::Large),
            "xl" => Ok(Self::ExtraLarge),
            other => Err(PosterError::input(format!(
                "unsupported poster size \"{other}\" (expected s, l or xl)"
            ))),
        }
    }

    /// Nominal full-resolution canvas for this size and orientation.
    pub fn canvas(self, orient: Orientation) -> Canvas {
        let (long, short) = match self {
            Self::Small => (5400, 3600),
            Self::Large => (7200, 5400),
            Self::ExtraLarge => (10800, 7200),
        };
        match orient {
            Orientation::Landscape => Canvas::new(long, short),
            Orientation::Portrait => Canvas::new(short, long),
        }
    }
}

impl Orientation {
    /// Parse an orientation key (`landscape`, `portrait`).
    pub fn parse(key: &str) -> PosterResult<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "landscape" => Ok(Self::Landscape),
            "portrait" => Ok(Self::Portrait),
            other => Err(PosterError::input(format!(
                "unsupported orientation \"{other}\" (expected landscape or portrait)"
            ))),
        }
    }
}

/// Size, orientation and stylization toggle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleSpec {
    /// Print size.
    pub size: PosterSize,
    /// Canvas orientation.
    pub orient: Orientation,
    /// Apply the brick mosaic effect.
    #[serde(default)]
    pub legofy: bool,
}

/// Color modulation parameters.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Hue rotation in degrees, `0..=360`.
    #[serde(rename = "hue-rotate")]
    pub hue_rotate: f64,
    /// Saturation percentage, `0..=200` (100 = unchanged).
    pub saturate: f64,
    /// Brightness percentage, `0..=100` (100 = unchanged).
    pub brightness: f64,
}

impl Default for FilterSpec {
    fn default() -> Self {
        Self {
            hue_rotate: 0.0,
            saturate: 100.0,
            brightness: 100.0,
        }
    }
}

impl FilterSpec {
    /// Check every parameter is finite and inside its documented range.
    pub fn validate(&self) -> PosterResult<()> {
        fn check(name: &str, v: f64, max: f64) -> PosterResult<()> {
            if !v.is_finite() || !(0.0..=max).contains(&v) {
                return Err(PosterError::input(format!(
                    "filter {name} must be in [0, {max}], got {v}"
                )));
            }
            Ok(())
        }
        check("hue-rotate", self.hue_rotate, 360.0)?;
        check("saturate", self.saturate, 200.0)?;
        check("brightness", self.brightness, 100.0)
    }
}

/// Full poster request as handed over by the CLI or the catalog lookup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PosterRequest {
    /// GIBS imagery layer identifier.
    pub layer: String,
    /// Imagery date.
    #[serde(serialize_with = "ser_date", deserialize_with = "de_date")]
    pub date: NaiveDate,
    /// `[west, south, east, north]` in EPSG:4326; longitudes may lie outside `[-180, 180]`.
    pub bounds: Bounds,
    /// Color modulation.
    pub filters: FilterSpec,
    /// Size/orientation/stylization.
    pub style: StyleSpec,
    /// Counter-clockwise rotation in degrees, `-180..=180`.
    #[serde(default)]
    pub rotation: f64,
}

impl PosterRequest {
    /// Validate every field and return a copy with normalized bounds.
    pub fn validated(&self) -> PosterResult<Self> {
        if self.layer.trim().is_empty() {
            return Err(PosterError::input("layer must be non-empty"));
        }
        if !self.rotation.is_finite() || !(-180.0..=180.0).contains(&self.rotation) {
            return Err(PosterError::input(format!(
                "rotation must be in [-180, 180], got {}",
                self.rotation
            )));
        }
        self.filters.validate()?;
        let bounds = self.bounds.normalized()?;
        Ok(Self {
            bounds,
            ..self.clone()
        })
    }

    /// Parse a request from JSON, mapping failures to input errors.
    pub fn from_json(bytes: &[u8]) -> PosterResult<Self> {
        serde_json::from_slice(bytes)
            .map_err(|e| PosterError::input(format!("parse poster request: {e}")))
    }
}

/// Parse an ISO-like `YYYY-MM-DD` date (day and month may be unpadded).
pub fn parse_date(s: &str) -> PosterResult<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|e| PosterError::input(format!("invalid date \"{s}\": {e}")))
}

fn de_date<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
where
    D: Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    parse_date(&s).map_err(serde::de::Error::custom)
}

fn ser_date<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
#[path = "../../tests/unit/style/model.rs"]
mod tests;
