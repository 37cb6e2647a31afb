use serde::Deserialize;
use uuid::Uuid;

use crate::fetch::source::HttpClient;
use crate::foundation::core::Bounds;
use crate::foundation::error::{PosterError, PosterResult};
use crate::style::model::{FilterSpec, PosterRequest, StyleSpec, parse_date};

/// Poster order lookup endpoint; queried with `?uuid=<id>`.
pub const CATALOG_URL: &str = "https://api.remotepixel.ca/poster_uuid";

/// Area of interest as stored by the catalog: a coordinate array or its string form.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Aoi {
    /// `[west, south, east, north]`.
    Coords(Vec<f64>),
    /// e.g. `"[-10, 30, 10, 50]"`.
    Text(String),
}

impl Aoi {
    /// The four bounding values in `[west, south, east, north]` order.
    pub fn values(&self) -> PosterResult<[f64; 4]> {
        let values = match self {
            Self::Coords(v) => v.clone(),
            Self::Text(s) => s
                .trim()
                .trim_matches(|c| matches!(c, '[' | ']' | '(' | ')'))
                .split(',')
                .map(|part| {
                    part.trim().parse::<f64>().map_err(|e| {
                        PosterError::input(format!("aoi value \"{}\": {e}", part.trim()))
                    })
                })
                .collect::<PosterResult<Vec<_>>>()?,
        };
        <[f64; 4]>::try_from(values.as_slice()).map_err(|_| {
            PosterError::input(format!("aoi must have 4 values, got {}", values.len()))
        })
    }
}

/// Poster order as stored under `results._source`.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct CatalogRecord {
    /// GIBS layer identifier.
    pub overlay: String,
    /// Human-readable layer name.
    #[serde(default)]
    pub lyr_desc: Option<String>,
    /// Imagery date, `YYYY-MM-DD`.
    pub date: String,
    /// Size/orientation/stylization.
    pub style: StyleSpec,
    /// Color modulation.
    pub filters: FilterSpec,
    /// Rotation in degrees.
    #[serde(default)]
    pub rot: f64,
    /// Bounding box.
    pub aoi: Aoi,
}

#[derive(Deserialize)]
struct CatalogResponse {
    results: CatalogResults,
}

#[derive(Deserialize)]
struct CatalogResults {
    #[serde(rename = "_source")]
    source: CatalogRecord,
}

impl CatalogRecord {
    /// Parse a catalog response body.
    pub fn from_response(bytes: &[u8]) -> PosterResult<Self> {
        let resp: CatalogResponse = serde_json::from_slice(bytes)
            .map_err(|e| PosterError::input(format!("parse catalog record: {e}")))?;
        Ok(resp.results.source)
    }

    /// Display name for the layer, falling back to its identifier.
    pub fn layer_name(&self) -> &str {
        self.lyr_desc.as_deref().unwrap_or(&self.overlay)
    }

    /// Convert into a validated request with normalized longitudes.
    pub fn to_request(&self) -> PosterResult<PosterRequest> {
        let [west, south, east, north] = self.aoi.values()?;
        let req = PosterRequest {
            layer: self.overlay.clone(),
            date: parse_date(&self.date)?,
            bounds: Bounds::new(west, south, east, north),
            filters: self.filters,
            style: self.style,
            rotation: self.rot,
        };
        req.validated()
    }
}

/// Fetch the catalog record for poster `id` from `base_url`.
#[tracing::instrument(skip(client))]
pub fn lookup<C: HttpClient + ?Sized>(
    client: &C,
    base_url: &str,
    id: Uuid,
) -> PosterResult<CatalogRecord> {
    let url = format!("{base_url}?uuid={id}");
    let body = client
        .get(&url)?
        .ok_or_else(|| PosterError::fetch(format!("catalog has no record for {id}")))?;
    tracing::debug!(bytes = body.len(), "catalog record fetched");
    CatalogRecord::from_response(&body)
}

#[cfg(test)]
#[path = "../../tests/unit/catalog/metadata.rs"]
mod tests;
