use chrono::NaiveDate;

use crate::geo::grid::{GibsGrid, TileId};

/// Default GIBS WMTS REST template. `{z}`/`{y}`/`{x}` are level, row and column.
pub const GIBS_URL_TEMPLATE: &str = "http://gibs.earthdata.nasa.gov/wmts/epsg4326/best/{layer}/default/{date}/250m/{z}/{y}/{x}.jpg";

/// Virtual mosaic of one layer/date over the global tile pyramid.
///
/// Nothing is materialized; the descriptor only knows how to address tiles.
#[derive(Clone, Debug, PartialEq)]
pub struct MosaicDescriptor {
    /// GIBS layer identifier.
    pub layer: String,
    /// Imagery date.
    pub date: NaiveDate,
    /// URL template with `{layer}`, `{date}`, `{z}`, `{y}`, `{x}` placeholders.
    pub url_template: String,
    /// Pyramid geometry.
    pub grid: GibsGrid,
}

impl MosaicDescriptor {
    /// Describe `layer` on `date` against the default GIBS endpoint.
    pub fn new(layer: impl Into<String>, date: NaiveDate) -> Self {
        Self {
            layer: layer.into(),
            date,
            url_template: GIBS_URL_TEMPLATE.to_string(),
            grid: GibsGrid::default(),
        }
    }

    /// Override the URL template.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Resolve the URL of one tile.
    pub fn tile_url(&self, tile: TileId) -> String {
        self.url_template
            .replace("{layer}", &self.layer)
            .replace("{date}", &self.date.format("%Y-%m-%d").to_string())
            .replace("{z}", &tile.level.to_string())
            .replace("{y}", &tile.row.to_string())
            .replace("{x}", &tile.col.to_string())
    }
}
