//! Tile transport: an injectable HTTP client and the GIBS tile source built on it.

use std::time::Duration;

use anyhow::Context as _;
use image::RgbImage;
use tracing::{debug, trace, warn};

use crate::fetch::mosaic::MosaicDescriptor;
use crate::foundation::error::{PosterError, PosterResult};
use crate::geo::grid::{GibsGrid, TileId};

/// User-Agent sent with every request.
const USER_AGENT: &str = concat!("gibs-poster/", env!("CARGO_PKG_VERSION"));

/// Blocking HTTP GET abstraction so tile and catalog reads can be tested without a network.
pub trait HttpClient: Send + Sync {
    /// Fetch `url`.
    ///
    /// Returns `Ok(None)` for "no content" responses (HTTP 204 and 404), `Ok(Some(body))` for
    /// success, and a fetch error for anything else.
    fn get(&self, url: &str) -> PosterResult<Option<Vec<u8>>>;
}

/// [`HttpClient`] backed by `reqwest`'s blocking client.
#[derive(Clone, Debug)]
pub struct ReqwestClient {
    client: reqwest::blocking::Client,
}

impl ReqwestClient {
    /// Create a client with a custom timeout in seconds.
    pub fn with_timeout(timeout_secs: u64) -> PosterResult<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PosterError::fetch(format!("failed to create HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

impl HttpClient for ReqwestClient {
    fn get(&self, url: &str) -> PosterResult<Option<Vec<u8>>> {
        trace!(url, "HTTP GET");
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|e| PosterError::fetch(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        if status == reqwest::StatusCode::NOT_FOUND || status == reqwest::StatusCode::NO_CONTENT {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(PosterError::fetch(format!("HTTP {status} from {url}")));
        }

        let body = response
            .bytes()
            .map_err(|e| PosterError::fetch(format!("read response from {url}: {e}")))?;
        Ok(Some(body.to_vec()))
    }
}

/// Source of decoded RGB tiles for one virtual mosaic.
pub trait TileSource: Send + Sync {
    /// Pyramid geometry the tiles follow.
    fn grid(&self) -> &GibsGrid;

    /// Fetch one tile. `Ok(None)` means the tile is blank.
    fn tile(&self, tile: TileId) -> PosterResult<Option<RgbImage>>;
}

/// Tiles read from the remote service addressed by a [`MosaicDescriptor`].
pub struct GibsTileSource<C: HttpClient> {
    descriptor: MosaicDescriptor,
    client: C,
}

impl<C: HttpClient> GibsTileSource<C> {
    /// Create a source for `descriptor` using `client`.
    pub fn new(descriptor: MosaicDescriptor, client: C) -> Self {
        Self { descriptor, client }
    }
}

impl<C: HttpClient> TileSource for GibsTileSource<C> {
    fn grid(&self) -> &GibsGrid {
        &self.descriptor.grid
    }

    fn tile(&self, tile: TileId) -> PosterResult<Option<RgbImage>> {
        let grid = &self.descriptor.grid;
        if !grid.tile_in_coverage(tile) {
            return Ok(None);
        }

        let url = self.descriptor.tile_url(tile);
        let Some(bytes) = self.client.get(&url)? else {
            warn!(
                level = tile.level,
                row = tile.row,
                col = tile.col,
                "tile has no content, reading as blank"
            );
            return Ok(None);
        };

        let img = image::load_from_memory(&bytes)
            .with_context(|| format!("decode tile {url}"))
            .map_err(|e| PosterError::fetch(format!("{e:#}")))?
            .to_rgb8();

        if img.width() != grid.block_size || img.height() != grid.block_size {
            return Err(PosterError::fetch(format!(
                "tile {url} is {}x{}, expected {}x{}",
                img.width(),
                img.height(),
                grid.block_size,
                grid.block_size
            )));
        }

        debug!(
            level = tile.level,
            row = tile.row,
            col = tile.col,
            bytes = bytes.len(),
            "tile fetched"
        );
        Ok(Some(img))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/source.rs"]
mod tests;
