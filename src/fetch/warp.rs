use std::collections::HashMap;

use chrono::NaiveDate;
use image::RgbImage;
use rayon::prelude::*;
use tracing::debug;

use crate::fetch::mosaic::{GIBS_URL_TEMPLATE, MosaicDescriptor};
use crate::fetch::source::{GibsTileSource, ReqwestClient, TileSource};
use crate::foundation::core::{Bounds, OutputShape};
use crate::foundation::error::{PosterError, PosterResult};
use crate::foundation::math::{lerp, round_u8};
use crate::geo::grid::{GibsGrid, TileId, TileRange};
use crate::geo::projection::{
    Crs, EARTH_RADIUS_M, MERCATOR_HALF_EXTENT_M, lonlat_to_mercator, mercator_to_lonlat,
    transform_bounds,
};

/// Points inserted along each bounding-box edge before reprojecting it.
pub const DENSIFY_PTS: usize = 21;

/// Read windows are snapped to `2^-WINDOW_PRECISION_BITS` of a pixel.
pub const WINDOW_PRECISION_BITS: i32 = 21;

/// Tuning for tile fetching and the reprojecting read.
#[derive(Clone, Debug)]
pub struct FetchOpts {
    /// Worker threads used for tile I/O and resampling.
    pub threads: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_secs: u64,
    /// Tile URL template (see [`MosaicDescriptor::tile_url`]).
    pub url_template: String,
    /// Finest pyramid level the read may use.
    pub max_level: u8,
    /// Output rows resampled per strip; tiles are loaded one strip at a time.
    pub strip_rows: u32,
}

impl Default for FetchOpts {
    fn default() -> Self {
        Self {
            threads: 8,
            timeout_secs: 30,
            url_template: GIBS_URL_TEMPLATE.to_string(),
            max_level: 8,
            strip_rows: 256,
        }
    }
}

impl FetchOpts {
    /// Set the worker thread count.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = threads;
        self
    }

    /// Set the HTTP timeout in seconds.
    pub fn with_timeout_secs(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Set the tile URL template.
    pub fn with_url_template(mut self, template: impl Into<String>) -> Self {
        self.url_template = template.into();
        self
    }

    /// Cap the pyramid level.
    pub fn with_max_level(mut self, level: u8) -> Self {
        self.max_level = level;
        self
    }

    /// Set the strip height in output rows.
    pub fn with_strip_rows(mut self, rows: u32) -> Self {
        self.strip_rows = rows;
        self
    }
}

/// Band-major `u8` pixels: `data[band][row][col]` flattened.
#[derive(Clone, Debug, PartialEq)]
pub struct BandArray {
    /// Shape of the array.
    pub shape: OutputShape,
    /// `bands * height * width` samples.
    pub data: Vec<u8>,
}

impl BandArray {
    /// Zero-filled array of `shape`.
    pub fn zeros(shape: OutputShape) -> Self {
        Self {
            shape,
            data: vec![0u8; shape.bands * shape.plane_len()],
        }
    }

    /// Borrow one band plane.
    pub fn band(&self, band: usize) -> &[u8] {
        let len = self.shape.plane_len();
        &self.data[band * len..(band + 1) * len]
    }

    /// Sample at `(band, row, col)`.
    pub fn get(&self, band: usize, row: u32, col: u32) -> u8 {
        let idx = (row as usize) * (self.shape.width as usize) + (col as usize);
        self.band(band)[idx]
    }

    /// Interleave the three bands into an RGB image, consuming the array.
    pub fn into_rgb_image(self) -> PosterResult<RgbImage> {
        if self.shape.bands != 3 {
            return Err(PosterError::transform(format!(
                "assemble rgb image: expected 3 bands, got {}",
                self.shape.bands
            )));
        }
        let (r, g, b) = (self.band(0), self.band(1), self.band(2));
        let mut raw = Vec::with_capacity(self.shape.plane_len() * 3);
        for i in 0..self.shape.plane_len() {
            raw.extend_from_slice(&[r[i], g[i], b[i]]);
        }
        RgbImage::from_raw(self.shape.width, self.shape.height, raw)
            .ok_or_else(|| PosterError::transform("assemble rgb image: buffer size mismatch"))
    }
}

/// Fractional pixel window inside a [`WarpedView`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PixelWindow {
    /// Column of the left edge.
    pub col_off: f64,
    /// Row of the top edge.
    pub row_off: f64,
    /// Width in view pixels.
    pub width: f64,
    /// Height in view pixels.
    pub height: f64,
}

/// Read-only EPSG:3857 view over a geographic tile mosaic.
///
/// The view has one Mercator pixel grid whose resolution matches the finest pyramid level at the
/// equator. Its origin is the north-west corner of the square Mercator world, and rows north or
/// south of that square read as zero. Reads resample straight from the pyramid level that best matches the requested output
/// resolution, so the view itself is never materialized.
pub struct WarpedView<'a, S: TileSource + ?Sized> {
    source: &'a S,
    grid: GibsGrid,
    origin_x: f64,
    origin_y: f64,
    res_m: f64,
    max_level: u8,
    strip_rows: u32,
    pool: rayon::ThreadPool,
}

impl<'a, S: TileSource + ?Sized> WarpedView<'a, S> {
    /// Open a view over `source`.
    pub fn open(source: &'a S, opts: &FetchOpts) -> PosterResult<Self> {
        let grid = *source.grid();
        if grid.bands != 3 {
            return Err(PosterError::transform(format!(
                "warped view supports 3-band tiles, source has {}",
                grid.bands
            )));
        }
        let max_level = opts.max_level.min(grid.max_level);
        let res_m = grid.resolution_deg(max_level).to_radians() * EARTH_RADIUS_M;

        Ok(Self {
            source,
            grid,
            origin_x: lonlat_to_mercator(grid.upper_left_x, 0.0).0,
            origin_y: MERCATOR_HALF_EXTENT_M,
            res_m,
            max_level,
            strip_rows: opts.strip_rows.max(1),
            pool: build_thread_pool(opts.threads)?,
        })
    }

    /// Pixel window covering Mercator `bounds`, snapped to [`WINDOW_PRECISION_BITS`].
    pub fn window(&self, bounds: &Bounds) -> PosterResult<PixelWindow> {
        let snap = |v: f64| {
            let scale = 2f64.powi(WINDOW_PRECISION_BITS);
            (v * scale).round() / scale
        };
        let col_off = snap((bounds.west - self.origin_x) / self.res_m);
        let row_off = snap((self.origin_y - bounds.north) / self.res_m);
        let col_end = snap((bounds.east - self.origin_x) / self.res_m);
        let row_end = snap((self.origin_y - bounds.south) / self.res_m);

        let window = PixelWindow {
            col_off,
            row_off,
            width: col_end - col_off,
            height: row_end - row_off,
        };
        if !(window.width > 0.0 && window.height > 0.0) {
            return Err(PosterError::transform(format!(
                "read window is degenerate: {window:?}"
            )));
        }
        Ok(window)
    }

    /// Bilinear boundless read of 3 bands from `window`, resampled to `shape`.
    ///
    /// Output pixels that fall outside the imagery coverage, or outside the square Mercator world,
    /// are zero.
    #[tracing::instrument(skip(self))]
    pub fn read(&self, window: &PixelWindow, shape: OutputShape) -> PosterResult<BandArray> {
        if shape.bands != 3 {
            return Err(PosterError::transform(format!(
                "warped read supports exactly 3 bands, got {}",
                shape.bands
            )));
        }
        if !(window.width > 0.0 && window.height > 0.0) {
            return Err(PosterError::transform(format!(
                "read window is degenerate: {window:?}"
            )));
        }

        let out_w = shape.width as usize;
        let out_h = shape.height as usize;
        let lons: Vec<f64> = (0..out_w)
            .map(|i| {
                let col = window.col_off + (i as f64 + 0.5) * window.width / out_w as f64;
                mercator_to_lonlat(self.origin_x + col * self.res_m, 0.0).0
            })
            .collect();
        let lats: Vec<f64> = (0..out_h)
            .map(|j| {
                let row = window.row_off + (j as f64 + 0.5) * window.height / out_h as f64;
                let y = self.origin_y - row * self.res_m;
                if y.abs() > MERCATOR_HALF_EXTENT_M {
                    f64::NAN
                } else {
                    mercator_to_lonlat(0.0, y).1
                }
            })
            .collect();

        let level = self.pick_level(&lons, &lats);
        let sampler = LevelSampler::new(&self.grid, level, &lons, &lats);

        let Some(full_range) = sampler.tile_range(0, out_h) else {
            return Err(PosterError::fetch(
                "read window lies entirely outside the imagery coverage",
            ));
        };
        debug!(
            level,
            tiles = full_range.tile_count(),
            width = shape.width,
            height = shape.height,
            "warped read"
        );

        let mut out = BandArray::zeros(shape);
        let mut tiles: HashMap<TileId, Option<RgbImage>> = HashMap::new();
        let strip = self.strip_rows as usize;

        let mut row_start = 0usize;
        while row_start < out_h {
            let row_end = (row_start + strip).min(out_h);
            if let Some(range) = sampler.tile_range(row_start, row_end) {
                tiles.retain(|id, _| id.row >= range.row_min);
                self.load_tiles(&range, &mut tiles)?;
            }

            let mut rgb = vec![0u8; (row_end - row_start) * out_w * 3];
            self.pool.install(|| {
                rgb.par_chunks_mut(out_w * 3)
                    .enumerate()
                    .for_each(|(k, line)| sampler.sample_row(&tiles, row_start + k, line));
            });

            let plane = shape.plane_len();
            for (k, line) in rgb.chunks_exact(out_w * 3).enumerate() {
                let base = (row_start + k) * out_w;
                for (i, px) in line.chunks_exact(3).enumerate() {
                    out.data[base + i] = px[0];
                    out.data[plane + base + i] = px[1];
                    out.data[2 * plane + base + i] = px[2];
                }
            }
            row_start = row_end;
        }

        Ok(out)
    }

    fn pick_level(&self, lons: &[f64], lats: &[f64]) -> u8 {
        // Mean step between the outermost finite samples.
        let span = |v: &[f64]| {
            let first = v.iter().position(|x| x.is_finite());
            let last = v.iter().rposition(|x| x.is_finite());
            match (first, last) {
                (Some(a), Some(b)) if b > a => (v[b] - v[a]).abs() / (b - a) as f64,
                _ => f64::INFINITY,
            }
        };
        let target = span(lons).min(span(lats));
        self.grid.best_level(target).min(self.max_level)
    }

    fn load_tiles(
        &self,
        range: &TileRange,
        tiles: &mut HashMap<TileId, Option<RgbImage>>,
    ) -> PosterResult<()> {
        let missing: Vec<TileId> = range.tiles().filter(|t| !tiles.contains_key(t)).collect();
        if missing.is_empty() {
            return Ok(());
        }

        let fetched: Vec<(TileId, PosterResult<Option<RgbImage>>)> = self.pool.install(|| {
            missing
                .par_iter()
                .map(|&t| (t, self.source.tile(t)))
                .collect()
        });
        let bs = self.grid.block_size;
        for (id, res) in fetched {
            let tile = res?;
            if let Some(img) = &tile
                && img.dimensions() != (bs, bs)
            {
                return Err(PosterError::fetch(format!(
                    "tile {}/{}/{} is {}x{}, expected {bs}x{bs}",
                    id.level,
                    id.row,
                    id.col,
                    img.width(),
                    img.height()
                )));
            }
            tiles.insert(id, tile);
        }
        Ok(())
    }
}

/// Maps output pixels onto one pyramid level and samples it.
struct LevelSampler<'g> {
    grid: &'g GibsGrid,
    level: u8,
    /// Source pixel-center X per output column.
    sx: Vec<f64>,
    /// Source pixel-center Y per output row.
    sy: Vec<f64>,
    coverage: (f64, f64, f64, f64),
}

impl<'g> LevelSampler<'g> {
    fn new(grid: &'g GibsGrid, level: u8, lons: &[f64], lats: &[f64]) -> Self {
        let res = grid.resolution_deg(level);
        Self {
            grid,
            level,
            sx: lons
                .iter()
                .map(|lon| (lon - grid.upper_left_x) / res - 0.5)
                .collect(),
            sy: lats
                .iter()
                .map(|lat| (grid.upper_left_y - lat) / res - 0.5)
                .collect(),
            coverage: grid.coverage_pixels(level),
        }
    }

    /// Tiles needed to sample output rows `[row_start, row_end)`.
    fn tile_range(&self, row_start: usize, row_end: usize) -> Option<TileRange> {
        let rows = &self.sy[row_start..row_end];
        let y0 = rows.iter().copied().fold(f64::INFINITY, f64::min).floor();
        let y1 = rows.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil() + 2.0;
        let x0 = self.sx.iter().copied().fold(f64::INFINITY, f64::min).floor();
        let x1 = self.sx.iter().copied().fold(f64::NEG_INFINITY, f64::max).ceil() + 2.0;
        self.grid.tiles_for_pixels(self.level, x0, y0, x1, y1)
    }

    fn sample_row(&self, tiles: &HashMap<TileId, Option<RgbImage>>, row: usize, line: &mut [u8]) {
        let (cx0, cy0, cx1, cy1) = self.coverage;
        let sy = self.sy[row];
        // Sample positions refer to pixel centers; +0.5 recovers the geographic position.
        // NaN rows lie outside the Mercator world and fail the range test.
        if !(sy + 0.5 >= cy0 && sy + 0.5 < cy1) {
            return;
        }
        let max_x = cx1 as i64 - 1;
        let max_y = cy1 as i64 - 1;
        let y_base = sy.floor() as i64;
        let y0 = y_base.clamp(cy0 as i64, max_y);
        let y1 = (y_base + 1).clamp(cy0 as i64, max_y);
        let fy = sy - sy.floor();

        for (i, px) in line.chunks_exact_mut(3).enumerate() {
            let sx = self.sx[i];
            if !(sx + 0.5 >= cx0 && sx + 0.5 < cx1) {
                continue;
            }
            let x_base = sx.floor() as i64;
            let x0 = x_base.clamp(cx0 as i64, max_x);
            let x1 = (x_base + 1).clamp(cx0 as i64, max_x);
            let fx = sx - sx.floor();

            let p00 = self.pixel(tiles, x0, y0);
            let p10 = self.pixel(tiles, x1, y0);
            let p01 = self.pixel(tiles, x0, y1);
            let p11 = self.pixel(tiles, x1, y1);
            for c in 0..3 {
                let top = lerp(f64::from(p00[c]), f64::from(p10[c]), fx);
                let bottom = lerp(f64::from(p01[c]), f64::from(p11[c]), fx);
                px[c] = round_u8(lerp(top, bottom, fy));
            }
        }
    }

    fn pixel(&self, tiles: &HashMap<TileId, Option<RgbImage>>, x: i64, y: i64) -> [u8; 3] {
        if x < 0 || y < 0 {
            return [0, 0, 0];
        }
        let bs = i64::from(self.grid.block_size);
        let id = TileId::new(self.level, (y / bs) as u32, (x / bs) as u32);
        match tiles.get(&id) {
            Some(Some(tile)) => tile.get_pixel((x % bs) as u32, (y % bs) as u32).0,
            _ => [0, 0, 0],
        }
    }
}

/// Dedicated rayon pool with `threads` workers.
pub(crate) fn build_thread_pool(threads: usize) -> PosterResult<rayon::ThreadPool> {
    if threads == 0 {
        return Err(PosterError::input("fetch 'threads' must be >= 1"));
    }
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|e| PosterError::fetch(format!("failed to build rayon thread pool: {e}")))
}

/// Reproject `bounds` (EPSG:4326) and read it from `source` into `shape`.
#[tracing::instrument(skip(source, opts))]
pub fn fetch_from<S: TileSource + ?Sized>(
    source: &S,
    bounds: &Bounds,
    shape: OutputShape,
    opts: &FetchOpts,
) -> PosterResult<BandArray> {
    let merc = transform_bounds(Crs::Epsg4326, Crs::Epsg3857, bounds, DENSIFY_PTS)?;
    let view = WarpedView::open(source, opts)?;
    let window = view.window(&merc)?;
    view.read(&window, shape)
}

/// Fetch `layer` on `date` over `bounds` from the remote tile service.
pub fn fetch(
    layer: &str,
    date: NaiveDate,
    bounds: &Bounds,
    shape: OutputShape,
    opts: &FetchOpts,
) -> PosterResult<BandArray> {
    let descriptor = MosaicDescriptor::new(layer, date).with_url_template(opts.url_template.clone());
    let client = ReqwestClient::with_timeout(opts.timeout_secs)?;
    let source = GibsTileSource::new(descriptor, client);
    fetch_from(&source, bounds, shape, opts)
}

#[cfg(test)]
#[path = "../../tests/unit/fetch/warp.rs"]
mod tests;
