//! Static description of the GIBS EPSG:4326 "best" tile pyramid.
//!
//! The pyramid's level-0 matrix is 2 x 1 tiles of 512 px, each covering 288 degrees, anchored at
//! `(-180, 90)` with a top-left Y origin. The described data window therefore spans
//! `[-180, 396] x [-198, 90]`, of which only `[-180, 180] x [-90, 90]` holds imagery.

/// Identifier of one tile in the pyramid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TileId {
    /// Pyramid level (0 = coarsest).
    pub level: u8,
    /// Row from the top.
    pub row: u32,
    /// Column from the left.
    pub col: u32,
}

impl TileId {
    /// Create a tile id.
    pub fn new(level: u8, row: u32, col: u32) -> Self {
        Self { level, row, col }
    }
}

/// Inclusive tile index ranges at one level.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TileRange {
    /// Level the range belongs to.
    pub level: u8,
    /// First row.
    pub row_min: u32,
    /// Last row (inclusive).
    pub row_max: u32,
    /// First column.
    pub col_min: u32,
    /// Last column (inclusive).
    pub col_max: u32,
}

impl TileRange {
    /// Iterate tiles row-major.
    pub fn tiles(&self) -> impl Iterator<Item = TileId> + '_ {
        (self.row_min..=self.row_max).flat_map(move |row| {
            (self.col_min..=self.col_max).map(move |col| TileId::new(self.level, row, col))
        })
    }

    /// Number of tiles in the range; never zero since bounds are inclusive.
    pub fn tile_count(&self) -> usize {
        ((self.row_max - self.row_min + 1) as usize) * ((self.col_max - self.col_min + 1) as usize)
    }
}

/// Tile pyramid geometry, declared statically rather than discovered from the service.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GibsGrid {
    /// Upper-left longitude of the data window.
    pub upper_left_x: f64,
    /// Upper-left latitude of the data window.
    pub upper_left_y: f64,
    /// Lower-right longitude of the data window.
    pub lower_right_x: f64,
    /// Lower-right latitude of the data window.
    pub lower_right_y: f64,
    /// Finest pyramid level.
    pub max_level: u8,
    /// Tiles across at level 0.
    pub tile_count_x: u32,
    /// Tiles down at level 0.
    pub tile_count_y: u32,
    /// Tile edge in pixels.
    pub block_size: u32,
    /// Bands per tile.
    pub bands: usize,
    /// Longitude/latitude extent that actually holds imagery: `(west, south, east, north)`.
    pub coverage: (f64, f64, f64, f64),
}

impl Default for GibsGrid {
    fn default() -> Self {
        Self {
            upper_left_x: -180.0,
            upper_left_y: 90.0,
            lower_right_x: 396.0,
            lower_right_y: -198.0,
            max_level: 8,
            tile_count_x: 2,
            tile_count_y: 1,
            block_size: 512,
            bands: 3,
            coverage: (-180.0, -90.0, 180.0, 90.0),
        }
    }
}

impl GibsGrid {
    /// Degrees covered by one tile edge at `level`.
    pub fn tile_span_deg(&self, level: u8) -> f64 {
        (self.lower_right_x - self.upper_left_x)
            / (f64::from(self.tile_count_x) * 2f64.powi(i32::from(level)))
    }

    /// Degrees per pixel at `level`.
    pub fn resolution_deg(&self, level: u8) -> f64 {
        self.tile_span_deg(level) / f64::from(self.block_size)
    }

    /// Tiles across and down at `level`.
    pub fn tile_counts(&self, level: u8) -> (u32, u32) {
        let scale = 1u32 << level;
        (self.tile_count_x * scale, self.tile_count_y * scale)
    }

    /// Full raster size in pixels at `level`.
    pub fn raster_size(&self, level: u8) -> (u64, u64) {
        let (tx, ty) = self.tile_counts(level);
        (
            u64::from(tx) * u64::from(self.block_size),
            u64::from(ty) * u64::from(self.block_size),
        )
    }

    /// Coarsest level whose pixels are at least as fine as `target_res_deg`.
    ///
    /// Falls back to `max_level` when even the finest level is coarser than requested.
    pub fn best_level(&self, target_res_deg: f64) -> u8 {
        if !target_res_deg.is_finite() || target_res_deg <= 0.0 {
            return self.max_level;
        }
        (0..=self.max_level)
            .find(|&level| self.resolution_deg(level) <= target_res_deg)
            .unwrap_or(self.max_level)
    }

    /// Fractional pixel position of a lon/lat at `level`, measured from the top-left corner.
    pub fn lonlat_to_pixel(&self, level: u8, lon: f64, lat: f64) -> (f64, f64) {
        let res = self.resolution_deg(level);
        (
            (lon - self.upper_left_x) / res,
            (self.upper_left_y - lat) / res,
        )
    }

    /// Pixel bounds `(x_min, y_min, x_max, y_max)` of the imagery coverage at `level`.
    pub fn coverage_pixels(&self, level: u8) -> (f64, f64, f64, f64) {
        let (w, s, e, n) = self.coverage;
        let (x0, y0) = self.lonlat_to_pixel(level, w, n);
        let (x1, y1) = self.lonlat_to_pixel(level, e, s);
        (x0, y0, x1, y1)
    }

    /// Whether a tile overlaps the imagery coverage at all.
    pub fn tile_in_coverage(&self, tile: TileId) -> bool {
        let (tx, ty) = self.tile_counts(tile.level);
        if tile.col >= tx || tile.row >= ty {
            return false;
        }
        let (x0, y0, x1, y1) = self.coverage_pixels(tile.level);
        let bs = f64::from(self.block_size);
        let left = f64::from(tile.col) * bs;
        let top = f64::from(tile.row) * bs;
        left < x1 && left + bs > x0 && top < y1 && top + bs > y0
    }

    /// Tiles covering the pixel rectangle `[x0, x1) x [y0, y1)` at `level`, clipped to coverage.
    ///
    /// Returns `None` when the rectangle misses the imagery entirely.
    pub fn tiles_for_pixels(
        &self,
        level: u8,
        x0: f64,
        y0: f64,
        x1: f64,
        y1: f64,
    ) -> Option<TileRange> {
        let (cx0, cy0, cx1, cy1) = self.coverage_pixels(level);
        let x0 = x0.max(cx0);
        let y0 = y0.max(cy0);
        let x1 = x1.min(cx1);
        let y1 = y1.min(cy1);
        if !(x0 < x1 && y0 < y1) {
            return None;
        }

        let bs = f64::from(self.block_size);
        let (tx, ty) = self.tile_counts(level);
        let col_min = ((x0 / bs).floor().max(0.0) as u32).min(tx - 1);
        let col_max = (((x1 / bs).ceil() - 1.0).max(0.0) as u32).min(tx - 1);
        let row_min = ((y0 / bs).floor().max(0.0) as u32).min(ty - 1);
        let row_max = (((y1 / bs).ceil() - 1.0).max(0.0) as u32).min(ty - 1);

        Some(TileRange {
            level,
            row_min,
            row_max,
            col_min: col_min.min(col_max),
            col_max,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/geo/grid.rs"]
mod tests;
