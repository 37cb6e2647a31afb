//! Print-size posters from NASA GIBS satellite imagery.
//!
//! A [`PosterRequest`] names a GIBS layer, a date, a geographic bounding box and a style. The
//! pipeline is a strict linear sequence:
//!
//! - fetch: reproject the box to Web Mercator and resample GIBS tiles into the canvas
//!   ([`fetch_from`], [`WarpedView`])
//! - stylize (optional): replace every block with a tinted brick ([`legofy`])
//! - rotate the oversized fetch and center-crop back to the nominal canvas
//! - modulate hue, saturation and brightness ([`modulate`])
//! - encode once as JPEG ([`encode_jpeg`])
//!
//! [`create_poster`] runs everything against the live tile service; [`create_poster_from`]
//! accepts any [`TileSource`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod catalog;
mod compose;
mod effects;
mod encode;
mod fetch;
mod foundation;
mod geo;
mod style;

pub use crate::assets::bricks::{BrickSet, brick_key};
pub use crate::assets::decode::{MosaicInput, decode_rgb};
pub use crate::catalog::metadata::{Aoi, CATALOG_URL, CatalogRecord, lookup};
pub use crate::compose::canvas::{
    BRICK_SIZE, PREVIEW_BRICK_SIZE, PREVIEW_FACTOR, brick_size, fetch_canvas, folded_angle,
    nominal_canvas,
};
pub use crate::compose::poster::{PosterImage, PosterOpts, create_poster, create_poster_from};
pub use crate::effects::legofy::{apply_color_overlay, block_average, dims, legofy, overlay_effect};
pub use crate::effects::modulate::{Modulation, hsl_to_rgb, hue_param, modulate, rgb_to_hsl};
pub use crate::effects::rotate::{center_crop, expanded_size, rotate_expand};
pub use crate::encode::jpeg::{JPEG_QUALITY, encode_jpeg};
pub use crate::fetch::mosaic::{GIBS_URL_TEMPLATE, MosaicDescriptor};
pub use crate::fetch::source::{GibsTileSource, HttpClient, ReqwestClient, TileSource};
pub use crate::fetch::warp::{
    BandArray, DENSIFY_PTS, FetchOpts, PixelWindow, WINDOW_PRECISION_BITS, WarpedView, fetch,
    fetch_from,
};
pub use crate::foundation::core::{Bounds, Canvas, OutputShape, normalize_lon};
pub use crate::foundation::error::{PosterError, PosterResult};
pub use crate::geo::grid::{GibsGrid, TileId, TileRange};
pub use crate::geo::projection::{
    Crs, EARTH_RADIUS_M, MERCATOR_HALF_EXTENT_M, MERCATOR_MAX_LAT, densified_outline,
    lonlat_to_mercator, mercator_to_lonlat, transform_bounds, transform_point,
};
pub use crate::style::model::{
    FilterSpec, Orientation, PosterRequest, PosterSize, StyleSpec, parse_date,
};
