//! GIBS tile access and the reprojecting read that assembles a Web Mercator window.
//!
//! - [`mosaic`] names the tiled mosaic (layer, date, URL template, pyramid).
//! - [`source`] fetches and decodes individual tiles.
//! - [`warp`] resamples tiles onto an output pixel grid.

pub(crate) mod mosaic;
pub(crate) mod source;
pub(crate) mod warp;
