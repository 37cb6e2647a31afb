use std::f64::consts::PI;

use crate::foundation::core::Bounds;
use crate::foundation::error::{PosterError, PosterResult};

/// WGS84 semi-major axis used by spherical Web Mercator, in meters.
pub const EARTH_RADIUS_M: f64 = 6_378_137.0;

/// Latitude at which Web Mercator's square world ends.
pub const MERCATOR_MAX_LAT: f64 = 85.051_128_779_806_59;

/// Coordinate reference systems understood by the pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crs {
    /// Geographic longitude/latitude in degrees.
    Epsg4326,
    /// Spherical Web Mercator in meters.
    Epsg3857,
}

/// Half the side of the square Web Mercator world, in meters.
pub const MERCATOR_HALF_EXTENT_M: f64 = PI * EARTH_RADIUS_M;

/// Project a longitude/latitude pair into Web Mercator meters.
///
/// Latitudes past [`MERCATOR_MAX_LAT`] project beyond the square world. The poles have no
/// image and map to an infinite `y`.
pub fn lonlat_to_mercator(lon: f64, lat: f64) -> (f64, f64) {
    let x = EARTH_RADIUS_M * lon.to_radians();
    let y = if lat >= 90.0 {
        f64::INFINITY
    } else if lat <= -90.0 {
        f64::NEG_INFINITY
    } else {
        EARTH_RADIUS_M * (PI / 4.0 + lat.to_radians() / 2.0).tan().ln()
    };
    (x, y)
}

/// Inverse of [`lonlat_to_mercator`].
pub fn mercator_to_lonlat(x: f64, y: f64) -> (f64, f64) {
    let lon = (x / EARTH_RADIUS_M).to_degrees();
    let lat = (2.0 * (y / EARTH_RADIUS_M).exp().atan() - PI / 2.0).to_degrees();
    (lon, lat)
}

/// Transform a single point between two CRSs.
pub fn transform_point(src: Crs, dst: Crs, x: f64, y: f64) -> (f64, f64) {
    match (src, dst) {
        (Crs::Epsg4326, Crs::Epsg3857) => lonlat_to_mercator(x, y),
        (Crs::Epsg3857, Crs::Epsg4326) => mercator_to_lonlat(x, y),
        _ => (x, y),
    }
}

/// Sample the outline of `bounds`, inserting `densify_pts` extra points along each edge.
pub fn densified_outline(bounds: &Bounds, densify_pts: usize) -> Vec<(f64, f64)> {
    let steps = densify_pts + 1;
    let corners = [
        (bounds.west, bounds.south),
        (bounds.west, bounds.north),
        (bounds.east, bounds.north),
        (bounds.east, bounds.south),
    ];

    let mut out = Vec::with_capacity(4 * steps);
    for i in 0..4 {
        let (x0, y0) = corners[i];
        let (x1, y1) = corners[(i + 1) % 4];
        for k in 0..steps {
            let t = k as f64 / steps as f64;
            out.push((x0 + (x1 - x0) * t, y0 + (y1 - y0) * t));
        }
    }
    out
}

/// Transform a bounding box and return the envelope of its densified, transformed outline.
pub fn transform_bounds(
    src: Crs,
    dst: Crs,
    bounds: &Bounds,
    densify_pts: usize,
) -> PosterResult<Bounds> {
    let mut west = f64::INFINITY;
    let mut south = f64::INFINITY;
    let mut east = f64::NEG_INFINITY;
    let mut north = f64::NEG_INFINITY;

    for (x, y) in densified_outline(bounds, densify_pts) {
        let (tx, ty) = transform_point(src, dst, x, y);
        if !tx.is_finite() || !ty.is_finite() {
            return Err(PosterError::transform(format!(
                "reproject bounds: point ({x}, {y}) has no finite image in {dst:?}"
            )));
        }
        west = west.min(tx);
        south = south.min(ty);
        east = east.max(tx);
        north = north.max(ty);
    }

    if !(west < east && south < north) {
        return Err(PosterError::transform(
            "reproject bounds: transformed envelope is empty",
        ));
    }
    Ok(Bounds::new(west, south, east, north))
}

#[cfg(test)]
#[path = "../../tests/unit/geo/projection.rs"]
mod tests;
