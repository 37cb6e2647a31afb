use super::*;

#[test]
fn level_geometry_matches_gibs_250m_matrix() {
    let g = GibsGrid::default();
    assert_eq!(g.tile_span_deg(0), 288.0);
    assert_eq!(g.tile_span_deg(8), 1.125);
    assert_eq!(g.tile_counts(8), (512, 256));
    assert_eq!(g.raster_size(8), (262_144, 131_072));
    assert!((g.resolution_deg(8) - 0.002_197_265_625).abs() < 1e-15);
}

#[test]
fn best_level_picks_coarsest_fine_enough_level() {
    let g = GibsGrid::default();
    // Exactly level 5 resolution.
    assert_eq!(g.best_level(g.resolution_deg(5)), 5);
    // Slightly coarser than level 5 still needs level 5.
    assert_eq!(g.best_level(g.resolution_deg(5) * 1.5), 5);
    // Very coarse requests land on level 0.
    assert_eq!(g.best_level(10.0), 0);
    // Finer than the finest level caps at max.
    assert_eq!(g.best_level(1e-6), 8);
    assert_eq!(g.best_level(0.0), 8);
}

#[test]
fn tiles_outside_coverage_are_detected() {
    let g = GibsGrid::default();
    assert!(g.tile_in_coverage(TileId::new(8, 0, 0)));
    // Column 320 starts at lon 180.
    assert!(!g.tile_in_coverage(TileId::new(8, 0, 320)));
    assert!(g.tile_in_coverage(TileId::new(8, 0, 319)));
    // Row 160 starts at lat -90.
    assert!(!g.tile_in_coverage(TileId::new(8, 160, 0)));
    // Level 0 second tile covers lon 108..396 and still overlaps imagery.
    assert!(g.tile_in_coverage(TileId::new(0, 0, 1)));
    assert!(!g.tile_in_coverage(TileId::new(0, 1, 0)));
}

#[test]
fn tiles_for_pixels_clips_to_coverage() {
    let g = GibsGrid::default();
    let (x0, y0) = g.lonlat_to_pixel(8, -10.0, 50.0);
    let (x1, y1) = g.lonlat_to_pixel(8, 10.0, 30.0);
    let r = g.tiles_for_pixels(8, x0, y0, x1, y1).unwrap();
    // lon -10 -> col floor(170 / 1.125) = 151; lon 10 -> col 168 (exclusive edge at 169.0 tiles).
    assert_eq!(r.col_min, 151);
    assert_eq!(r.col_max, 168);
    // lat 50 -> row floor(40 / 1.125) = 35; lat 30 -> row 53.
    assert_eq!(r.row_min, 35);
    assert_eq!(r.row_max, 53);
    assert_eq!(r.tile_count(), 18 * 19);
    assert_eq!(r.tiles().count(), r.tile_count());

    // A rectangle entirely east of the antimeridian has no imagery.
    let (ox0, oy0) = g.lonlat_to_pixel(8, 200.0, 10.0);
    let (ox1, oy1) = g.lonlat_to_pixel(8, 220.0, 0.0);
    assert!(g.tiles_for_pixels(8, ox0, oy0, ox1, oy1).is_none());
}
