use super::*;

#[test]
fn mercator_known_points() {
    let (x, y) = lonlat_to_mercator(0.0, 0.0);
    assert!(x.abs() < 1e-6 && y.abs() < 1e-6);

    let (x, _) = lonlat_to_mercator(180.0, 0.0);
    assert!((x - 20_037_508.342_789_244).abs() < 1e-3);

    let (_, y) = lonlat_to_mercator(0.0, MERCATOR_MAX_LAT);
    assert!((y - 20_037_508.342_789_244).abs() < 1e-2);
}

#[test]
fn mercator_round_trips_points() {
    for (lon, lat) in [(-10.0, 30.0), (10.0, 50.0), (123.4, -67.8), (-179.9, 84.0)] {
        let (x, y) = lonlat_to_mercator(lon, lat);
        let (lon2, lat2) = mercator_to_lonlat(x, y);
        assert!((lon - lon2).abs() < 1e-9);
        assert!((lat - lat2).abs() < 1e-9);
    }
}

#[test]
fn latitudes_past_the_limit_project_outside_the_square() {
    let (_, y_lim) = lonlat_to_mercator(0.0, MERCATOR_MAX_LAT);
    assert!((y_lim - MERCATOR_HALF_EXTENT_M).abs() < 1e-2);

    let (_, y89) = lonlat_to_mercator(0.0, 89.0);
    assert!((y89 - 30_240_971.96).abs() < 1.0);
    let (_, y_s89) = lonlat_to_mercator(0.0, -89.0);
    assert!((y_s89 + 30_240_971.96).abs() < 1.0);

    assert_eq!(lonlat_to_mercator(0.0, 90.0).1, f64::INFINITY);
    assert_eq!(lonlat_to_mercator(0.0, -90.0).1, f64::NEG_INFINITY);
}

#[test]
fn boxes_past_the_limit_keep_their_true_envelope() {
    let b = Bounds::new(-10.0, 75.0, 10.0, 89.0);
    let m = transform_bounds(Crs::Epsg4326, Crs::Epsg3857, &b, 21).unwrap();
    assert!(m.north > MERCATOR_HALF_EXTENT_M);
    assert!((m.north - lonlat_to_mercator(0.0, 89.0).1).abs() < 1e-6);

    let above = Bounds::new(-10.0, 86.0, 10.0, 89.0);
    let m = transform_bounds(Crs::Epsg4326, Crs::Epsg3857, &above, 21).unwrap();
    assert!(m.south > MERCATOR_HALF_EXTENT_M);
}

#[test]
fn boxes_touching_a_pole_cannot_be_projected() {
    let b = Bounds::new(-10.0, 80.0, 10.0, 90.0);
    assert!(matches!(
        transform_bounds(Crs::Epsg4326, Crs::Epsg3857, &b, 21),
        Err(PosterError::Transform(_))
    ));
}

#[test]
fn densified_outline_has_expected_point_count() {
    let b = Bounds::new(-10.0, 30.0, 10.0, 50.0);
    let pts = densified_outline(&b, 21);
    assert_eq!(pts.len(), 4 * 22);
    assert!(pts.contains(&(-10.0, 30.0)));
    assert!(pts.contains(&(10.0, 50.0)));
    for (x, y) in pts {
        assert!((-10.0..=10.0).contains(&x));
        assert!((30.0..=50.0).contains(&y));
    }
}

#[test]
fn transform_bounds_to_mercator_envelope() {
    let b = Bounds::new(-10.0, 30.0, 10.0, 50.0);
    let m = transform_bounds(Crs::Epsg4326, Crs::Epsg3857, &b, 21).unwrap();
    let (w, s) = lonlat_to_mercator(-10.0, 30.0);
    let (e, n) = lonlat_to_mercator(10.0, 50.0);
    assert!((m.west - w).abs() < 1e-6);
    assert!((m.south - s).abs() < 1e-6);
    assert!((m.east - e).abs() < 1e-6);
    assert!((m.north - n).abs() < 1e-6);

    let back = transform_bounds(Crs::Epsg3857, Crs::Epsg4326, &m, 21).unwrap();
    assert!((back.west - -10.0).abs() < 1e-9);
    assert!((back.north - 50.0).abs() < 1e-9);
}

#[test]
fn transform_bounds_identity_for_same_crs() {
    let b = Bounds::new(1.0, 2.0, 3.0, 4.0);
    assert_eq!(transform_bounds(Crs::Epsg4326, Crs::Epsg4326, &b, 0).unwrap(), b);
}
