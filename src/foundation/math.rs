/// Saturate a signed channel value into `0..=255`.
pub(crate) fn clip_u8(v: i32) -> u8 {
    v.clamp(0, 255) as u8
}

/// Round a float channel value to the nearest `u8`, saturating.
pub(crate) fn round_u8(v: f64) -> u8 {
    if v.is_nan() {
        return 0;
    }
    v.round().clamp(0.0, 255.0) as u8
}

/// Linear interpolation between `a` and `b`.
pub(crate) fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}
