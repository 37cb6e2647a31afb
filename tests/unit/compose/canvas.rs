use super::*;
use crate::style::model::{Orientation, PosterSize};

fn style(size: PosterSize, orient: Orientation) -> StyleSpec {
    StyleSpec {
        size,
        orient,
        legofy: false,
    }
}

#[test]
fn canvas_table_and_preview() {
    let l = style(PosterSize::Large, Orientation::Landscape);
    assert_eq!(nominal_canvas(&l, false), Canvas::new(7200, 5400));
    assert_eq!(nominal_canvas(&l, true), Canvas::new(720, 540));

    let s = style(PosterSize::Small, Orientation::Landscape);
    assert_eq!(nominal_canvas(&s, true), Canvas::new(540, 360));

    let xl = style(PosterSize::ExtraLarge, Orientation::Portrait);
    assert_eq!(nominal_canvas(&xl, false), Canvas::new(7200, 10800));
    assert_eq!(nominal_canvas(&xl, true), Canvas::new(720, 1080));
}

#[test]
fn angles_fold_into_quarter_turn() {
    assert_eq!(folded_angle(0.0), 0.0);
    assert_eq!(folded_angle(30.0), 30.0);
    assert_eq!(folded_angle(-30.0), 30.0);
    assert_eq!(folded_angle(90.0), 90.0);
    assert_eq!(folded_angle(120.0), 60.0);
    assert_eq!(folded_angle(-120.0), 60.0);
    assert_eq!(folded_angle(180.0), 0.0);
    assert_eq!(folded_angle(-180.0), 0.0);
}

#[test]
fn zero_rotation_fetches_nominal_canvas() {
    let c = Canvas::new(540, 360);
    assert_eq!(fetch_canvas(c, 0.0), c);
}

#[test]
fn diagonal_square_grows_by_sqrt_two() {
    let c = Canvas::new(1000, 1000);
    let expect = (1000.0 * (2f64).sqrt()).floor() as u32;
    assert_eq!(fetch_canvas(c, 45.0), Canvas::new(expect, expect));
    assert_eq!(fetch_canvas(c, -45.0), Canvas::new(expect, expect));
}

#[test]
fn quarter_turn_swaps_axes() {
    let c = Canvas::new(540, 360);
    assert_eq!(fetch_canvas(c, 90.0), Canvas::new(360, 540));
    assert_eq!(fetch_canvas(c, -90.0), Canvas::new(360, 540));
}

#[test]
fn half_turn_keeps_nominal_size() {
    let c = Canvas::new(540, 360);
    assert_eq!(fetch_canvas(c, 180.0), c);
}

#[test]
fn oversize_is_symmetric_in_direction() {
    let c = Canvas::new(720, 540);
    for r in [10.0, 33.0, 75.0] {
        assert_eq!(fetch_canvas(c, r), fetch_canvas(c, -r));
    }
}

#[test]
fn brick_sizes() {
    assert_eq!(brick_size(false), 80);
    assert_eq!(brick_size(true), 8);
}
