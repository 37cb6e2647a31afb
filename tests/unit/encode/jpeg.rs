use image::{GenericImageView, Rgb};

use super::*;

#[test]
fn encodes_decodable_jpeg_of_same_size() {
    let img = RgbImage::from_fn(33, 17, |x, y| Rgb([(x * 7) as u8, (y * 13) as u8, 90]));
    let bytes = encode_jpeg(&img, JPEG_QUALITY).unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(
        image::guess_format(&bytes).unwrap(),
        image::ImageFormat::Jpeg
    );
    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!(decoded.dimensions(), (33, 17));
}

#[test]
fn max_quality_is_close_to_source() {
    let img = RgbImage::from_pixel(16, 16, Rgb([180, 60, 30]));
    let bytes = encode_jpeg(&img, JPEG_QUALITY).unwrap();
    let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
    for (a, b) in decoded.pixels().zip(img.pixels()) {
        for ch in 0..3 {
            assert!((i32::from(a.0[ch]) - i32::from(b.0[ch])).abs() <= 3);
        }
    }
}

#[test]
fn rejects_bad_quality_and_empty_images() {
    let img = RgbImage::new(2, 2);
    assert!(matches!(encode_jpeg(&img, 0), Err(PosterError::Encode(_))));
    assert!(matches!(
        encode_jpeg(&RgbImage::new(0, 4), JPEG_QUALITY),
        Err(PosterError::Encode(_))
    ));
}

/// Walk marker segments up to SOF0 and return its payload.
fn sof0_segment(bytes: &[u8]) -> &[u8] {
    let mut pos = 2;
    while pos + 4 <= bytes.len() {
        assert_eq!(bytes[pos], 0xFF, "marker expected at {pos}");
        let marker = bytes[pos + 1];
        let len = usize::from(u16::from_be_bytes([bytes[pos + 2], bytes[pos + 3]]));
        if marker == 0xC0 {
            return &bytes[pos + 4..pos + 2 + len];
        }
        assert_ne!(marker, 0xDA, "scan reached before a baseline frame header");
        pos += 2 + len;
    }
    panic!("no SOF0 segment");
}

#[test]
fn chroma_is_kept_at_full_resolution() {
    let img = RgbImage::from_fn(40, 24, |x, y| Rgb([(x * 6) as u8, (y * 10) as u8, 200]));
    let bytes = encode_jpeg(&img, JPEG_QUALITY).unwrap();
    let sof = sof0_segment(&bytes);

    assert_eq!(sof[0], 8);
    assert_eq!(u16::from_be_bytes([sof[1], sof[2]]), 24);
    assert_eq!(u16::from_be_bytes([sof[3], sof[4]]), 40);
    let components = usize::from(sof[5]);
    assert_eq!(components, 3);
    for c in 0..components {
        let sampling = sof[6 + 3 * c + 1];
        assert_eq!(sampling, 0x11, "component {c}");
    }
}
