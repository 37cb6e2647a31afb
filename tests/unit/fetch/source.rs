use std::collections::HashMap;
use std::io::Cursor;
use std::sync::Mutex;

use chrono::NaiveDate;

use super::*;

#[derive(Default)]
struct FakeHttp {
    responses: HashMap<String, PosterResult<Option<Vec<u8>>>>,
    requested: Mutex<Vec<String>>,
}

impl HttpClient for FakeHttp {
    fn get(&self, url: &str) -> PosterResult<Option<Vec<u8>>> {
        self.requested.lock().unwrap().push(url.to_string());
        match self.responses.get(url) {
            Some(Ok(v)) => Ok(v.clone()),
            Some(Err(e)) => Err(PosterError::fetch(e.to_string())),
            None => Err(PosterError::fetch(format!("unexpected url {url}"))),
        }
    }
}

fn descriptor() -> MosaicDescriptor {
    MosaicDescriptor::new("L", NaiveDate::from_ymd_opt(2014, 7, 7).unwrap())
        .with_url_template("mem://{z}/{y}/{x}")
}

fn encoded_tile(size: u32, rgb: [u8; 3]) -> Vec<u8> {
    let img = RgbImage::from_pixel(size, size, image::Rgb(rgb));
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn decodes_successful_tiles() {
    let mut http = FakeHttp::default();
    http.responses
        .insert("mem://8/0/0".to_string(), Ok(Some(encoded_tile(512, [10, 20, 30]))));
    let src = GibsTileSource::new(descriptor(), http);

    let tile = src.tile(TileId::new(8, 0, 0)).unwrap().unwrap();
    assert_eq!(tile.dimensions(), (512, 512));
    assert_eq!(tile.get_pixel(100, 100).0, [10, 20, 30]);
}

#[test]
fn no_content_reads_as_blank() {
    let mut http = FakeHttp::default();
    http.responses.insert("mem://8/1/1".to_string(), Ok(None));
    let src = GibsTileSource::new(descriptor(), http);
    assert!(src.tile(TileId::new(8, 1, 1)).unwrap().is_none());
}

#[test]
fn out_of_coverage_tiles_are_never_requested() {
    let http = FakeHttp::default();
    let src = GibsTileSource::new(descriptor(), http);
    assert!(src.tile(TileId::new(8, 0, 400)).unwrap().is_none());
    assert!(src.tile(TileId::new(8, 200, 0)).unwrap().is_none());
    assert!(src.client.requested.lock().unwrap().is_empty());
}

#[test]
fn service_errors_propagate_as_fetch_errors() {
    let mut http = FakeHttp::default();
    http.responses.insert(
        "mem://8/2/2".to_string(),
        Err(PosterError::fetch("HTTP 500")),
    );
    let src = GibsTileSource::new(descriptor(), http);
    assert!(matches!(
        src.tile(TileId::new(8, 2, 2)),
        Err(PosterError::Fetch(_))
    ));
}

#[test]
fn malformed_tiles_are_fetch_errors() {
    let mut http = FakeHttp::default();
    http.responses
        .insert("mem://8/3/3".to_string(), Ok(Some(b"not an image".to_vec())));
    http.responses
        .insert("mem://8/3/4".to_string(), Ok(Some(encoded_tile(256, [0, 0, 0]))));
    let src = GibsTileSource::new(descriptor(), http);
    assert!(matches!(
        src.tile(TileId::new(8, 3, 3)),
        Err(PosterError::Fetch(_))
    ));
    assert!(matches!(
        src.tile(TileId::new(8, 3, 4)),
        Err(PosterError::Fetch(_))
    ));
}
