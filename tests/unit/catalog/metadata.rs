use std::sync::Mutex;

use chrono::NaiveDate;
use serde_json::json;

use super::*;
use crate::style::model::{Orientation, PosterSize};

fn response(aoi: serde_json::Value) -> Vec<u8> {
    serde_json::to_vec(&json!({
        "results": {
            "_id": "ignored",
            "_source": {
                "overlay": "VIIRS_SNPP_CorrectedReflectance_TrueColor",
                "lyr_desc": "VIIRS True Color",
                "date": "2017-05-01",
                "style": {"size": "l", "orient": "portrait", "legofy": true},
                "filters": {"hue-rotate": 90, "saturate": 120, "brightness": 80},
                "rot": -15,
                "aoi": aoi
            }
        }
    }))
    .unwrap()
}

struct StaticHttp {
    body: Option<Vec<u8>>,
    urls: Mutex<Vec<String>>,
}

impl HttpClient for StaticHttp {
    fn get(&self, url: &str) -> PosterResult<Option<Vec<u8>>> {
        self.urls.lock().unwrap().push(url.to_string());
        Ok(self.body.clone())
    }
}

#[test]
fn array_aoi_becomes_request() {
    let rec = CatalogRecord::from_response(&response(json!([190, 30, 200, 50]))).unwrap();
    assert_eq!(rec.layer_name(), "VIIRS True Color");
    let req = rec.to_request().unwrap();
    assert_eq!(req.layer, "VIIRS_SNPP_CorrectedReflectance_TrueColor");
    assert_eq!(req.date, NaiveDate::from_ymd_opt(2017, 5, 1).unwrap());
    assert_eq!(req.bounds, Bounds::new(-170.0, 30.0, -160.0, 50.0));
    assert_eq!(req.style.size, PosterSize::Large);
    assert_eq!(req.style.orient, Orientation::Portrait);
    assert!(req.style.legofy);
    assert_eq!(req.filters.hue_rotate, 90.0);
    assert_eq!(req.rotation, -15.0);
}

#[test]
fn string_aoi_is_parsed() {
    let rec = CatalogRecord::from_response(&response(json!("[-10, 30, 10, 50]"))).unwrap();
    assert_eq!(
        rec.to_request().unwrap().bounds,
        Bounds::new(-10.0, 30.0, 10.0, 50.0)
    );
    assert_eq!(
        Aoi::Text("(1.5,2,3,4)".into()).values().unwrap(),
        [1.5, 2.0, 3.0, 4.0]
    );
}

#[test]
fn malformed_aoi_is_rejected() {
    assert!(matches!(
        Aoi::Coords(vec![1.0, 2.0, 3.0]).values(),
        Err(PosterError::Input(_))
    ));
    assert!(matches!(
        Aoi::Text("[a, b, c, d]".into()).values(),
        Err(PosterError::Input(_))
    ));
}

#[test]
fn rotation_defaults_to_zero_and_desc_is_optional() {
    let body = serde_json::to_vec(&json!({
        "results": {"_source": {
            "overlay": "MODIS_Terra_CorrectedReflectance_TrueColor",
            "date": "2014-07-07",
            "style": {"size": "s", "orient": "landscape"},
            "filters": {"hue-rotate": 0, "saturate": 100, "brightness": 100},
            "aoi": [-10, 30, 10, 50]
        }}
    }))
    .unwrap();
    let rec = CatalogRecord::from_response(&body).unwrap();
    assert_eq!(rec.rot, 0.0);
    assert_eq!(rec.layer_name(), "MODIS_Terra_CorrectedReflectance_TrueColor");
    assert!(!rec.to_request().unwrap().style.legofy);
}

#[test]
fn missing_source_is_an_input_error() {
    assert!(matches!(
        CatalogRecord::from_response(br#"{"results": {}}"#),
        Err(PosterError::Input(_))
    ));
}

#[test]
fn lookup_queries_by_uuid() {
    let id = Uuid::parse_str("67e55044-10b1-426f-9247-bb680e5fe0c8").unwrap();
    let http = StaticHttp {
        body: Some(response(json!([-10, 30, 10, 50]))),
        urls: Mutex::new(Vec::new()),
    };
    let rec = lookup(&http, CATALOG_URL, id).unwrap();
    assert_eq!(rec.overlay, "VIIRS_SNPP_CorrectedReflectance_TrueColor");
    assert_eq!(
        http.urls.lock().unwrap().as_slice(),
        ["https://api.remotepixel.ca/poster_uuid?uuid=67e55044-10b1-426f-9247-bb680e5fe0c8"]
    );
}

#[test]
fn lookup_without_record_is_a_fetch_error() {
    let http = StaticHttp {
        body: None,
        urls: Mutex::new(Vec::new()),
    };
    assert!(matches!(
        lookup(&http, CATALOG_URL, Uuid::nil()),
        Err(PosterError::Fetch(_))
    ));
}
