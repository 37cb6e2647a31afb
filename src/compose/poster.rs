use tracing::{debug, info};

use crate::assets::bricks::BrickSet;
use crate::assets::decode::MosaicInput;
use crate::compose::canvas::{brick_size, fetch_canvas, nominal_canvas};
use crate::effects::legofy::legofy;
use crate::effects::modulate::{Modulation, modulate};
use crate::effects::rotate::{center_crop, rotate_expand};
use crate::encode::jpeg::{JPEG_QUALITY, encode_jpeg};
use crate::fetch::mosaic::MosaicDescriptor;
use crate::fetch::source::{GibsTileSource, ReqwestClient, TileSource};
use crate::fetch::warp::{FetchOpts, build_thread_pool, fetch_from};
use crate::foundation::core::{Canvas, OutputShape};
use crate::foundation::error::{PosterError, PosterResult};
use crate::style::model::PosterRequest;

/// Options controlling poster creation.
#[derive(Clone, Debug, Default)]
pub struct PosterOpts {
    /// Render at a tenth of the nominal size with 8 px bricks.
    pub preview: bool,
    /// Tile fetch tuning.
    pub fetch: FetchOpts,
}

impl PosterOpts {
    /// Toggle preview mode.
    pub fn with_preview(mut self, preview: bool) -> Self {
        self.preview = preview;
        self
    }

    /// Replace the fetch options.
    pub fn with_fetch(mut self, fetch: FetchOpts) -> Self {
        self.fetch = fetch;
        self
    }
}

/// Finished poster: the encoded JPEG and its pixel size.
#[derive(Clone, Debug)]
pub struct PosterImage {
    /// Output size.
    pub canvas: Canvas,
    /// JPEG bytes.
    pub jpeg: Vec<u8>,
}

/// Create a poster from the remote GIBS tile service with the bundled brick textures.
pub fn create_poster(req: &PosterRequest, opts: &PosterOpts) -> PosterResult<PosterImage> {
    let descriptor = MosaicDescriptor::new(req.layer.clone(), req.date)
        .with_url_template(opts.fetch.url_template.clone());
    let client = ReqwestClient::with_timeout(opts.fetch.timeout_secs)?;
    let source = GibsTileSource::new(descriptor, client);
    create_poster_from(req, &source, BrickSet::bundled()?, opts)
}

/// Create a poster reading tiles from `source`.
///
/// Stages run in order: validate, fetch, optional brick mosaic, rotation with center crop,
/// color modulation, encode. Any stage failure aborts the request. The image stages run on a
/// pool sized by `opts.fetch.threads`.
#[tracing::instrument(
    skip_all,
    fields(layer = %req.layer, date = %req.date, preview = opts.preview)
)]
pub fn create_poster_from<S: TileSource + ?Sized>(
    req: &PosterRequest,
    source: &S,
    bricks: &BrickSet,
    opts: &PosterOpts,
) -> PosterResult<PosterImage> {
    let req = req.validated().map_err(|e| e.in_stage("validate"))?;
    let canvas = nominal_canvas(&req.style, opts.preview);
    if canvas.width == 0 || canvas.height == 0 {
        return Err(PosterError::input(format!(
            "canvas {}x{} is empty",
            canvas.width, canvas.height
        ))
        .in_stage("validate"));
    }
    let pool = build_thread_pool(opts.fetch.threads).map_err(|e| e.in_stage("validate"))?;
    let oversize = fetch_canvas(canvas, req.rotation);
    debug!(
        width = canvas.width,
        height = canvas.height,
        fetch_width = oversize.width,
        fetch_height = oversize.height,
        rotation = req.rotation,
        "poster geometry"
    );

    let shape =
        OutputShape::new(3, oversize.height, oversize.width).map_err(|e| e.in_stage("validate"))?;
    let bands =
        fetch_from(source, &req.bounds, shape, &opts.fetch).map_err(|e| e.in_stage("fetch"))?;
    let mut img = bands.into_rgb_image().map_err(|e| e.in_stage("fetch"))?;

    let img = pool.install(|| -> PosterResult<_> {
        if req.style.legofy {
            let brick = brick_size(opts.preview);
            img = legofy(MosaicInput::InMemory(img), brick, brick, bricks)
                .map_err(|e| e.in_stage("legofy"))?;
        }

        if req.rotation != 0.0 {
            img = center_crop(&rotate_expand(&img, req.rotation), canvas.width, canvas.height);
        }

        modulate(&mut img, &Modulation::from_filters(&req.filters));
        Ok(img)
    })?;

    let jpeg = encode_jpeg(&img, JPEG_QUALITY).map_err(|e| e.in_stage("encode"))?;
    info!(
        width = img.width(),
        height = img.height(),
        bytes = jpeg.len(),
        "poster ready"
    );
    Ok(PosterImage {
        canvas: Canvas::new(img.width(), img.height()),
        jpeg,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/compose/poster.rs"]
mod tests;
