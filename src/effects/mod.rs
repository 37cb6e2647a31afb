//! Pixel effects applied after the fetch: brick mosaic, rotation and color modulation.
//!
//! Every effect is a pure function of its input image.

pub(crate) mod legofy;
pub(crate) mod modulate;
pub(crate) mod rotate;
