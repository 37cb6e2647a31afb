//! Bundled brick textures and input image resolution.

pub(crate) mod bricks;
pub(crate) mod decode;
