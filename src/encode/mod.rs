//! Final image encoding.

pub(crate) mod jpeg;
