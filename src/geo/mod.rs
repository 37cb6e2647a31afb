//! Coordinate systems and the remote tile pyramid geometry.

pub(crate) mod grid;
pub(crate) mod projection;
