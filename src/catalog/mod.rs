//! Poster order lookup against the remote catalog.

pub(crate) mod metadata;
