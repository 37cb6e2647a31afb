//! Poster orchestration: canvas geometry and the fetch-to-encode pipeline.

pub(crate) mod canvas;
pub(crate) mod poster;
