/// Convenience result type used across the poster pipeline.
pub type PosterResult<T> = Result<T, PosterError>;

/// Top-level error taxonomy used by pipeline APIs.
///
/// Each variant corresponds to one failure category; messages name the stage that failed.
#[derive(thiserror::Error, Debug)]
pub enum PosterError {
    /// Invalid caller-provided request data, rejected before any fetch is attempted.
    #[error("input error: {0}")]
    Input(String),

    /// Remote tile service, tile decoding, or read-window failures.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Missing or unreadable bundled resources (brick textures, mosaic inputs).
    #[error("asset error: {0}")]
    Asset(String),

    /// Numeric or geometric degeneracies caught before resampling.
    #[error("transform error: {0}")]
    Transform(String),

    /// Final image encode failures.
    #[error("encode error: {0}")]
    Encode(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PosterError {
    /// Build a [`PosterError::Input`] value.
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build a [`PosterError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`PosterError::Asset`] value.
    pub fn asset(msg: impl Into<String>) -> Self {
        Self::Asset(msg.into())
    }

    /// Build a [`PosterError::Transform`] value.
    pub fn transform(msg: impl Into<String>) -> Self {
        Self::Transform(msg.into())
    }

    /// Build a [`PosterError::Encode`] value.
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }

    /// Prefix the message with the pipeline stage that produced it.
    pub fn in_stage(self, stage: &str) -> Self {
        match self {
            Self::Input(m) => Self::Input(format!("{stage}: {m}")),
            Self::Fetch(m) => Self::Fetch(format!("{stage}: {m}")),
            Self::Asset(m) => Self::Asset(format!("{stage}: {m}")),
            Self::Transform(m) => Self::Transform(format!("{stage}: {m}")),
            Self::Encode(m) => Self::Encode(format!("{stage}: {m}")),
            Self::Other(e) => Self::Other(e.context(stage.to_string())),
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
