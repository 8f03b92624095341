/// Convenience result type used across Driftshow.
pub type DriftResult<T> = Result<T, DriftError>;

/// Top-level error taxonomy used by engine APIs.
///
/// Per-image decode failures are recoverable and never cross the render
/// thread as errors; they surface as `Failed` sentinels in the prefetch
/// cache. Only session-fatal conditions (`EmptyPlaylist`, invalid profile
/// data) are reported to the caller at session start.
#[derive(thiserror::Error, Debug)]
pub enum DriftError {
    /// Invalid user-provided profile or viewport data.
    #[error("validation error: {0}")]
    Validation(String),

    /// A source image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A source image uses a format no available decoder handles.
    #[error("unsupported format: {0}")]
    UnsupportedFormat(String),

    /// The playlist contains no images; the session cannot start.
    #[error("playlist contains no images")]
    EmptyPlaylist,

    /// Prefetch worker pool or cache is saturated; relieved by backpressure.
    #[error("resource exhausted: {0}")]
    ResourceExhausted(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl DriftError {
    /// Build a [`DriftError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`DriftError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`DriftError::UnsupportedFormat`] value.
    pub fn unsupported_format(msg: impl Into<String>) -> Self {
        Self::UnsupportedFormat(msg.into())
    }

    /// Build a [`DriftError::ResourceExhausted`] value.
    pub fn resource_exhausted(msg: impl Into<String>) -> Self {
        Self::ResourceExhausted(msg.into())
    }

    /// True for per-image failures the sequencer skips over.
    pub fn is_per_image(&self) -> bool {
        matches!(self, Self::Decode(_) | Self::UnsupportedFormat(_))
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
