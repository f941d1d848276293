/// Convenience result type used across photoframe.
pub type FrameResult<T> = Result<T, FrameError>;

/// Top-level error taxonomy used by editor APIs.
#[derive(thiserror::Error, Debug)]
pub enum FrameError {
    /// Invalid user-provided configuration or arguments.
    #[error("validation error: {0}")]
    Validation(String),

    /// A frame document or catalog resource could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// A frame document could not be parsed as SVG/XML.
    #[error("parse error: {0}")]
    Parse(String),

    /// A user-provided image could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// Rasterizing or encoding the export failed.
    #[error("render error: {0}")]
    Render(String),

    /// Wrapped lower-level error from dependencies or IO.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl FrameError {
    /// Build a [`FrameError::Validation`] value.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`FrameError::Fetch`] value.
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`FrameError::Parse`] value.
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// Build a [`FrameError::Decode`] value.
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`FrameError::Render`] value.
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
