/// Result alias used across the crate.
pub type KeepsakeResult<T> = Result<T, KeepsakeError>;

/// Error type for every fallible keepsake operation.
///
/// Public render and export entry points convert these into graceful fallbacks; the variants
/// exist so the failure is still reported through logs and return values.
#[derive(thiserror::Error, Debug)]
pub enum KeepsakeError {
    /// Invalid input (bad hex color, zero-sized canvas, malformed config).
    #[error("validation error: {0}")]
    Validation(String),

    /// Image bytes could not be decoded.
    #[error("decode error: {0}")]
    Decode(String),

    /// A remote or local asset could not be fetched.
    #[error("fetch error: {0}")]
    Fetch(String),

    /// Drawing failed (surface limits, buffer mismatches).
    #[error("render error: {0}")]
    Render(String),

    /// PNG encoding failed.
    #[error("encode error: {0}")]
    Encode(String),

    /// Filesystem error while saving or reading.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Anything else, with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl KeepsakeError {
    /// Build a [`KeepsakeError::Validation`].
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    /// Build a [`KeepsakeError::Decode`].
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    /// Build a [`KeepsakeError::Fetch`].
    pub fn fetch(msg: impl Into<String>) -> Self {
        Self::Fetch(msg.into())
    }

    /// Build a [`KeepsakeError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build a [`KeepsakeError::Encode`].
    pub fn encode(msg: impl Into<String>) -> Self {
        Self::Encode(msg.into())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
