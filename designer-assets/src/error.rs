//! Asset error types.

use designer_core::CanvasError;
use thiserror::Error;

/// Result type for asset operations.
pub type AssetResult<T> = Result<T, AssetError>;

/// Errors that can occur while resolving an image source.
#[derive(Debug, Error)]
pub enum AssetError {
    /// Reading the file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bytes are not a decodable image.
    #[error("Failed to decode image: {0}")]
    Decode(String),

    /// The data URI is malformed.
    #[error("Invalid data URI: {0}")]
    InvalidDataUri(String),

    /// The source scheme cannot be fetched by this resolver.
    #[error("Unsupported image source: {0}")]
    UnsupportedSource(String),
}

impl From<image::ImageError> for AssetError {
    fn from(err: image::ImageError) -> Self {
        Self::Decode(err.to_string())
    }
}

impl From<AssetError> for CanvasError {
    fn from(err: AssetError) -> Self {
        Self::Resource(err.to_string())
    }
}
