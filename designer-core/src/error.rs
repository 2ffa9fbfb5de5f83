//! Error types for canvas operations.

use thiserror::Error;

/// Result type for canvas operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in canvas operations.
///
/// Operations on element ids that no longer exist are not errors: they are
/// absorbed as no-ops and reported through `false` / `None` return values.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// Asset resolution (fetch or decode) failed. The scene is unchanged.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// The host was used outside of its `init()` / `dispose()` window.
    #[error("Canvas lifecycle violation: {0}")]
    Lifecycle(#[from] LifecycleError),

    /// A loosely-typed property edit could not be converted.
    #[error("Invalid property `{key}`: {reason}")]
    InvalidProperty {
        /// The property key as supplied by the caller.
        key: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// Configuration failed validation.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Configuration or property JSON could not be parsed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Lifecycle violations raised by [`crate::CanvasHost`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LifecycleError {
    /// `init()` has not been called yet.
    #[error("canvas session has not been initialized")]
    NotInitialized,
    /// The session was disposed and not re-initialized.
    #[error("canvas session has been disposed")]
    Disposed,
    /// The session was accessed re-entrantly, e.g. from one of its observers.
    #[error("canvas session is already in use")]
    Busy,
}
