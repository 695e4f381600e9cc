//! Error types for the preview engine

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in the preview engine
#[derive(Error, Debug)]
pub enum Error {
    /// An uploaded file exceeded the size gate
    #[error("File too large: {size} bytes exceeds the {limit} byte limit")]
    FileTooLarge { size: u64, limit: u64 },

    /// An uploaded file could not be decoded as an image
    #[error("Failed to read upload: {0}")]
    ReadError(String),

    /// A single preview sub-update failed
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// The capture backend failed to produce a bitmap
    #[error("Surface capture failed: {0}")]
    CaptureError(String),

    /// The host offers no clipboard surface
    #[error("Clipboard is not supported by this host")]
    ClipboardUnsupported,

    /// The clipboard write was attempted and failed
    #[error("Clipboard write failed: {0}")]
    ClipboardError(String),

    /// Another export action is still in flight
    #[error("An export action is already in flight")]
    ExportBusy,

    /// Invalid configuration or form-state document
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// Filesystem error while saving an export
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
