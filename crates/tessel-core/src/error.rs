//! Error types for Tessel operations.

use thiserror::Error;

/// Core error type for Tessel operations.
///
/// Out-of-range coordinates passed to surface mutation methods are never
/// reported through this type; they are clipped silently.
#[derive(Error, Debug)]
pub enum Error {
    /// A surface could not be attached to the requested parent.
    #[error("Invalid attachment: {0}")]
    InvalidAttachment(String),

    /// A surface could not be detached from its tree.
    #[error("Invalid detachment: {0}")]
    InvalidDetachment(String),

    /// The surface handle does not refer to a live surface.
    #[error("Surface not found: {0}")]
    SurfaceNotFound(String),

    /// Invalid dimensions were provided.
    #[error("Invalid dimensions: {0}")]
    InvalidDimensions(String),

    /// An I/O error occurred while writing to a display sink.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using the core Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for color parsing operations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    /// Input string was empty.
    #[error("empty input")]
    EmptyInput,

    /// Hex string had an invalid length.
    #[error("invalid hex length: {0} (expected 3, 4, 6, or 8)")]
    InvalidLength(usize),

    /// Invalid hexadecimal character.
    #[error("invalid hex character")]
    InvalidHexChar,
}
