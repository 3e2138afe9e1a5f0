//! Error types for terrain construction and heightmap decoding
//!
//! Construction is pure and deterministic, so there is no retry or partial
//! result: a call either returns a fully populated value or one of these.

use std::fmt;

/// Errors raised while building terrain geometry or assembling a scene
#[derive(Debug, Clone, PartialEq)]
pub enum TerrainError {
    /// A construction parameter was malformed
    InvalidInput {
        /// Name of the offending parameter (e.g. `"size"`, `"resolution"`)
        parameter: &'static str,
        /// What was wrong with it
        message: String,
    },
    /// The heightmap could not be decoded
    Decode(DecodeError),
}

impl TerrainError {
    /// Create an `InvalidInput` error for a named parameter
    pub fn invalid_input(parameter: &'static str, message: impl Into<String>) -> Self {
        TerrainError::InvalidInput {
            parameter,
            message: message.into(),
        }
    }

    /// Returns true for the `InvalidInput` kind
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, TerrainError::InvalidInput { .. })
    }
}

impl fmt::Display for TerrainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TerrainError::InvalidInput { parameter, message } => {
                write!(f, "Invalid input '{parameter}': {message}")
            }
            TerrainError::Decode(err) => write!(f, "Heightmap decode failed: {err}"),
        }
    }
}

impl std::error::Error for TerrainError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TerrainError::Decode(err) => Some(err),
            TerrainError::InvalidInput { .. } => None,
        }
    }
}

impl From<DecodeError> for TerrainError {
    fn from(err: DecodeError) -> Self {
        TerrainError::Decode(err)
    }
}

/// Errors raised while turning image bytes into a heightmap
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    /// Failed to read the image file
    Io {
        /// Path that was being read
        path: String,
        /// Underlying I/O error message
        message: String,
    },
    /// Bytes were not a supported image format
    Format(String),
    /// Image decoded to zero width or height
    Empty,
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeError::Io { path, message } => write!(f, "Failed to read '{path}': {message}"),
            DecodeError::Format(msg) => write!(f, "Unsupported image data: {msg}"),
            DecodeError::Empty => write!(f, "Image has zero width or height"),
        }
    }
}

impl std::error::Error for DecodeError {}
