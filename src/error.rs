//! Error types for the ROI viewer.
//!
//! Scene and tool operations never fail: removing an absent shape or
//! deleting an empty selection is a no-op. Errors only arise at the edges,
//! where the host hands over image data, text names or serialized data.

use thiserror::Error;

/// Errors returned by viewer operations that accept external input.
#[derive(Error, Debug)]
pub enum ViewerError {
    /// Image array is neither grayscale (H×W) nor 3-channel color (H×W×3)
    #[error("Unsupported image shape {shape:?}: expected (height, width) or (height, width, 3)")]
    UnsupportedImageShape {
        /// Shape of the rejected array
        shape: Vec<usize>,
    },

    /// Image has a zero-length dimension
    #[error("Image is empty")]
    EmptyImage,

    /// No text label with this name exists
    #[error("Unknown text label '{name}'")]
    UnknownText {
        /// Name that was looked up
        name: String,
    },

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Errors that can occur when loading configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// JSON parsing error
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Configuration version is newer than supported
    #[error(
        "Configuration file version {file_version} is newer than supported version {supported_version}"
    )]
    VersionTooNew {
        file_version: u32,
        supported_version: u32,
    },

    /// A field holds a value outside its valid range
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}
