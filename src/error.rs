//! Error types for batchstack.

use std::path::PathBuf;
use thiserror::Error;

use crate::models::{ChannelDepth, ChannelLayout, Resolution};

/// Main error type for the batchstack library.
#[derive(Error, Debug)]
pub enum Error {
    /// Wrong number of positional arguments.
    #[error("usage: {usage}")]
    Usage { usage: &'static str },

    /// Resolution argument is not `<width>x<height>`.
    #[error("resolution format: \"1000x1000\" (got \"{input}\")")]
    InvalidResolution { input: String },

    /// Batch count is not a positive integer.
    #[error("batch count must be a positive integer (got \"{input}\")")]
    InvalidBatchCount { input: String },

    /// Invalid option value.
    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },

    /// Input path missing or not a directory.
    #[error("input needs to be a folder: {}", path.display())]
    InputNotFound { path: PathBuf },

    /// Output path cannot be used.
    #[error("invalid output {}: {reason}", path.display())]
    InvalidOutput { path: PathBuf, reason: String },

    /// Output extension is not png or jpg.
    #[error("output needs to be a .png or .jpg file: {}", path.display())]
    UnsupportedFormat { path: PathBuf },

    /// Debug directory exists and has entries.
    #[error("debug directory is not empty: {}", path.display())]
    DebugDirNotEmpty { path: PathBuf },

    /// Failed to decode a frame.
    #[error("failed to load image from {}: {source}", path.display())]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Failed to encode an output image.
    #[error("failed to save image to {}: {source}", path.display())]
    Encode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// A frame does not match the run resolution.
    #[error("resolution mismatch: expected {expected}, got {actual}")]
    ResolutionMismatch {
        expected: Resolution,
        actual: Resolution,
    },

    /// A frame does not match the run channel depth.
    #[error("channel depth mismatch: expected {expected}, got {actual}")]
    DepthMismatch {
        expected: ChannelDepth,
        actual: ChannelDepth,
    },

    /// Frames in one reduction use different channel layouts.
    #[error("channel layout mismatch: expected {expected:?}, got {actual:?}")]
    LayoutMismatch {
        expected: ChannelLayout,
        actual: ChannelLayout,
    },

    /// The averaging step could not produce a result.
    #[error("average render failed: {reason}")]
    Render { reason: String },

    /// No group produced an average.
    #[error("no frames could be loaded from {}", path.display())]
    NoFrames { path: PathBuf },

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Errors raised while validating the invocation, before any work starts.
    pub fn is_config(&self) -> bool {
        matches!(
            self,
            Error::Usage { .. }
                | Error::InvalidResolution { .. }
                | Error::InvalidBatchCount { .. }
                | Error::InvalidParameter { .. }
                | Error::InputNotFound { .. }
                | Error::InvalidOutput { .. }
                | Error::UnsupportedFormat { .. }
                | Error::DebugDirNotEmpty { .. }
        )
    }
}

/// Result type alias for batchstack operations.
pub type Result<T> = std::result::Result<T, Error>;
