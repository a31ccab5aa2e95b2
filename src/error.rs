use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image processing error: {0}")]
    ImageProcessing(#[from] image::ImageError),

    #[error("PNG optimization error: {0}")]
    PngOptimization(String),

    #[error("Invalid target dimensions: {0}x{1}. Width and height must be positive")]
    InvalidDimensions(u32, u32),

    #[error("Invalid size ceiling: {0} KB. Must be positive")]
    InvalidSizeCeiling(u64),

    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    #[error("File not found: {0}")]
    FileNotFound(PathBuf),

    #[error("Failed to create output directory {path:?}: {source}")]
    DirectoryCreationFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Path is outside the input root: {0}")]
    InvalidPath(PathBuf),

    #[error("Walkdir error: {0}")]
    WalkdirError(#[from] walkdir::Error),
}

impl From<tempfile::PersistError> for CompressionError {
    fn from(err: tempfile::PersistError) -> Self {
        CompressionError::Io(err.error)
    }
}

pub type Result<T> = std::result::Result<T, CompressionError>;
