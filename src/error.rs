//! Errors for the fallible edges: config files and image I/O.
//! Rasterization itself never fails.

/// Error type for config and texture loading
#[derive(Debug, thiserror::Error)]
pub enum RasterError {
    /// Reading or writing a file failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A RON config could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ron::error::SpannedError),

    /// A config could not be serialized.
    #[error("Serialize error: {0}")]
    Serialize(#[from] ron::Error),

    /// Image decode or encode failed.
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    /// Config parsed but holds unusable values.
    #[error("Invalid config: {0}")]
    InvalidConfig(String),
}
