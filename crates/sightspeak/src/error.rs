use std::path::PathBuf;
use thiserror::Error;

/// Everything that can stop a conversion, by pipeline stage.
///
/// These never escape [`crate::Converter::convert`]; they are rendered into
/// the `error` field of the result record.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("image file not found: {}", .0.display())]
    ImageNotFound(PathBuf),

    #[error("failed to read image {}: {source}", .path.display())]
    ImageRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("vision analysis failed: {0:#}")]
    Vision(anyhow::Error),

    #[error("speech synthesis failed: {0:#}")]
    Tts(anyhow::Error),

    #[error("audio not ready after {0} seconds")]
    Timeout(u64),

    #[error("audio download failed: {0:#}")]
    Download(anyhow::Error),

    #[error("failed to write audio to {}: {source}", .path.display())]
    AudioWrite {
        path: PathBuf,
        source: std::io::Error,
    },
}
