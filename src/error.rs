use std::path::PathBuf;
use thiserror::Error;

/// Errors the analysis pipeline can halt on.
///
/// Metadata problems are not represented here: a missing or corrupt tag
/// block degrades to "Unknown" fields instead of aborting the analysis.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// The path does not exist or is not a regular file.
    #[error("The selected file does not exist: {}", .0.display())]
    NotFound(PathBuf),

    /// The extension is not in the supported-format whitelist.
    #[error("The selected file is not a valid audio file (unsupported format \"{0}\")")]
    UnsupportedFormat(String),

    /// The audio payload could not be decoded. Fatal; no partial report.
    #[error("Failed to decode audio: {0}")]
    Decode(String),

    /// Conversion to the working sample rate failed.
    #[error("Failed to resample audio: {0}")]
    Resample(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
