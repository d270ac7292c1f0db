use chrono::{DateTime, Local};
use serde::Serialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::error::AnalysisError;

/// Extensions the analyzer accepts. Anything else is rejected before decode.
pub const SUPPORTED_FORMATS: [&str; 5] = ["mp3", "wav", "ogg", "flac", "aiff"];

const HASH_CHUNK_SIZE: usize = 4096;

/// Identity of the input file, established before any decoding happens.
#[derive(Debug, Clone, Serialize)]
pub struct AudioAsset {
    /// Basename of the input path.
    pub file_name: String,
    /// Lower-cased extension, guaranteed to be in [`SUPPORTED_FORMATS`].
    pub format: String,
    /// Filesystem modification time.
    pub last_modified: DateTime<Local>,
    /// MD5 of the raw byte stream, lowercase hex. A fingerprint for
    /// identity, not an integrity check.
    pub content_hash: String,
}

/// Validate the path and build the [`AudioAsset`] identity record.
///
/// Fails with [`AnalysisError::NotFound`] for missing/non-regular paths and
/// [`AnalysisError::UnsupportedFormat`] for extensions outside the whitelist.
pub fn probe_file(path: &Path) -> Result<AudioAsset, AnalysisError> {
    if !path.is_file() {
        return Err(AnalysisError::NotFound(path.to_path_buf()));
    }

    let format = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if !SUPPORTED_FORMATS.contains(&format.as_str()) {
        return Err(AnalysisError::UnsupportedFormat(format));
    }

    let meta = std::fs::metadata(path)?;
    let last_modified = DateTime::<Local>::from(meta.modified()?);

    let file_name = path
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();

    let content_hash = hash_file(path)?;
    log::debug!("Probed {}: {} ({})", file_name, format, content_hash);

    Ok(AudioAsset {
        file_name,
        format,
        last_modified,
        content_hash,
    })
}

/// Stream the file through MD5 in fixed-size chunks, so memory use stays
/// O(chunk) regardless of file size.
fn hash_file(path: &Path) -> Result<String, AnalysisError> {
    let mut file = File::open(path)?;
    let mut context = md5::Context::new();
    let mut buf = [0u8; HASH_CHUNK_SIZE];

    loop {
        let n = file.read(&mut buf)?;
        if n == 0 {
            break;
        }
        context.consume(&buf[..n]);
    }

    Ok(format!("{:x}", context.compute()))
}
