use lofty::prelude::*;
use lofty::probe::Probe;
use serde::Serialize;
use std::borrow::Cow;
use std::path::Path;

/// Sentinel for tag fields absent from the container.
pub const UNKNOWN: &str = "Unknown";

/// Embedded metadata with every absent field defaulted to `"Unknown"`.
#[derive(Debug, Clone, Serialize)]
pub struct Tags {
    pub artist: String,
    pub title: String,
    pub album: String,
    pub year: String,
    pub genre: String,
}

impl Default for Tags {
    fn default() -> Self {
        Self {
            artist: UNKNOWN.to_string(),
            title: UNKNOWN.to_string(),
            album: UNKNOWN.to_string(),
            year: UNKNOWN.to_string(),
            genre: UNKNOWN.to_string(),
        }
    }
}

/// Read embedded tags from the container.
///
/// Never fails the analysis: a file without tags, or with a tag block lofty
/// cannot parse, yields all-"Unknown" fields.
pub fn read_tags(path: &Path) -> Tags {
    let tagged_file = match Probe::open(path).and_then(|p| p.read()) {
        Ok(f) => f,
        Err(e) => {
            log::debug!("No readable tags in {}: {}", path.display(), e);
            return Tags::default();
        }
    };

    let tag = match tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
        Some(t) => t,
        None => return Tags::default(),
    };

    Tags {
        artist: field(tag.artist()),
        title: field(tag.title()),
        album: field(tag.album()),
        year: tag
            .year()
            .map(|y| y.to_string())
            .unwrap_or_else(|| UNKNOWN.to_string()),
        genre: field(tag.genre()),
    }
}

fn field(value: Option<Cow<'_, str>>) -> String {
    value
        .map(|s| s.to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_string())
}
