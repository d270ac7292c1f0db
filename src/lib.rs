//! waveprobe - single-file audio measurement reports
//!
//! Turns one audio file into a structured report: file identity, embedded
//! tags, time- and frequency-domain statistics, a tempo estimate, and a
//! 12-bin chroma vector. Also exposes the pure data transforms a display
//! layer needs for waveform, spectrogram, frequency-spectrum, and
//! spectral-envelope plots; the rendering itself lives elsewhere.

pub mod analysis;
pub mod audio;
pub mod config;
pub mod error;
pub mod metadata;
pub mod probe;
pub mod report;

pub use analysis::{analyze, AnalysisReport};
pub use config::Config;
pub use error::AnalysisError;
