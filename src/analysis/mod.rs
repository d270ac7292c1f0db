pub mod harmonic;
pub mod rhythm;
pub mod spectral;
pub mod temporal;

use serde::Serialize;
use std::path::Path;

use crate::audio::decode::decode_audio;
use crate::config::Config;
use crate::error::AnalysisError;
use crate::metadata::{self, Tags};
use crate::probe::{self, AudioAsset};

/// Everything the report renders, derived purely from the probed asset and
/// the decoded signal. Read-only once built.
#[derive(Debug, Serialize)]
pub struct AnalysisReport {
    pub asset: AudioAsset,
    /// Present only when the metadata section is enabled.
    pub tags: Option<Tags>,
    /// Seconds, sample count over the working rate.
    pub duration: f32,
    /// The rate the container declares.
    pub native_rate: u32,
    /// The rate all spectral math ran at.
    pub working_rate: u32,
    pub channels: usize,
    pub max_amplitude: f32,
    pub mean_amplitude: f32,
    pub min_frequency: f32,
    pub max_frequency: f32,
    /// Beats per minute; 0.0 for silence.
    pub tempo: Option<f32>,
    /// Mean dB amplitude.
    pub loudness: Option<f32>,
    /// Pitch-class energies in C..B order.
    pub chroma: Option<[f32; 12]>,
}

/// Run the full pipeline on one file.
///
/// Probe validates first and short-circuits; the decode runs once and every
/// analyzer is an independent pure function of the decoded signal. Nothing
/// is cached across calls; the signal is dropped when this returns.
pub fn analyze(path: &Path, config: &Config) -> Result<AnalysisReport, AnalysisError> {
    let asset = probe::probe_file(path)?;

    let tags = if config.sections.metadata {
        Some(metadata::read_tags(path))
    } else {
        None
    };

    log::info!("Decoding {}...", asset.file_name);
    let signal = decode_audio(path, config.analysis.working_rate)?;

    let stats = temporal::time_stats(&signal);
    let (min_frequency, max_frequency) = spectral::frequency_bounds(signal.sample_rate);

    let tempo = if config.sections.rhythm {
        Some(rhythm::estimate_tempo(&signal, &config.analysis))
    } else {
        None
    };

    let loudness = if config.sections.loudness {
        Some(temporal::average_loudness(&signal.samples))
    } else {
        None
    };

    let chroma = if config.sections.harmonic {
        Some(harmonic::chroma_features(&signal, &config.analysis))
    } else {
        None
    };

    Ok(AnalysisReport {
        asset,
        tags,
        duration: stats.duration,
        native_rate: signal.native_rate,
        working_rate: signal.sample_rate,
        channels: signal.channels,
        max_amplitude: stats.max_amplitude,
        mean_amplitude: stats.mean_amplitude,
        min_frequency,
        max_frequency,
        tempo,
        loudness,
        chroma,
    })
}
