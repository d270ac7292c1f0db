use serde::Serialize;

use super::spectral::to_db_scale;
use crate::audio::decode::DecodedSignal;

/// Time-domain statistics of the decoded signal. Amplitudes are normalized
/// (scaled) values, not physical units.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct TimeStats {
    pub duration: f32,
    pub max_amplitude: f32,
    pub mean_amplitude: f32,
}

/// Duration and amplitude extremes. An empty buffer yields all zeros.
pub fn time_stats(signal: &DecodedSignal) -> TimeStats {
    if signal.samples.is_empty() {
        return TimeStats {
            duration: 0.0,
            max_amplitude: 0.0,
            mean_amplitude: 0.0,
        };
    }

    let max_amplitude = signal.samples.iter().map(|s| s.abs()).fold(0.0f32, f32::max);
    let mean_amplitude =
        signal.samples.iter().map(|s| s.abs()).sum::<f32>() / signal.samples.len() as f32;

    TimeStats {
        duration: signal.duration_secs(),
        max_amplitude,
        mean_amplitude,
    }
}

/// Mean of the per-sample dB amplitudes, with the same floor and
/// dynamic-range clamp as the spectral envelope.
pub fn average_loudness(samples: &[f32]) -> f32 {
    let db = to_db_scale(samples);
    if db.is_empty() {
        return 0.0;
    }
    db.iter().sum::<f32>() / db.len() as f32
}
