use super::spectral::stft_magnitudes;
use crate::audio::decode::DecodedSignal;
use crate::config::AnalysisConfig;

/// Tempo search band for the autocorrelation stage. Periodicities outside
/// this band are attributed to their in-band multiple.
const TEMPO_MIN_BPM: f32 = 60.0;
const TEMPO_MAX_BPM: f32 = 180.0;

/// Minimum spacing between picked beats, in seconds.
const MIN_BEAT_GAP: f32 = 0.1;

/// Estimate a global tempo in beats per minute.
///
/// The onset-strength envelope (half-wave-rectified spectral flux) is
/// autocorrelated and the dominant in-band lag gives a coarse tempo; the
/// estimate is then refined with the median interval of picked beat
/// positions compatible with that period. Silence and near-silence
/// return 0.0 instead of failing.
pub fn estimate_tempo(signal: &DecodedSignal, cfg: &AnalysisConfig) -> f32 {
    let mags = stft_magnitudes(&signal.samples, cfg.fft_size, cfg.hop_size);
    if mags.len() < 4 {
        return 0.0;
    }

    let onset = onset_envelope(&mags);
    if onset.iter().all(|&f| f <= 1e-6) {
        log::debug!("Onset envelope is flat; reporting tempo 0");
        return 0.0;
    }

    let frame_rate = signal.sample_rate as f32 / cfg.hop_size as f32;

    let coarse = match dominant_periodicity(&onset, frame_rate) {
        Some(bpm) => bpm,
        None => return 0.0,
    };

    let beat_times = pick_beats(&onset, frame_rate);
    let tempo = refine_tempo(coarse, &beat_times);

    log::info!(
        "Tempo: {:.1} BPM (coarse {:.1}, {} beats picked)",
        tempo,
        coarse,
        beat_times.len()
    );
    tempo
}

/// Frame-to-frame spectral energy increase, summed across bins. The first
/// frame has no predecessor and contributes 0.
fn onset_envelope(mags: &[Vec<f32>]) -> Vec<f32> {
    let mut flux = vec![0.0f32; mags.len()];
    for i in 1..mags.len() {
        flux[i] = mags[i]
            .iter()
            .zip(mags[i - 1].iter())
            .map(|(cur, prev)| (cur - prev).max(0.0))
            .sum();
    }
    flux
}

/// Autocorrelate the onset envelope over lags inside the tempo band and
/// return the BPM of the strongest one.
fn dominant_periodicity(onset: &[f32], frame_rate: f32) -> Option<f32> {
    let min_lag = ((frame_rate * 60.0 / TEMPO_MAX_BPM).floor() as usize).max(1);
    let max_lag = ((frame_rate * 60.0 / TEMPO_MIN_BPM).ceil() as usize).min(onset.len() - 1);
    if min_lag >= max_lag {
        return None;
    }

    let mut best_lag = 0usize;
    let mut best_value = 0.0f32;
    for lag in min_lag..=max_lag {
        let value: f32 = onset[..onset.len() - lag]
            .iter()
            .zip(onset[lag..].iter())
            .map(|(a, b)| a * b)
            .sum();
        if value > best_value {
            best_value = value;
            best_lag = lag;
        }
    }

    if best_value <= 0.0 || best_lag == 0 {
        return None;
    }
    Some(60.0 * frame_rate / best_lag as f32)
}

/// Pick beat positions: local peaks of the onset envelope above an adaptive
/// threshold, at least [`MIN_BEAT_GAP`] apart. Intermediate only; the report
/// never sees these.
fn pick_beats(onset: &[f32], frame_rate: f32) -> Vec<f32> {
    if onset.is_empty() {
        return Vec::new();
    }

    let window = 20; // ~0.5s of context at the default hop
    let mut beat_times = Vec::new();

    for i in 0..onset.len() {
        let start = i.saturating_sub(window);
        let end = (i + window + 1).min(onset.len());
        let local_mean: f32 = onset[start..end].iter().sum::<f32>() / (end - start) as f32;

        let threshold = local_mean * 1.5 + 0.01;

        if onset[i] > threshold {
            let is_peak = (i == 0 || onset[i] >= onset[i - 1])
                && (i == onset.len() - 1 || onset[i] >= onset[i + 1]);

            let time = i as f32 / frame_rate;
            let far_enough = beat_times
                .last()
                .map_or(true, |&last: &f32| time - last > MIN_BEAT_GAP);

            if is_peak && far_enough {
                beat_times.push(time);
            }
        }
    }

    beat_times
}

/// Snap the coarse autocorrelation estimate to the median inter-beat
/// interval when the picked beats agree with it.
fn refine_tempo(coarse_bpm: f32, beat_times: &[f32]) -> f32 {
    if beat_times.len() < 2 {
        return coarse_bpm;
    }

    let period = 60.0 / coarse_bpm;
    let mut compatible: Vec<f32> = beat_times
        .windows(2)
        .map(|w| w[1] - w[0])
        .filter(|&i| i >= period * 0.7 && i <= period * 1.4)
        .collect();

    if compatible.is_empty() {
        return coarse_bpm;
    }

    compatible.sort_by(|a, b| a.partial_cmp(b).unwrap());
    let median_interval = compatible[compatible.len() / 2];
    60.0 / median_interval
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono(samples: Vec<f32>, rate: u32) -> DecodedSignal {
        DecodedSignal {
            samples,
            sample_rate: rate,
            native_rate: rate,
            channels: 1,
        }
    }

    /// Short noise bursts every `interval_secs`, silence in between.
    fn click_track(rate: u32, secs: f32, interval_secs: f32) -> Vec<f32> {
        let n = (rate as f32 * secs) as usize;
        let interval = (rate as f32 * interval_secs) as usize;
        let click_len = rate as usize / 100; // 10ms bursts
        let mut samples = vec![0.0f32; n];
        let mut pos = 0;
        while pos < n {
            for i in 0..click_len.min(n - pos) {
                // decaying burst with some high-frequency content
                let t = i as f32 / rate as f32;
                samples[pos + i] = (1.0 - i as f32 / click_len as f32)
                    * (2.0 * std::f32::consts::PI * 3000.0 * t).sin();
            }
            pos += interval;
        }
        samples
    }

    #[test]
    fn silence_reports_zero_tempo() {
        let cfg = AnalysisConfig::default();
        let signal = mono(vec![0.0; 22050 * 4], 22050);
        assert_eq!(estimate_tempo(&signal, &cfg), 0.0);
    }

    #[test]
    fn too_short_signal_reports_zero_tempo() {
        let cfg = AnalysisConfig::default();
        let signal = mono(vec![0.5; 1000], 22050);
        assert_eq!(estimate_tempo(&signal, &cfg), 0.0);
    }

    #[test]
    fn click_track_lands_near_120_bpm() {
        let cfg = AnalysisConfig::default();
        // 120 BPM = one click every 0.5s
        let signal = mono(click_track(22050, 8.0, 0.5), 22050);
        let tempo = estimate_tempo(&signal, &cfg);
        assert!(
            (tempo - 120.0).abs() < 15.0,
            "expected ~120 BPM, got {tempo}"
        );
    }

    #[test]
    fn onset_envelope_rises_on_energy_increase() {
        let quiet = vec![0.1f32; 8];
        let loud = vec![1.0f32; 8];
        let flux = onset_envelope(&[quiet.clone(), quiet.clone(), loud, quiet]);
        assert_eq!(flux[0], 0.0);
        assert!(flux[2] > flux[1]);
        // decreases are rectified away
        assert_eq!(flux[3], 0.0);
    }

    #[test]
    fn refine_uses_median_interval_when_beats_agree() {
        // beats at a clean 0.5s spacing refine a slightly-off coarse guess
        let beats: Vec<f32> = (0..10).map(|i| i as f32 * 0.5).collect();
        let tempo = refine_tempo(110.0, &beats);
        assert!((tempo - 120.0).abs() < 1e-3);
    }

    #[test]
    fn refine_falls_back_to_coarse_without_beats() {
        assert_eq!(refine_tempo(97.0, &[]), 97.0);
        assert_eq!(refine_tempo(97.0, &[1.0]), 97.0);
    }
}
