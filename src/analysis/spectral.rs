use rustfft::{num_complex::Complex, FftPlanner};
use serde::Serialize;

use crate::audio::decode::DecodedSignal;
use crate::config::AnalysisConfig;

/// Amplitudes below this are clamped before the log, so silence maps to a
/// finite dB value instead of -inf.
const AMPLITUDE_FLOOR: f32 = 1e-5;

/// Dynamic range kept below the peak when converting a whole array to dB.
const TOP_DB: f32 = 80.0;

/// Full-signal DFT output for the frequency-spectrum plot. Both sequences
/// have length N (the sample count), frequencies in the standard FFT bin
/// layout with the negative-frequency fold.
#[derive(Debug, Clone, Serialize)]
pub struct FrequencySpectrum {
    pub frequencies: Vec<f32>,
    pub magnitudes: Vec<f32>,
}

/// Frequency-by-time magnitude grid (dB) for the spectrogram plot.
#[derive(Debug, Clone, Serialize)]
pub struct Spectrogram {
    /// One row per STFT frame, `fft_size / 2` dB-scaled bins each.
    pub frames: Vec<Vec<f32>>,
    /// Hz between adjacent bins.
    pub freq_step: f32,
    /// Seconds between adjacent frames.
    pub frame_step: f32,
}

/// Report-level frequency bounds: DC to Nyquist, independent of content.
pub fn frequency_bounds(sample_rate: u32) -> (f32, f32) {
    (0.0, sample_rate as f32 / 2.0)
}

/// The raw decoded waveform, for the waveform plot.
pub fn waveform_samples(signal: &DecodedSignal) -> &[f32] {
    &signal.samples
}

/// DFT of the entire sample sequence.
pub fn frequency_spectrum(samples: &[f32], sample_rate: u32) -> FrequencySpectrum {
    let n = samples.len();
    if n == 0 {
        return FrequencySpectrum {
            frequencies: Vec::new(),
            magnitudes: Vec::new(),
        };
    }

    let mut buffer: Vec<Complex<f32>> = samples.iter().map(|&s| Complex::new(s, 0.0)).collect();

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(n);
    fft.process(&mut buffer);

    let magnitudes: Vec<f32> = buffer.iter().map(|c| c.norm()).collect();

    // Bin k maps to k/(N*dt) for the first half, (k-N)/(N*dt) for the rest.
    let step = sample_rate as f32 / n as f32;
    let last_positive = (n - 1) / 2;
    let frequencies: Vec<f32> = (0..n)
        .map(|k| {
            if k <= last_positive {
                k as f32 * step
            } else {
                (k as f32 - n as f32) * step
            }
        })
        .collect();

    FrequencySpectrum {
        frequencies,
        magnitudes,
    }
}

/// Per-frame peak log-magnitude across frequency: one scalar per STFT frame.
pub fn spectral_envelope(signal: &DecodedSignal, cfg: &AnalysisConfig) -> Vec<f32> {
    let mags = stft_magnitudes(&signal.samples, cfg.fft_size, cfg.hop_size);
    let peaks: Vec<f32> = mags
        .iter()
        .map(|frame| frame.iter().copied().fold(0.0f32, f32::max))
        .collect();
    to_db_scale(&peaks)
}

/// Spectrogram data grid for the display layer. No axes or colors here,
/// just the numbers.
pub fn spectrogram(signal: &DecodedSignal, cfg: &AnalysisConfig) -> Spectrogram {
    let mags = stft_magnitudes(&signal.samples, cfg.fft_size, cfg.hop_size);

    let peak = mags
        .iter()
        .flat_map(|f| f.iter().copied())
        .fold(0.0f32, f32::max);
    let floor_db = amplitude_to_db(peak) - TOP_DB;

    let frames: Vec<Vec<f32>> = mags
        .iter()
        .map(|frame| frame.iter().map(|&m| amplitude_to_db(m).max(floor_db)).collect())
        .collect();

    Spectrogram {
        frames,
        freq_step: signal.sample_rate as f32 / cfg.fft_size as f32,
        frame_step: cfg.hop_size as f32 / signal.sample_rate as f32,
    }
}

/// Hann-windowed STFT magnitudes: one `fft_size / 2`-bin row per frame.
/// Frames start at sample 0 and advance by `hop_size`; a signal shorter
/// than one window yields no frames.
pub(crate) fn stft_magnitudes(samples: &[f32], fft_size: usize, hop_size: usize) -> Vec<Vec<f32>> {
    if samples.len() < fft_size || hop_size == 0 {
        return Vec::new();
    }

    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(fft_size);
    let hann = hann_window(fft_size);

    let mut frames = Vec::with_capacity((samples.len() - fft_size) / hop_size + 1);
    let mut pos = 0;
    while pos + fft_size <= samples.len() {
        let mut buffer: Vec<Complex<f32>> = samples[pos..pos + fft_size]
            .iter()
            .enumerate()
            .map(|(i, &s)| Complex::new(s * hann[i], 0.0))
            .collect();
        fft.process(&mut buffer);

        let magnitudes: Vec<f32> = buffer[..fft_size / 2].iter().map(|c| c.norm()).collect();
        frames.push(magnitudes);
        pos += hop_size;
    }

    frames
}

/// `20·log10(|a|)` with the amplitude floor applied.
pub(crate) fn amplitude_to_db(amplitude: f32) -> f32 {
    20.0 * amplitude.abs().max(AMPLITUDE_FLOOR).log10()
}

/// Convert an array of amplitudes to dB, clamping everything to within
/// [`TOP_DB`] of the array's own peak.
pub(crate) fn to_db_scale(values: &[f32]) -> Vec<f32> {
    if values.is_empty() {
        return Vec::new();
    }
    let db: Vec<f32> = values.iter().map(|&v| amplitude_to_db(v)).collect();
    let peak = db.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = peak - TOP_DB;
    db.into_iter().map(|v| v.max(floor)).collect()
}

pub(crate) fn hann_window(size: usize) -> Vec<f32> {
    (0..size)
        .map(|i| 0.5 * (1.0 - (2.0 * std::f32::consts::PI * i as f32 / (size - 1) as f32).cos()))
        .collect()
}
