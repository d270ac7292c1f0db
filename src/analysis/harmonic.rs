use super::spectral::stft_magnitudes;
use crate::audio::decode::DecodedSignal;
use crate::config::AnalysisConfig;

/// Report order of the 12 pitch classes.
pub const PITCH_CLASSES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

/// Band projected onto pitch classes: fundamentals and the first few
/// harmonics, skipping sub-bass rumble and the brittle top octaves.
const CHROMA_MIN_HZ: f32 = 80.0;
const CHROMA_MAX_HZ: f32 = 4000.0;

/// Bins quieter than this are ignored.
const MAGNITUDE_THRESHOLD: f32 = 1e-3;

const A4_HZ: f32 = 440.0;

/// Time-averaged 12-bin chroma vector in C..B order.
///
/// Each STFT frame's magnitudes are binned by pitch class (semitone
/// equivalence, octave ignored) and the frames are averaged. Values are
/// relative energies, deliberately not normalized to sum to 1. A signal
/// shorter than one window yields all zeros.
pub fn chroma_features(signal: &DecodedSignal, cfg: &AnalysisConfig) -> [f32; 12] {
    let mags = stft_magnitudes(&signal.samples, cfg.fft_size, cfg.hop_size);
    let mut chroma = [0.0f32; 12];
    if mags.is_empty() {
        return chroma;
    }

    let freq_step = signal.sample_rate as f32 / cfg.fft_size as f32;

    for frame in &mags {
        for (bin, &magnitude) in frame.iter().enumerate() {
            if magnitude <= MAGNITUDE_THRESHOLD {
                continue;
            }
            let freq = bin as f32 * freq_step;
            if !(CHROMA_MIN_HZ..=CHROMA_MAX_HZ).contains(&freq) {
                continue;
            }
            chroma[pitch_class(freq)] += magnitude;
        }
    }

    for value in &mut chroma {
        *value /= mags.len() as f32;
    }
    chroma
}

/// Nearest MIDI note modulo 12, so C maps to 0 and B to 11.
fn pitch_class(freq: f32) -> usize {
    let midi = 69.0 + 12.0 * (freq / A4_HZ).log2();
    (midi.round() as i32).rem_euclid(12) as usize
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

    fn sine(freq: f32, rate: u32, secs: f32) -> Vec<f32> {
        let n = (rate as f32 * secs) as usize;
        (0..n)
            .map(|i| (2.0 * std::f32::consts::PI * freq * i as f32 / rate as f32).sin())
            .collect()
    }

    #[test]
    fn pitch_classes_map_to_the_fixed_order() {
        assert_eq!(pitch_class(261.63), 0); // C4
        assert_eq!(pitch_class(440.0), 9); // A4
        assert_eq!(pitch_class(880.0), 9); // A5, octave ignored
        assert_eq!(pitch_class(493.88), 11); // B4
    }

    #[test]
    fn a440_concentrates_energy_in_the_a_bin() {
        let cfg = AnalysisConfig::default();
        let signal = mono(sine(440.0, 22050, 1.0), 22050);
        let chroma = chroma_features(&signal, &cfg);

        let (argmax, _) = chroma
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap())
            .unwrap();
        assert_eq!(PITCH_CLASSES[argmax], "A");
    }

    #[test]
    fn chroma_is_always_12_non_negative_entries() {
        let cfg = AnalysisConfig::default();
        for samples in [vec![0.0; 22050], sine(523.25, 22050, 0.5), vec![1e-6; 22050]] {
            let chroma = chroma_features(&mono(samples, 22050), &cfg);
            assert_eq!(chroma.len(), 12);
            assert!(chroma.iter().all(|&v| v >= 0.0));
        }
    }

    #[test]
    fn short_signal_yields_zero_chroma() {
        let cfg = AnalysisConfig::default();
        let chroma = chroma_features(&mono(vec![0.5; 100], 22050), &cfg);
        assert_eq!(chroma, [0.0; 12]);
    }
}
