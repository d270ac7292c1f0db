use std::path::Path;
use symphonia::core::audio::SampleBuffer;
use symphonia::core::codecs::DecoderOptions;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;

use crate::error::AnalysisError;

/// Decoded audio, owned by a single analysis call and dropped with it.
///
/// `samples` is mono at `sample_rate` (the working rate). `native_rate` is
/// what the container itself declares; the two differ when the source was
/// resampled, and the report keeps both.
pub struct DecodedSignal {
    pub samples: Vec<f32>,
    pub sample_rate: u32,
    pub native_rate: u32,
    pub channels: usize,
}

impl DecodedSignal {
    pub fn duration_secs(&self) -> f32 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.samples.len() as f32 / self.sample_rate as f32
    }
}

/// Decode the audio payload into a mono f32 buffer at `working_rate`.
///
/// Any unreadable or corrupt payload is fatal for the whole analysis;
/// there is no partial report.
pub fn decode_audio(path: &Path, working_rate: u32) -> Result<DecodedSignal, AnalysisError> {
    let file = std::fs::File::open(path)?;

    let mss = MediaSourceStream::new(Box::new(file), Default::default());

    let mut hint = Hint::new();
    if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
        hint.with_extension(ext);
    }

    let probed = symphonia::default::get_probe()
        .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
        .map_err(|e| AnalysisError::Decode(format!("failed to probe container: {e}")))?;

    let mut format = probed.format;

    let track = format
        .tracks()
        .iter()
        .find(|t| t.codec_params.codec != symphonia::core::codecs::CODEC_TYPE_NULL)
        .ok_or_else(|| AnalysisError::Decode("no audio track found".to_string()))?;

    let track_id = track.id;
    let channels = track.codec_params.channels.map_or(1, |c| c.count());
    let native_rate = track
        .codec_params
        .sample_rate
        .ok_or_else(|| AnalysisError::Decode("container declares no sample rate".to_string()))?;

    let mut decoder = symphonia::default::get_codecs()
        .make(&track.codec_params, &DecoderOptions::default())
        .map_err(|e| AnalysisError::Decode(format!("failed to create decoder: {e}")))?;

    let mut all_samples: Vec<f32> = Vec::new();

    loop {
        let packet = match format.next_packet() {
            Ok(packet) => packet,
            Err(symphonia::core::errors::Error::IoError(ref e))
                if e.kind() == std::io::ErrorKind::UnexpectedEof =>
            {
                break;
            }
            Err(e) => return Err(AnalysisError::Decode(e.to_string())),
        };

        if packet.track_id() != track_id {
            continue;
        }

        let decoded = match decoder.decode(&packet) {
            Ok(d) => d,
            // A single bad packet is skipped; a fully broken stream still
            // fails below when nothing decodes.
            Err(symphonia::core::errors::Error::DecodeError(_)) => continue,
            Err(e) => return Err(AnalysisError::Decode(e.to_string())),
        };

        let spec = *decoded.spec();
        let num_frames = decoded.frames();

        let mut sample_buf = SampleBuffer::<f32>::new(num_frames as u64, spec);
        sample_buf.copy_interleaved_ref(decoded);

        let samples = sample_buf.samples();

        // Downmix to mono
        if channels == 1 {
            all_samples.extend_from_slice(samples);
        } else {
            for frame_samples in samples.chunks(channels) {
                let mono: f32 = frame_samples.iter().sum::<f32>() / channels as f32;
                all_samples.push(mono);
            }
        }
    }

    if all_samples.is_empty() {
        return Err(AnalysisError::Decode("no decodable audio packets".to_string()));
    }

    let samples = if native_rate != working_rate {
        resample(&all_samples, native_rate, working_rate)?
    } else {
        all_samples
    };

    log::info!(
        "Decoded audio: {} samples, native {}Hz, working {}Hz, {} channel(s), {:.1}s",
        samples.len(),
        native_rate,
        working_rate,
        channels,
        samples.len() as f32 / working_rate as f32
    );

    Ok(DecodedSignal {
        samples,
        sample_rate: working_rate,
        native_rate,
        channels,
    })
}

/// Resample mono f32 audio from `from_rate` to `to_rate` using rubato.
fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>, AnalysisError> {
    use rubato::{
        Resampler, SincFixedIn, SincInterpolationParameters, SincInterpolationType, WindowFunction,
    };

    let params = SincInterpolationParameters {
        sinc_len: 256,
        f_cutoff: 0.95,
        interpolation: SincInterpolationType::Linear,
        oversampling_factor: 256,
        window: WindowFunction::BlackmanHarris2,
    };

    let ratio = to_rate as f64 / from_rate as f64;
    let mut resampler = SincFixedIn::<f32>::new(
        ratio,
        2.0, // max relative ratio
        params,
        samples.len(),
        1, // mono
    )
    .map_err(|e| AnalysisError::Resample(e.to_string()))?;

    let input = vec![samples.to_vec()];
    let output = resampler
        .process(&input, None)
        .map_err(|e| AnalysisError::Resample(e.to_string()))?;

    Ok(output.into_iter().next().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duration_of_empty_signal_is_zero() {
        let signal = DecodedSignal {
            samples: Vec::new(),
            sample_rate: 22050,
            native_rate: 22050,
            channels: 1,
        };
        assert_eq!(signal.duration_secs(), 0.0);
    }

    #[test]
    fn garbage_payload_is_a_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.wav");
        std::fs::write(&path, b"RIFF but not really").unwrap();

        let result = decode_audio(&path, 22050);
        assert!(matches!(result, Err(AnalysisError::Decode(_))));
    }
}
