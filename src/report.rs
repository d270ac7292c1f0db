use std::fmt::Write;

use crate::analysis::harmonic::PITCH_CLASSES;
use crate::analysis::AnalysisReport;

/// Render the report as plain text, sections in fixed order: identity,
/// metadata, time/frequency statistics, tempo, loudness, chroma. Disabled
/// sections are omitted wholesale.
pub fn render(report: &AnalysisReport) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "File Name: {}", report.asset.file_name);
    let _ = writeln!(out, "Audio File Format: {}", report.asset.format);
    let _ = writeln!(
        out,
        "Last Modified: {}",
        report.asset.last_modified.format("%Y-%m-%d %H:%M:%S")
    );
    let _ = writeln!(out, "File Hash: {}", report.asset.content_hash);

    if let Some(tags) = &report.tags {
        let _ = writeln!(out);
        let _ = writeln!(out, "Artist: {}", tags.artist);
        let _ = writeln!(out, "Title: {}", tags.title);
        let _ = writeln!(out, "Album: {}", tags.album);
        let _ = writeln!(out, "Year: {}", tags.year);
        let _ = writeln!(out, "Genre: {}", tags.genre);
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "File Duration: {:.2} seconds", report.duration);
    let _ = writeln!(out, "Sample Rate: {} Hz", report.native_rate);
    let _ = writeln!(out, "Sampling Frequency: {} Hz", report.working_rate);
    let _ = writeln!(out, "Number of Channels: {}", report.channels);
    let _ = writeln!(
        out,
        "Maximum Amplitude: {:.2} (scaled value)",
        report.max_amplitude
    );
    let _ = writeln!(
        out,
        "Average Amplitude: {:.2} (scaled value)",
        report.mean_amplitude
    );
    let _ = writeln!(out, "Minimum Frequency: {:.0} Hz", report.min_frequency);
    let _ = writeln!(out, "Maximum Frequency: {:.2} Hz", report.max_frequency);

    if let Some(tempo) = report.tempo {
        let _ = writeln!(out);
        let _ = writeln!(out, "Tempo: {:.2} BPM", tempo);
    }

    if let Some(loudness) = report.loudness {
        let _ = writeln!(out, "Average Loudness: {:.2} dB", loudness);
    }

    if let Some(chroma) = &report.chroma {
        let _ = writeln!(out);
        let _ = writeln!(out, "Chroma Features:");
        for (note, value) in PITCH_CLASSES.iter().zip(chroma.iter()) {
            let _ = writeln!(out, "{}: {:.3}", note, value);
        }
    }

    out
}
