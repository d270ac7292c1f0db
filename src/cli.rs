use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "waveprobe", about = "Audio file measurement reports: identity, tags, spectrum, tempo, chroma")]
pub struct Cli {
    /// Input audio file (mp3, wav, ogg, flac, aiff)
    pub input: PathBuf,

    /// Config file path (defaults to waveprobe.toml or the platform config dir)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Emit the report as JSON instead of text
    #[arg(long)]
    pub json: bool,

    /// Report sections to disable (comma-separated: loudness,metadata,rhythm,harmonic)
    #[arg(long, value_delimiter = ',')]
    pub skip: Vec<String>,

    /// Working sample rate in Hz for all spectral analysis
    #[arg(long, default_value_t = 22050)]
    pub working_rate: u32,
}
