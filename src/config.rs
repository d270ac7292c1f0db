use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub sections: Sections,
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Which optional report sections are produced. The minimal product variant
/// is a config file with toggles off, not a separate code path.
#[derive(Debug, Deserialize)]
pub struct Sections {
    #[serde(default = "default_true")]
    pub loudness: bool,
    #[serde(default = "default_true")]
    pub metadata: bool,
    #[serde(default = "default_true")]
    pub rhythm: bool,
    #[serde(default = "default_true")]
    pub harmonic: bool,
}

#[derive(Debug, Deserialize)]
pub struct AnalysisConfig {
    /// Fixed working sample rate every signal is resampled to before
    /// analysis. The container's native rate is reported separately.
    #[serde(default = "default_working_rate")]
    pub working_rate: u32,
    #[serde(default = "default_fft_size")]
    pub fft_size: usize,
    #[serde(default = "default_hop_size")]
    pub hop_size: usize,
}

impl Default for Sections {
    fn default() -> Self {
        Self {
            loudness: true,
            metadata: true,
            rhythm: true,
            harmonic: true,
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            working_rate: default_working_rate(),
            fft_size: default_fft_size(),
            hop_size: default_hop_size(),
        }
    }
}

fn default_true() -> bool { true }
fn default_working_rate() -> u32 { 22050 }
fn default_fft_size() -> usize { 2048 }
fn default_hop_size() -> usize { 512 }

pub fn load_config(path: &PathBuf) -> Option<Config> {
    let content = std::fs::read_to_string(path).ok()?;
    toml::from_str(&content).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_yields_defaults() {
        let cfg: Config = toml::from_str("").unwrap();
        assert!(cfg.sections.loudness);
        assert!(cfg.sections.metadata);
        assert_eq!(cfg.analysis.working_rate, 22050);
        assert_eq!(cfg.analysis.fft_size, 2048);
        assert_eq!(cfg.analysis.hop_size, 512);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let cfg: Config = toml::from_str("[sections]\nloudness = false\n").unwrap();
        assert!(!cfg.sections.loudness);
        assert!(cfg.sections.rhythm);
        assert!(cfg.sections.harmonic);
    }

    #[test]
    fn analysis_params_are_overridable() {
        let cfg: Config =
            toml::from_str("[analysis]\nworking_rate = 44100\nhop_size = 1024\n").unwrap();
        assert_eq!(cfg.analysis.working_rate, 44100);
        assert_eq!(cfg.analysis.hop_size, 1024);
        assert_eq!(cfg.analysis.fft_size, 2048);
    }
}
