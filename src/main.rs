mod cli;

use anyhow::Result;
use clap::Parser;

use cli::Cli;
use waveprobe::{analysis, config, report};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();

    // Load config: explicit --config path, or auto-detect waveprobe.toml / global config
    let config_path = cli.config.clone().or_else(|| {
        let local = std::path::PathBuf::from("waveprobe.toml");
        if local.exists() {
            return Some(local);
        }
        if let Some(config_dir) = dirs::config_dir() {
            let platform = config_dir.join("waveprobe").join("config.toml");
            if platform.exists() {
                return Some(platform);
            }
        }
        None
    });

    let mut config = match config_path {
        Some(ref path) => match config::load_config(path) {
            Some(cfg) => {
                log::info!("Loaded config from {}", path.display());
                cfg
            }
            None => {
                log::warn!("Failed to load config from {}", path.display());
                config::Config::default()
            }
        },
        None => config::Config::default(),
    };

    // CLI overrides apply on top of the config file
    if cli.working_rate != 22050 {
        config.analysis.working_rate = cli.working_rate;
    }
    for section in &cli.skip {
        match section.as_str() {
            "loudness" => config.sections.loudness = false,
            "metadata" => config.sections.metadata = false,
            "rhythm" => config.sections.rhythm = false,
            "harmonic" => config.sections.harmonic = false,
            other => log::warn!("Unknown section in --skip: {}", other),
        }
    }

    let report = match analysis::analyze(&cli.input, &config) {
        Ok(report) => report,
        Err(e) => {
            // Validation failures are user-facing diagnostics, not stack dumps
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", report::render(&report));
    }

    Ok(())
}
