use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use coop_evolution_core::{SimConfig, World};
use std::fs;
use std::path::PathBuf;
use std::time::Instant;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "coop-evolution")]
#[command(about = "Evolve cooperation among neural-network agents")]
struct Cli {
    /// Last generation to run to completion.
    #[arg(value_parser = clap::value_parser!(u32).range(1..))]
    max_generation: u32,
    /// JSON file with simulation parameters; missing fields use defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    width: Option<f64>,
    #[arg(long)]
    height: Option<f64>,
    #[arg(long)]
    seed: Option<u64>,
    /// Stop after this many ticks even if the goal generation is not reached.
    #[arg(long)]
    max_ticks: Option<u64>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Pretty)]
    format: OutputFormat,
    #[arg(long)]
    out: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Pretty,
    Json,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}

fn run(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;
    let mut world = World::try_new(config.clone()).context("invalid simulation configuration")?;
    info!(
        max_generation = cli.max_generation,
        seed = config.seed,
        width = config.world_width,
        height = config.world_height,
        agents = config.target_population,
        "starting simulation"
    );

    let start = Instant::now();
    let ticks = world.run_generations(cli.max_generation, cli.max_ticks);
    let report = world.on_exit();
    info!(
        ticks,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "run complete"
    );

    let text = match cli.format {
        OutputFormat::Pretty => report.to_string().trim_end().to_string(),
        OutputFormat::Json => serde_json::to_string_pretty(&report)?,
    };
    write_output(text, cli.out)
}

/// Defaults, then the config file, then individual flags.
fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = load_config(cli.config.as_ref())?;
    if let Some(width) = cli.width {
        config.world_width = width;
    }
    if let Some(height) = cli.height {
        config.world_height = height;
    }
    if let Some(seed) = cli.seed {
        config.seed = seed;
    }
    Ok(config)
}

fn load_config(path: Option<&PathBuf>) -> Result<SimConfig> {
    let Some(path) = path else {
        return Ok(SimConfig::default());
    };
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    SimConfig::from_json_str(&raw)
        .with_context(|| format!("failed to parse JSON config {}", path.display()))
}

fn write_output(text: String, out: Option<PathBuf>) -> Result<()> {
    if let Some(path) = out {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).with_context(|| {
                format!("failed creating output directory {}", parent.display())
            })?;
        }
        fs::write(&path, text).with_context(|| format!("failed writing {}", path.display()))?;
        info!(path = %path.display(), "wrote report");
    } else {
        println!("{text}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_generation_and_overrides() {
        let cli = Cli::try_parse_from([
            "coop-evolution",
            "3",
            "--width",
            "640",
            "--seed",
            "9",
            "--format",
            "json",
        ])
        .unwrap();
        assert_eq!(cli.max_generation, 3);
        assert_eq!(cli.format, OutputFormat::Json);
        let config = build_config(&cli).unwrap();
        assert_eq!(config.world_width, 640.0);
        assert_eq!(config.world_height, SimConfig::default().world_height);
        assert_eq!(config.seed, 9);
    }

    #[test]
    fn rejects_zero_or_missing_generation() {
        assert!(Cli::try_parse_from(["coop-evolution", "0"]).is_err());
        assert!(Cli::try_parse_from(["coop-evolution"]).is_err());
        assert!(Cli::try_parse_from(["coop-evolution", "two"]).is_err());
    }

    #[test]
    fn config_file_is_layered_under_flags() {
        let dir = std::env::temp_dir().join(format!("coop-evolution-cli-{}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.json");
        fs::write(&path, r#"{ "target_population": 12, "seed": 5 }"#).unwrap();

        let cli = Cli::try_parse_from([
            "coop-evolution",
            "1",
            "--config",
            path.to_str().unwrap(),
            "--seed",
            "6",
        ])
        .unwrap();
        let config = build_config(&cli).unwrap();
        assert_eq!(config.target_population, 12);
        assert_eq!(config.seed, 6);
        fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from([
            "coop-evolution",
            "1",
            "--config",
            "/nonexistent/coop-evolution.json",
        ])
        .unwrap();
        let err = build_config(&cli).unwrap_err();
        assert!(err.to_string().contains("failed to read config"));
    }
}
