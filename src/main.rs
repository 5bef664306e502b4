//! infiniscroll demo - Entry Point

use clap::Parser;
use infiniscroll::config::{
    apply_cli_overrides, apply_env_overrides, load_config_with_precedence, merge_config,
    CliOverrides, ConfigError, ResolvedConfig,
};
use infiniscroll::demo::FeedConfig;
use std::path::PathBuf;
use tracing::info;

/// infiniscroll - load-more-on-scroll feed in the terminal
#[derive(Parser, Debug)]
#[command(name = "infiniscroll")]
#[command(version)]
#[command(about = "Terminal feed that loads more items when scrolled to the bottom")]
pub struct Args {
    /// Quiet time after the last scroll before checking position, in milliseconds
    #[arg(long)]
    pub debounce_ms: Option<u64>,

    /// Percent of the scrollable distance that triggers a load
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=100))]
    pub percent: Option<u8>,

    /// Items appended per load
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    pub page_size: Option<u32>,

    /// Simulated load latency in milliseconds
    #[arg(long)]
    pub latency_ms: Option<u64>,

    /// Fail every Nth load (0 never fails)
    #[arg(long)]
    pub fail_every: Option<usize>,

    /// Stop loading once the feed holds this many items
    #[arg(long)]
    pub max_items: Option<usize>,

    /// Log a diagnostics record for every scroll check
    #[arg(short, long)]
    pub debug: bool,

    /// Path to configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,
}

impl Args {
    /// Flags the user set, as config overrides. `--debug` can only turn
    /// diagnostics on.
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            debounce_ms: self.debounce_ms,
            percent: self.percent.map(f64::from),
            debug: self.debug.then_some(true),
            page_size: self.page_size.map(|n| n as usize),
            latency_ms: self.latency_ms,
            fail_every: self.fail_every,
            max_items: self.max_items,
        }
    }
}

/// Defaults → Config File → Env Vars → CLI Args
fn resolve_config(args: &Args) -> Result<ResolvedConfig, ConfigError> {
    let config_file = load_config_with_precedence(args.config.clone())?;
    let merged = merge_config(config_file);
    let with_env = apply_env_overrides(merged);
    Ok(apply_cli_overrides(with_env, args.overrides()))
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let config = resolve_config(&args)?;

    infiniscroll::logging::init(&config.log_file_path, config.debug)?;

    info!(
        config = ?config,
        "Configuration loaded and resolved"
    );

    let sentinel = config.sentinel_config()?;
    infiniscroll::demo::run(FeedConfig::from(&config), sentinel)?;

    Ok(())
}
