// # -----------------------------
// # crates/cli/src/main.rs
// # -----------------------------
use std::io;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use quantum_cli::scenario::Scenario;
use quantum_cli::simulate;
use quantum_common::ShellConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Parser, Debug)]
#[command(name = "quantum-shell", version = VERSION, about = "Quantum shell - workspace lifecycle driver", long_about = None)]
struct Cli {
    /// Configuration file (defaults to QUANTUM_CONFIG, then quantum.toml)
    #[arg(long = "config", global = true, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Output format: pretty human-readable format (default is JSON)
    #[arg(long = "pretty", global = true)]
    pretty: bool,
    /// Log level (trace, debug, info, warn, error, off). Overrides RUST_LOG if set.
    #[arg(long = "log-level", global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    /// Enable structured JSON logging
    #[arg(long = "json-logs", global = true)]
    json_logs: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Replay a scenario's navigation steps and report every lifecycle event
    Simulate {
        /// Scenario file (TOML)
        scenario: PathBuf,
    },
    /// Print the effective configuration as TOML
    Config,
}

/// Initialize logging based on CLI arguments, environment and config.
fn init_logging(cli_level: Option<&str>, config_level: Option<&str>, json_logs: bool) -> Result<()> {
    // CLI arg overrides RUST_LOG, which overrides the config file
    let filter = if let Some(level) = cli_level {
        match level.to_lowercase().as_str() {
            "off" => EnvFilter::new("off"),
            "error" => EnvFilter::new("error"),
            "warn" | "warning" => EnvFilter::new("warn"),
            "info" => EnvFilter::new("info"),
            "debug" => EnvFilter::new("debug"),
            "trace" => EnvFilter::new("trace"),
            other => EnvFilter::try_new(other).unwrap_or_else(|_| {
                eprintln!("Warning: Invalid log level '{}', using 'info'", level);
                EnvFilter::new("info")
            }),
        }
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            config_level
                .and_then(|level| EnvFilter::try_new(level).ok())
                .unwrap_or_else(|| EnvFilter::new("warn"))
        })
    };

    let result = if json_logs {
        fmt()
            .json()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(true)
            .try_init()
    } else {
        // Human-readable logging (default)
        fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .with_target(false)
            .try_init()
    };

    result.map_err(|err| anyhow!("failed to initialise logging: {}", err))
}

fn load_config(path: Option<PathBuf>) -> Result<ShellConfig> {
    match path {
        // An explicit path must load; discovered files fall back to defaults.
        Some(path) => ShellConfig::load_from_path(&path)
            .with_context(|| format!("load config {}", path.display())),
        None => Ok(ShellConfig::from_sources(None)),
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = load_config(cli.config.clone())?;
    init_logging(
        cli.log_level.as_deref(),
        config.logging.level.as_deref(),
        cli.json_logs || config.logging.json,
    )?;

    tracing::debug!("Quantum shell starting with version {}", VERSION);
    tracing::debug!("CLI arguments: {:?}", cli);

    match cli.command {
        Commands::Simulate { scenario } => {
            let scenario = Scenario::load(&scenario)?;
            let report = simulate::run(&scenario, &config.lifecycle).await?;
            if cli.pretty {
                print!("{}", report.render_pretty());
            } else {
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
            if report.failures() > 0 {
                tracing::info!("{} lifecycle handler(s) failed", report.failures());
            }
        }
        Commands::Config => {
            let rendered = config.to_toml().context("render config")?;
            print!("{}", rendered);
        }
    }

    Ok(())
}
