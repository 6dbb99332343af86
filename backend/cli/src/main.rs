mod status_cmd;
mod wiring;

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use medlens_config::Config;
use medlens_core::{CheckOutcome, Claim};
use medlens_logging::{init_logger, ConsoleStream};

#[derive(Parser)]
#[command(name = "medlens")]
#[command(about = "MedLens Verify: evidence-backed health claim checking")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Port to bind the HTTP server to
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Query a running server
    Status {
        /// Port the server listens on (defaults to MEDLENS_PORT or 8000)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Check one claim and print the result as JSON
    Check {
        /// The claim text
        text: String,
    },
}

impl Commands {
    /// `check` prints its result on stdout, so its logs go to stderr.
    fn console(&self) -> ConsoleStream {
        match self {
            Self::Check { .. } => ConsoleStream::Stderr,
            _ => ConsoleStream::Stdout,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    let console = cli.command.console();

    match cli.command {
        Commands::Serve { port } => {
            let mut config = load_config(console)?;
            if let Some(port) = port {
                config.server.port = port;
            }
            run_server(config).await?;
        }
        Commands::Status { port } => {
            init_logger::<PathBuf>("warn", None, console);
            status_cmd::run(port).await?;
        }
        Commands::Check { text } => {
            let config = load_config(console)?;
            run_check(&config, &text).await?;
        }
    }

    Ok(())
}

/// Read the environment, start logging, and refuse to continue on hard config errors.
fn load_config(console: ConsoleStream) -> Result<Config> {
    let loaded = Config::from_env();
    match &loaded {
        Ok(config) => init_logger(&config.logging.level, config.logging.log_dir.as_ref(), console),
        Err(_) => init_logger::<PathBuf>("info", None, console),
    }
    let config = loaded.context("Failed to load configuration from environment")?;

    info!(config = %config.redacted(), "Configuration loaded");
    let report = config.validate();
    if let Some(error) = report.errors.first() {
        bail!("{error}");
    }
    Ok(config)
}

async fn run_server(config: Config) -> Result<()> {
    let addr: SocketAddr = config
        .bind_addr()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.bind_addr()))?;

    info!(
        %addr,
        model = %config.openai.model,
        search = config.search_enabled(),
        "Starting MedLens Verify"
    );

    let state = wiring::build_state(&config).await;
    medlens_gateway::start_server(addr, state).await
}

async fn run_check(config: &Config, text: &str) -> Result<()> {
    let Some(claim) = Claim::new(text) else {
        bail!("No text provided");
    };

    let checker = wiring::build_checker(config);
    let outcome = checker.check(&claim).await;
    println!("{}", serde_json::to_string_pretty(outcome.result())?);

    if let CheckOutcome::ModelFailed { category, .. } = outcome {
        bail!("Model call failed: {category}");
    }
    Ok(())
}
