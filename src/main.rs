use clap::Parser;
use rigup::config::Config;
use rigup::core::{format_error_with_help, RigupResult};
use rigup::di::ServiceContainer;
use rigup::provision::{self, RunOutcome};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "rigup")]
#[command(about = "Provision a developer workstation from a curated file server")]
#[command(version)]
struct Cli {
    /// Base URL of the file server (overrides the configured one)
    #[arg(short, long, value_name = "URL")]
    url: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
}

fn load_config(cli: &Cli) -> RigupResult<Config> {
    let config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.with_base_url(cli.url.clone())
}

async fn run(cli: Cli) -> RigupResult<RunOutcome> {
    let config = load_config(&cli)?;
    match cli.url {
        Some(_) => println!("Using file server {} (from --url)", config.base_url),
        None => println!("Using file server {}", config.base_url),
    }

    let services = ServiceContainer::new(&config)?;
    provision::run(&services, &config).await
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli).await {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Provisioning aborted");
            eprintln!("\n{}", format_error_with_help(&e));
            ExitCode::FAILURE
        }
    }
}
