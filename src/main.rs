//! `golinks` binary: runs the link server, or resolves one link and exits.
//!
//! # Usage
//!
//! ```bash
//! # Serve on LISTEN with storage from DATABASE_URL
//! golinks
//!
//! # Dev mode with in-memory storage
//! STORAGE_BACKEND=memory golinks --dev-listen :8080
//!
//! # Resolve a link once
//! golinks go/meet/standup
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use golinks::config::{self, Config, Overrides};
use golinks::server;
use tracing_subscriber::EnvFilter;

/// Private short link service.
#[derive(Parser)]
#[command(name = "golinks")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Resolve this link, print its destination and exit
    link: Option<String>,

    /// Service name links are reached by (overrides GOLINKS_HOSTNAME)
    #[arg(long)]
    hostname: Option<String>,

    /// Listen on this address in dev mode (overrides DEV_LISTEN)
    #[arg(long)]
    dev_listen: Option<String>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let overrides = Overrides {
        hostname: cli.hostname.clone(),
        dev_listen: cli.dev_listen.clone(),
    };
    let config = match config::load_from_env(overrides) {
        Ok(config) => config,
        Err(e) => return fail(&e),
    };

    init_tracing(&config, cli.verbose);

    let result = match cli.link {
        Some(ref link) => resolve_once(&config, link).await,
        None => {
            config.print_summary();
            server::run(config).await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => fail(&e),
    }
}

/// Resolves `link` with no user and without recording a click.
async fn resolve_once(config: &Config, link: &str) -> Result<()> {
    let state = server::build_state(config).await?;
    if let Some(ref path) = config.snapshot_path {
        server::restore_snapshot(&state, path).await?;
    }

    let destination = state.resolver.resolve(link, None).await?;
    println!("{destination}");
    Ok(())
}

fn init_tracing(config: &Config, verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info")),
        1 => EnvFilter::new("debug"),
        _ => EnvFilter::new("trace"),
    };

    // stdout carries the resolved destination
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if config.log_format == "json" {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn fail(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {:#}", "error:".red().bold(), err);
    ExitCode::FAILURE
}
