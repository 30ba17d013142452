/*
newspulse - command line entry point.
Runs the analysis pipeline for one company and prints the client payload as JSON.
*/

use anyhow::Result;
use clap::{Parser, Subcommand};
use common::Config;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

use newspulse::keywords::keywords_for_company;
use newspulse::pipeline::Pipeline;
use newspulse::service;

#[derive(Parser, Debug)]
#[command(name = "newspulse", about = "Company news sentiment reports with a spoken Hindi summary")]
struct Args {
    /// Path to config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Override log level (info, debug, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch, analyze and report on a company's latest news
    Analyze { company: String },
    /// Print the search keywords used for a company
    Keywords { company: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = EnvFilter::try_new(&args.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

    let default_path = PathBuf::from("config.default.toml");
    let override_path = if let Some(p) = args.config {
        if !p.exists() {
            error!(path = ?p, "specified config file not found");
            return Err(anyhow::anyhow!("Config file not found: {}", p.display()));
        }
        p
    } else {
        PathBuf::from("config.toml")
    };

    let config = match Config::load_with_defaults(Some(&default_path), Some(&override_path)).await {
        Ok(cfg) => cfg,
        Err(e) => {
            error!(%e, "failed to load configuration");
            return Err(e);
        }
    };
    info!(default = ?default_path, override = ?override_path, "configuration loaded");

    match args.command {
        Command::Keywords { company } => {
            for keyword in keywords_for_company(&config.keywords, &company) {
                println!("{}", keyword);
            }
        }
        Command::Analyze { company } => {
            // Model construction may block (downloads, weight loading).
            let pipeline = tokio::task::spawn_blocking(move || Pipeline::new(config)).await??;
            match service::process_request(&pipeline, &company).await {
                Ok(response) => println!("{}", serde_json::to_string_pretty(&response)?),
                Err(e) => {
                    error!(status = e.status(), %e, "analysis failed");
                    return Err(e.into());
                }
            }
        }
    }

    Ok(())
}
