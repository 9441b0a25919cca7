mod config;
mod sampler;
mod source;

use clap::Parser;
use env_logger::Env;
use std::path::PathBuf;
use std::process::ExitCode;

use crate::config::Config;
use crate::sampler::{banner, summary, Sampler, POLL_INTERVAL};
use crate::source::HttpSource;

#[derive(Parser)]
#[command(name = "orbit-logger")]
#[command(about = "Log the ISS position to a CSV file once a minute")]
struct Cli {
    /// YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// Folder for the CSV output (overrides the config file)
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => match Config::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config {}: {}", path.display(), e);
                return ExitCode::FAILURE;
            }
        },
        None => Config::default(),
    };
    if let Some(folder) = cli.output_dir {
        config.output.folder = folder;
    }

    let timeout = match config.request_timeout() {
        Ok(t) => t,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = std::fs::create_dir_all(&config.output.folder) {
        eprintln!(
            "Error creating folder {}: {}",
            config.output.folder.display(),
            e
        );
        return ExitCode::FAILURE;
    }

    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Error starting runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let source = HttpSource::new(config.endpoint.clone(), timeout);
    log::info!(
        "Polling {} (timeout {})",
        source.url(),
        humantime::format_duration(timeout)
    );
    let mut sampler = Sampler::new(source, config.output_path());

    println!("{}", banner(POLL_INTERVAL));

    sampler.run_on(runtime, interrupted());

    if sampler.log().is_empty() {
        log::warn!("No readings were collected");
    }
    println!("{}", summary(sampler.log().len(), sampler.output_path()));
    ExitCode::SUCCESS
}

async fn interrupted() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        log::error!("Cannot listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
}
