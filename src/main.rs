mod cli;
mod error;
mod output;
mod replay;
mod types;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = cli::Args::parse();

    // Initialize tracing; RUST_LOG directives refine --log-level
    let level = args
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let config = match replay::load_config(&args) {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "invalid configuration");
            std::process::exit(2);
        }
    };

    info!(
        precision = ?config.precision,
        duplicates = ?config.duplicates,
        json = args.json,
        "book-replay starting"
    );

    if let Err(e) = replay::run(args.input.as_deref(), &config, args.json) {
        error!(error = %e, "replay failed");
        std::process::exit(1);
    }
}
