//! FitPose CLI Entry Point
//!
//! This is the main entry point for the fitpose command-line tool.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use fitpose_cli::{Cli, Commands};

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so JSON output on stdout stays machine-readable.
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Replay(args) => {
            fitpose_cli::replay::execute(args)?;
        }
        Commands::Exercises(args) => {
            fitpose_cli::exercises::execute(&args)?;
        }
        Commands::Version => {
            println!("fitpose {}", env!("CARGO_PKG_VERSION"));
            println!("Engine version: {}", fitpose_engine::VERSION);
            println!("Core version: {}", fitpose_core::VERSION);
        }
    }

    Ok(())
}
