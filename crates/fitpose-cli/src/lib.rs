//! FitPose CLI
//!
//! Command-line interface for the FitPose exercise engine.
//!
//! # Features
//!
//! - **replay**: Run a recorded keypoint stream through a tracking session
//! - **exercises**: List the registered exercise profiles
//! - **version**: Display version information
//!
//! # Usage
//!
//! ```bash
//! # Replay a recording, selecting the exercise up front
//! fitpose replay --input session.jsonl --exercise squat
//!
//! # Stream from another process, JSON out
//! pose-extractor video.mp4 | fitpose replay --input - --format json
//!
//! # Use tuned thresholds
//! fitpose replay --input session.jsonl --config engine.json
//! ```

use clap::{Parser, Subcommand, ValueEnum};

pub mod exercises;
pub mod replay;

/// FitPose Command Line Interface
#[derive(Parser, Debug)]
#[command(name = "fitpose")]
#[command(author, version, about = "Exercise repetition counting and form feedback")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Replay a JSON-lines keypoint stream through a session
    Replay(replay::ReplayArgs),

    /// List registered exercise profiles
    Exercises(exercises::ExercisesArgs),

    /// Display version information
    Version,
}

/// Output format
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Pretty table output
    #[default]
    Table,
    /// JSON output
    Json,
}
