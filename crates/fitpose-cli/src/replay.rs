//! `fitpose replay`: run a recorded keypoint stream through a session.
//!
//! Input is JSON lines, one event per line:
//!
//! ```text
//! {"type":"select","exercise":"squat"}
//! {"type":"frame","keypoints":[[x,y],[x,y,c],...]}
//! {"type":"frame"}                      # nobody detected
//! {"type":"reset"}
//! ```
//!
//! Blank lines and lines starting with `#` are skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Args;
use colored::Colorize;
use serde::{Deserialize, Serialize};
use tabled::{settings::Style, Table, Tabled};

use fitpose_core::KeypointSet;
use fitpose_engine::{EngineConfig, Exercise, FormStatus, FrameResult, Session};

use crate::OutputFormat;

/// Arguments for the replay command
#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// JSON-lines event file, or `-` for stdin
    #[arg(short, long)]
    pub input: PathBuf,

    /// Exercise to select before the first event
    #[arg(short, long)]
    pub exercise: Option<String>,

    /// Engine configuration file (JSON)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

// ---------------------------------------------------------------------------
// Events
// ---------------------------------------------------------------------------

/// One keypoint as recorded: `[x, y]` or `[x, y, confidence]`.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawKeypoint {
    /// Position with full confidence.
    Point(f32, f32),
    /// Position and detector confidence in `[0, 1]`.
    Scored(f32, f32, f32),
}

impl RawKeypoint {
    fn with_confidence(self) -> (f32, f32, f32) {
        match self {
            RawKeypoint::Point(x, y) => (x, y, 1.0),
            RawKeypoint::Scored(x, y, c) => (x, y, c),
        }
    }
}

/// A replay event.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A video frame; `None` keypoints means nobody was detected.
    Frame {
        #[serde(default)]
        keypoints: Option<Vec<RawKeypoint>>,
    },
    /// Switch exercise.
    Select { exercise: String },
    /// Zero the rep count.
    Reset,
}

/// Parses one JSON-lines event.
pub fn parse_event(line: &str) -> Result<Event> {
    serde_json::from_str(line).context("Invalid replay event")
}

fn to_keypoint_set(raw: &[RawKeypoint]) -> Result<KeypointSet> {
    let points: Vec<_> = raw.iter().map(|kp| kp.with_confidence()).collect();
    KeypointSet::from_xy_confidence(&points).context("Invalid keypoints")
}

// ---------------------------------------------------------------------------
// Replay
// ---------------------------------------------------------------------------

/// Totals reported after a replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReplaySummary {
    /// Exercise selected at the end of the stream.
    pub exercise: Option<Exercise>,
    /// Final rep count.
    pub reps: u32,
    /// Frame events processed.
    pub frames_processed: usize,
    /// Frame events that carried keypoints.
    pub frames_with_detection: usize,
}

/// Drives a [`Session`] from events.
#[derive(Debug)]
pub struct Replay {
    session: Session,
    frames_processed: usize,
    frames_with_detection: usize,
}

impl Replay {
    /// Wraps a session.
    pub fn new(session: Session) -> Self {
        Replay {
            session,
            frames_processed: 0,
            frames_with_detection: 0,
        }
    }

    /// Applies one event. Frames yield a result; control events do not.
    pub fn apply(&mut self, event: Event) -> Result<Option<FrameResult>> {
        match event {
            Event::Select { exercise } => {
                self.session.select_exercise(&exercise)?;
                Ok(None)
            }
            Event::Reset => {
                self.session.reset();
                Ok(None)
            }
            Event::Frame { keypoints } => {
                let keypoints = keypoints.as_deref().map(to_keypoint_set).transpose()?;
                self.frames_processed += 1;
                if keypoints.is_some() {
                    self.frames_with_detection += 1;
                }
                Ok(Some(self.session.process_frame(keypoints.as_ref())))
            }
        }
    }

    /// Reads events until EOF, calling `on_frame` for every frame result.
    pub fn run<R: BufRead>(
        &mut self,
        reader: R,
        mut on_frame: impl FnMut(&FrameResult) -> Result<()>,
    ) -> Result<ReplaySummary> {
        for (index, line) in reader.lines().enumerate() {
            let line_no = index + 1;
            let line = line.with_context(|| format!("Failed to read line {line_no}"))?;
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let event = parse_event(line).with_context(|| format!("line {line_no}"))?;
            if let Some(result) = self
                .apply(event)
                .with_context(|| format!("line {line_no}"))?
            {
                on_frame(&result)?;
            }
        }
        Ok(self.summary())
    }

    /// Current totals.
    pub fn summary(&self) -> ReplaySummary {
        ReplaySummary {
            exercise: self.session.state().exercise(),
            reps: self.session.state().rep_count(),
            frames_processed: self.frames_processed,
            frames_with_detection: self.frames_with_detection,
        }
    }
}

/// Builds a session from an optional config file and initial exercise.
pub fn build_session(config: Option<&Path>, exercise: Option<&str>) -> Result<Session> {
    let config = match config {
        Some(path) => EngineConfig::from_json(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => EngineConfig::default(),
    };
    let mut session = Session::new(config)?;
    if let Some(id) = exercise {
        session.select_exercise(id)?;
    }
    Ok(session)
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Tabled)]
struct FrameRow {
    #[tabled(rename = "Frame")]
    frame: usize,
    #[tabled(rename = "Exercise")]
    exercise: String,
    #[tabled(rename = "Angle")]
    angle: String,
    #[tabled(rename = "Phase")]
    phase: String,
    #[tabled(rename = "Reps")]
    reps: u32,
    #[tabled(rename = "Status")]
    status: String,
    #[tabled(rename = "Feedback")]
    feedback: String,
}

fn format_status(status: FormStatus) -> String {
    match status {
        FormStatus::GoodForm => status.label().green().to_string(),
        FormStatus::FixForm => status.label().red().to_string(),
        FormStatus::NoExercise => status.label().dimmed().to_string(),
    }
}

fn frame_row(frame: usize, result: &FrameResult) -> FrameRow {
    FrameRow {
        frame,
        exercise: result
            .exercise
            .map_or_else(|| "-".to_string(), |e| e.profile().display_name.to_string()),
        angle: if result.tracked_angle.is_nan() {
            "n/a".to_string()
        } else {
            format!("{:.1}", result.tracked_angle)
        },
        phase: result.phase.label().to_string(),
        reps: result.rep_count,
        status: format_status(result.form_status),
        feedback: result.feedback.join("; "),
    }
}

fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    if path.as_os_str() == "-" {
        return Ok(Box::new(BufReader::new(io::stdin())));
    }
    let file =
        File::open(path).with_context(|| format!("Failed to open input {}", path.display()))?;
    Ok(Box::new(BufReader::new(file)))
}

/// Execute the replay command
pub fn execute(args: ReplayArgs) -> Result<()> {
    let session = build_session(args.config.as_deref(), args.exercise.as_deref())?;
    let mut replay = Replay::new(session);
    let input = open_input(&args.input)?;

    tracing::info!(input = %args.input.display(), "replaying keypoint stream");

    match args.format {
        OutputFormat::Json => {
            let summary = replay.run(input, |result| {
                println!("{}", serde_json::to_string(result)?);
                Ok(())
            })?;
            println!("{}", serde_json::to_string(&serde_json::json!({ "summary": summary }))?);
        }
        OutputFormat::Table => {
            let mut rows = Vec::new();
            let summary = replay.run(input, |result| {
                rows.push(frame_row(rows.len() + 1, result));
                Ok(())
            })?;

            if rows.is_empty() {
                println!("{} No frames in input.", "[INFO]".blue());
            } else {
                println!("{}", Table::new(rows).with(Style::rounded()));
            }
            print_summary(&summary);
        }
    }

    Ok(())
}

fn print_summary(summary: &ReplaySummary) {
    println!();
    println!("{}", "Replay Summary".bold().cyan());
    println!("{}", "=".repeat(40));
    println!(
        "  {} {}",
        "Exercise:".dimmed(),
        summary
            .exercise
            .map_or_else(|| "none".to_string(), |e| e.profile().display_name.to_string())
    );
    println!("  {} {}", "Reps:".dimmed(), summary.reps.to_string().green().bold());
    println!("  {} {}", "Frames processed:".dimmed(), summary.frames_processed);
    println!(
        "  {} {}",
        "Frames with detection:".dimmed(),
        summary.frames_with_detection
    );
}
