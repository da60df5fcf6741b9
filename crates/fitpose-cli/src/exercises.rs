//! `fitpose exercises`: list the profile registry.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use serde::Serialize;
use tabled::{settings::Style, Table, Tabled};

use fitpose_engine::{profiles, ExerciseProfile};

use crate::OutputFormat;

/// Arguments for the exercises command
#[derive(Args, Debug)]
pub struct ExercisesArgs {
    /// Output format
    #[arg(short, long, value_enum, default_value = "table")]
    pub format: OutputFormat,
}

/// One registry entry as listed.
#[derive(Debug, Tabled, Serialize)]
pub struct ProfileRow {
    #[tabled(rename = "ID")]
    pub id: &'static str,
    #[tabled(rename = "Name")]
    pub name: &'static str,
    #[tabled(rename = "Tracked Joint")]
    pub tracked_joint: &'static str,
    #[tabled(rename = "Correct Range")]
    pub correct_range: String,
    #[tabled(rename = "Start")]
    pub start: String,
    #[tabled(rename = "End")]
    pub end: String,
    #[tabled(rename = "Rules")]
    pub rules: usize,
}

impl From<&ExerciseProfile> for ProfileRow {
    fn from(profile: &ExerciseProfile) -> Self {
        ProfileRow {
            id: profile.id,
            name: profile.display_name,
            tracked_joint: profile.tracked_joint.name,
            correct_range: profile
                .correct_range
                .map_or_else(|| "-".to_string(), |r| format!("{:.0}-{:.0}°", r.min, r.max)),
            start: format!(">= {:.0}°", profile.phase.start),
            end: format!("< {:.0}°", profile.phase.end),
            rules: profile.rules.len(),
        }
    }
}

/// Rows for every registered profile, in registry order.
pub fn profile_rows() -> Vec<ProfileRow> {
    profiles().iter().map(ProfileRow::from).collect()
}

/// Execute the exercises command
pub fn execute(args: &ExercisesArgs) -> Result<()> {
    let rows = profile_rows();
    match args.format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&rows)?);
        }
        OutputFormat::Table => {
            println!("{}", "Exercise Profiles".bold().cyan());
            println!("{}", Table::new(rows).with(Style::rounded()));
            println!();
            println!(
                "{} Select one with '{}'.",
                "[INFO]".blue(),
                "fitpose replay --exercise <ID>".green()
            );
        }
    }
    Ok(())
}
