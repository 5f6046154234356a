use std::path::PathBuf;

use clap::Args;
use runsheet_core::{build_run_sheets, RunSheetConfig, TableLoader};
use serde::Serialize;

use crate::loader::XlsxTableLoader;

#[derive(Args)]
pub struct CheckArgs {
    /// Schedule table export (xlsx)
    #[arg(long)]
    pub schedule: PathBuf,
    /// Flattened sessions export (xlsx)
    #[arg(long)]
    pub sessions: PathBuf,
    /// Group definitions TOML
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Print the resolved sessions and diagnostics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct CheckReport<'a> {
    sessions: &'a [runsheet_core::CanonicalSession],
    diagnostics: &'a [runsheet_core::Diagnostic],
}

pub fn run(args: CheckArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => RunSheetConfig::load(path)?,
        None => RunSheetConfig::default(),
    };

    let loader = XlsxTableLoader;
    let schedule = loader.load(&args.schedule)?;
    let sessions = loader.load(&args.sessions)?;

    let set = build_run_sheets(&schedule, &sessions, &config)?;

    if args.json {
        let report = CheckReport {
            sessions: &set.sessions,
            diagnostics: &set.diagnostics,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} sessions resolved into {} views",
        set.sessions.len(),
        set.views.len()
    );
    if set.diagnostics.is_empty() {
        println!("no diagnostics");
    } else {
        println!("{} diagnostic(s):", set.diagnostics.len());
        for diagnostic in &set.diagnostics {
            println!("  - {diagnostic}");
        }
    }
    Ok(())
}
