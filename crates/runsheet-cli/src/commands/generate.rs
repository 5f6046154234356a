use std::path::PathBuf;

use clap::Args;
use runsheet_core::{build_run_sheets, RunSheetConfig, TableLoader, WorkbookEmitter};

use crate::emitter::XlsxWorkbookEmitter;
use crate::loader::XlsxTableLoader;

#[derive(Args)]
pub struct GenerateArgs {
    /// Schedule table export (xlsx)
    #[arg(long)]
    pub schedule: PathBuf,
    /// Flattened sessions export (xlsx)
    #[arg(long)]
    pub sessions: PathBuf,
    /// Output workbook path
    #[arg(long, short)]
    pub output: PathBuf,
    /// Group definitions TOML (defaults to a single catch-all group)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Treat any diagnostic as fatal and write nothing
    #[arg(long)]
    pub strict: bool,
}

pub fn run(args: GenerateArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &args.config {
        Some(path) => RunSheetConfig::load(path)?,
        None => RunSheetConfig::default(),
    };

    let loader = XlsxTableLoader;
    let schedule = loader.load(&args.schedule)?;
    let sessions = loader.load(&args.sessions)?;

    let set = build_run_sheets(&schedule, &sessions, &config)?;

    for diagnostic in &set.diagnostics {
        eprintln!("warning: {diagnostic}");
    }
    if args.strict && !set.diagnostics.is_empty() {
        return Err(format!(
            "aborting (--strict): {} diagnostic(s) reported",
            set.diagnostics.len()
        )
        .into());
    }

    let mut emitter = XlsxWorkbookEmitter::new(&args.output, config.event.name.clone());
    emitter.emit(&set.views)?;

    println!(
        "wrote {} sheets ({} sessions) to {}",
        set.views.len(),
        set.sessions.len(),
        args.output.display()
    );
    Ok(())
}
