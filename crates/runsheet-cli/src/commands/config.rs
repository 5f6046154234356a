use std::path::PathBuf;

use clap::Subcommand;
use runsheet_core::RunSheetConfig;

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Write a commented starter configuration file
    Init {
        /// Destination path
        #[arg(default_value = "runsheet.toml")]
        path: PathBuf,
    },
    /// Validate a configuration file and print the parsed result
    Show {
        path: PathBuf,
    },
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Init { path } => {
            if path.exists() {
                return Err(format!("{} already exists", path.display()).into());
            }
            std::fs::write(&path, RunSheetConfig::starter_toml())?;
            println!("wrote starter configuration to {}", path.display());
        }
        ConfigAction::Show { path } => {
            let config = RunSheetConfig::load(&path)?;
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
