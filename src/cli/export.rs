//! CLI commands for data export

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};

use crate::config::settings::Settings;
use crate::error::{ExpenseError, ExpenseResult};
use crate::export::{export_grid_csv, export_grid_json, export_store_json};
use crate::projection::ProjectionPolicy;
use crate::services::GridService;
use crate::storage::Storage;

/// Export format options
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum ExportFormat {
    /// Spreadsheet-compatible, one line per expense
    Csv,
    /// Includes forecast flags
    Json,
}

/// Export subcommands
#[derive(Subcommand, Debug)]
pub enum ExportCommands {
    /// Export a year grid
    Grid {
        /// Output file path ("-" for stdout)
        output: PathBuf,
        #[arg(short, long, value_enum, default_value = "csv")]
        format: ExportFormat,
        #[arg(short, long)]
        year: Option<i32>,
        /// Forecast policy (defaults to the configured one)
        #[arg(short, long, value_enum)]
        policy: Option<ProjectionPolicy>,
        /// Pretty-print JSON output
        #[arg(long)]
        pretty: bool,
    },
    /// Export every stored expense as JSON
    All {
        /// Output file path ("-" for stdout)
        output: PathBuf,
        #[arg(long)]
        pretty: bool,
    },
}

fn open_output(output: &PathBuf) -> ExpenseResult<Box<dyn Write>> {
    if output.as_os_str() == "-" {
        return Ok(Box::new(io::stdout().lock()));
    }

    let file = File::create(output).map_err(|e| {
        ExpenseError::Export(format!("Failed to create {}: {}", output.display(), e))
    })?;
    Ok(Box::new(BufWriter::new(file)))
}

fn report(output: &PathBuf, what: &str) {
    if output.as_os_str() != "-" {
        eprintln!("Exported {} to {}", what, output.display());
    }
}

/// Handle export commands
pub fn handle_export_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExportCommands,
) -> ExpenseResult<()> {
    match cmd {
        ExportCommands::Grid {
            output,
            format,
            year,
            policy,
            pretty,
        } => {
            let year = settings.year_or_selected(year);
            let policy = policy.unwrap_or(settings.projection_policy);
            let grid = GridService::new(storage).year_grid(year, policy)?;

            let mut writer = open_output(&output)?;
            match format {
                ExportFormat::Csv => export_grid_csv(&grid, &mut writer)?,
                ExportFormat::Json => export_grid_json(&grid, &mut writer, pretty)?,
            }
            writer
                .flush()
                .map_err(|e| ExpenseError::Export(e.to_string()))?;

            log::info!("Exported {} grid ({} rows)", year, grid.rows.len());
            report(&output, &format!("{} grid", year));
        }

        ExportCommands::All { output, pretty } => {
            let mut writer = open_output(&output)?;
            export_store_json(storage, &mut writer, pretty)?;
            writer
                .flush()
                .map_err(|e| ExpenseError::Export(e.to_string()))?;

            report(&output, "all expenses");
        }
    }

    Ok(())
}
