//! Grid and history CLI commands

use clap::Args;

use crate::config::settings::Settings;
use crate::display::format_year_grid;
use crate::error::ExpenseResult;
use crate::projection::ProjectionPolicy;
use crate::services::GridService;
use crate::storage::Storage;

/// Arguments of `expgrid grid`
#[derive(Args)]
pub struct GridArgs {
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Forecast policy for this view (defaults to the configured one)
    #[arg(short, long, value_enum)]
    pub policy: Option<ProjectionPolicy>,
}

/// Print the year grid
pub fn handle_grid_command(storage: &Storage, settings: &Settings, args: GridArgs) -> ExpenseResult<()> {
    let year = settings.year_or_selected(args.year);
    let policy = args.policy.unwrap_or(settings.projection_policy);

    let grid = GridService::new(storage).year_grid(year, policy)?;
    print!("{}", format_year_grid(&grid, &settings.currency_symbol));
    Ok(())
}

/// Print the most recent audit entries
pub fn handle_history_command(storage: &Storage, limit: usize) -> ExpenseResult<()> {
    let entries = storage.audit().read_recent(limit)?;
    if entries.is_empty() {
        println!("No changes recorded yet.");
        return Ok(());
    }

    for entry in entries.iter().rev() {
        println!("{}", entry.format_human_readable());
    }
    Ok(())
}
