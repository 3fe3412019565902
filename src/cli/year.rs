//! Year CLI commands
//!
//! Selecting the working year and the bulk year operations.

use clap::Subcommand;

use crate::config::paths::GridPaths;
use crate::config::settings::Settings;
use crate::error::ExpenseResult;
use crate::services::YearService;
use crate::storage::{ExpenseFilter, Storage};

/// Year subcommands
#[derive(Subcommand)]
pub enum YearCommands {
    /// List years that have expenses
    List,
    /// Make a year the default for other commands
    Select {
        year: i32,
    },
    /// Copy the active rows of a year into the next year with blank months
    CloneForward {
        /// Source year (defaults to the selected year)
        #[arg(short, long)]
        year: Option<i32>,
        /// Select the new year afterwards
        #[arg(short, long)]
        select: bool,
    },
    /// Delete every expense of a year (a backup is taken first)
    Reset {
        #[arg(short, long)]
        year: Option<i32>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

/// Handle a year command
pub fn handle_year_command(
    storage: &Storage,
    paths: &GridPaths,
    settings: &mut Settings,
    cmd: YearCommands,
) -> ExpenseResult<()> {
    let service = YearService::new(storage);

    match cmd {
        YearCommands::List => {
            let years = service.years()?;
            let selected = settings.effective_year();
            if years.is_empty() {
                println!("No expenses recorded yet. Selected year: {}", selected);
                return Ok(());
            }

            for year in years {
                let active = storage.expenses.query(ExpenseFilter::active(year))?.len();
                let archived = storage.expenses.query(ExpenseFilter::archived(year))?.len();
                println!(
                    "{} {}  {} active, {} archived",
                    if year == selected { "*" } else { " " },
                    year,
                    active,
                    archived
                );
            }
        }

        YearCommands::Select { year } => {
            select_year(storage, paths, settings, year)?;
            println!("Selected year: {}", year);
        }

        YearCommands::CloneForward { year, select } => {
            let year = settings.year_or_selected(year);
            let clones = service.clone_forward(year)?;
            println!(
                "Cloned {} expense(s) from {} into {}.",
                clones.len(),
                year,
                year + 1
            );
            if select {
                select_year(storage, paths, settings, year + 1)?;
                println!("Selected year: {}", year + 1);
            }
        }

        YearCommands::Reset { year, force } => {
            let year = settings.year_or_selected(year);
            let count = storage.expenses.query(ExpenseFilter::any(year))?.len();

            if !force {
                println!(
                    "WARNING: This will delete all {} expense(s) of {}, archived ones included.",
                    count, year
                );
                println!("To proceed, run again with --force flag:");
                println!("  expgrid year reset --year {} --force", year);
                return Ok(());
            }

            let summary = service.reset_year(year, &settings.backup_retention)?;
            println!("Deleted {} expense(s) from {}.", summary.removed.len(), year);
            println!("Backup saved: {}", summary.backup_path.display());
        }
    }

    Ok(())
}

fn select_year(
    storage: &Storage,
    paths: &GridPaths,
    settings: &mut Settings,
    year: i32,
) -> ExpenseResult<()> {
    let before = settings.clone();
    settings.selected_year = Some(year);
    settings.save(paths)?;
    storage.log_settings_update(&before, settings)
}
