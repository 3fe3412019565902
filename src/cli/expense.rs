//! Expense CLI commands
//!
//! Row-level commands: add, list, show, edit, set a cell, toggle payment,
//! archive, restore and delete.

use clap::Subcommand;

use crate::config::settings::Settings;
use crate::display::{format_expense_details, format_expense_list};
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Money, Month};
use crate::services::{CellUpdate, ExpenseEdit, ExpenseService, NewExpense};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add an expense row (recurring unless --month is given)
    Add {
        /// Description shown in the grid
        description: String,
        /// Amount (e.g., "120.50" or "120")
        #[arg(default_value = "0")]
        amount: String,
        /// Day of the month the expense is due
        #[arg(short, long, default_value = "1")]
        day: u8,
        /// Create a one-off expense in this month only
        #[arg(short, long)]
        month: Option<Month>,
        /// Forecast blank months from this row's paid months
        #[arg(short, long)]
        projectable: bool,
        /// Year (defaults to the selected year)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// List expense rows of a year
    List {
        /// Show archived rows instead of active ones
        #[arg(short, long)]
        archived: bool,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Show one expense month by month
    Show {
        /// Expense description or ID
        expense: String,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Edit description, due day or projectable flag
    Edit {
        /// Expense description or ID
        expense: String,
        #[arg(short = 'n', long)]
        description: Option<String>,
        #[arg(short, long)]
        day: Option<u8>,
        #[arg(short, long)]
        projectable: Option<bool>,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Set the value and/or paid flag of one month
    Set {
        /// Expense description or ID
        expense: String,
        /// Month name, abbreviation or number
        month: Month,
        /// New value for the month
        value: Option<String>,
        /// Mark the month paid
        #[arg(long, conflicts_with = "unpaid")]
        paid: bool,
        /// Mark the month unpaid
        #[arg(long)]
        unpaid: bool,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Flip the paid flag of one month
    Toggle {
        /// Expense description or ID
        expense: String,
        /// Month name, abbreviation or number
        month: Month,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Archive an expense (hidden from the grid, kept in storage)
    Archive {
        expense: String,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Restore an archived expense
    Restore {
        expense: String,
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Permanently delete an expense
    Delete {
        expense: String,
        #[arg(short, long)]
        year: Option<i32>,
        /// Skip confirmation
        #[arg(short, long)]
        force: bool,
    },
}

fn parse_amount(input: &str) -> ExpenseResult<Money> {
    Money::parse(input).map_err(|e| {
        ExpenseError::Validation(format!(
            "Invalid amount: '{}'. Use format like '120.50' or '120'. Error: {}",
            input, e
        ))
    })
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    cmd: ExpenseCommands,
) -> ExpenseResult<()> {
    let service = ExpenseService::new(storage);
    let symbol = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::Add {
            description,
            amount,
            day,
            month,
            projectable,
            year,
        } => {
            let expense = service.add(NewExpense {
                year: settings.year_or_selected(year),
                due_day: day,
                description,
                amount: parse_amount(&amount)?,
                month,
                projectable,
            })?;

            println!("Added expense: {}", expense.description);
            println!("  Year: {}", expense.year);
            match month {
                Some(month) => println!(
                    "  One-off: {} in {}",
                    expense.value(month).format_with_symbol(symbol),
                    month
                ),
                None => println!(
                    "  Monthly: {}",
                    expense.value(Month::January).format_with_symbol(symbol)
                ),
            }
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { archived, year } => {
            let year = settings.year_or_selected(year);
            let expenses = if archived {
                service.list_archived(year)?
            } else {
                service.list_active(year)?
            };
            print!("{}", format_expense_list(&expenses, symbol));
        }

        ExpenseCommands::Show { expense, year } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            print!("{}", format_expense_details(&found, symbol));
        }

        ExpenseCommands::Edit {
            expense,
            description,
            day,
            projectable,
            year,
        } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            let edit = ExpenseEdit {
                description,
                due_day: day,
                projectable,
            };
            if edit.is_empty() {
                println!("No changes specified. Use --description, --day or --projectable.");
                return Ok(());
            }

            let updated = service.edit(found.id, edit)?;
            println!("Updated expense: {}", updated);
        }

        ExpenseCommands::Set {
            expense,
            month,
            value,
            paid,
            unpaid,
            year,
        } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            let update = CellUpdate {
                value: value.as_deref().map(parse_amount).transpose()?,
                paid: match (paid, unpaid) {
                    (true, _) => Some(true),
                    (_, true) => Some(false),
                    _ => None,
                },
            };

            let updated = service.update_cell(found.id, month, update)?;
            println!(
                "{} {}: {}{}",
                updated.description,
                month,
                updated.value(month).format_with_symbol(symbol),
                if updated.is_paid(month) { " (paid)" } else { "" }
            );
        }

        ExpenseCommands::Toggle {
            expense,
            month,
            year,
        } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            let updated = service.toggle_paid(found.id, month)?;
            println!(
                "{} {}: {}",
                updated.description,
                month,
                if updated.is_paid(month) { "paid" } else { "unpaid" }
            );
        }

        ExpenseCommands::Archive { expense, year } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            let archived = service.archive(found.id)?;
            println!("Archived expense: {}", archived.description);
        }

        ExpenseCommands::Restore { expense, year } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            let restored = service.restore(found.id)?;
            println!("Restored expense: {}", restored.description);
        }

        ExpenseCommands::Delete {
            expense,
            year,
            force,
        } => {
            let found = service.resolve(settings.year_or_selected(year), &expense)?;
            if !force {
                println!("This will permanently delete '{}'.", found);
                println!("Archive it instead with: expgrid expense archive {}", found.id);
                println!("To proceed, run again with --force.");
                return Ok(());
            }

            let deleted = service.delete(found.id)?;
            println!("Deleted expense: {}", deleted.description);
        }
    }

    Ok(())
}
