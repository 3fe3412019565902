//! CLI command handlers
//!
//! Bridges the clap argument parsing with the service layer.

pub mod advise;
pub mod backup;
pub mod config;
pub mod expense;
pub mod export;
pub mod grid;
pub mod year;

pub use advise::{handle_advise_command, AdviseArgs};
pub use backup::{handle_backup_command, BackupCommands};
pub use config::{handle_config_command, ConfigArgs};
pub use expense::{handle_expense_command, ExpenseCommands};
pub use export::{handle_export_command, ExportCommands};
pub use grid::{handle_grid_command, handle_history_command, GridArgs};
pub use year::{handle_year_command, YearCommands};
