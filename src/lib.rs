//! expense-grid - yearly expense tracking from the terminal
//!
//! Expenses are rows of a year grid, one cell per month holding an amount and
//! a paid flag. Blank months can be forecast from paid ones, a year can be
//! carried into the next with blank cells, and a text generator can be asked
//! for advice about a year's spending.
//!
//! # Architecture
//!
//! - `config`: data directory resolution and settings
//! - `error`: error types
//! - `models`: expenses, money, months and ids
//! - `storage`: JSON document store and change feed
//! - `audit`: append-only change log
//! - `backup`: rolling backups and restore
//! - `projection`: forecasting of blank months
//! - `services`: business operations
//! - `advisor`: advice generation
//! - `export`: CSV and JSON export
//! - `display`: terminal formatting
//! - `cli`: command handlers
//!
//! # Example
//!
//! ```rust,ignore
//! use expense_grid::config::{GridPaths, Settings};
//! use expense_grid::services::GridService;
//! use expense_grid::storage::Storage;
//!
//! let paths = GridPaths::new()?;
//! let settings = Settings::load_or_create(&paths)?;
//! let mut storage = Storage::new(paths)?;
//! storage.load_all()?;
//!
//! let grid = GridService::new(&storage).year_grid(2025, settings.projection_policy)?;
//! ```

pub mod advisor;
pub mod audit;
pub mod backup;
pub mod cli;
pub mod config;
pub mod display;
pub mod error;
pub mod export;
pub mod models;
pub mod projection;
pub mod services;
pub mod storage;

pub use error::{ExpenseError, ExpenseResult};
