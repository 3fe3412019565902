//! Export module for expense-grid
//!
//! - CSV: a year grid, spreadsheet-compatible
//! - JSON: a year grid with forecast flags, or the whole store

pub mod csv;
pub mod json;

pub use self::csv::export_grid_csv;
pub use self::json::{export_grid_json, export_store_json, GridExport, StoreExport, EXPORT_SCHEMA_VERSION};
