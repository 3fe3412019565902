//! JSON export
//!
//! Two documents: a single year grid with display values and forecast flags,
//! and the whole expense store across all years.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::services::YearGrid;
use crate::storage::Storage;

/// Current export schema version
pub const EXPORT_SCHEMA_VERSION: &str = "1.0.0";

/// Export of one year grid
#[derive(Debug, Clone, Serialize)]
pub struct GridExport<'a> {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub grid: &'a YearGrid,
}

/// Export of every stored row
#[derive(Debug, Clone, Serialize)]
pub struct StoreExport {
    pub schema_version: &'static str,
    pub exported_at: DateTime<Utc>,
    pub app_version: &'static str,
    pub years: Vec<i32>,
    pub expense_count: usize,
    pub expenses: Vec<Expense>,
}

impl StoreExport {
    pub fn from_storage(storage: &Storage) -> ExpenseResult<Self> {
        let expenses = storage.expenses.get_all()?;
        Ok(Self {
            schema_version: EXPORT_SCHEMA_VERSION,
            exported_at: Utc::now(),
            app_version: env!("CARGO_PKG_VERSION"),
            years: storage.expenses.years()?,
            expense_count: expenses.len(),
            expenses,
        })
    }
}

fn write_json<W: Write, T: Serialize>(writer: &mut W, value: &T, pretty: bool) -> ExpenseResult<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *writer, value)
    } else {
        serde_json::to_writer(&mut *writer, value)
    }
    .map_err(|e| ExpenseError::Export(format!("Failed to serialize export: {}", e)))?;

    writeln!(writer).map_err(|e| ExpenseError::Export(e.to_string()))
}

/// Export a year grid to JSON
pub fn export_grid_json<W: Write>(grid: &YearGrid, writer: &mut W, pretty: bool) -> ExpenseResult<()> {
    let export = GridExport {
        schema_version: EXPORT_SCHEMA_VERSION,
        exported_at: Utc::now(),
        app_version: env!("CARGO_PKG_VERSION"),
        grid,
    };
    write_json(writer, &export, pretty)
}

/// Export the whole store to JSON
pub fn export_store_json<W: Write>(storage: &Storage, writer: &mut W, pretty: bool) -> ExpenseResult<()> {
    write_json(writer, &StoreExport::from_storage(storage)?, pretty)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::GridPaths;
    use crate::models::{Money, Month};
    use crate::projection::ProjectionPolicy;
    use crate::services::GridService;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn create_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(GridPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();
        (temp_dir, storage)
    }

    #[test]
    fn test_grid_json_carries_projection() {
        let (_temp, storage) = create_storage();
        let mut power = Expense::recurring(2025, 10, "Power", Money::zero());
        power.projectable = true;
        power.set_value(Month::January, Money::from_units(100));
        power.set_paid(Month::January, true);
        storage.expenses.upsert(power).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
        let grid = GridService::with_today(&storage, today)
            .year_grid(2025, ProjectionPolicy::PerRow)
            .unwrap();

        let mut out = Vec::new();
        export_grid_json(&grid, &mut out, false).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["schema_version"], EXPORT_SCHEMA_VERSION);
        let row = &value["grid"]["rows"][0];
        assert_eq!(row["expense"]["description"], "Power");
        assert_eq!(row["display"]["march"], 10000);
        assert_eq!(row["projected"]["march"], true);
        assert_eq!(row["projected"]["february"], false);
        assert_eq!(value["grid"]["policy"], "per-row");
    }

    #[test]
    fn test_store_json() {
        let (_temp, storage) = create_storage();
        storage
            .expenses
            .upsert(Expense::recurring(2024, 1, "Rent", Money::zero()))
            .unwrap();
        storage
            .expenses
            .upsert(Expense::recurring(2025, 1, "Rent", Money::zero()))
            .unwrap();

        let mut out = Vec::new();
        export_store_json(&storage, &mut out, true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();

        assert_eq!(value["expense_count"], 2);
        assert_eq!(value["years"], serde_json::json!([2024, 2025]));
    }
}
