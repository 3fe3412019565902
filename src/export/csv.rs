//! CSV export of a year grid
//!
//! One line per row with the twelve display values and the row total,
//! followed by a totals line. Amounts are written in currency units with two
//! decimals.

use std::io::Write;

use crate::error::ExpenseResult;
use crate::models::{Money, Month};
use crate::services::YearGrid;

fn amount(money: Money) -> String {
    money.to_string()
}

/// Export the grid to CSV
pub fn export_grid_csv<W: Write>(grid: &YearGrid, writer: W) -> ExpenseResult<()> {
    let mut csv = csv::Writer::from_writer(writer);

    let mut header = vec![
        "ID".to_string(),
        "Due Day".to_string(),
        "Description".to_string(),
    ];
    header.extend(Month::ALL.iter().map(|m| m.short_label().to_string()));
    header.extend(["Total", "Paid Months", "Projected Months"].map(String::from));
    csv.write_record(&header)?;

    for row in &grid.rows {
        let expense = &row.expense;
        let mut record = vec![
            expense.id.to_string(),
            expense.due_day.to_string(),
            expense.description.clone(),
        ];
        record.extend(row.projection.display.values().copied().map(amount));
        record.push(amount(row.projection.total()));
        record.push(month_list(|m| expense.is_paid(m)));
        record.push(month_list(|m| row.projection.projected[m]));
        csv.write_record(&record)?;
    }

    let mut totals = vec![String::new(), String::new(), "Total".to_string()];
    totals.extend(grid.month_totals.values().copied().map(amount));
    totals.push(amount(grid.grand_total()));
    totals.push(String::new());
    totals.push(month_list(|m| grid.month_projected[m]));
    csv.write_record(&totals)?;

    csv.flush()?;
    Ok(())
}

/// Space-separated short labels of the months selected by `pred`
fn month_list(pred: impl Fn(Month) -> bool) -> String {
    Month::ALL
        .iter()
        .filter(|m| pred(**m))
        .map(|m| m.short_label())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::GridPaths;
    use crate::models::Expense;
    use crate::projection::ProjectionPolicy;
    use crate::services::GridService;
    use crate::storage::Storage;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    #[test]
    fn test_grid_csv() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(GridPaths::with_base_dir(temp_dir.path().to_path_buf())).unwrap();

        let mut rent = Expense::recurring(2025, 5, "Rent, flat", Money::from_units(900));
        rent.set_paid(Month::January, true);
        storage.expenses.upsert(rent).unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 6, 1).unwrap();
        let grid = GridService::with_today(&storage, today)
            .year_grid(2025, ProjectionPolicy::Off)
            .unwrap();

        let mut out = Vec::new();
        export_grid_csv(&grid, &mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 3);
        assert!(lines[0].starts_with("ID,Due Day,Description,Jan,Feb"));
        assert!(lines[1].contains("\"Rent, flat\""));
        assert!(lines[1].contains(",900.00,"));
        assert!(lines[1].contains("10800.00,Jan,"));
        assert!(lines[2].starts_with(",,Total,900.00"));
    }
}
