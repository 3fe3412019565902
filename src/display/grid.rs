//! Year grid rendering
//!
//! Rows are expenses, columns are months. Paid cells carry a check mark and
//! forecast cells are prefixed with `~`.

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

use crate::models::{Money, Month};
use crate::projection::YearPhase;
use crate::services::YearGrid;

const PAID_MARK: &str = "✓";
const PROJECTED_MARK: &str = "~";

fn cell(value: Money, paid: bool, projected: bool) -> String {
    if projected {
        format!("{}{}", PROJECTED_MARK, value)
    } else if paid {
        format!("{} {}", value, PAID_MARK)
    } else if value.is_zero() {
        "-".to_string()
    } else {
        value.to_string()
    }
}

/// Render the grid as a table followed by a legend
pub fn format_year_grid(grid: &YearGrid, currency_symbol: &str) -> String {
    if grid.is_empty() {
        return format!(
            "No active expenses for {}. Add one with 'expgrid expense add'.",
            grid.year
        );
    }

    let mut builder = Builder::default();

    let mut header = vec!["Day".to_string(), "Description".to_string()];
    header.extend(Month::ALL.iter().map(|m| m.short_label().to_string()));
    header.push("Total".to_string());
    builder.push_record(header);

    for row in &grid.rows {
        let expense = &row.expense;
        let mut record = vec![expense.due_day.to_string(), expense.description.clone()];
        record.extend(Month::ALL.iter().map(|&m| {
            cell(
                row.projection.display[m],
                expense.is_paid(m),
                row.projection.projected[m],
            )
        }));
        record.push(row.projection.total().to_string());
        builder.push_record(record);
    }

    let mut totals = vec![String::new(), "Total".to_string()];
    totals.extend(
        Month::ALL
            .iter()
            .map(|&m| cell(grid.month_totals[m], false, grid.month_projected[m])),
    );
    totals.push(grid.grand_total().to_string());
    builder.push_record(totals);

    let mut paid = vec![String::new(), "Paid".to_string()];
    paid.extend(Month::ALL.iter().map(|&m| grid.paid_totals[m].to_string()));
    paid.push(grid.paid_total().to_string());
    builder.push_record(paid);

    let mut table = builder.build();
    table
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..)).with(Alignment::right()));

    let mut output = format!("Expenses {} ({})\n", grid.year, phase_label(grid.phase));
    output.push_str(&table.to_string());
    output.push('\n');
    output.push_str(&format!(
        "Total {}  Paid {}  Policy {}",
        grid.grand_total().format_with_symbol(currency_symbol),
        grid.paid_total().format_with_symbol(currency_symbol),
        grid.policy
    ));
    if let Some(average) = grid.portfolio_average {
        output.push_str(&format!(
            "  Monthly average {}",
            average.format_with_symbol(currency_symbol)
        ));
    }
    output.push_str(&format!(
        "\n{} paid  {} forecast from paid months\n",
        PAID_MARK, PROJECTED_MARK
    ));

    output
}

fn phase_label(phase: YearPhase) -> String {
    match phase {
        YearPhase::Past => "closed".to_string(),
        YearPhase::Current(month) => format!("current month {}", month),
        YearPhase::Future => "upcoming".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_marks() {
        assert_eq!(cell(Money::from_units(10), true, false), "10.00 ✓");
        assert_eq!(cell(Money::from_units(10), false, true), "~10.00");
        assert_eq!(cell(Money::from_units(10), false, false), "10.00");
        assert_eq!(cell(Money::zero(), false, false), "-");
    }

    #[test]
    fn test_phase_label() {
        assert_eq!(phase_label(YearPhase::Current(Month::May)), "current month May");
        assert_eq!(phase_label(YearPhase::Past), "closed");
    }
}
