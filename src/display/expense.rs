//! Expense display formatting
//!
//! Formats expense rows for terminal output in list and detail views.

use crate::models::{Expense, Month};

/// Format a list of expenses as a table
pub fn format_expense_list(expenses: &[Expense], currency_symbol: &str) -> String {
    if expenses.is_empty() {
        return "No expenses found.".to_string();
    }

    let desc_width = expenses
        .iter()
        .map(|e| e.description.chars().count())
        .max()
        .unwrap_or(11)
        .max(11);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:>3}  {:<desc_width$}  {:>14}  {:>4}  {}\n",
        "ID",
        "Day",
        "Description",
        "Total",
        "Paid",
        "Flags",
        desc_width = desc_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:->3}  {:-<desc_width$}  {:->14}  {:->4}  {:-<10}\n",
        "",
        "",
        "",
        "",
        "",
        "",
        desc_width = desc_width,
    ));

    for expense in expenses {
        let mut flags = Vec::new();
        if expense.projectable {
            flags.push("projectable");
        }
        if expense.archived {
            flags.push("archived");
        }

        output.push_str(&format!(
            "{:<12}  {:>3}  {:<desc_width$}  {:>14}  {:>2}/12  {}\n",
            expense.id.to_string(),
            expense.due_day,
            expense.description,
            expense.total().format_with_symbol(currency_symbol),
            expense.paid_count(),
            flags.join(", "),
            desc_width = desc_width,
        ));
    }

    output
}

/// Format a single expense with its month-by-month cells
pub fn format_expense_details(expense: &Expense, currency_symbol: &str) -> String {
    let mut output = String::new();

    output.push_str(&format!("Expense: {}\n", expense.description));
    output.push_str(&format!("  ID:          {}\n", expense.id));
    output.push_str(&format!("  Year:        {}\n", expense.year));
    output.push_str(&format!("  Due day:     {}\n", expense.due_day));
    output.push_str(&format!(
        "  Projectable: {}\n",
        if expense.projectable { "Yes" } else { "No" }
    ));
    if expense.archived {
        output.push_str("  Status:      Archived\n");
    }
    output.push('\n');

    for month in Month::ALL {
        output.push_str(&format!(
            "  {:<10} {:>14}  {}\n",
            month.to_string(),
            expense.value(month).format_with_symbol(currency_symbol),
            if expense.is_paid(month) { "paid" } else { "" }
        ));
    }
    output.push_str(&format!(
        "  {:<10} {:>14}\n",
        "Total",
        expense.total().format_with_symbol(currency_symbol)
    ));

    output
}
