//! Service layer for expense-grid
//!
//! Business operations on top of the storage layer: validation, audit
//! logging and commit of every change.

pub mod expense;
pub mod grid;
pub mod year;

pub use expense::{CellUpdate, ExpenseEdit, ExpenseService, NewExpense};
pub use grid::{GridRow, GridService, YearGrid};
pub use year::{ResetSummary, YearService};
