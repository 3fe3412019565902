//! Display formatting for terminal output
//!
//! The year grid is rendered with `tabled`; lists and detail views are plain
//! fixed-width text.

pub mod expense;
pub mod grid;

pub use expense::{format_expense_details, format_expense_list};
pub use grid::format_year_grid;
