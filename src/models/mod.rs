//! Core data models for expense-grid
//!
//! Expense rows, the money and month types their twelve-month grids are built
//! from, and strongly-typed ids.

pub mod expense;
pub mod ids;
pub mod money;
pub mod month;

pub use expense::{Expense, ExpenseValidationError};
pub use ids::{ExpenseId, SubscriptionId};
pub use money::{Money, MoneyParseError};
pub use month::{Month, MonthMap};
