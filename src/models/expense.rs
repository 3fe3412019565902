//! Expense model
//!
//! One expense line-item of a year: a value and a paid flag for each of the
//! twelve months.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::ids::ExpenseId;
use super::money::Money;
use super::month::{Month, MonthMap};

/// An expense row in a year grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    /// Year this row belongs to
    pub year: i32,

    /// Day of the month the expense is due (1-31)
    pub due_day: u8,

    pub description: String,

    /// Archived rows are excluded from active views
    #[serde(default)]
    pub archived: bool,

    /// Opts the row into per-row forecast averaging
    #[serde(default)]
    pub projectable: bool,

    pub monthly_values: MonthMap<Money>,

    pub paid_status: MonthMap<bool>,

    pub created_at: DateTime<Utc>,

    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Create a recurring expense with `amount` in every month, all unpaid
    pub fn recurring(year: i32, due_day: u8, description: impl Into<String>, amount: Money) -> Self {
        Self::with_values(year, due_day, description, MonthMap::filled(amount))
    }

    /// Create a one-off expense with `amount` in a single month, all unpaid
    pub fn one_off(
        year: i32,
        due_day: u8,
        description: impl Into<String>,
        month: Month,
        amount: Money,
    ) -> Self {
        let mut values = MonthMap::filled(Money::zero());
        values[month] = amount;
        Self::with_values(year, due_day, description, values)
    }

    fn with_values(
        year: i32,
        due_day: u8,
        description: impl Into<String>,
        monthly_values: MonthMap<Money>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ExpenseId::new(),
            year,
            due_day,
            description: description.into(),
            archived: false,
            projectable: false,
            monthly_values,
            paid_status: MonthMap::filled(false),
            created_at: now,
            updated_at: now,
        }
    }

    /// Copy this row into another year with every month reset to zero and unpaid
    pub fn carried_into(&self, year: i32) -> Self {
        let mut next = Self::with_values(
            year,
            self.due_day,
            self.description.clone(),
            MonthMap::filled(Money::zero()),
        );
        next.projectable = self.projectable;
        next
    }

    pub fn value(&self, month: Month) -> Money {
        self.monthly_values[month]
    }

    pub fn is_paid(&self, month: Month) -> bool {
        self.paid_status[month]
    }

    pub fn set_value(&mut self, month: Month, value: Money) {
        self.monthly_values[month] = value;
        self.updated_at = Utc::now();
    }

    pub fn set_paid(&mut self, month: Month, paid: bool) {
        self.paid_status[month] = paid;
        self.updated_at = Utc::now();
    }

    /// Flip the paid flag of a month, returning the new state
    pub fn toggle_paid(&mut self, month: Month) -> bool {
        let paid = !self.paid_status[month];
        self.set_paid(month, paid);
        paid
    }

    pub fn archive(&mut self) {
        self.archived = true;
        self.updated_at = Utc::now();
    }

    pub fn restore(&mut self) {
        self.archived = false;
        self.updated_at = Utc::now();
    }

    /// Sum of the stored values of all twelve months
    pub fn total(&self) -> Money {
        self.monthly_values.values().sum()
    }

    /// Number of months marked paid
    pub fn paid_count(&self) -> usize {
        self.paid_status.values().filter(|paid| **paid).count()
    }

    /// Grid ordering: due day first, then description (case-insensitive)
    pub fn grid_order(a: &Expense, b: &Expense) -> Ordering {
        a.due_day.cmp(&b.due_day).then_with(|| {
            a.description
                .to_lowercase()
                .cmp(&b.description.to_lowercase())
        })
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        let description = self.description.trim();
        if description.chars().count() < 2 {
            return Err(ExpenseValidationError::DescriptionTooShort);
        }

        if description.chars().count() > 100 {
            return Err(ExpenseValidationError::DescriptionTooLong(
                description.chars().count(),
            ));
        }

        if !(1..=31).contains(&self.due_day) {
            return Err(ExpenseValidationError::InvalidDueDay(self.due_day));
        }

        if !(1900..=9999).contains(&self.year) {
            return Err(ExpenseValidationError::InvalidYear(self.year));
        }

        if let Some((month, value)) = self.monthly_values.iter().find(|(_, v)| v.is_negative()) {
            return Err(ExpenseValidationError::NegativeValue(month, *value));
        }

        Ok(())
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (day {}, {})", self.description, self.due_day, self.year)
    }
}

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    DescriptionTooShort,
    DescriptionTooLong(usize),
    InvalidDueDay(u8),
    InvalidYear(i32),
    NegativeValue(Month, Money),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DescriptionTooShort => {
                write!(f, "Description must have at least 2 characters")
            }
            Self::DescriptionTooLong(len) => {
                write!(f, "Description too long ({} chars, max 100)", len)
            }
            Self::InvalidDueDay(day) => write!(f, "Due day must be 1-31, got {}", day),
            Self::InvalidYear(year) => write!(f, "Year out of range: {}", year),
            Self::NegativeValue(month, value) => {
                write!(f, "Value for {} cannot be negative ({})", month, value)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recurring() {
        let expense = Expense::recurring(2025, 10, "Rent", Money::from_units(1200));
        assert!(expense.monthly_values.values().all(|v| *v == Money::from_units(1200)));
        assert_eq!(expense.paid_count(), 0);
        assert!(!expense.archived);
        assert!(!expense.projectable);
        assert_eq!(expense.total(), Money::from_units(14400));
    }

    #[test]
    fn test_one_off() {
        let expense = Expense::one_off(2025, 5, "Car tax", Month::March, Money::from_units(400));
        assert_eq!(expense.value(Month::March), Money::from_units(400));
        assert_eq!(expense.total(), Money::from_units(400));
    }

    #[test]
    fn test_toggle_paid() {
        let mut expense = Expense::recurring(2025, 1, "Water", Money::from_units(50));
        assert!(expense.toggle_paid(Month::May));
        assert!(expense.is_paid(Month::May));
        assert!(!expense.toggle_paid(Month::May));
        assert!(!expense.is_paid(Month::May));
    }

    #[test]
    fn test_carried_into_resets_months() {
        let mut expense = Expense::recurring(2025, 3, "Internet", Money::from_units(90));
        expense.projectable = true;
        expense.set_paid(Month::January, true);

        let next = expense.carried_into(2026);
        assert_ne!(next.id, expense.id);
        assert_eq!(next.year, 2026);
        assert_eq!(next.due_day, 3);
        assert_eq!(next.description, "Internet");
        assert!(next.projectable);
        assert_eq!(next.total(), Money::zero());
        assert_eq!(next.paid_count(), 0);
    }

    #[test]
    fn test_grid_order() {
        let a = Expense::recurring(2025, 5, "water", Money::zero());
        let b = Expense::recurring(2025, 5, "Electricity", Money::zero());
        let c = Expense::recurring(2025, 1, "Rent", Money::zero());

        let mut rows = vec![a, b, c];
        rows.sort_by(Expense::grid_order);
        let names: Vec<_> = rows.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Electricity", "water"]);
    }

    #[test]
    fn test_validation() {
        let mut expense = Expense::recurring(2025, 10, "Gym", Money::from_units(30));
        assert!(expense.validate().is_ok());

        expense.description = "x".into();
        assert_eq!(expense.validate(), Err(ExpenseValidationError::DescriptionTooShort));

        expense.description = "Gym".into();
        expense.due_day = 32;
        assert_eq!(expense.validate(), Err(ExpenseValidationError::InvalidDueDay(32)));

        expense.due_day = 1;
        expense.set_value(Month::July, Money::from_cents(-1));
        assert!(matches!(
            expense.validate(),
            Err(ExpenseValidationError::NegativeValue(Month::July, _))
        ));
    }

    #[test]
    fn test_rejects_document_with_missing_months() {
        let expense = Expense::recurring(2025, 10, "Rent", Money::from_units(10));
        let mut json = serde_json::to_value(&expense).unwrap();
        json["monthly_values"]
            .as_object_mut()
            .unwrap()
            .remove("december");

        assert!(serde_json::from_value::<Expense>(json).is_err());
    }
}
