//! Expense service
//!
//! Row-level operations on the year grid: adding rows, editing them, writing
//! single cells, toggling payment, archiving and deleting.

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, ExpenseId, Money, Month};
use crate::storage::{ExpenseFilter, Storage};

/// Input for creating an expense row
#[derive(Debug, Clone)]
pub struct NewExpense {
    pub year: i32,
    pub due_day: u8,
    pub description: String,
    pub amount: Money,
    /// `Some(month)` creates a one-off row with the amount in that month only
    pub month: Option<Month>,
    pub projectable: bool,
}

/// Field changes for an existing row; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ExpenseEdit {
    pub description: Option<String>,
    pub due_day: Option<u8>,
    pub projectable: Option<bool>,
}

impl ExpenseEdit {
    pub fn is_empty(&self) -> bool {
        self.description.is_none() && self.due_day.is_none() && self.projectable.is_none()
    }
}

/// New contents for one month cell
#[derive(Debug, Clone, Copy, Default)]
pub struct CellUpdate {
    pub value: Option<Money>,
    pub paid: Option<bool>,
}

/// Service for expense row management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a recurring or one-off row
    pub fn add(&self, input: NewExpense) -> ExpenseResult<Expense> {
        let description = input.description.trim();

        let mut expense = match input.month {
            Some(month) => {
                Expense::one_off(input.year, input.due_day, description, month, input.amount)
            }
            None => Expense::recurring(input.year, input.due_day, description, input.amount),
        };
        expense.projectable = input.projectable;

        expense
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.save_expenses()?;
        self.storage.log_create(&expense)?;

        log::info!("Added expense {} '{}' to {}", expense.id, expense.description, expense.year);
        Ok(expense)
    }

    pub fn get(&self, id: ExpenseId) -> ExpenseResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find a row of `year` by id, short id, id prefix, or exact description
    ///
    /// Description matching is case-insensitive. An identifier matching more
    /// than one row is rejected.
    pub fn find(&self, year: i32, identifier: &str) -> ExpenseResult<Option<Expense>> {
        if let Ok(id) = ExpenseId::parse(identifier.trim()) {
            return self.storage.expenses.get(id);
        }

        let rows = self.storage.expenses.query(ExpenseFilter::any(year))?;
        let needle = identifier.trim().to_lowercase();

        let mut matches: Vec<Expense> = rows
            .iter()
            .filter(|e| e.description.to_lowercase() == needle)
            .cloned()
            .collect();
        if matches.is_empty() {
            matches = rows
                .into_iter()
                .filter(|e| e.id.matches_prefix(identifier))
                .collect();
        }

        match matches.len() {
            0 => Ok(None),
            1 => Ok(matches.pop()),
            n => Err(ExpenseError::Validation(format!(
                "'{}' matches {} expenses; use the expense id",
                identifier, n
            ))),
        }
    }

    /// Like [`ExpenseService::find`], but a missing row is an error
    pub fn resolve(&self, year: i32, identifier: &str) -> ExpenseResult<Expense> {
        self.find(year, identifier)?
            .ok_or_else(|| ExpenseError::expense_not_found(identifier))
    }

    fn load(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        self.storage
            .expenses
            .get(id)?
            .ok_or_else(|| ExpenseError::expense_not_found(id.to_string()))
    }

    fn commit(&self, before: &Expense, after: Expense) -> ExpenseResult<Expense> {
        self.storage.expenses.upsert(after.clone())?;
        self.storage.save_expenses()?;
        self.storage.log_update(before, &after)?;
        Ok(after)
    }

    /// Change description, due day or projectable flag
    pub fn edit(&self, id: ExpenseId, edit: ExpenseEdit) -> ExpenseResult<Expense> {
        if edit.is_empty() {
            return Err(ExpenseError::Validation("Nothing to change".into()));
        }

        let before = self.load(id)?;
        let mut expense = before.clone();

        if let Some(description) = edit.description {
            expense.description = description.trim().to_string();
        }
        if let Some(due_day) = edit.due_day {
            expense.due_day = due_day;
        }
        if let Some(projectable) = edit.projectable {
            expense.projectable = projectable;
        }
        expense.updated_at = chrono::Utc::now();

        expense
            .validate()
            .map_err(|e| ExpenseError::Validation(e.to_string()))?;

        log::info!("Edited expense {}", id);
        self.commit(&before, expense)
    }

    /// Write the value and/or paid flag of one month
    pub fn update_cell(&self, id: ExpenseId, month: Month, update: CellUpdate) -> ExpenseResult<Expense> {
        if update.value.is_none() && update.paid.is_none() {
            return Err(ExpenseError::Validation("Nothing to change".into()));
        }
        if let Some(value) = update.value {
            if value.is_negative() {
                return Err(ExpenseError::Validation(format!(
                    "Value for {} cannot be negative ({})",
                    month, value
                )));
            }
        }

        let before = self.load(id)?;
        let mut expense = before.clone();

        if let Some(value) = update.value {
            expense.set_value(month, value);
        }
        if let Some(paid) = update.paid {
            expense.set_paid(month, paid);
        }

        log::debug!("Updated {} of expense {}", month, id);
        self.commit(&before, expense)
    }

    /// Flip the paid flag of one month
    pub fn toggle_paid(&self, id: ExpenseId, month: Month) -> ExpenseResult<Expense> {
        let before = self.load(id)?;
        let mut expense = before.clone();
        let paid = expense.toggle_paid(month);

        log::debug!("Marked {} of expense {} as {}", month, id, if paid { "paid" } else { "unpaid" });
        self.commit(&before, expense)
    }

    /// Soft-delete a row
    pub fn archive(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let before = self.load(id)?;
        if before.archived {
            return Err(ExpenseError::Validation(format!(
                "Expense '{}' is already archived",
                before.description
            )));
        }

        let mut expense = before.clone();
        expense.archive();

        log::info!("Archived expense {}", id);
        self.commit(&before, expense)
    }

    /// Bring an archived row back into the active grid
    pub fn restore(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let before = self.load(id)?;
        if !before.archived {
            return Err(ExpenseError::Validation(format!(
                "Expense '{}' is not archived",
                before.description
            )));
        }

        let mut expense = before.clone();
        expense.restore();

        log::info!("Restored expense {}", id);
        self.commit(&before, expense)
    }

    /// Permanently remove a row
    pub fn delete(&self, id: ExpenseId) -> ExpenseResult<Expense> {
        let expense = self.load(id)?;

        self.storage.expenses.delete(id)?;
        self.storage.save_expenses()?;
        self.storage.log_delete(&expense)?;

        log::info!("Deleted expense {} '{}'", id, expense.description);
        Ok(expense)
    }

    /// Non-archived rows of a year in grid order
    pub fn list_active(&self, year: i32) -> ExpenseResult<Vec<Expense>> {
        self.storage.expenses.query(ExpenseFilter::active(year))
    }

    /// Archived rows of a year in grid order
    pub fn list_archived(&self, year: i32) -> ExpenseResult<Vec<Expense>> {
        self.storage.expenses.query(ExpenseFilter::archived(year))
    }
}
