//! Storage layer for expense-grid
//!
//! JSON document storage with atomic writes, an append-only audit trail and a
//! change feed that pushes filtered snapshots to subscribers after each commit.

pub mod expenses;
pub mod feed;
pub mod file_io;

pub use expenses::{ExpenseFilter, ExpenseRepository};
pub use feed::{ExpenseFeed, Snapshot};
pub use file_io::{read_json, write_json_atomic};

use serde::Serialize;

use crate::audit::{generate_diff, AuditEntry, AuditLogger, EntityType};
use crate::config::paths::GridPaths;
use crate::error::ExpenseError;
use crate::models::{Expense, SubscriptionId};

/// Main storage coordinator
pub struct Storage {
    paths: GridPaths,
    pub expenses: ExpenseRepository,
    audit: AuditLogger,
    feed: ExpenseFeed,
}

impl Storage {
    /// Create a new Storage instance, creating directories as needed
    pub fn new(paths: GridPaths) -> Result<Self, ExpenseError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: ExpenseRepository::new(paths.expenses_file()),
            audit: AuditLogger::new(paths.audit_log()),
            feed: ExpenseFeed::new(),
            paths,
        })
    }

    pub fn paths(&self) -> &GridPaths {
        &self.paths
    }

    /// Load all data from disk
    pub fn load_all(&mut self) -> Result<(), ExpenseError> {
        self.expenses.load()
    }

    /// Persist the expense store and notify subscribers
    ///
    /// Every mutation goes through here, so one call is one commit.
    pub fn save_expenses(&self) -> Result<(), ExpenseError> {
        self.expenses.save()?;
        self.feed.publish(&self.expenses.get_all()?)
    }

    /// Watch the rows selected by `filter`
    ///
    /// The callback runs immediately with the current rows, then after every
    /// commit until [`Storage::unsubscribe`] is called.
    pub fn subscribe<F>(&self, filter: ExpenseFilter, callback: F) -> Result<SubscriptionId, ExpenseError>
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let current = self.expenses.get_all()?;
        self.feed.subscribe(filter, callback, &current)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, ExpenseError> {
        self.feed.unsubscribe(id)
    }

    pub fn audit(&self) -> &AuditLogger {
        &self.audit
    }

    pub fn log_create(&self, expense: &Expense) -> Result<(), ExpenseError> {
        self.audit.log(&AuditEntry::create(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            expense,
        ))
    }

    pub fn log_update(&self, before: &Expense, after: &Expense) -> Result<(), ExpenseError> {
        let diff = generate_diff(&to_value(before)?, &to_value(after)?);
        self.audit.log(&AuditEntry::update(
            EntityType::Expense,
            after.id.to_string(),
            Some(after.description.clone()),
            before,
            after,
            diff,
        ))
    }

    pub fn log_delete(&self, expense: &Expense) -> Result<(), ExpenseError> {
        self.audit.log(&AuditEntry::delete(
            EntityType::Expense,
            expense.id.to_string(),
            Some(expense.description.clone()),
            expense,
        ))
    }

    /// Record a bulk creation (clone forward) as one batch of entries
    pub fn log_create_batch(&self, expenses: &[Expense]) -> Result<(), ExpenseError> {
        let entries: Vec<AuditEntry> = expenses
            .iter()
            .map(|e| {
                AuditEntry::create(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            })
            .collect();
        self.audit.log_batch(&entries)
    }

    /// Record a bulk deletion (year reset) as one batch of entries
    pub fn log_delete_batch(&self, expenses: &[Expense]) -> Result<(), ExpenseError> {
        let entries: Vec<AuditEntry> = expenses
            .iter()
            .map(|e| {
                AuditEntry::delete(
                    EntityType::Expense,
                    e.id.to_string(),
                    Some(e.description.clone()),
                    e,
                )
            })
            .collect();
        self.audit.log_batch(&entries)
    }

    /// Record a settings change
    pub fn log_settings_update<T: Serialize>(&self, before: &T, after: &T) -> Result<(), ExpenseError> {
        let diff = generate_diff(&to_value(before)?, &to_value(after)?);
        if diff.is_none() {
            return Ok(());
        }
        self.audit.log(&AuditEntry::update(
            EntityType::Settings,
            "settings",
            None,
            before,
            after,
            diff,
        ))
    }

    /// Check if storage has been initialized
    pub fn is_initialized(&self) -> bool {
        self.paths.settings_file().exists()
    }
}

fn to_value<T: Serialize>(value: &T) -> Result<serde_json::Value, ExpenseError> {
    serde_json::to_value(value).map_err(ExpenseError::from)
}
