//! Expense repository for JSON storage
//!
//! Manages loading and saving expense rows to expenses.json

use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::RwLock;

use crate::error::ExpenseError;
use crate::models::{Expense, ExpenseId};

use super::file_io::{read_json, write_json_atomic};

/// Serializable expense data structure
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct ExpenseData {
    expenses: Vec<Expense>,
}

/// Which rows of the store a query selects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExpenseFilter {
    pub year: i32,
    /// `Some(flag)` selects rows with that archived flag; `None` selects both
    pub archived: Option<bool>,
}

impl ExpenseFilter {
    /// Non-archived rows of a year
    pub fn active(year: i32) -> Self {
        Self {
            year,
            archived: Some(false),
        }
    }

    /// Archived rows of a year
    pub fn archived(year: i32) -> Self {
        Self {
            year,
            archived: Some(true),
        }
    }

    /// Every row of a year
    pub fn any(year: i32) -> Self {
        Self {
            year,
            archived: None,
        }
    }

    pub fn matches(&self, expense: &Expense) -> bool {
        expense.year == self.year && self.archived.map_or(true, |a| expense.archived == a)
    }
}

/// Repository for expense persistence
pub struct ExpenseRepository {
    path: PathBuf,
    data: RwLock<HashMap<ExpenseId, Expense>>,
}

impl ExpenseRepository {
    /// Create a new expense repository
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            data: RwLock::new(HashMap::new()),
        }
    }

    /// Load expenses from disk
    pub fn load(&self) -> Result<(), ExpenseError> {
        let file_data: ExpenseData = read_json(&self.path)?;

        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.clear();
        for expense in file_data.expenses {
            data.insert(expense.id, expense);
        }

        Ok(())
    }

    /// Save expenses to disk
    pub fn save(&self) -> Result<(), ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| Expense::grid_order(a, b)));

        write_json_atomic(&self.path, &ExpenseData { expenses })
    }

    /// Get an expense by ID
    pub fn get(&self, id: ExpenseId) -> Result<Option<Expense>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(data.get(&id).cloned())
    }

    /// Get all expenses, ordered by year then grid order
    pub fn get_all(&self) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data.values().cloned().collect();
        expenses.sort_by(|a, b| a.year.cmp(&b.year).then_with(|| Expense::grid_order(a, b)));
        Ok(expenses)
    }

    /// Get the rows selected by a filter, in grid order
    pub fn query(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut expenses: Vec<_> = data
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect();
        expenses.sort_by(Expense::grid_order);
        Ok(expenses)
    }

    /// Distinct years present in the store, ascending
    pub fn years(&self) -> Result<Vec<i32>, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut years: Vec<i32> = data.values().map(|e| e.year).collect();
        years.sort_unstable();
        years.dedup();
        Ok(years)
    }

    /// Insert or update an expense
    pub fn upsert(&self, expense: Expense) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        data.insert(expense.id, expense);
        Ok(())
    }

    /// Insert or update several expenses under one lock
    pub fn upsert_many(&self, expenses: Vec<Expense>) -> Result<(), ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        for expense in expenses {
            data.insert(expense.id, expense);
        }
        Ok(())
    }

    /// Delete an expense
    pub fn delete(&self, id: ExpenseId) -> Result<bool, ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        Ok(data.remove(&id).is_some())
    }

    /// Delete every row selected by a filter, returning the removed rows
    pub fn delete_matching(&self, filter: ExpenseFilter) -> Result<Vec<Expense>, ExpenseError> {
        let mut data = self.data.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let ids: Vec<ExpenseId> = data
            .values()
            .filter(|e| filter.matches(e))
            .map(|e| e.id)
            .collect();

        let mut removed: Vec<Expense> = ids.iter().filter_map(|id| data.remove(id)).collect();
        removed.sort_by(Expense::grid_order);
        Ok(removed)
    }

    pub fn count(&self) -> Result<usize, ExpenseError> {
        let data = self.data.read().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
        })?;
        Ok(data.len())
    }
}
