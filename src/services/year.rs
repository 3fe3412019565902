//! Year service
//!
//! Bulk operations over a whole year grid.

use crate::backup::BackupManager;
use crate::config::settings::BackupRetention;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::Expense;
use crate::storage::{ExpenseFilter, Storage};

/// Outcome of a year reset
#[derive(Debug)]
pub struct ResetSummary {
    pub removed: Vec<Expense>,
    /// Backup taken before anything was deleted
    pub backup_path: std::path::PathBuf,
}

/// Service for year-level operations
pub struct YearService<'a> {
    storage: &'a Storage,
}

impl<'a> YearService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Years that have at least one row, ascending
    pub fn years(&self) -> ExpenseResult<Vec<i32>> {
        self.storage.expenses.years()
    }

    /// Copy every active row of `year` into `year + 1`
    ///
    /// The copies get new ids, zero values and no paid months. Refuses to
    /// write into a year that already has rows. All copies are committed
    /// together.
    pub fn clone_forward(&self, year: i32) -> ExpenseResult<Vec<Expense>> {
        let next_year = year
            .checked_add(1)
            .ok_or_else(|| ExpenseError::Year(format!("Cannot clone past year {}", year)))?;

        let source = self.storage.expenses.query(ExpenseFilter::active(year))?;
        if source.is_empty() {
            return Err(ExpenseError::Year(format!(
                "No active expenses in {} to clone",
                year
            )));
        }

        let existing = self.storage.expenses.query(ExpenseFilter::any(next_year))?;
        if !existing.is_empty() {
            return Err(ExpenseError::Year(format!(
                "{} already has {} expenses; reset it first",
                next_year,
                existing.len()
            )));
        }

        let clones: Vec<Expense> = source.iter().map(|e| e.carried_into(next_year)).collect();
        for clone in &clones {
            clone
                .validate()
                .map_err(|e| ExpenseError::Validation(e.to_string()))?;
        }

        self.storage.expenses.upsert_many(clones.clone())?;
        self.storage.save_expenses()?;
        self.storage.log_create_batch(&clones)?;

        log::info!("Cloned {} expenses from {} into {}", clones.len(), year, next_year);
        Ok(clones)
    }

    /// Delete every row of `year`, archived ones included
    ///
    /// A backup is written first; nothing is deleted if it fails.
    pub fn reset_year(&self, year: i32, retention: &BackupRetention) -> ExpenseResult<ResetSummary> {
        let count = self.storage.expenses.query(ExpenseFilter::any(year))?.len();
        if count == 0 {
            return Err(ExpenseError::Year(format!("No expenses in {} to reset", year)));
        }

        let backups = BackupManager::new(self.storage.paths().clone(), retention.clone());
        let (backup_path, _) = backups.create_backup_with_retention()?;

        let removed = self.storage.expenses.delete_matching(ExpenseFilter::any(year))?;
        self.storage.save_expenses()?;
        self.storage.log_delete_batch(&removed)?;

        log::warn!("Reset {}: removed {} expenses", year, removed.len());
        Ok(ResetSummary {
            removed,
            backup_path,
        })
    }
}
