//! Backup restoration
//!
//! Overwrites the expense store (and settings, when present) from an archive.

use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};

use crate::config::paths::GridPaths;
use crate::error::{ExpenseError, ExpenseResult};
use crate::storage::write_json_atomic;

use super::manager::BackupArchive;

/// Handles restoring from backups
pub struct RestoreManager {
    paths: GridPaths,
}

impl RestoreManager {
    pub fn new(paths: GridPaths) -> Self {
        Self { paths }
    }

    fn read_archive(backup_path: &Path) -> ExpenseResult<BackupArchive> {
        let contents = fs::read_to_string(backup_path)
            .map_err(|e| ExpenseError::Io(format!("Failed to read backup file: {}", e)))?;

        serde_json::from_str(&contents)
            .map_err(|e| ExpenseError::Json(format!("Failed to parse backup file: {}", e)))
    }

    /// Restore data from a backup file
    ///
    /// Current data is overwritten. Callers should take a backup first.
    pub fn restore_from_file(&self, backup_path: &Path) -> ExpenseResult<RestoreResult> {
        let archive = Self::read_archive(backup_path)?;
        self.restore_from_archive(&archive)
    }

    pub fn restore_from_archive(&self, archive: &BackupArchive) -> ExpenseResult<RestoreResult> {
        self.paths.ensure_directories()?;

        let mut result = RestoreResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            expense_count: count_expenses(&archive.expenses),
            ..RestoreResult::default()
        };

        if !archive.expenses.is_null() {
            write_json_atomic(self.paths.expenses_file(), &archive.expenses)?;
            result.expenses_restored = true;
        }

        if !archive.settings.is_null() {
            write_json_atomic(self.paths.settings_file(), &archive.settings)?;
            result.settings_restored = true;
        }

        log::info!("{}", result.summary());
        Ok(result)
    }

    /// Parse a backup file without restoring it
    pub fn validate_backup(&self, backup_path: &Path) -> ExpenseResult<ValidationResult> {
        let archive = Self::read_archive(backup_path)?;

        Ok(ValidationResult {
            schema_version: archive.schema_version,
            backup_date: archive.created_at,
            expense_count: count_expenses(&archive.expenses),
            has_settings: archive.settings.is_object(),
        })
    }
}

fn count_expenses(store: &serde_json::Value) -> Option<usize> {
    store.get("expenses").and_then(|e| e.as_array()).map(Vec::len)
}

/// Result of a restore operation
#[derive(Debug, Default)]
pub struct RestoreResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    pub expenses_restored: bool,
    pub settings_restored: bool,
    pub expense_count: Option<usize>,
}

impl RestoreResult {
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if self.expenses_restored {
            match self.expense_count {
                Some(n) => parts.push(format!("{} expenses", n)),
                None => parts.push("expenses".to_string()),
            }
        }
        if self.settings_restored {
            parts.push("settings".to_string());
        }
        if parts.is_empty() {
            "Nothing to restore".to_string()
        } else {
            format!("Restored: {}", parts.join(", "))
        }
    }
}

/// Result of validating a backup
#[derive(Debug)]
pub struct ValidationResult {
    pub schema_version: u32,
    pub backup_date: DateTime<Utc>,
    /// Number of expense rows, `None` if the store section is missing or malformed
    pub expense_count: Option<usize>,
    pub has_settings: bool,
}

impl ValidationResult {
    pub fn is_complete(&self) -> bool {
        self.expense_count.is_some() && self.has_settings
    }

    pub fn summary(&self) -> String {
        match (self.expense_count, self.has_settings) {
            (Some(n), true) => format!("Complete backup (v{}): {} expenses", self.schema_version, n),
            (Some(n), false) => format!(
                "Partial backup (v{}): {} expenses, no settings",
                self.schema_version, n
            ),
            (None, _) => format!("Partial backup (v{}): no expense data", self.schema_version),
        }
    }
}
