//! Backup manager
//!
//! Snapshots the expense store and settings into dated JSON archives and
//! prunes them according to the retention policy.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

use crate::config::paths::GridPaths;
use crate::config::settings::BackupRetention;
use crate::error::{ExpenseError, ExpenseResult};

const BACKUP_PREFIX: &str = "backup-";
pub(crate) const ARCHIVE_SCHEMA_VERSION: u32 = 1;

/// Metadata about a backup file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupInfo {
    pub filename: String,
    pub path: PathBuf,
    pub created_at: DateTime<Utc>,
    pub size_bytes: u64,
    /// Oldest backup of its calendar month; kept under the monthly quota
    pub is_monthly: bool,
}

/// On-disk backup format
#[derive(Debug, Serialize, Deserialize)]
pub struct BackupArchive {
    pub schema_version: u32,
    pub created_at: DateTime<Utc>,
    /// Contents of expenses.json
    pub expenses: serde_json::Value,
    /// Contents of config.json
    #[serde(default)]
    pub settings: serde_json::Value,
}

/// Manages backup creation and retention
pub struct BackupManager {
    paths: GridPaths,
    retention: BackupRetention,
}

impl BackupManager {
    pub fn new(paths: GridPaths, retention: BackupRetention) -> Self {
        Self { paths, retention }
    }

    pub fn backup_dir(&self) -> PathBuf {
        self.paths.backup_dir()
    }

    /// Write a backup of the current data, returning its path
    pub fn create_backup(&self) -> ExpenseResult<PathBuf> {
        let backup_dir = self.backup_dir();
        fs::create_dir_all(&backup_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to create backup directory: {}", e)))?;

        let now = Utc::now();
        let filename = format!(
            "{}{}-{:03}.json",
            BACKUP_PREFIX,
            now.format("%Y%m%d-%H%M%S"),
            now.timestamp_subsec_millis()
        );
        let backup_path = backup_dir.join(filename);

        let archive = BackupArchive {
            schema_version: ARCHIVE_SCHEMA_VERSION,
            created_at: now,
            expenses: read_json_value(&self.paths.expenses_file())?,
            settings: read_json_value(&self.paths.settings_file())?,
        };

        let json = serde_json::to_string_pretty(&archive)
            .map_err(|e| ExpenseError::Json(format!("Failed to serialize backup: {}", e)))?;
        fs::write(&backup_path, json)
            .map_err(|e| ExpenseError::Io(format!("Failed to write backup file: {}", e)))?;

        log::info!("Backup written to {}", backup_path.display());
        Ok(backup_path)
    }

    /// All backups, newest first
    pub fn list_backups(&self) -> ExpenseResult<Vec<BackupInfo>> {
        let backup_dir = self.backup_dir();
        if !backup_dir.exists() {
            return Ok(Vec::new());
        }

        let mut backups = Vec::new();
        for entry in fs::read_dir(&backup_dir)
            .map_err(|e| ExpenseError::Io(format!("Failed to read backup directory: {}", e)))?
        {
            let entry = entry
                .map_err(|e| ExpenseError::Io(format!("Failed to read directory entry: {}", e)))?;
            if let Some(info) = parse_backup_info(&entry.path()) {
                backups.push(info);
            }
        }

        // Oldest backup of each month is the monthly one
        backups.sort_by(|a, b| a.created_at.cmp(&b.created_at));
        let mut seen_months = HashSet::new();
        for backup in &mut backups {
            let key = (backup.created_at.year(), backup.created_at.month());
            backup.is_monthly = seen_months.insert(key);
        }

        backups.reverse();
        Ok(backups)
    }

    /// Delete backups beyond the retention policy, returning the deleted paths
    pub fn enforce_retention(&self) -> ExpenseResult<Vec<PathBuf>> {
        let (monthly, daily): (Vec<_>, Vec<_>) =
            self.list_backups()?.into_iter().partition(|b| b.is_monthly);

        let expired = daily
            .into_iter()
            .skip(self.retention.daily_count as usize)
            .chain(monthly.into_iter().skip(self.retention.monthly_count as usize));

        let mut deleted = Vec::new();
        for backup in expired {
            fs::remove_file(&backup.path)
                .map_err(|e| ExpenseError::Io(format!("Failed to delete old backup: {}", e)))?;
            log::debug!("Pruned backup {}", backup.filename);
            deleted.push(backup.path);
        }

        Ok(deleted)
    }

    /// Create a backup and then enforce the retention policy
    pub fn create_backup_with_retention(&self) -> ExpenseResult<(PathBuf, Vec<PathBuf>)> {
        let backup_path = self.create_backup()?;
        let deleted = self.enforce_retention()?;
        Ok((backup_path, deleted))
    }

    /// Look up a backup by filename
    pub fn get_backup(&self, filename: &str) -> ExpenseResult<Option<BackupInfo>> {
        Ok(self
            .list_backups()?
            .into_iter()
            .find(|b| b.filename == filename))
    }

    pub fn get_latest_backup(&self) -> ExpenseResult<Option<BackupInfo>> {
        Ok(self.list_backups()?.into_iter().next())
    }
}

fn parse_backup_info(path: &Path) -> Option<BackupInfo> {
    let filename = path.file_name()?.to_string_lossy().to_string();
    let stamp = filename.strip_prefix(BACKUP_PREFIX)?.strip_suffix(".json")?;
    let created_at = parse_backup_timestamp(stamp)?;
    let size_bytes = fs::metadata(path).ok()?.len();

    Some(BackupInfo {
        filename,
        path: path.to_path_buf(),
        created_at,
        size_bytes,
        is_monthly: false,
    })
}

/// Read a JSON file as a generic value, `null` if it doesn't exist
fn read_json_value(path: &Path) -> ExpenseResult<serde_json::Value> {
    if !path.exists() {
        return Ok(serde_json::Value::Null);
    }

    let contents = fs::read_to_string(path)
        .map_err(|e| ExpenseError::Io(format!("Failed to read file for backup: {}", e)))?;

    serde_json::from_str(&contents)
        .map_err(|e| ExpenseError::Json(format!("Failed to parse JSON for backup: {}", e)))
}

/// Parse `YYYYMMDD-HHMMSS-mmm` (milliseconds optional)
fn parse_backup_timestamp(stamp: &str) -> Option<DateTime<Utc>> {
    let mut parts = stamp.split('-');
    let date_part = parts.next()?;
    let time_part = parts.next()?;
    let millis: u32 = match parts.next() {
        Some(m) => m.parse().ok()?,
        None => 0,
    };
    if parts.next().is_some() {
        return None;
    }

    let date = NaiveDate::parse_from_str(date_part, "%Y%m%d").ok()?;
    let time = NaiveTime::parse_from_str(time_part, "%H%M%S").ok()?;
    if millis > 999 {
        return None;
    }
    let time = time.with_nanosecond(millis * 1_000_000)?;

    Some(DateTime::from_naive_utc_and_offset(
        NaiveDateTime::new(date, time),
        Utc,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_manager() -> (BackupManager, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());
        paths.ensure_directories().unwrap();

        let retention = BackupRetention {
            daily_count: 3,
            monthly_count: 2,
        };

        (BackupManager::new(paths, retention), temp_dir)
    }

    fn write_named_backup(manager: &BackupManager, stamp: &str) {
        let path = manager.backup_dir().join(format!("backup-{}.json", stamp));
        fs::write(path, r#"{"schema_version":1,"created_at":"2025-01-01T00:00:00Z","expenses":null}"#)
            .unwrap();
    }

    #[test]
    fn test_create_backup_captures_store() {
        let (manager, temp) = create_test_manager();
        fs::write(
            temp.path().join("data").join("expenses.json"),
            r#"{"expenses":[]}"#,
        )
        .unwrap();

        let backup_path = manager.create_backup().unwrap();
        let archive: BackupArchive =
            serde_json::from_str(&fs::read_to_string(&backup_path).unwrap()).unwrap();

        assert_eq!(archive.schema_version, ARCHIVE_SCHEMA_VERSION);
        assert!(archive.expenses["expenses"].is_array());
        assert!(archive.settings.is_null());
    }

    #[test]
    fn test_list_backups_newest_first() {
        let (manager, _temp) = create_test_manager();
        write_named_backup(&manager, "20250301-080000-000");
        write_named_backup(&manager, "20250302-080000-000");
        write_named_backup(&manager, "20250115-080000-000");

        let backups = manager.list_backups().unwrap();
        let names: Vec<_> = backups.iter().map(|b| b.filename.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "backup-20250302-080000-000.json",
                "backup-20250301-080000-000.json",
                "backup-20250115-080000-000.json",
            ]
        );
        assert!(!backups[0].is_monthly);
        assert!(backups[1].is_monthly);
        assert!(backups[2].is_monthly);
    }

    #[test]
    fn test_retention_policy() {
        let (manager, _temp) = create_test_manager();
        // One monthly (first of March) plus five dailies
        for day in 1..=6 {
            write_named_backup(&manager, &format!("202503{:02}-080000-000", day));
        }

        let deleted = manager.enforce_retention().unwrap();
        assert_eq!(deleted.len(), 2);

        let remaining = manager.list_backups().unwrap();
        assert_eq!(remaining.len(), 4);
        assert!(remaining
            .iter()
            .any(|b| b.filename == "backup-20250301-080000-000.json"));
    }

    #[test]
    fn test_ignores_unrelated_files() {
        let (manager, _temp) = create_test_manager();
        fs::write(manager.backup_dir().join("notes.txt"), "x").unwrap();
        fs::write(manager.backup_dir().join("backup-garbage.json"), "{}").unwrap();

        assert!(manager.list_backups().unwrap().is_empty());
        assert!(manager.get_latest_backup().unwrap().is_none());
    }

    #[test]
    fn test_parse_backup_timestamp() {
        let timestamp = parse_backup_timestamp("20251127-143022").unwrap();
        assert_eq!((timestamp.year(), timestamp.month(), timestamp.day()), (2025, 11, 27));

        let timestamp = parse_backup_timestamp("20251127-143022-456").unwrap();
        assert_eq!(timestamp.timestamp_subsec_millis(), 456);

        assert!(parse_backup_timestamp("20251327-143022").is_none());
        assert!(parse_backup_timestamp("20251127").is_none());
    }
}
