//! Backup system for expense-grid
//!
//! Rolling JSON backups of the expense store and settings, with a retention
//! policy and restore.
//!
//! # Retention Policy
//!
//! By default the system keeps 30 daily backups and 12 monthly backups (the
//! oldest backup of each calendar month). A backup is always taken before a
//! year is reset.
//!
//! ```rust,ignore
//! let manager = BackupManager::new(paths.clone(), settings.backup_retention.clone());
//! let (backup_path, _pruned) = manager.create_backup_with_retention()?;
//!
//! let result = RestoreManager::new(paths).restore_from_file(&backup_path)?;
//! println!("{}", result.summary());
//! ```

mod manager;
mod restore;

pub use manager::{BackupArchive, BackupInfo, BackupManager};
pub use restore::{RestoreManager, RestoreResult, ValidationResult};
