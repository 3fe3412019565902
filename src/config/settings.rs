//! User settings for expense-grid
//!
//! Persists the selected year, projection policy, display preferences,
//! backup retention and advisor configuration.

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use super::paths::GridPaths;
use crate::error::ExpenseError;
use crate::projection::ProjectionPolicy;

/// Backup retention settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackupRetention {
    /// Number of daily backups to keep
    pub daily_count: u32,
    /// Number of monthly backups to keep
    pub monthly_count: u32,
}

impl Default for BackupRetention {
    fn default() -> Self {
        Self {
            daily_count: 30,
            monthly_count: 12,
        }
    }
}

/// Text-generation advisor settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvisorSettings {
    /// Model name passed to the provider
    #[serde(default = "default_advisor_model")]
    pub model: String,

    /// Name of the environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Free-text description of the user (profession, income, goals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_profile: Option<String>,
}

impl Default for AdvisorSettings {
    fn default() -> Self {
        Self {
            model: default_advisor_model(),
            api_key_env: default_api_key_env(),
            user_profile: None,
        }
    }
}

fn default_advisor_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_api_key_env() -> String {
    "GEMINI_API_KEY".to_string()
}

/// User settings for expense-grid
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Schema version for migration support
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,

    /// Year shown when a command does not name one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected_year: Option<i32>,

    /// How blank months are forecast in the grid
    #[serde(default)]
    pub projection_policy: ProjectionPolicy,

    /// Currency symbol used when printing amounts
    #[serde(default = "default_currency")]
    pub currency_symbol: String,

    /// Backup retention policy
    #[serde(default)]
    pub backup_retention: BackupRetention,

    #[serde(default)]
    pub advisor: AdvisorSettings,
}

fn default_schema_version() -> u32 {
    1
}

fn default_currency() -> String {
    "$".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            schema_version: default_schema_version(),
            selected_year: None,
            projection_policy: ProjectionPolicy::default(),
            currency_symbol: default_currency(),
            backup_retention: BackupRetention::default(),
            advisor: AdvisorSettings::default(),
        }
    }
}

impl Settings {
    /// The selected year, falling back to the current calendar year
    pub fn effective_year(&self) -> i32 {
        self.selected_year
            .unwrap_or_else(|| chrono::Local::now().year())
    }

    /// Resolve an explicit year argument against the selected year
    pub fn year_or_selected(&self, year: Option<i32>) -> i32 {
        year.unwrap_or_else(|| self.effective_year())
    }

    /// Load settings from disk, or create default settings if file doesn't exist
    pub fn load_or_create(paths: &GridPaths) -> Result<Self, ExpenseError> {
        let settings_path = paths.settings_file();

        if settings_path.exists() {
            let contents = std::fs::read_to_string(&settings_path)
                .map_err(|e| ExpenseError::Io(format!("Failed to read settings file: {}", e)))?;

            let settings: Settings = serde_json::from_str(&contents).map_err(|e| {
                ExpenseError::Config(format!("Failed to parse settings file: {}", e))
            })?;

            Ok(settings)
        } else {
            // Don't save yet - let caller decide when to persist
            Ok(Settings::default())
        }
    }

    /// Save settings to disk
    pub fn save(&self, paths: &GridPaths) -> Result<(), ExpenseError> {
        paths.ensure_directories()?;

        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ExpenseError::Config(format!("Failed to serialize settings: {}", e)))?;

        std::fs::write(paths.settings_file(), contents)
            .map_err(|e| ExpenseError::Io(format!("Failed to write settings file: {}", e)))?;

        Ok(())
    }
}
