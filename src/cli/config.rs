//! Configuration CLI command

use clap::Args;

use crate::config::paths::GridPaths;
use crate::config::settings::Settings;
use crate::error::ExpenseResult;
use crate::projection::ProjectionPolicy;
use crate::storage::Storage;

/// Arguments of `expgrid config`; without flags the current configuration is shown
#[derive(Args, Default)]
pub struct ConfigArgs {
    /// Default forecast policy for the grid
    #[arg(long, value_enum)]
    pub policy: Option<ProjectionPolicy>,
    /// Currency symbol printed before amounts
    #[arg(long)]
    pub currency: Option<String>,
    /// Profile text sent to the advisor
    #[arg(long, conflicts_with = "clear_profile")]
    pub profile: Option<String>,
    /// Forget the saved advisor profile
    #[arg(long)]
    pub clear_profile: bool,
    /// Advisor model name
    #[arg(long)]
    pub model: Option<String>,
    /// Environment variable holding the advisor API key
    #[arg(long)]
    pub api_key_env: Option<String>,
}

impl ConfigArgs {
    fn apply(self, settings: &mut Settings) -> bool {
        let mut changed = false;
        if let Some(policy) = self.policy {
            settings.projection_policy = policy;
            changed = true;
        }
        if let Some(currency) = self.currency {
            settings.currency_symbol = currency;
            changed = true;
        }
        if let Some(profile) = self.profile {
            settings.advisor.user_profile = Some(profile);
            changed = true;
        }
        if self.clear_profile {
            settings.advisor.user_profile = None;
            changed = true;
        }
        if let Some(model) = self.model {
            settings.advisor.model = model;
            changed = true;
        }
        if let Some(var) = self.api_key_env {
            settings.advisor.api_key_env = var;
            changed = true;
        }
        changed
    }
}

/// Show or update the configuration
pub fn handle_config_command(
    storage: &Storage,
    paths: &GridPaths,
    settings: &mut Settings,
    args: ConfigArgs,
) -> ExpenseResult<()> {
    let before = settings.clone();
    if args.apply(settings) {
        settings.save(paths)?;
        storage.log_settings_update(&before, settings)?;
        println!("Configuration updated.");
        println!();
    }

    println!("expense-grid configuration");
    println!("==========================");
    println!("Base directory:   {}", paths.base_dir().display());
    println!("Expenses file:    {}", paths.expenses_file().display());
    println!("Backup directory: {}", paths.backup_dir().display());
    println!();
    println!("Selected year:     {}", settings.effective_year());
    println!("Projection policy: {}", settings.projection_policy);
    println!("Currency symbol:   {}", settings.currency_symbol);
    println!(
        "Backup retention:  {} daily, {} monthly",
        settings.backup_retention.daily_count, settings.backup_retention.monthly_count
    );
    println!("Advisor model:     {}", settings.advisor.model);
    println!("Advisor key var:   {}", settings.advisor.api_key_env);
    println!(
        "Advisor profile:   {}",
        settings.advisor.user_profile.as_deref().unwrap_or("(none)")
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_apply() {
        let mut settings = Settings::default();
        assert!(!ConfigArgs::default().apply(&mut settings));

        let args = ConfigArgs {
            policy: Some(ProjectionPolicy::Portfolio),
            profile: Some("Engineer".into()),
            ..ConfigArgs::default()
        };
        assert!(args.apply(&mut settings));
        assert_eq!(settings.projection_policy, ProjectionPolicy::Portfolio);
        assert_eq!(settings.advisor.user_profile.as_deref(), Some("Engineer"));

        let args = ConfigArgs {
            clear_profile: true,
            ..ConfigArgs::default()
        };
        assert!(args.apply(&mut settings));
        assert!(settings.advisor.user_profile.is_none());
    }
}
