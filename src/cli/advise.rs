//! Advisor CLI command

use clap::Args;

use crate::advisor::{render_prompt, AdviceRequest};
use crate::config::settings::Settings;
use crate::error::ExpenseResult;
use crate::services::ExpenseService;
use crate::storage::Storage;

/// Arguments of `expgrid advise`
#[derive(Args)]
pub struct AdviseArgs {
    #[arg(short, long)]
    pub year: Option<i32>,
    /// Describe yourself (profession, income, goals); overrides the saved profile
    #[arg(short, long)]
    pub profile: Option<String>,
    /// Print the prompt instead of calling the model
    #[arg(long)]
    pub prompt_only: bool,
}

/// Handle the advise command
pub fn handle_advise_command(storage: &Storage, settings: &Settings, args: AdviseArgs) -> ExpenseResult<()> {
    let year = settings.year_or_selected(args.year);
    let expenses = ExpenseService::new(storage).list_active(year)?;
    let profile = args.profile.or_else(|| settings.advisor.user_profile.clone());

    let request = AdviceRequest::from_expenses(year, &expenses, profile)?;

    if args.prompt_only {
        print!("{}", render_prompt(&request));
        return Ok(());
    }

    let advice = generate(settings, &request)?;
    println!("Advice for {}", year);
    println!();
    println!("{}", advice);
    Ok(())
}

#[cfg(feature = "gemini")]
fn generate(settings: &Settings, request: &AdviceRequest) -> ExpenseResult<String> {
    use crate::advisor::{request_advice, GeminiAdvisor};
    use crate::error::ExpenseError;

    let advisor = GeminiAdvisor::from_settings(&settings.advisor)?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| ExpenseError::Advisor(format!("Failed to start runtime: {}", e)))?;

    runtime.block_on(request_advice(&advisor, request))
}

#[cfg(not(feature = "gemini"))]
fn generate(_settings: &Settings, _request: &AdviceRequest) -> ExpenseResult<String> {
    Err(crate::error::ExpenseError::Config(
        "This build has no advisor backend; rebuild with --features gemini or use --prompt-only"
            .to_string(),
    ))
}
