//! Advisor prompt template

use super::AdviceRequest;

const NO_PROFILE: &str = "The user has not provided any additional information.";

/// Render the instruction text sent to the text generator
pub fn render_prompt(request: &AdviceRequest) -> String {
    let profile = request
        .user_profile
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .unwrap_or(NO_PROFILE);

    format!(
        "You are a personal finance advisor. Analyze the provided expense data for the year {year} \
and provide personalized advice to the user.\n\
\n\
Consider any anomalies or unusual spending patterns.\n\
\n\
Here's some additional information about the user:\n\
{profile}\n\
\n\
The expense data is provided as a JSON array:\n\
{data}\n\
\n\
Based on this data, provide clear and actionable advice to help the user better manage their \
finances. Focus on anomaly detection and advice generation.\n\
Do not start with a greeting, and do not act as a chatbot.\n\
Be concise.\n",
        year = request.year,
        profile = profile,
        data = request.expense_data,
    )
}
