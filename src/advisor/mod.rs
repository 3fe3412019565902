//! Financial advice from a text generator
//!
//! The active rows of a year are serialized into an [`AdviceRequest`] and
//! handed to an [`AdviceGenerator`]. Whatever goes wrong inside the generator,
//! callers only see a generic advisor error; the cause is logged.

#[cfg(feature = "gemini")]
mod gemini;
mod prompt;

#[cfg(feature = "gemini")]
pub use gemini::GeminiAdvisor;
pub use prompt::render_prompt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, MonthMap};

/// Message shown for any generator failure
pub const GENERIC_FAILURE: &str = "Could not generate advice. Please try again later.";

/// Input of one advice generation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdviceRequest {
    pub year: i32,
    /// JSON array of `{ "description", "monthlyValues" }`, amounts in currency units
    pub expense_data: String,
    /// Free-text description of the user (profession, income, goals)
    pub user_profile: Option<String>,
}

#[derive(Serialize)]
struct ExpenseLine<'a> {
    description: &'a str,
    #[serde(rename = "monthlyValues")]
    monthly_values: MonthMap<f64>,
}

impl AdviceRequest {
    /// Serialize `expenses` into a request
    ///
    /// # Errors
    ///
    /// Returns `Advisor` when there are no rows to analyze.
    pub fn from_expenses(
        year: i32,
        expenses: &[Expense],
        user_profile: Option<String>,
    ) -> ExpenseResult<Self> {
        if expenses.is_empty() {
            return Err(ExpenseError::Advisor(format!(
                "No expense data to analyze for {}",
                year
            )));
        }

        let lines: Vec<ExpenseLine<'_>> = expenses
            .iter()
            .map(|e| ExpenseLine {
                description: &e.description,
                monthly_values: e.monthly_values.map(|v| v.as_f64()),
            })
            .collect();

        Ok(Self {
            year,
            expense_data: serde_json::to_string(&lines)?,
            user_profile,
        })
    }
}

/// Something that turns an advice request into advice text
#[async_trait]
pub trait AdviceGenerator: Send + Sync {
    async fn generate(&self, request: &AdviceRequest) -> ExpenseResult<String>;
}

/// Run a generator, collapsing every failure into a generic advisor error
pub async fn request_advice(
    generator: &dyn AdviceGenerator,
    request: &AdviceRequest,
) -> ExpenseResult<String> {
    if let Err(e) = serde_json::from_str::<serde_json::Value>(&request.expense_data) {
        log::error!("Advice request carries malformed expense data: {}", e);
        return Err(ExpenseError::Advisor(GENERIC_FAILURE.to_string()));
    }

    match generator.generate(request).await {
        Ok(advice) if !advice.trim().is_empty() => Ok(advice.trim().to_string()),
        Ok(_) => {
            log::error!("Advice generator returned an empty response");
            Err(ExpenseError::Advisor(GENERIC_FAILURE.to_string()))
        }
        Err(e) => {
            log::error!("Advice generation failed: {}", e);
            Err(ExpenseError::Advisor(GENERIC_FAILURE.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Money, Month};
    use std::sync::Mutex;

    struct Canned {
        reply: ExpenseResult<String>,
        seen: Mutex<Vec<AdviceRequest>>,
    }

    impl Canned {
        fn new(reply: ExpenseResult<String>) -> Self {
            Self {
                reply,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl AdviceGenerator for Canned {
        async fn generate(&self, request: &AdviceRequest) -> ExpenseResult<String> {
            self.seen.lock().unwrap().push(request.clone());
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(e) => Err(ExpenseError::Advisor(e.to_string())),
            }
        }
    }

    fn sample_rows() -> Vec<Expense> {
        let mut rent = Expense::recurring(2025, 5, "Rent", Money::from_cents(90050));
        rent.set_value(Month::December, Money::zero());
        vec![rent]
    }

    #[test]
    fn test_request_serializes_units() {
        let request = AdviceRequest::from_expenses(2025, &sample_rows(), None).unwrap();
        let data: serde_json::Value = serde_json::from_str(&request.expense_data).unwrap();

        assert_eq!(data[0]["description"], "Rent");
        assert_eq!(data[0]["monthlyValues"]["january"], 900.5);
        assert_eq!(data[0]["monthlyValues"]["december"], 0.0);
        assert_eq!(data[0]["monthlyValues"].as_object().unwrap().len(), 12);
    }

    #[test]
    fn test_request_requires_rows() {
        let err = AdviceRequest::from_expenses(2025, &[], None).unwrap_err();
        assert!(matches!(err, ExpenseError::Advisor(_)));
    }

    #[tokio::test]
    async fn test_request_advice_passes_request_through() {
        let generator = Canned::new(Ok("  Cut the gym.\n".to_string()));
        let request =
            AdviceRequest::from_expenses(2025, &sample_rows(), Some("Teacher".into())).unwrap();

        let advice = request_advice(&generator, &request).await.unwrap();
        assert_eq!(advice, "Cut the gym.");
        assert_eq!(generator.seen.lock().unwrap()[0], request);
    }

    #[tokio::test]
    async fn test_failures_are_generic() {
        let request = AdviceRequest::from_expenses(2025, &sample_rows(), None).unwrap();

        let failing = Canned::new(Err(ExpenseError::Io("connection reset".into())));
        let err = request_advice(&failing, &request).await.unwrap_err();
        assert_eq!(err.to_string(), format!("Advisor error: {}", GENERIC_FAILURE));

        let empty = Canned::new(Ok(String::new()));
        assert!(request_advice(&empty, &request).await.is_err());
    }

    #[tokio::test]
    async fn test_malformed_data_never_reaches_generator() {
        let generator = Canned::new(Ok("advice".into()));
        let request = AdviceRequest {
            year: 2025,
            expense_data: "not json".into(),
            user_profile: None,
        };

        assert!(request_advice(&generator, &request).await.is_err());
        assert!(generator.seen.lock().unwrap().is_empty());
    }
}
