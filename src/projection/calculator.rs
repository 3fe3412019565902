//! Forecast calculation for blank months
//!
//! Given the rows of a year grid and a reference date, fills months that have
//! no recorded amount with an average of previously paid months. Stored data
//! is never modified; the result is a parallel set of display values.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::ProjectionPolicy;
use crate::error::{ExpenseError, ExpenseResult};
use crate::models::{Expense, Money, Month, MonthMap};

/// Where the target year sits relative to the reference date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", content = "month", rename_all = "lowercase")]
pub enum YearPhase {
    Past,
    /// The target year is the current year; carries the current month
    Current(Month),
    Future,
}

impl YearPhase {
    pub fn of(target_year: i32, today: NaiveDate) -> Self {
        match target_year.cmp(&today.year()) {
            std::cmp::Ordering::Less => YearPhase::Past,
            std::cmp::Ordering::Greater => YearPhase::Future,
            std::cmp::Ordering::Equal => {
                // chrono guarantees month() is 1..=12
                let month = Month::from_number(today.month()).unwrap_or(Month::December);
                YearPhase::Current(month)
            }
        }
    }

    /// Months that may be filled with a forecast: the current month onward,
    /// every month of a future year, none of a past year
    pub fn is_forward(&self, month: Month) -> bool {
        match self {
            YearPhase::Past => false,
            YearPhase::Current(current) => month >= *current,
            YearPhase::Future => true,
        }
    }

    /// Months whose paid totals feed the portfolio average: every month of a
    /// past year, months before the current one, none of a future year
    pub fn is_history(&self, month: Month) -> bool {
        match self {
            YearPhase::Past => true,
            YearPhase::Current(current) => month < *current,
            YearPhase::Future => false,
        }
    }
}

/// Input row for the calculator: twelve stored values and twelve paid flags
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectionRow {
    values: MonthMap<Money>,
    paid: MonthMap<bool>,
    projectable: bool,
}

impl ProjectionRow {
    /// Build a row from raw month slices
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` unless both slices hold exactly twelve entries.
    pub fn new(values: &[Money], paid: &[bool], projectable: bool) -> ExpenseResult<Self> {
        let values: [Money; 12] = values.try_into().map_err(|_| {
            ExpenseError::InvalidInput(format!(
                "expected 12 monthly values, got {}",
                values.len()
            ))
        })?;
        let paid: [bool; 12] = paid.try_into().map_err(|_| {
            ExpenseError::InvalidInput(format!("expected 12 paid flags, got {}", paid.len()))
        })?;

        Ok(Self {
            values: MonthMap::from_array(values),
            paid: MonthMap::from_array(paid),
            projectable,
        })
    }

    pub fn from_expense(expense: &Expense) -> Self {
        Self {
            values: expense.monthly_values,
            paid: expense.paid_status,
            projectable: expense.projectable,
        }
    }

    /// Average of the values of all paid months, if any month is paid
    pub fn paid_average(&self) -> Option<Money> {
        let paid: Vec<Money> = self
            .values
            .iter()
            .filter(|(month, _)| self.paid[*month])
            .map(|(_, value)| *value)
            .collect();

        Money::average(paid.iter().sum(), paid.len())
    }
}

impl From<&Expense> for ProjectionRow {
    fn from(expense: &Expense) -> Self {
        Self::from_expense(expense)
    }
}

/// Display values for one row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowProjection {
    pub display: MonthMap<Money>,
    /// Whether each display value is a forecast rather than a stored amount
    pub projected: MonthMap<bool>,
    /// The row's own paid-month average, when it was used
    pub average: Option<Money>,
}

impl RowProjection {
    fn actual(row: &ProjectionRow) -> Self {
        Self {
            display: row.values,
            projected: MonthMap::filled(false),
            average: None,
        }
    }

    /// Sum of the twelve display values
    pub fn total(&self) -> Money {
        self.display.values().sum()
    }

    pub fn has_projection(&self) -> bool {
        self.projected.values().any(|p| *p)
    }
}

/// Result of a projection over a whole year grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Projection {
    pub policy: ProjectionPolicy,
    pub phase: YearPhase,
    /// One entry per input row, in input order
    pub rows: Vec<RowProjection>,
    /// Column totals of display values
    pub month_totals: MonthMap<Money>,
    /// Whether each column total contains a forecast
    pub month_projected: MonthMap<bool>,
    /// Average used by the portfolio policy
    pub portfolio_average: Option<Money>,
}

impl Projection {
    /// Sum of the twelve column totals
    pub fn grand_total(&self) -> Money {
        self.month_totals.values().sum()
    }

    pub fn is_active(&self) -> bool {
        self.month_projected.values().any(|p| *p)
    }
}

/// Computes display values for a year grid under one policy
#[derive(Debug, Clone, Copy)]
pub struct ProjectionCalculator {
    policy: ProjectionPolicy,
    today: NaiveDate,
}

impl ProjectionCalculator {
    pub fn new(policy: ProjectionPolicy, today: NaiveDate) -> Self {
        Self { policy, today }
    }

    pub fn policy(&self) -> ProjectionPolicy {
        self.policy
    }

    /// Project `rows` belonging to `target_year`
    pub fn project(&self, target_year: i32, rows: &[ProjectionRow]) -> Projection {
        let phase = YearPhase::of(target_year, self.today);

        match self.policy {
            ProjectionPolicy::Off => self.actual_only(phase, rows),
            ProjectionPolicy::PerRow => self.per_row(phase, rows),
            ProjectionPolicy::Portfolio => self.portfolio(phase, rows),
        }
    }

    fn actual_only(&self, phase: YearPhase, rows: &[ProjectionRow]) -> Projection {
        let rows: Vec<RowProjection> = rows.iter().map(RowProjection::actual).collect();
        let month_totals = column_totals(&rows);

        Projection {
            policy: self.policy,
            phase,
            rows,
            month_totals,
            month_projected: MonthMap::filled(false),
            portfolio_average: None,
        }
    }

    fn per_row(&self, phase: YearPhase, rows: &[ProjectionRow]) -> Projection {
        let rows: Vec<RowProjection> = rows
            .iter()
            .map(|row| {
                let mut out = RowProjection::actual(row);
                if !row.projectable {
                    return out;
                }

                let Some(average) = row.paid_average() else {
                    return out;
                };

                for month in Month::ALL {
                    if phase.is_forward(month) && row.values[month].is_zero() {
                        out.display[month] = average;
                        out.projected[month] = true;
                    }
                }
                out.average = Some(average);
                out
            })
            .collect();

        let month_totals = column_totals(&rows);
        let month_projected =
            MonthMap::from_fn(|month| rows.iter().any(|row| row.projected[month]));

        Projection {
            policy: self.policy,
            phase,
            rows,
            month_totals,
            month_projected,
            portfolio_average: None,
        }
    }

    fn portfolio(&self, phase: YearPhase, rows: &[ProjectionRow]) -> Projection {
        let paid_totals = MonthMap::from_fn(|month| {
            rows.iter()
                .filter(|row| row.paid[month])
                .map(|row| row.values[month])
                .sum::<Money>()
        });

        let history: Vec<Money> = paid_totals
            .iter()
            .filter(|(month, total)| phase.is_history(*month) && total.is_positive())
            .map(|(_, total)| *total)
            .collect();
        let average = Money::average(history.iter().sum(), history.len());

        let row_projections: Vec<RowProjection> = rows.iter().map(RowProjection::actual).collect();
        let mut month_totals = column_totals(&row_projections);
        let mut month_projected = MonthMap::filled(false);

        if let Some(average) = average.filter(Money::is_positive) {
            for month in Month::ALL {
                if phase.is_forward(month) && month_totals[month].is_zero() {
                    month_totals[month] = average;
                    month_projected[month] = true;
                }
            }
        }

        Projection {
            policy: self.policy,
            phase,
            rows: row_projections,
            month_totals,
            month_projected,
            portfolio_average: average,
        }
    }
}

fn column_totals(rows: &[RowProjection]) -> MonthMap<Money> {
    MonthMap::from_fn(|month| rows.iter().map(|row| row.display[month]).sum())
}
