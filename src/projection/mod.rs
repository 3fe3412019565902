//! Spending projections
//!
//! Forecasts blank months of a year grid from previously paid months. Two
//! policies are available and exactly one is active at a time:
//!
//! - `PerRow`: each `projectable` row averages its own paid months and fills
//!   its blank forward months with that average.
//! - `Portfolio`: paid totals of past months are averaged across all rows and
//!   fill forward months whose column total is zero.
//!
//! ```rust
//! use chrono::NaiveDate;
//! use expense_grid::models::Money;
//! use expense_grid::projection::{ProjectionCalculator, ProjectionPolicy, ProjectionRow};
//!
//! let mut values = [Money::zero(); 12];
//! values[0] = Money::from_units(120);
//! values[2] = Money::from_units(180);
//! let mut paid = [false; 12];
//! paid[0] = true;
//! paid[2] = true;
//!
//! let row = ProjectionRow::new(&values, &paid, true).unwrap();
//! let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
//! let projection = ProjectionCalculator::new(ProjectionPolicy::PerRow, today).project(2025, &[row]);
//! assert_eq!(projection.rows[0].average, Some(Money::from_units(150)));
//! ```

mod calculator;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use calculator::{Projection, ProjectionCalculator, ProjectionRow, RowProjection, YearPhase};

/// Which forecast policy the grid applies
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum ProjectionPolicy {
    /// Average of each projectable row's own paid months
    #[default]
    PerRow,
    /// Average of paid column totals across all rows
    Portfolio,
    /// Show stored values only
    Off,
}

impl fmt::Display for ProjectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProjectionPolicy::PerRow => write!(f, "per-row"),
            ProjectionPolicy::Portfolio => write!(f, "portfolio"),
            ProjectionPolicy::Off => write!(f, "off"),
        }
    }
}
