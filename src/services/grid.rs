//! Grid service
//!
//! Assembles the active rows of a year with their forecast display values.

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::ExpenseResult;
use crate::models::{Expense, Money, MonthMap};
use crate::projection::{
    ProjectionCalculator, ProjectionPolicy, ProjectionRow, RowProjection, YearPhase,
};
use crate::storage::{ExpenseFilter, Storage};

/// One grid line: the stored row plus what the grid shows for it
#[derive(Debug, Clone, Serialize)]
pub struct GridRow {
    pub expense: Expense,
    #[serde(flatten)]
    pub projection: RowProjection,
}

/// A year grid ready for display or export
#[derive(Debug, Clone, Serialize)]
pub struct YearGrid {
    pub year: i32,
    pub policy: ProjectionPolicy,
    pub phase: YearPhase,
    pub rows: Vec<GridRow>,
    pub month_totals: MonthMap<Money>,
    pub month_projected: MonthMap<bool>,
    /// Sum of the stored values of paid cells, per month
    pub paid_totals: MonthMap<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub portfolio_average: Option<Money>,
}

impl YearGrid {
    pub fn grand_total(&self) -> Money {
        self.month_totals.values().sum()
    }

    pub fn paid_total(&self) -> Money {
        self.paid_totals.values().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Service building year grids
pub struct GridService<'a> {
    storage: &'a Storage,
    today: NaiveDate,
}

impl<'a> GridService<'a> {
    /// Grid service using the local date as the reference date
    pub fn new(storage: &'a Storage) -> Self {
        Self::with_today(storage, chrono::Local::now().date_naive())
    }

    /// Grid service with a fixed reference date
    pub fn with_today(storage: &'a Storage, today: NaiveDate) -> Self {
        Self { storage, today }
    }

    /// Build the grid of active rows for `year`
    pub fn year_grid(&self, year: i32, policy: ProjectionPolicy) -> ExpenseResult<YearGrid> {
        let expenses = self.storage.expenses.query(ExpenseFilter::active(year))?;
        let inputs: Vec<ProjectionRow> = expenses.iter().map(ProjectionRow::from).collect();

        let projection = ProjectionCalculator::new(policy, self.today).project(year, &inputs);
        log::debug!(
            "Built {} grid for {} with {} rows ({:?})",
            policy,
            year,
            expenses.len(),
            projection.phase
        );

        let paid_totals: MonthMap<Money> = MonthMap::from_fn(|month| {
            expenses
                .iter()
                .filter(|e| e.is_paid(month))
                .map(|e| e.value(month))
                .sum()
        });

        let rows = expenses
            .into_iter()
            .zip(projection.rows)
            .map(|(expense, projection)| GridRow {
                expense,
                projection,
            })
            .collect();

        Ok(YearGrid {
            year,
            policy: projection.policy,
            phase: projection.phase,
            rows,
            month_totals: projection.month_totals,
            month_projected: projection.month_projected,
            paid_totals,
            portfolio_average: projection.portfolio_average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::paths::GridPaths;
    use crate::models::Month;
    use tempfile::TempDir;

    fn create_test_storage() -> (TempDir, Storage) {
        let temp_dir = TempDir::new().unwrap();
        let paths = GridPaths::with_base_dir(temp_dir.path().to_path_buf());
        let mut storage = Storage::new(paths).unwrap();
        storage.load_all().unwrap();
        (temp_dir, storage)
    }

    fn april_2025() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 4, 10).unwrap()
    }

    #[test]
    fn test_per_row_grid() {
        let (_temp, storage) = create_test_storage();

        let mut power = Expense::recurring(2025, 10, "Power", Money::zero());
        power.projectable = true;
        power.set_value(Month::January, Money::from_units(120));
        power.set_paid(Month::January, true);
        power.set_value(Month::March, Money::from_units(180));
        power.set_paid(Month::March, true);
        storage.expenses.upsert(power).unwrap();

        let mut gym = Expense::recurring(2025, 1, "Gym", Money::from_units(40));
        gym.archive();
        storage.expenses.upsert(gym).unwrap();

        let grid = GridService::with_today(&storage, april_2025())
            .year_grid(2025, ProjectionPolicy::PerRow)
            .unwrap();

        assert_eq!(grid.rows.len(), 1);
        let row = &grid.rows[0];
        assert_eq!(row.projection.average, Some(Money::from_units(150)));
        assert!(!row.projection.projected[Month::February]);
        assert!(row.projection.projected[Month::April]);
        assert_eq!(row.projection.display[Month::December], Money::from_units(150));

        assert_eq!(grid.paid_total(), Money::from_units(300));
        assert_eq!(grid.grand_total(), Money::from_units(300 + 150 * 9));
        assert_eq!(grid.phase, YearPhase::Current(Month::April));
    }

    #[test]
    fn test_off_policy_shows_stored_values() {
        let (_temp, storage) = create_test_storage();
        let mut power = Expense::recurring(2025, 10, "Power", Money::zero());
        power.projectable = true;
        power.set_value(Month::January, Money::from_units(100));
        power.set_paid(Month::January, true);
        storage.expenses.upsert(power).unwrap();

        let grid = GridService::with_today(&storage, april_2025())
            .year_grid(2025, ProjectionPolicy::Off)
            .unwrap();

        assert_eq!(grid.grand_total(), Money::from_units(100));
        assert!(!grid.month_projected.values().any(|p| *p));
    }

    #[test]
    fn test_empty_year() {
        let (_temp, storage) = create_test_storage();
        let grid = GridService::with_today(&storage, april_2025())
            .year_grid(2030, ProjectionPolicy::Portfolio)
            .unwrap();

        assert!(grid.is_empty());
        assert_eq!(grid.grand_total(), Money::zero());
        assert_eq!(grid.phase, YearPhase::Future);
    }
}
