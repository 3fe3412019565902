//! Change feed for filtered expense queries
//!
//! A subscriber registers a callback against an `ExpenseFilter`. It receives
//! the current matching rows immediately, then a fresh snapshot after every
//! commit to the store, until it unsubscribes. Snapshots carry a sequence
//! number that increases with every commit, so consumers can tell them apart
//! and order them.
//!
//! ```rust,ignore
//! let id = storage.subscribe(ExpenseFilter::active(2025), |snapshot| {
//!     println!("#{}: {} rows", snapshot.sequence, snapshot.expenses.len());
//! })?;
//! // ... mutations through the services ...
//! storage.unsubscribe(id)?;
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};

use crate::error::ExpenseError;
use crate::models::{Expense, SubscriptionId};

use super::expenses::ExpenseFilter;

/// Rows matching a subscription at one point in time
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// Commit counter at the time the snapshot was taken
    pub sequence: u64,
    /// Matching rows in grid order
    pub expenses: Vec<Expense>,
}

type Callback = Arc<dyn Fn(&Snapshot) + Send + Sync>;

struct Subscription {
    id: SubscriptionId,
    filter: ExpenseFilter,
    callback: Callback,
}

/// Registry of snapshot subscribers
#[derive(Default)]
pub struct ExpenseFeed {
    subscriptions: RwLock<Vec<Subscription>>,
    sequence: AtomicU64,
}

impl ExpenseFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback and deliver the initial snapshot built from `current`
    pub fn subscribe<F>(
        &self,
        filter: ExpenseFilter,
        callback: F,
        current: &[Expense],
    ) -> Result<SubscriptionId, ExpenseError>
    where
        F: Fn(&Snapshot) + Send + Sync + 'static,
    {
        let id = SubscriptionId::new();
        let callback: Callback = Arc::new(callback);

        {
            let mut subs = self.subscriptions.write().map_err(|e| {
                ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
            })?;
            subs.push(Subscription {
                id,
                filter,
                callback: Arc::clone(&callback),
            });
        }

        log::debug!("Subscription {} added for year {}", id, filter.year);
        callback(&self.snapshot(filter, current));
        Ok(id)
    }

    /// Remove a subscription; returns false if it was not registered
    pub fn unsubscribe(&self, id: SubscriptionId) -> Result<bool, ExpenseError> {
        let mut subs = self.subscriptions.write().map_err(|e| {
            ExpenseError::Storage(format!("Failed to acquire write lock: {}", e))
        })?;

        let before = subs.len();
        subs.retain(|s| s.id != id);
        let removed = subs.len() != before;
        if removed {
            log::debug!("Subscription {} removed", id);
        }
        Ok(removed)
    }

    /// Advance the commit counter and push a snapshot to every subscriber
    ///
    /// Callbacks run after the registry lock is released, so they may
    /// subscribe or unsubscribe themselves.
    pub fn publish(&self, all: &[Expense]) -> Result<(), ExpenseError> {
        self.sequence.fetch_add(1, Ordering::SeqCst);

        let targets: Vec<(ExpenseFilter, Callback)> = {
            let subs = self.subscriptions.read().map_err(|e| {
                ExpenseError::Storage(format!("Failed to acquire read lock: {}", e))
            })?;
            subs.iter()
                .map(|s| (s.filter, Arc::clone(&s.callback)))
                .collect()
        };

        for (filter, callback) in targets {
            callback(&self.snapshot(filter, all));
        }
        Ok(())
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.read().map(|s| s.len()).unwrap_or(0)
    }

    fn snapshot(&self, filter: ExpenseFilter, all: &[Expense]) -> Snapshot {
        let mut expenses: Vec<Expense> =
            all.iter().filter(|e| filter.matches(e)).cloned().collect();
        expenses.sort_by(Expense::grid_order);

        Snapshot {
            sequence: self.sequence.load(Ordering::SeqCst),
            expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Money;
    use std::sync::Mutex;

    fn collector() -> (Arc<Mutex<Vec<Snapshot>>>, impl Fn(&Snapshot) + Send + Sync) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |s: &Snapshot| sink.lock().unwrap().push(s.clone()))
    }

    #[test]
    fn test_initial_snapshot_is_filtered_and_ordered() {
        let feed = ExpenseFeed::new();
        let rows = vec![
            Expense::recurring(2025, 20, "Water", Money::zero()),
            Expense::recurring(2025, 5, "Rent", Money::zero()),
            Expense::recurring(2024, 1, "Old", Money::zero()),
        ];

        let (seen, callback) = collector();
        feed.subscribe(ExpenseFilter::active(2025), callback, &rows)
            .unwrap();

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 1);
        let names: Vec<_> = seen[0].expenses.iter().map(|e| e.description.as_str()).collect();
        assert_eq!(names, vec!["Rent", "Water"]);
    }

    #[test]
    fn test_publish_increments_sequence() {
        let feed = ExpenseFeed::new();
        let (seen, callback) = collector();
        feed.subscribe(ExpenseFilter::active(2025), callback, &[]).unwrap();

        let rows = vec![Expense::recurring(2025, 1, "Rent", Money::zero())];
        feed.publish(&rows).unwrap();
        feed.publish(&rows).unwrap();

        let seen = seen.lock().unwrap();
        let sequences: Vec<u64> = seen.iter().map(|s| s.sequence).collect();
        assert_eq!(sequences, vec![0, 1, 2]);
        assert_eq!(seen[2].expenses.len(), 1);
    }

    #[test]
    fn test_unsubscribe_stops_delivery() {
        let feed = ExpenseFeed::new();
        let (seen, callback) = collector();
        let id = feed.subscribe(ExpenseFilter::any(2025), callback, &[]).unwrap();

        assert!(feed.unsubscribe(id).unwrap());
        assert!(!feed.unsubscribe(id).unwrap());
        feed.publish(&[]).unwrap();

        assert_eq!(seen.lock().unwrap().len(), 1);
        assert_eq!(feed.subscriber_count(), 0);
    }
}
