//! The velocity ledger: process-wide rolling aggregates and the
//! check-then-commit admission scope.
//!
//! The ledger is the only mutable state in the system. It is constructed
//! once at process start, shared by reference, and mutated exclusively by
//! committing accepted loads. Buckets are created lazily and never evicted.
//!
//! # Concurrency
//!
//! Every account (one per customer, plus the reserved prime account) lives
//! behind its own mutex. An admission transaction locks the candidate's
//! customer account, and additionally the prime account when the candidate
//! is prime-identified, before any rule reads, and releases both only after
//! the commit (or the reject). Acquisition order is always customer first,
//! prime second: the prime lock is only ever taken by a thread already
//! holding its own (distinct) customer lock, and no thread waits on a
//! customer lock while holding the prime lock, so no cycle can form.

use crate::application::ports::Storage;
use crate::domain::buckets::AccountHistory;
use crate::domain::load::{CustomerKey, Load};
use crate::domain::rules::VelocityView;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

/// Internal failure of the ledger's serialization machinery.
///
/// Fatal for the request that hit it. Because both appends of a prime
/// commit happen under locks acquired before any rule read, a commit never
/// applies partially.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageFault {
    account: String,
}

impl StorageFault {
    fn poisoned(key: &CustomerKey) -> Self {
        Self {
            account: key.to_string(),
        }
    }
}

impl fmt::Display for StorageFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "velocity account {:?} is unusable: a writer panicked mid-update",
            self.account
        )
    }
}

impl std::error::Error for StorageFault {}

/// Process-wide mapping of rolling per-customer and per-day aggregates.
///
/// Generic over the storage implementation; in production use the sharded
/// in-memory store. Tests construct a fresh ledger per test instead of
/// clearing shared state.
#[derive(Debug)]
pub struct VelocityLedger<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    store: Arc<S>,
}

impl<S> Clone for VelocityLedger<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S> VelocityLedger<S>
where
    S: Storage<CustomerKey, AccountHistory>,
{
    /// Create an empty ledger over `store`.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// Count of accepted loads for `key` on `date`.
    pub fn daily_count(&self, key: &CustomerKey, date: NaiveDate) -> Result<usize, StorageFault> {
        self.with_account(key, |account| account.daily_count(date))
    }

    /// Sum of raw amounts accepted for `key` on `date`.
    pub fn daily_raw_total(
        &self,
        key: &CustomerKey,
        date: NaiveDate,
    ) -> Result<Decimal, StorageFault> {
        self.with_account(key, |account| account.daily_raw_total(date))
    }

    /// Raw daily total scaled by that weekday's multiplier.
    pub fn daily_weighted_total(
        &self,
        key: &CustomerKey,
        date: NaiveDate,
    ) -> Result<Decimal, StorageFault> {
        self.with_account(key, |account| account.daily_weighted_total(date))
    }

    /// Weighted totals summed over the Monday-through-Sunday week of `date`.
    pub fn weekly_weighted_total(
        &self,
        key: &CustomerKey,
        date: NaiveDate,
    ) -> Result<Decimal, StorageFault> {
        self.with_account(key, |account| account.weekly_weighted_total(date))
    }

    /// Run one admission transaction for `candidate`.
    ///
    /// Locks the candidate's customer account, plus the shared prime
    /// account when the candidate is prime-identified, and keeps both
    /// locked until `f` returns. Rule reads and the commit inside `f`
    /// therefore observe and mutate a single consistent snapshot; two
    /// concurrent candidates for the same bucket serialize here.
    pub fn with_admission<F, R>(&self, candidate: &Load, f: F) -> Result<R, StorageFault>
    where
        F: FnOnce(&mut AdmissionScope<'_>) -> R,
    {
        let customer_key = candidate.customer_key();
        let account_handle = self.store.handle(&customer_key);
        let prime_handle = candidate
            .is_prime
            .then(|| self.store.handle(&CustomerKey::Prime));

        let account = account_handle
            .lock()
            .map_err(|_| StorageFault::poisoned(&customer_key))?;
        let prime = match prime_handle.as_ref() {
            Some(handle) => Some(
                handle
                    .lock()
                    .map_err(|_| StorageFault::poisoned(&CustomerKey::Prime))?,
            ),
            None => None,
        };

        let mut scope = AdmissionScope {
            date: candidate.date(),
            account,
            prime,
        };
        Ok(f(&mut scope))
    }

    /// Commit `load` outside any wider admission transaction.
    ///
    /// Appends the amount to the customer bucket for the load's date, and
    /// to the shared prime bucket for prime-identified loads, atomically.
    /// Admission paths should prefer [`Self::with_admission`], which keeps
    /// the rule reads and the commit under one scope.
    pub fn commit(&self, load: &Load) -> Result<(), StorageFault> {
        self.with_admission(load, |scope| scope.commit(load))
    }

    /// Number of accounts with recorded state.
    pub fn account_count(&self) -> usize {
        self.store.len()
    }

    fn with_account<F, R>(&self, key: &CustomerKey, f: F) -> Result<R, StorageFault>
    where
        F: FnOnce(&AccountHistory) -> R,
    {
        let handle = self.store.handle(key);
        let guard = handle.lock().map_err(|_| StorageFault::poisoned(key))?;
        Ok(f(&guard))
    }
}

/// Exclusive view over the bucket(s) one admission transaction may read
/// and mutate.
///
/// Holds the customer account lock, and the prime account lock for
/// prime-identified candidates, from rule evaluation through commit.
pub struct AdmissionScope<'a> {
    date: NaiveDate,
    account: MutexGuard<'a, AccountHistory>,
    prime: Option<MutexGuard<'a, AccountHistory>>,
}

impl AdmissionScope<'_> {
    /// Record an accepted load in its customer bucket and, when the scope
    /// was opened for a prime-identified candidate, in the shared prime
    /// bucket. Both appends happen under the locks taken at scope
    /// creation, as a single atomic unit.
    pub fn commit(&mut self, load: &Load) {
        self.account.record(self.date, load.amount);
        if let Some(prime) = self.prime.as_mut() {
            prime.record(self.date, load.amount);
        }
    }
}

impl VelocityView for AdmissionScope<'_> {
    fn daily_count(&self) -> usize {
        self.account.daily_count(self.date)
    }

    fn prime_daily_count(&self) -> usize {
        self.prime
            .as_ref()
            .map_or(0, |prime| prime.daily_count(self.date))
    }

    fn daily_weighted_total(&self) -> Decimal {
        self.account.daily_weighted_total(self.date)
    }

    fn weekly_weighted_total(&self) -> Decimal {
        self.account.weekly_weighted_total(self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::rules;
    use crate::infrastructure::storage::ShardedStorage;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn ledger() -> VelocityLedger<ShardedStorage<CustomerKey, AccountHistory>> {
        VelocityLedger::new(Arc::new(ShardedStorage::new()))
    }

    fn load(id: i64, customer_id: i64, amount: Decimal, day: u32) -> Load {
        Load {
            id,
            customer_id,
            amount,
            timestamp: NaiveDate::from_ymd_opt(2025, 7, day)
                .unwrap()
                .and_hms_opt(12, 0, 0)
                .unwrap()
                .and_utc(),
            is_prime: crate::domain::primes::is_prime(id),
        }
    }

    #[test]
    fn test_fresh_ledger_answers_zero() {
        let ledger = ledger();
        let day = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        assert_eq!(ledger.daily_count(&CustomerKey::Customer(1), day).unwrap(), 0);
        assert_eq!(
            ledger.daily_raw_total(&CustomerKey::Prime, day).unwrap(),
            Decimal::ZERO
        );
    }

    #[test]
    fn test_commit_appends_to_customer_bucket() {
        let ledger = ledger();
        let load = load(8, 1, dec!(50.00), 10);
        ledger
            .with_admission(&load, |scope| scope.commit(&load))
            .unwrap();

        let day = load.date();
        assert_eq!(ledger.daily_count(&CustomerKey::Customer(1), day).unwrap(), 1);
        assert_eq!(
            ledger.daily_raw_total(&CustomerKey::Customer(1), day).unwrap(),
            dec!(50.00)
        );
        // Non-prime loads never touch the prime account.
        assert_eq!(ledger.daily_count(&CustomerKey::Prime, day).unwrap(), 0);
    }

    #[test]
    fn test_prime_commit_hits_both_buckets() {
        let ledger = ledger();
        let load = load(7, 1, dec!(12.34), 10);
        assert!(load.is_prime);
        ledger
            .with_admission(&load, |scope| scope.commit(&load))
            .unwrap();

        let day = load.date();
        assert_eq!(ledger.daily_count(&CustomerKey::Customer(1), day).unwrap(), 1);
        assert_eq!(ledger.daily_count(&CustomerKey::Prime, day).unwrap(), 1);
        assert_eq!(
            ledger.daily_raw_total(&CustomerKey::Prime, day).unwrap(),
            dec!(12.34)
        );
    }

    #[test]
    fn test_scope_view_reflects_prior_commits() {
        let ledger = ledger();
        let first = load(8, 1, dec!(3000.00), 10);
        ledger
            .with_admission(&first, |scope| scope.commit(&first))
            .unwrap();

        let second = load(10, 1, dec!(2500.00), 10);
        let decision = ledger
            .with_admission(&second, |scope| rules::evaluate(&second, scope))
            .unwrap();
        assert_eq!(
            decision,
            rules::Decision::Reject(rules::Rule::DailyAmount)
        );
    }

    #[test]
    fn test_weekly_total_through_ledger() {
        let ledger = ledger();
        // Monday the 7th and Thursday the 10th.
        for day in [7, 10] {
            ledger.commit(&load(8, 1, dec!(10.00), day)).unwrap();
        }
        let thursday = NaiveDate::from_ymd_opt(2025, 7, 10).unwrap();
        assert_eq!(
            ledger
                .weekly_weighted_total(&CustomerKey::Customer(1), thursday)
                .unwrap(),
            dec!(30.00)
        );
    }

    #[test]
    fn test_accounts_created_lazily() {
        let ledger = ledger();
        assert_eq!(ledger.account_count(), 0);
        let load = load(8, 1, dec!(1.00), 10);
        ledger
            .with_admission(&load, |scope| scope.commit(&load))
            .unwrap();
        assert_eq!(ledger.account_count(), 1);
    }
}
