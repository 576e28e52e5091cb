//! Balance read cache using Moka.
//!
//! A read accelerator in front of the account store, never the system of
//! record. Entries expire after the configured TTL (300 seconds by
//! default) and every balance mutation invalidates the affected entry
//! after its transaction commits. Nothing writes the cache while a
//! database transaction is still open, so a rollback cannot leave a
//! stale balance behind.

use moka::sync::Cache;
use remit_shared::types::AccountId;
use rust_decimal::Decimal;
use std::time::Duration;

/// Default cache capacity (number of accounts).
const DEFAULT_CACHE_CAPACITY: u64 = 10_000;

/// Default time-to-live for cached balances (5 minutes).
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache of account balances keyed by account id.
///
/// Thread-safe and cheap to clone; clones share the same underlying cache.
#[derive(Clone)]
pub struct BalanceCache {
    cache: Cache<AccountId, Decimal>,
}

impl BalanceCache {
    /// Creates a new balance cache with default settings.
    ///
    /// Default: 10,000 entries max, 5 minute TTL.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CACHE_CAPACITY, DEFAULT_TTL_SECS)
    }

    /// Creates a new balance cache with custom configuration.
    ///
    /// # Arguments
    ///
    /// * `max_capacity` - Maximum number of entries to cache
    /// * `ttl_secs` - Time-to-live in seconds for each entry
    #[must_use]
    pub fn with_config(max_capacity: u64, ttl_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_live(Duration::from_secs(ttl_secs))
            .build();

        Self { cache }
    }

    /// Returns the cached balance for an account, if present and fresh.
    #[must_use]
    pub fn get(&self, account_id: AccountId) -> Option<Decimal> {
        self.cache.get(&account_id)
    }

    /// Stores a balance read from the backing store.
    ///
    /// Only call this with a committed value; in-flight transaction state
    /// must go through `invalidate` instead.
    pub fn set(&self, account_id: AccountId, balance: Decimal) {
        self.cache.insert(account_id, balance);
    }

    /// Drops the cached balance for an account.
    ///
    /// Called after a mutation commits; the next read repopulates lazily.
    pub fn invalidate(&self, account_id: AccountId) {
        self.cache.invalidate(&account_id);
    }

    /// Returns the number of entries currently in the cache.
    #[must_use]
    pub fn entry_count(&self) -> u64 {
        self.cache.entry_count()
    }

    /// Runs cache maintenance tasks.
    ///
    /// Moka handles expiry in the background; calling this explicitly
    /// makes `entry_count` exact, which the tests rely on.
    pub fn run_pending_tasks(&self) {
        self.cache.run_pending_tasks();
    }
}

impl Default for BalanceCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn acct() -> AccountId {
        AccountId::new()
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = BalanceCache::new();
        let account = acct();

        assert_eq!(cache.get(account), None);

        cache.set(account, dec!(500));
        assert_eq!(cache.get(account), Some(dec!(500)));
        // Repeated reads within the TTL return the identical value.
        assert_eq!(cache.get(account), Some(dec!(500)));
    }

    #[test]
    fn test_set_overwrites() {
        let cache = BalanceCache::new();
        let account = acct();

        cache.set(account, dec!(100));
        cache.set(account, dec!(250));
        assert_eq!(cache.get(account), Some(dec!(250)));
    }

    #[test]
    fn test_invalidate_drops_entry() {
        let cache = BalanceCache::new();
        let account = acct();
        let other = acct();

        cache.set(account, dec!(100));
        cache.set(other, dec!(200));

        cache.invalidate(account);
        cache.run_pending_tasks();

        assert_eq!(cache.get(account), None);
        assert_eq!(cache.get(other), Some(dec!(200)));
    }

    #[test]
    fn test_entries_are_per_account() {
        let cache = BalanceCache::new();
        let a = acct();
        let b = acct();

        cache.set(a, dec!(1));
        cache.set(b, dec!(2));

        assert_eq!(cache.get(a), Some(dec!(1)));
        assert_eq!(cache.get(b), Some(dec!(2)));
    }

    #[test]
    fn test_entry_count() {
        let cache = BalanceCache::with_config(10, 60);

        cache.set(acct(), dec!(1));
        cache.set(acct(), dec!(2));
        cache.run_pending_tasks();

        assert_eq!(cache.entry_count(), 2);
    }

    #[test]
    fn test_default_impl() {
        let cache = BalanceCache::default();
        assert_eq!(cache.get(acct()), None);
    }
}
