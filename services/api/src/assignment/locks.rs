//! Per-period run exclusion.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use ims_id::PeriodId;
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// Registry of one async lock per period.
///
/// Holding the guard returned by [`PeriodLocks::acquire`] means no other run
/// for that period is in progress in this process. Callers for the same
/// period queue up; different periods never block each other.
#[derive(Clone, Default)]
pub struct PeriodLocks {
    locks: Arc<Mutex<HashMap<PeriodId, Arc<AsyncMutex<()>>>>>,
}

impl PeriodLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait until the period is free and claim it.
    pub async fn acquire(&self, period_id: PeriodId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            // Drop entries nobody holds or waits on.
            locks.retain(|id, lock| *id == period_id || Arc::strong_count(lock) > 1);
            locks.entry(period_id).or_default().clone()
        };
        lock.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[tokio::test]
    async fn test_same_period_waits_for_release() {
        let locks = PeriodLocks::new();
        let period_id = PeriodId::new();

        let guard = locks.acquire(period_id).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(period_id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        tokio::time::timeout(Duration::from_secs(1), waiter)
            .await
            .expect("waiter should acquire after release")
            .unwrap();

        let again = tokio::time::timeout(Duration::from_millis(100), locks.acquire(period_id)).await;
        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn test_released_periods_are_pruned() {
        let locks = PeriodLocks::new();
        let stale = PeriodId::new();
        drop(locks.acquire(stale).await);

        let _current = locks.acquire(PeriodId::new()).await;
        let registry = locks.locks.lock().unwrap();
        assert_eq!(registry.len(), 1);
        assert!(!registry.contains_key(&stale));
    }

    #[tokio::test]
    async fn test_different_periods_do_not_block() {
        let locks = PeriodLocks::new();
        let _first = locks.acquire(PeriodId::new()).await;

        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(PeriodId::new())).await;
        assert!(second.is_ok());
    }
}
