use crate::error::{Result, WalletError};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

const DEFAULT_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Per-user mutual exclusion for balance mutation.
///
/// Every read-modify-write of one wallet runs under that user's lock.
/// Acquisition is bounded: exceeding the timeout fails with `Contended`
/// instead of queueing indefinitely.
pub struct LockRegistry {
    locks: Mutex<HashMap<Uuid, Arc<Mutex<()>>>>,
    acquire_timeout: Duration,
}

impl LockRegistry {
    pub fn new() -> Self {
        Self::with_timeout(DEFAULT_ACQUIRE_TIMEOUT)
    }

    pub fn with_timeout(acquire_timeout: Duration) -> Self {
        Self {
            locks: Mutex::new(HashMap::new()),
            acquire_timeout,
        }
    }

    async fn handle(&self, user_id: Uuid) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(user_id).or_default().clone()
    }

    /// Takes a user's exclusive section, or fails with `Contended` after the
    /// registry timeout.
    pub async fn acquire(&self, user_id: Uuid) -> Result<OwnedMutexGuard<()>> {
        let handle = self.handle(user_id).await;
        tokio::time::timeout(self.acquire_timeout, handle.lock_owned())
            .await
            .map_err(|_| WalletError::Contended)
    }

    /// Takes both users' exclusive sections in ascending id order, so two
    /// transfers between the same pair can never deadlock each other.
    pub async fn acquire_pair(
        &self,
        a: Uuid,
        b: Uuid,
    ) -> Result<(OwnedMutexGuard<()>, OwnedMutexGuard<()>)> {
        debug_assert_ne!(a, b, "pair acquisition requires distinct users");
        let (first, second) = if a < b { (a, b) } else { (b, a) };
        let first_guard = self.acquire(first).await?;
        let second_guard = self.acquire(second).await?;
        Ok((first_guard, second_guard))
    }
}

impl Default for LockRegistry {
    fn default() -> Self {
        Self::new()
    }
}
