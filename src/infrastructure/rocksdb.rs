use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationSink, NotificationStore, TransactionStore, UserStore};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::domain::user::User;
use crate::error::{Result, WalletError};
use async_trait::async_trait;
use rocksdb::{ColumnFamilyDescriptor, DB, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;
use uuid::Uuid;

/// Column Family for storing user rows.
pub const CF_USERS: &str = "users";
/// Column Family for storing the transaction ledger.
pub const CF_TRANSACTIONS: &str = "transactions";
/// Column Family for storing notification inboxes.
pub const CF_NOTIFICATIONS: &str = "notifications";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for `User`, `Transaction`, and `Notification` entities
/// using separate Column Families. Secondary-index queries (phone lookup,
/// pending queue, per-user history) scan their Column Family.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let descriptors = vec![
            ColumnFamilyDescriptor::new(CF_USERS, Options::default()),
            ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default()),
            ColumnFamilyDescriptor::new(CF_NOTIFICATIONS, Options::default()),
        ];

        let db = DB::open_cf_descriptors(&opts, path, descriptors)?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&rocksdb::ColumnFamily> {
        self.db.cf_handle(name).ok_or_else(|| {
            WalletError::Internal(Box::new(std::io::Error::other(format!(
                "{name} column family not found"
            ))))
        })
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: Uuid, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| WalletError::Internal(Box::new(e)))?;
        self.db.put_cf(&cf, key.as_bytes(), bytes)?;
        Ok(())
    }

    fn fetch<T: DeserializeOwned>(&self, cf_name: &str, key: Uuid) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_cf(&cf, key.as_bytes())? {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| WalletError::Internal(Box::new(e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut rows = Vec::new();
        for item in self.db.iterator_cf(&cf, rocksdb::IteratorMode::Start) {
            let (_key, value) = item.map_err(|e| WalletError::Internal(Box::new(e)))?;
            let row = serde_json::from_slice(&value)
                .map_err(|e| WalletError::Internal(Box::new(e)))?;
            rows.push(row);
        }
        Ok(rows)
    }
}

#[async_trait]
impl UserStore for RocksDBStore {
    async fn store(&self, user: User) -> Result<()> {
        self.put(CF_USERS, user.id, &user)
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>> {
        self.fetch(CF_USERS, user_id)
    }

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let users: Vec<User> = self.scan(CF_USERS)?;
        Ok(users.into_iter().find(|u| u.phone_number == phone_number))
    }

    async fn all(&self) -> Result<Vec<User>> {
        self.scan(CF_USERS)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        self.put(CF_TRANSACTIONS, tx.id, &tx)
    }

    async fn get(&self, tx_id: Uuid) -> Result<Option<Transaction>> {
        self.fetch(CF_TRANSACTIONS, tx_id)
    }

    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self.scan(CF_TRANSACTIONS)?;
        rows.retain(|tx| tx.user_id == user_id);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn pending(&self) -> Result<Vec<Transaction>> {
        let mut rows: Vec<Transaction> = self.scan(CF_TRANSACTIONS)?;
        rows.retain(|tx| tx.status == TransactionStatus::Pending);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn all(&self) -> Result<Vec<Transaction>> {
        self.scan(CF_TRANSACTIONS)
    }
}

#[async_trait]
impl NotificationStore for RocksDBStore {
    async fn store(&self, notification: Notification) -> Result<()> {
        self.put(CF_NOTIFICATIONS, notification.id, &notification)
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let mut rows: Vec<Notification> = self.scan(CF_NOTIFICATIONS)?;
        rows.retain(|n| n.user_id == user_id);
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<()> {
        if let Some(mut notification) =
            self.fetch::<Notification>(CF_NOTIFICATIONS, notification_id)?
        {
            notification.is_read = true;
            self.put(CF_NOTIFICATIONS, notification_id, &notification)?;
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for RocksDBStore {
    async fn notify(&self, user_id: Uuid, title: &str, message: &str) -> Result<()> {
        NotificationStore::store(self, Notification::new(user_id, title, message)).await
    }
}
