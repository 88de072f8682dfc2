use crate::domain::notification::Notification;
use crate::domain::ports::{NotificationSink, NotificationStore, TransactionStore, UserStore};
use crate::domain::transaction::{Transaction, TransactionStatus};
use crate::domain::user::User;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

/// A thread-safe in-memory store for users.
///
/// Uses `Arc<RwLock<HashMap<Uuid, User>>>` to allow shared concurrent access.
/// Ideal for testing or single-process runs where persistence is not
/// required; state lives exactly as long as the process.
#[derive(Default, Clone)]
pub struct InMemoryUserStore {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserStore {
    /// Creates a new, empty in-memory user store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for InMemoryUserStore {
    async fn store(&self, user: User) -> Result<()> {
        let mut users = self.users.write().await;
        users.insert(user.id, user);
        Ok(())
    }

    async fn get(&self, user_id: Uuid) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).cloned())
    }

    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users
            .values()
            .find(|user| user.phone_number == phone_number)
            .cloned())
    }

    async fn all(&self) -> Result<Vec<User>> {
        let users = self.users.read().await;
        Ok(users.values().cloned().collect())
    }
}

/// A thread-safe in-memory store for transactions.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<HashMap<Uuid, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

fn newest_first(transactions: &mut [Transaction]) {
    transactions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn store(&self, tx: Transaction) -> Result<()> {
        let mut transactions = self.transactions.write().await;
        transactions.insert(tx.id, tx);
        Ok(())
    }

    async fn get(&self, tx_id: Uuid) -> Result<Option<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(&tx_id).cloned())
    }

    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut rows: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.user_id == user_id)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn pending(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        let mut rows: Vec<Transaction> = transactions
            .values()
            .filter(|tx| tx.status == TransactionStatus::Pending)
            .cloned()
            .collect();
        newest_first(&mut rows);
        Ok(rows)
    }

    async fn all(&self) -> Result<Vec<Transaction>> {
        let transactions = self.transactions.read().await;
        Ok(transactions.values().cloned().collect())
    }
}

/// In-memory notification inbox. Doubles as the engine's delivery sink: a
/// delivered notification is simply appended to the owner's inbox.
#[derive(Default, Clone)]
pub struct InMemoryNotificationStore {
    notifications: Arc<RwLock<HashMap<Uuid, Notification>>>,
}

impl InMemoryNotificationStore {
    /// Creates a new, empty in-memory notification store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationStore for InMemoryNotificationStore {
    async fn store(&self, notification: Notification) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        notifications.insert(notification.id, notification);
        Ok(())
    }

    async fn for_user(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        let notifications = self.notifications.read().await;
        let mut rows: Vec<Notification> = notifications
            .values()
            .filter(|n| n.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn mark_read(&self, notification_id: Uuid) -> Result<()> {
        let mut notifications = self.notifications.write().await;
        if let Some(notification) = notifications.get_mut(&notification_id) {
            notification.is_read = true;
        }
        Ok(())
    }
}

#[async_trait]
impl NotificationSink for InMemoryNotificationStore {
    async fn notify(&self, user_id: Uuid, title: &str, message: &str) -> Result<()> {
        self.store(Notification::new(user_id, title, message)).await
    }
}
