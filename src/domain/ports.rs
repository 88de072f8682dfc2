use super::notification::Notification;
use super::transaction::Transaction;
use super::user::User;
use crate::error::Result;
use async_trait::async_trait;
use uuid::Uuid;

#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts or replaces a user row. All balance writes go through here.
    async fn store(&self, user: User) -> Result<()>;
    async fn get(&self, user_id: Uuid) -> Result<Option<User>>;
    async fn get_by_phone(&self, phone_number: &str) -> Result<Option<User>>;
    async fn all(&self) -> Result<Vec<User>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn store(&self, tx: Transaction) -> Result<()>;
    async fn get(&self, tx_id: Uuid) -> Result<Option<Transaction>>;
    /// All transactions owned by a user, newest first.
    async fn by_user(&self, user_id: Uuid) -> Result<Vec<Transaction>>;
    /// The admin queue: every pending transaction, newest first.
    async fn pending(&self) -> Result<Vec<Transaction>>;
    async fn all(&self) -> Result<Vec<Transaction>>;
}

#[async_trait]
pub trait NotificationStore: Send + Sync {
    async fn store(&self, notification: Notification) -> Result<()>;
    async fn for_user(&self, user_id: Uuid) -> Result<Vec<Notification>>;
    async fn mark_read(&self, notification_id: Uuid) -> Result<()>;
}

/// Outbound notification delivery. Fire-and-forget from the engine's point of
/// view: a failed delivery never rolls back a balance mutation.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn notify(&self, user_id: Uuid, title: &str, message: &str) -> Result<()>;
}

pub type UserStoreBox = Box<dyn UserStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;
pub type NotificationStoreBox = Box<dyn NotificationStore>;
pub type NotificationSinkBox = Box<dyn NotificationSink>;
