use crate::domain::notification::Notification;
use crate::domain::ports::{
    NotificationSinkBox, NotificationStoreBox, TransactionStoreBox, UserStoreBox,
};
use crate::domain::transaction::{ADMIN_FEE, Transaction, TransactionKind, TransactionStatus};
use crate::domain::user::{Amount, Balance, User};
use crate::error::{Result, WalletError};
use serde::Serialize;
use uuid::Uuid;

use super::locks::LockRegistry;

#[derive(Debug, Clone)]
pub struct TopUpRequest {
    pub user_id: Uuid,
    pub sender_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub original_amount: i64,
    /// Opaque reference to the transfer proof in external blob storage.
    pub proof_image: String,
}

#[derive(Debug, Clone)]
pub struct WithdrawRequest {
    pub user_id: Uuid,
    pub recipient_name: String,
    pub bank_name: String,
    pub account_number: String,
    pub original_amount: i64,
}

#[derive(Debug, Clone)]
pub struct SendRequest {
    pub user_id: Uuid,
    pub recipient_phone: String,
    pub original_amount: i64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AdminStats {
    pub pending_count: usize,
    pub total_users: usize,
    /// Sum of `amount` over approved transactions.
    pub total_volume: i64,
}

/// The main entry point for wallet operations.
///
/// `WalletEngine` owns the storage backends and the per-user lock registry.
/// Every balance mutation is a strict read-modify-write under the owning
/// user's lock; operations touching two wallets take both locks in a fixed
/// order before mutating either.
pub struct WalletEngine {
    pub(crate) users: UserStoreBox,
    pub(crate) transactions: TransactionStoreBox,
    pub(crate) notifications: NotificationStoreBox,
    pub(crate) notifier: NotificationSinkBox,
    pub(crate) locks: LockRegistry,
}

impl WalletEngine {
    pub fn new(
        users: UserStoreBox,
        transactions: TransactionStoreBox,
        notifications: NotificationStoreBox,
        notifier: NotificationSinkBox,
    ) -> Self {
        Self {
            users,
            transactions,
            notifications,
            notifier,
            locks: LockRegistry::new(),
        }
    }

    /// Replaces the default 5s lock-acquisition timeout.
    pub fn with_lock_registry(mut self, locks: LockRegistry) -> Self {
        self.locks = locks;
        self
    }

    /// Creates a wallet with a zero balance. Phone numbers are unique.
    pub async fn register(&self, phone_number: &str, pin: &str, name: &str) -> Result<User> {
        if phone_number.len() < 10 {
            return Err(WalletError::Validation(
                "phone number must have at least 10 digits".to_string(),
            ));
        }
        if pin.len() != 6 || !pin.chars().all(|c| c.is_ascii_digit()) {
            return Err(WalletError::Validation(
                "PIN must be exactly 6 digits".to_string(),
            ));
        }
        if name.trim().len() < 2 {
            return Err(WalletError::Validation(
                "name must have at least 2 characters".to_string(),
            ));
        }
        if self.users.get_by_phone(phone_number).await?.is_some() {
            return Err(WalletError::Validation(
                "phone number is already registered".to_string(),
            ));
        }

        let user = User::new(phone_number, pin, name.trim());
        self.users.store(user.clone()).await?;
        tracing::info!(user_id = %user.id, phone = %user.phone_number, "wallet registered");
        Ok(user)
    }

    pub async fn login(&self, phone_number: &str, pin: &str) -> Result<User> {
        let user = self
            .users
            .get_by_phone(phone_number)
            .await?
            .ok_or(WalletError::Unauthorized)?;
        if !user.pin.matches(pin) {
            return Err(WalletError::Unauthorized);
        }
        Ok(user)
    }

    pub async fn balance(&self, user_id: Uuid) -> Result<Balance> {
        let user = self.require_user(user_id).await?;
        Ok(user.balance)
    }

    pub async fn user_by_phone(&self, phone_number: &str) -> Result<User> {
        self.users
            .get_by_phone(phone_number)
            .await?
            .ok_or_else(|| WalletError::NotFound("user".to_string()))
    }

    /// Requests a top-up. The transaction is born pending and no balance
    /// moves until an admin approves it; `amount` is already net of the fee.
    pub async fn top_up(&self, req: TopUpRequest) -> Result<Transaction> {
        TransactionKind::TopUp.validate_amount(req.original_amount)?;
        if req.proof_image.trim().is_empty() {
            return Err(WalletError::Validation(
                "transfer proof is required".to_string(),
            ));
        }
        require_field(&req.sender_name, "sender name")?;
        require_field(&req.bank_name, "bank name")?;
        require_field(&req.account_number, "account number")?;

        let user = self.require_user(req.user_id).await?;
        require_active(&user)?;

        let tx = Transaction::top_up(
            user.id,
            req.sender_name,
            req.bank_name,
            req.account_number,
            req.original_amount,
            req.proof_image,
        );
        self.transactions.store(tx.clone()).await?;
        tracing::info!(user_id = %user.id, amount = req.original_amount, "top up requested");
        Ok(tx)
    }

    /// Requests a withdrawal. The full hold (`original + fee`) is debited
    /// immediately and returned only if an admin rejects the request.
    pub async fn withdraw(&self, req: WithdrawRequest) -> Result<Transaction> {
        TransactionKind::Withdraw.validate_amount(req.original_amount)?;
        require_field(&req.recipient_name, "recipient name")?;
        require_field(&req.bank_name, "bank name")?;
        require_field(&req.account_number, "account number")?;

        let _guard = self.locks.acquire(req.user_id).await?;

        let mut user = self.require_user(req.user_id).await?;
        require_active(&user)?;

        let hold = Amount::new(req.original_amount + ADMIN_FEE)?;
        user.debit(hold)?;
        self.users.store(user.clone()).await?;

        let tx = Transaction::withdraw(
            user.id,
            req.recipient_name,
            req.bank_name,
            req.account_number,
            req.original_amount,
        );
        self.transactions.store(tx.clone()).await?;
        tracing::info!(
            user_id = %user.id,
            amount = req.original_amount,
            hold = hold.value(),
            "withdrawal requested"
        );
        Ok(tx)
    }

    /// Instant peer-to-peer transfer. Debits the sender (`original + fee`),
    /// credits the recipient (`original`), and records the linked
    /// Send/Receive pair, all under both users' locks. Returns the sender's
    /// Send row.
    pub async fn send(&self, req: SendRequest) -> Result<Transaction> {
        TransactionKind::Send.validate_amount(req.original_amount)?;

        let sender = self.require_user(req.user_id).await?;
        let recipient = self
            .users
            .get_by_phone(&req.recipient_phone)
            .await?
            .ok_or(WalletError::RecipientNotFound)?;
        if recipient.id == sender.id {
            return Err(WalletError::SelfTransferDenied);
        }

        let _guards = self.locks.acquire_pair(sender.id, recipient.id).await?;

        // Balances may have moved while we waited on the locks.
        let mut sender = self.require_user(sender.id).await?;
        let mut recipient = self
            .users
            .get(recipient.id)
            .await?
            .ok_or(WalletError::RecipientNotFound)?;
        require_active(&sender)?;

        let total = Amount::new(req.original_amount + ADMIN_FEE)?;
        sender.debit(total)?;
        recipient.credit(Amount::new(req.original_amount)?);
        self.users.store(sender.clone()).await?;
        self.users.store(recipient.clone()).await?;

        let (send_tx, receive_tx) =
            Transaction::transfer_pair(&sender, &recipient, req.original_amount, req.notes);
        self.transactions.store(send_tx.clone()).await?;
        self.transactions.store(receive_tx).await?;

        tracing::info!(
            sender_id = %sender.id,
            recipient_id = %recipient.id,
            amount = req.original_amount,
            "transfer settled"
        );
        self.notify(
            recipient.id,
            "Balance received",
            &format!("You received {} from {}", req.original_amount, sender.name),
        )
        .await;

        Ok(send_tx)
    }

    pub async fn transactions_for(&self, user_id: Uuid) -> Result<Vec<Transaction>> {
        self.transactions.by_user(user_id).await
    }

    /// The admin approval queue.
    pub async fn pending(&self) -> Result<Vec<Transaction>> {
        self.transactions.pending().await
    }

    pub async fn users(&self) -> Result<Vec<User>> {
        self.users.all().await
    }

    pub async fn notifications_for(&self, user_id: Uuid) -> Result<Vec<Notification>> {
        self.notifications.for_user(user_id).await
    }

    pub async fn mark_notification_read(&self, notification_id: Uuid) -> Result<()> {
        self.notifications.mark_read(notification_id).await
    }

    pub async fn stats(&self) -> Result<AdminStats> {
        let pending_count = self.transactions.pending().await?.len();
        let total_users = self.users.all().await?.len();
        let total_volume = self
            .transactions
            .all()
            .await?
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Approved)
            .map(|tx| tx.amount)
            .sum();
        Ok(AdminStats {
            pending_count,
            total_users,
            total_volume,
        })
    }

    pub(crate) async fn require_user(&self, user_id: Uuid) -> Result<User> {
        self.users
            .get(user_id)
            .await?
            .ok_or_else(|| WalletError::NotFound("user".to_string()))
    }

    /// Fire-and-forget delivery; a failed notification never fails the
    /// operation that produced it.
    pub(crate) async fn notify(&self, user_id: Uuid, title: &str, message: &str) {
        if let Err(err) = self.notifier.notify(user_id, title, message).await {
            tracing::warn!(%user_id, error = %err, "notification delivery failed");
        }
    }
}

fn require_field(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(WalletError::Validation(format!("{field} is required")));
    }
    Ok(())
}

fn require_active(user: &User) -> Result<()> {
    if !user.is_active {
        return Err(WalletError::Validation("wallet is inactive".to_string()));
    }
    Ok(())
}
