use crate::error::{Result, WalletError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::user::{Amount, User};

/// Fixed fee charged on top-up, withdrawal, and send operations.
pub const ADMIN_FEE: i64 = 1_200;

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    #[serde(rename = "topup")]
    TopUp,
    Withdraw,
    Send,
    Receive,
}

impl TransactionKind {
    /// Amount bounds for user-initiated operations, in the smallest currency
    /// unit. `Receive` rows are derived, never user-entered.
    fn bounds(&self) -> Option<(i64, i64)> {
        match self {
            Self::TopUp => Some((12_000, 10_000_000)),
            Self::Withdraw => Some((55_000, 10_000_000)),
            Self::Send => Some((10_000, 10_000_000)),
            Self::Receive => None,
        }
    }

    /// Validates a user-entered amount against this kind's bounds.
    pub fn validate_amount(&self, original_amount: i64) -> Result<()> {
        let Some((min, max)) = self.bounds() else {
            return Ok(());
        };
        if original_amount < min {
            return Err(WalletError::Validation(format!(
                "minimum {} amount is {min}",
                self.label()
            )));
        }
        if original_amount > max {
            return Err(WalletError::Validation(format!(
                "maximum {} amount is {max}",
                self.label()
            )));
        }
        Ok(())
    }

    /// Label used in notifications and error messages.
    pub fn label(&self) -> &'static str {
        match self {
            Self::TopUp => "top up",
            Self::Withdraw => "withdrawal",
            Self::Send => "transfer",
            Self::Receive => "incoming transfer",
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Approved,
    Rejected,
}

/// Admin verdict on a pending transaction.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Decision {
    Approve,
    Reject,
}

/// Balance effect of resolving a pending transaction, computed from the
/// `(kind, decision)` pair so approve/reject can never apply the wrong
/// mutation for a given transaction kind.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Settlement {
    /// Credit the owner (approved top-up; amount already net of fee).
    CreditOwner(Amount),
    /// Return the full hold to the owner (rejected withdrawal).
    RefundOwner(Amount),
    /// No balance change (approved withdrawal, rejected top-up).
    None,
}

/// A ledger entry. Immutable after creation except for `status`/`updated_at`,
/// which only [`Transaction::resolve`] may touch.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub kind: TransactionKind,
    /// Signed effect on the owner's balance.
    pub amount: i64,
    /// User-entered amount, unsigned.
    pub original_amount: i64,
    pub admin_fee: i64,
    pub status: TransactionStatus,
    pub recipient_phone: Option<String>,
    pub recipient_name: Option<String>,
    pub bank_name: Option<String>,
    pub account_number: Option<String>,
    pub sender_name: Option<String>,
    pub proof_image: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Transaction {
    fn base(user_id: Uuid, kind: TransactionKind, amount: i64, original_amount: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            kind,
            amount,
            original_amount,
            admin_fee: ADMIN_FEE,
            status: TransactionStatus::Pending,
            recipient_phone: None,
            recipient_name: None,
            bank_name: None,
            account_number: None,
            sender_name: None,
            proof_image: None,
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// A pending top-up. `amount` is the credit applied at approval time,
    /// already net of the fee.
    pub fn top_up(
        user_id: Uuid,
        sender_name: String,
        bank_name: String,
        account_number: String,
        original_amount: i64,
        proof_image: String,
    ) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionKind::TopUp,
            original_amount - ADMIN_FEE,
            original_amount,
        );
        tx.sender_name = Some(sender_name);
        tx.bank_name = Some(bank_name);
        tx.account_number = Some(account_number);
        tx.proof_image = Some(proof_image);
        tx
    }

    /// A pending withdrawal. The hold (`original_amount + fee`) is debited at
    /// request time; `amount` records the payout.
    pub fn withdraw(
        user_id: Uuid,
        recipient_name: String,
        bank_name: String,
        account_number: String,
        original_amount: i64,
    ) -> Self {
        let mut tx = Self::base(
            user_id,
            TransactionKind::Withdraw,
            original_amount,
            original_amount,
        );
        tx.recipient_name = Some(recipient_name);
        tx.bank_name = Some(bank_name);
        tx.account_number = Some(account_number);
        tx
    }

    /// The linked pair recorded for an instant transfer: a `Send` row on the
    /// sender (negative amount) and a `Receive` row on the recipient
    /// (positive amount, zero fee). Both are terminal from birth.
    pub fn transfer_pair(
        sender: &User,
        recipient: &User,
        original_amount: i64,
        notes: Option<String>,
    ) -> (Self, Self) {
        let mut send = Self::base(
            sender.id,
            TransactionKind::Send,
            -original_amount,
            original_amount,
        );
        send.status = TransactionStatus::Approved;
        send.recipient_phone = Some(recipient.phone_number.clone());
        send.recipient_name = Some(recipient.name.clone());
        send.notes = notes.clone();

        let mut receive = Self::base(
            recipient.id,
            TransactionKind::Receive,
            original_amount,
            original_amount,
        );
        receive.status = TransactionStatus::Approved;
        receive.admin_fee = 0;
        receive.sender_name = Some(sender.name.clone());
        receive.notes = notes;

        (send, receive)
    }

    /// Applies an admin decision and returns the balance effect to settle.
    ///
    /// Only `Pending` transactions may transition; anything else fails with
    /// `AlreadyResolved`, so a repeated approval can never credit twice.
    pub fn resolve(&mut self, decision: Decision) -> Result<Settlement> {
        if self.status != TransactionStatus::Pending {
            return Err(WalletError::AlreadyResolved);
        }

        let settlement = match (self.kind, decision) {
            (TransactionKind::TopUp, Decision::Approve) => {
                Settlement::CreditOwner(Amount::new(self.amount)?)
            }
            (TransactionKind::Withdraw, Decision::Reject) => {
                Settlement::RefundOwner(Amount::new(self.original_amount + self.admin_fee)?)
            }
            (TransactionKind::TopUp, Decision::Reject)
            | (TransactionKind::Withdraw, Decision::Approve) => Settlement::None,
            // Send/Receive rows are born Approved and never reach here.
            (TransactionKind::Send | TransactionKind::Receive, _) => {
                return Err(WalletError::AlreadyResolved);
            }
        };

        self.status = match decision {
            Decision::Approve => TransactionStatus::Approved,
            Decision::Reject => TransactionStatus::Rejected,
        };
        self.updated_at = Utc::now();

        Ok(settlement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending_top_up(original_amount: i64) -> Transaction {
        Transaction::top_up(
            Uuid::new_v4(),
            "Alice".to_string(),
            "BCA".to_string(),
            "1234567890".to_string(),
            original_amount,
            "proof-1".to_string(),
        )
    }

    fn pending_withdraw(original_amount: i64) -> Transaction {
        Transaction::withdraw(
            Uuid::new_v4(),
            "Alice".to_string(),
            "BCA".to_string(),
            "1234567890".to_string(),
            original_amount,
        )
    }

    #[test]
    fn test_amount_bounds() {
        assert!(TransactionKind::TopUp.validate_amount(12_000).is_ok());
        assert!(matches!(
            TransactionKind::TopUp.validate_amount(11_999),
            Err(WalletError::Validation(_))
        ));
        assert!(matches!(
            TransactionKind::Withdraw.validate_amount(54_999),
            Err(WalletError::Validation(_))
        ));
        assert!(matches!(
            TransactionKind::Send.validate_amount(10_000_001),
            Err(WalletError::Validation(_))
        ));
        assert!(TransactionKind::Send.validate_amount(10_000).is_ok());
    }

    #[test]
    fn test_top_up_nets_fee() {
        let tx = pending_top_up(50_000);
        assert_eq!(tx.amount, 48_800);
        assert_eq!(tx.original_amount, 50_000);
        assert_eq!(tx.admin_fee, ADMIN_FEE);
        assert_eq!(tx.status, TransactionStatus::Pending);
    }

    #[test]
    fn test_approve_top_up_credits_net_amount() {
        let mut tx = pending_top_up(50_000);
        let settlement = tx.resolve(Decision::Approve).unwrap();
        assert_eq!(
            settlement,
            Settlement::CreditOwner(Amount::new(48_800).unwrap())
        );
        assert_eq!(tx.status, TransactionStatus::Approved);
    }

    #[test]
    fn test_reject_top_up_moves_no_funds() {
        let mut tx = pending_top_up(50_000);
        let settlement = tx.resolve(Decision::Reject).unwrap();
        assert_eq!(settlement, Settlement::None);
        assert_eq!(tx.status, TransactionStatus::Rejected);
    }

    #[test]
    fn test_approve_withdraw_keeps_hold() {
        let mut tx = pending_withdraw(55_000);
        let settlement = tx.resolve(Decision::Approve).unwrap();
        assert_eq!(settlement, Settlement::None);
        assert_eq!(tx.status, TransactionStatus::Approved);
    }

    #[test]
    fn test_reject_withdraw_refunds_exact_hold() {
        let mut tx = pending_withdraw(55_000);
        let settlement = tx.resolve(Decision::Reject).unwrap();
        assert_eq!(
            settlement,
            Settlement::RefundOwner(Amount::new(56_200).unwrap())
        );
    }

    #[test]
    fn test_resolve_is_terminal() {
        let mut tx = pending_top_up(50_000);
        tx.resolve(Decision::Approve).unwrap();

        assert!(matches!(
            tx.resolve(Decision::Approve),
            Err(WalletError::AlreadyResolved)
        ));
        assert!(matches!(
            tx.resolve(Decision::Reject),
            Err(WalletError::AlreadyResolved)
        ));
    }

    #[test]
    fn test_transfer_pair_contract() {
        let sender = User::new("08111111111", "123456", "Alice");
        let recipient = User::new("08222222222", "123456", "Bob");

        let (send, receive) =
            Transaction::transfer_pair(&sender, &recipient, 20_000, Some("lunch".to_string()));

        assert_eq!(send.user_id, sender.id);
        assert_eq!(send.amount, -20_000);
        assert_eq!(send.admin_fee, ADMIN_FEE);
        assert_eq!(send.status, TransactionStatus::Approved);
        assert_eq!(send.recipient_phone.as_deref(), Some("08222222222"));

        assert_eq!(receive.user_id, recipient.id);
        assert_eq!(receive.amount, 20_000);
        assert_eq!(receive.admin_fee, 0);
        assert_eq!(receive.status, TransactionStatus::Approved);
        assert_eq!(receive.sender_name.as_deref(), Some("Alice"));
    }

    #[test]
    fn test_transfer_rows_cannot_be_resolved() {
        let sender = User::new("08111111111", "123456", "Alice");
        let recipient = User::new("08222222222", "123456", "Bob");
        let (mut send, mut receive) = Transaction::transfer_pair(&sender, &recipient, 20_000, None);

        assert!(matches!(
            send.resolve(Decision::Reject),
            Err(WalletError::AlreadyResolved)
        ));
        assert!(matches!(
            receive.resolve(Decision::Approve),
            Err(WalletError::AlreadyResolved)
        ));
    }
}
