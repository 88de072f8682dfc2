//! Admin approval workflow: the only code path that moves a transaction out
//! of `Pending`, and the only writer of `status`/`updated_at`.

use crate::domain::transaction::{Decision, Settlement, Transaction};
use crate::error::{Result, WalletError};
use uuid::Uuid;

use super::engine::WalletEngine;

impl WalletEngine {
    /// Finalizes a pending transaction. An approved top-up credits the owner
    /// with the net amount; an approved withdrawal keeps the hold taken at
    /// request time.
    pub async fn approve(&self, tx_id: Uuid) -> Result<Transaction> {
        self.resolve_transaction(tx_id, Decision::Approve).await
    }

    /// Rejects a pending transaction. A rejected withdrawal refunds the hold
    /// exactly; a rejected top-up never moved funds in the first place.
    pub async fn reject(&self, tx_id: Uuid) -> Result<Transaction> {
        self.resolve_transaction(tx_id, Decision::Reject).await
    }

    async fn resolve_transaction(&self, tx_id: Uuid, decision: Decision) -> Result<Transaction> {
        let owner_id = self
            .transactions
            .get(tx_id)
            .await?
            .ok_or_else(|| WalletError::NotFound("transaction".to_string()))?
            .user_id;

        let _guard = self.locks.acquire(owner_id).await?;

        // Re-read under the owner's lock: a concurrent resolution must be
        // visible before the terminal-state guard runs.
        let mut tx = self
            .transactions
            .get(tx_id)
            .await?
            .ok_or_else(|| WalletError::NotFound("transaction".to_string()))?;
        let settlement = tx.resolve(decision)?;

        if let Settlement::CreditOwner(amount) | Settlement::RefundOwner(amount) = settlement {
            let mut user = self.require_user(tx.user_id).await?;
            user.credit(amount);
            self.users.store(user).await?;
        }
        self.transactions.store(tx.clone()).await?;

        let verdict = match decision {
            Decision::Approve => "approved",
            Decision::Reject => "rejected",
        };
        tracing::info!(tx_id = %tx.id, user_id = %tx.user_id, verdict, "transaction resolved");
        self.notify(
            tx.user_id,
            &format!("Transaction {verdict}"),
            &format!(
                "Your {} of {} was {verdict}",
                tx.kind.label(),
                tx.original_amount
            ),
        )
        .await;

        Ok(tx)
    }
}
