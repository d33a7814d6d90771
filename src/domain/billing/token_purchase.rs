//! Token bundle purchase record.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    InvoiceId, Money, PurchaseId, StateMachine, Timestamp, TokenBundleId, UserId, ValidationError,
};

/// Token bundle purchase status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PurchaseStatus {
    /// Created at checkout, tokens not yet credited.
    Pending,
    /// Paid; tokens credited to the buyer.
    Completed,
    /// Reversed; tokens debited back (possibly clamped).
    Refunded,
    /// Abandoned before payment.
    Cancelled,
}

impl StateMachine for PurchaseStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use PurchaseStatus::*;
        matches!(
            (self, target),
            (Pending, Completed)
                | (Pending, Cancelled)
                | (Completed, Refunded)
            // Refund reversal re-completes the purchase
                | (Refunded, Completed)
        )
    }
}

/// A one-time token bundle purchase.
///
/// `token_amount` is snapshotted from the catalog bundle at checkout so a
/// later catalog edit cannot change what an invoice pays for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundlePurchase {
    pub id: PurchaseId,
    pub user_id: UserId,
    pub bundle_id: TokenBundleId,
    pub invoice_id: Option<InvoiceId>,
    pub status: PurchaseStatus,
    pub token_amount: i64,
    pub price: Money,
    /// True once tokens for this purchase have been credited.
    pub tokens_credited: bool,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl TokenBundlePurchase {
    /// Creates a pending purchase snapshotting the bundle's price and size.
    pub fn new(user_id: UserId, bundle_id: TokenBundleId, token_amount: i64, price: Money) -> Self {
        Self {
            id: PurchaseId::new(),
            user_id,
            bundle_id,
            invoice_id: None,
            status: PurchaseStatus::Pending,
            token_amount,
            price,
            tokens_credited: false,
            completed_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Marks the purchase completed with tokens credited.
    pub fn complete(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PurchaseStatus::Completed)?;
        self.completed_at = Some(Timestamp::now());
        self.tokens_credited = true;
        Ok(())
    }

    /// Marks the purchase refunded.
    pub fn refund(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(PurchaseStatus::Refunded)?;
        Ok(())
    }

    /// Status as its wire string (`PENDING`, `COMPLETED`, ...).
    pub fn status_label(&self) -> String {
        format!("{:?}", self.status).to_uppercase()
    }
}
