//! Per-user token balance and append-only transaction ledger.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{Timestamp, TransactionId, UserId};

/// Why a token transaction happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TokenTransactionType {
    Purchase,
    Usage,
    Refund,
    Bonus,
    Adjustment,
}

/// Current token balance for a user.
///
/// Created lazily on first credit. The balance never goes negative: debits
/// either fail or, for refunds, clamp to what is available. Every mutation
/// is paired with a [`TokenTransaction`] in the same logical operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserTokenBalance {
    pub id: Uuid,
    pub user_id: UserId,
    pub balance: i64,
    pub updated_at: Timestamp,
}

impl UserTokenBalance {
    /// Creates a zero balance for a user.
    pub fn new(user_id: UserId) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            balance: 0,
            updated_at: Timestamp::now(),
        }
    }

    /// Adds tokens. Caller validates `amount > 0`.
    pub fn credit(&mut self, amount: i64) {
        self.balance += amount;
        self.updated_at = Timestamp::now();
    }

    /// Removes tokens. Caller validates `amount <= balance`.
    pub fn debit(&mut self, amount: i64) {
        self.balance -= amount;
        self.updated_at = Timestamp::now();
    }
}

/// Append-only ledger entry. Positive amounts are credits, negative are
/// debits. Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenTransaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub amount: i64,
    pub transaction_type: TokenTransactionType,
    /// Record that caused this movement (e.g. a purchase id).
    pub reference_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: Timestamp,
}

impl TokenTransaction {
    pub fn new(
        user_id: UserId,
        amount: i64,
        transaction_type: TokenTransactionType,
        reference_id: Option<Uuid>,
        description: Option<String>,
    ) -> Self {
        Self {
            id: TransactionId::new(),
            user_id,
            amount,
            transaction_type,
            reference_id,
            description,
            created_at: Timestamp::now(),
        }
    }
}
