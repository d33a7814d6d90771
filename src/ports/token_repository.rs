//! Token balance and transaction repository ports.

use async_trait::async_trait;

use crate::domain::billing::{BillingError, TokenTransaction, UserTokenBalance};
use crate::domain::foundation::UserId;

/// Repository port for [`UserTokenBalance`] persistence.
///
/// Balances are created lazily: `get_or_create` returns a zero balance for
/// users who have never been credited.
#[async_trait]
pub trait TokenBalanceRepository: Send + Sync {
    /// Find a user's balance. Returns `None` if the user was never credited.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Option<UserTokenBalance>, BillingError>;

    /// Find a user's balance, creating a zero balance if absent.
    async fn get_or_create(&self, user_id: &UserId) -> Result<UserTokenBalance, BillingError>;

    /// Insert or update a balance.
    async fn save(&self, balance: &UserTokenBalance) -> Result<(), BillingError>;
}

/// Repository port for the append-only [`TokenTransaction`] ledger.
#[async_trait]
pub trait TokenTransactionRepository: Send + Sync {
    /// Append a ledger entry. Entries are never updated or deleted.
    async fn create(&self, transaction: &TokenTransaction) -> Result<(), BillingError>;

    /// A user's ledger entries, newest first.
    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TokenTransaction>, BillingError>;
}
