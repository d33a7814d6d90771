//! Token balance and transaction service.
//!
//! Every balance mutation writes a paired ledger row in the same logical
//! operation. Credits and debits validate their amounts hard; the one
//! exception is [`TokenService::refund_tokens`], the clamped debit used by
//! the refund saga.

use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::domain::billing::{BillingError, TokenTransaction, TokenTransactionType, UserTokenBalance};
use crate::domain::foundation::UserId;
use crate::ports::{TokenBalanceRepository, TokenTransactionRepository};

/// Service for managing user token balances and the transaction ledger.
pub struct TokenService {
    balances: Arc<dyn TokenBalanceRepository>,
    transactions: Arc<dyn TokenTransactionRepository>,
}

impl TokenService {
    pub fn new(
        balances: Arc<dyn TokenBalanceRepository>,
        transactions: Arc<dyn TokenTransactionRepository>,
    ) -> Self {
        Self {
            balances,
            transactions,
        }
    }

    /// Current balance; zero for users that were never credited.
    pub async fn balance(&self, user_id: &UserId) -> Result<i64, BillingError> {
        Ok(self
            .balances
            .find_by_user(user_id)
            .await?
            .map_or(0, |b| b.balance))
    }

    /// Credits tokens to a user, creating the balance on first use.
    ///
    /// # Errors
    ///
    /// `NonPositiveCredit` if `amount <= 0`.
    pub async fn credit(
        &self,
        user_id: &UserId,
        amount: i64,
        transaction_type: TokenTransactionType,
        reference_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<UserTokenBalance, BillingError> {
        if amount <= 0 {
            return Err(BillingError::NonPositiveCredit);
        }

        let mut balance = self.balances.get_or_create(user_id).await?;
        balance.credit(amount);
        self.balances.save(&balance).await?;

        let transaction =
            TokenTransaction::new(*user_id, amount, transaction_type, reference_id, description);
        self.transactions.create(&transaction).await?;

        debug!(user = %user_id, amount, balance = balance.balance, "tokens credited");
        Ok(balance)
    }

    /// Debits tokens from a user.
    ///
    /// # Errors
    ///
    /// - `NonPositiveDebit` if `amount <= 0`
    /// - `InsufficientBalance` if the user holds fewer than `amount` tokens
    pub async fn debit(
        &self,
        user_id: &UserId,
        amount: i64,
        transaction_type: TokenTransactionType,
        reference_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<UserTokenBalance, BillingError> {
        if amount <= 0 {
            return Err(BillingError::NonPositiveDebit);
        }

        let mut balance = self
            .balances
            .find_by_user(user_id)
            .await?
            .ok_or(BillingError::InsufficientBalance)?;
        if balance.balance < amount {
            return Err(BillingError::InsufficientBalance);
        }

        balance.debit(amount);
        self.balances.save(&balance).await?;

        let transaction =
            TokenTransaction::new(*user_id, -amount, transaction_type, reference_id, description);
        self.transactions.create(&transaction).await?;

        debug!(user = %user_id, amount, balance = balance.balance, "tokens debited");
        Ok(balance)
    }

    /// Clamped debit for refunds: removes `min(amount, balance)` tokens and
    /// returns the amount actually debited.
    ///
    /// The user may have spent tokens between purchase and refund, so the
    /// reversal takes whatever is left rather than failing. A zero clamp
    /// writes no ledger row. This is the only operation allowed to reduce
    /// the requested amount silently.
    pub async fn refund_tokens(
        &self,
        user_id: &UserId,
        amount: i64,
        reference_id: Option<Uuid>,
        description: Option<String>,
    ) -> Result<i64, BillingError> {
        if amount <= 0 {
            return Err(BillingError::NonPositiveDebit);
        }

        let current = self.balance(user_id).await?;
        let actual = amount.min(current);
        if actual == 0 {
            debug!(user = %user_id, requested = amount, "refund debit clamped to zero");
            return Ok(0);
        }

        self.debit(
            user_id,
            actual,
            TokenTransactionType::Refund,
            reference_id,
            description,
        )
        .await?;
        Ok(actual)
    }

    /// A user's ledger entries, newest first.
    pub async fn transactions(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TokenTransaction>, BillingError> {
        self.transactions.find_by_user(user_id, limit, offset).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{InMemoryTokenBalanceRepository, InMemoryTokenTransactionRepository};

    fn service() -> TokenService {
        TokenService::new(
            Arc::new(InMemoryTokenBalanceRepository::new()),
            Arc::new(InMemoryTokenTransactionRepository::new()),
        )
    }

    #[tokio::test]
    async fn balance_is_zero_for_unknown_user() {
        let service = service();
        assert_eq!(service.balance(&UserId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn credit_creates_balance_and_ledger_row() {
        let service = service();
        let user = UserId::new();

        let balance = service
            .credit(&user, 500, TokenTransactionType::Purchase, None, None)
            .await
            .unwrap();

        assert_eq!(balance.balance, 500);
        let ledger = service.transactions(&user, 10, 0).await.unwrap();
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger[0].amount, 500);
        assert_eq!(ledger[0].transaction_type, TokenTransactionType::Purchase);
    }

    #[tokio::test]
    async fn credit_rejects_non_positive_amounts() {
        let service = service();
        let user = UserId::new();
        assert_eq!(
            service
                .credit(&user, 0, TokenTransactionType::Bonus, None, None)
                .await,
            Err(BillingError::NonPositiveCredit)
        );
        assert_eq!(
            service
                .credit(&user, -10, TokenTransactionType::Bonus, None, None)
                .await,
            Err(BillingError::NonPositiveCredit)
        );
    }

    #[tokio::test]
    async fn debit_writes_negative_ledger_row() {
        let service = service();
        let user = UserId::new();
        service
            .credit(&user, 500, TokenTransactionType::Purchase, None, None)
            .await
            .unwrap();

        let balance = service
            .debit(&user, 200, TokenTransactionType::Usage, None, None)
            .await
            .unwrap();

        assert_eq!(balance.balance, 300);
        let ledger = service.transactions(&user, 10, 0).await.unwrap();
        assert_eq!(ledger[0].amount, -200);
    }

    #[tokio::test]
    async fn debit_fails_on_insufficient_balance() {
        let service = service();
        let user = UserId::new();
        service
            .credit(&user, 100, TokenTransactionType::Purchase, None, None)
            .await
            .unwrap();

        let result = service
            .debit(&user, 101, TokenTransactionType::Usage, None, None)
            .await;
        assert_eq!(result, Err(BillingError::InsufficientBalance));
        assert_eq!(service.balance(&user).await.unwrap(), 100);
    }

    #[tokio::test]
    async fn debit_fails_for_user_without_balance() {
        let service = service();
        let result = service
            .debit(&UserId::new(), 1, TokenTransactionType::Usage, None, None)
            .await;
        assert_eq!(result, Err(BillingError::InsufficientBalance));
    }

    #[tokio::test]
    async fn refund_tokens_debits_full_amount_when_available() {
        let service = service();
        let user = UserId::new();
        service
            .credit(&user, 500, TokenTransactionType::Purchase, None, None)
            .await
            .unwrap();

        let actual = service.refund_tokens(&user, 500, None, None).await.unwrap();
        assert_eq!(actual, 500);
        assert_eq!(service.balance(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn refund_tokens_clamps_to_remaining_balance() {
        let service = service();
        let user = UserId::new();
        service
            .credit(&user, 500, TokenTransactionType::Purchase, None, None)
            .await
            .unwrap();
        service
            .debit(&user, 350, TokenTransactionType::Usage, None, None)
            .await
            .unwrap();

        // Only 150 remain of the nominal 500.
        let actual = service.refund_tokens(&user, 500, None, None).await.unwrap();
        assert_eq!(actual, 150);
        assert_eq!(service.balance(&user).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn refund_tokens_zero_clamp_writes_no_ledger_row() {
        let service = service();
        let user = UserId::new();

        let actual = service.refund_tokens(&user, 500, None, None).await.unwrap();
        assert_eq!(actual, 0);
        assert!(service.transactions(&user, 10, 0).await.unwrap().is_empty());
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// The clamped debit never drives a balance negative and always
            /// reports exactly what it removed.
            #[test]
            fn refund_never_overdraws(initial in 0i64..10_000, requested in 1i64..10_000) {
                let rt = tokio::runtime::Builder::new_current_thread()
                    .build()
                    .unwrap();
                rt.block_on(async {
                    let service = service();
                    let user = UserId::new();
                    if initial > 0 {
                        service
                            .credit(&user, initial, TokenTransactionType::Purchase, None, None)
                            .await
                            .unwrap();
                    }

                    let actual = service.refund_tokens(&user, requested, None, None).await.unwrap();
                    let remaining = service.balance(&user).await.unwrap();

                    prop_assert_eq!(actual, requested.min(initial));
                    prop_assert_eq!(remaining, initial - actual);
                    prop_assert!(remaining >= 0);
                    Ok(())
                })?;
            }
        }
    }
}
