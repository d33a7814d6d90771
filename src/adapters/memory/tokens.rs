//! In-memory token balance and ledger repositories.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::billing::{BillingError, TokenTransaction, UserTokenBalance};
use crate::domain::foundation::UserId;
use crate::ports::{TokenBalanceRepository, TokenTransactionRepository};

/// In-memory token balance store.
#[derive(Default)]
pub struct InMemoryTokenBalanceRepository {
    balances: RwLock<HashMap<UserId, UserTokenBalance>>,
}

impl InMemoryTokenBalanceRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBalanceRepository for InMemoryTokenBalanceRepository {
    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<UserTokenBalance>, BillingError> {
        Ok(self
            .balances
            .read()
            .expect("InMemoryTokenBalanceRepository: lock poisoned")
            .get(user_id)
            .cloned())
    }

    async fn get_or_create(&self, user_id: &UserId) -> Result<UserTokenBalance, BillingError> {
        let mut balances = self
            .balances
            .write()
            .expect("InMemoryTokenBalanceRepository: lock poisoned");
        Ok(balances
            .entry(*user_id)
            .or_insert_with(|| UserTokenBalance::new(*user_id))
            .clone())
    }

    async fn save(&self, balance: &UserTokenBalance) -> Result<(), BillingError> {
        self.balances
            .write()
            .expect("InMemoryTokenBalanceRepository: lock poisoned")
            .insert(balance.user_id, balance.clone());
        Ok(())
    }
}

/// In-memory append-only transaction ledger.
#[derive(Default)]
pub struct InMemoryTokenTransactionRepository {
    transactions: RwLock<Vec<TokenTransaction>>,
}

impl InMemoryTokenTransactionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of ledger rows, for test assertions.
    pub fn len(&self) -> usize {
        self.transactions
            .read()
            .expect("InMemoryTokenTransactionRepository: lock poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl TokenTransactionRepository for InMemoryTokenTransactionRepository {
    async fn create(&self, transaction: &TokenTransaction) -> Result<(), BillingError> {
        self.transactions
            .write()
            .expect("InMemoryTokenTransactionRepository: lock poisoned")
            .push(transaction.clone());
        Ok(())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<TokenTransaction>, BillingError> {
        let transactions = self
            .transactions
            .read()
            .expect("InMemoryTokenTransactionRepository: lock poisoned");
        Ok(transactions
            .iter()
            .rev()
            .filter(|t| t.user_id == *user_id)
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }
}
