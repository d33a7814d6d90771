//! Token bundle catalog entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, TokenBundleId};

/// A one-time purchasable pack of usage tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBundle {
    pub id: TokenBundleId,
    pub name: String,
    pub price: Money,
    /// Tokens credited to the buyer when the purchase completes.
    pub token_amount: i64,
    pub is_active: bool,
}

impl TokenBundle {
    pub fn new(
        id: TokenBundleId,
        name: impl Into<String>,
        price: Money,
        token_amount: i64,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            token_amount,
            is_active: true,
        }
    }
}
