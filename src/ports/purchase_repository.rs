//! Token bundle purchase repository port.

use async_trait::async_trait;

use crate::domain::billing::{BillingError, TokenBundlePurchase};
use crate::domain::foundation::{PurchaseId, UserId};

/// Repository port for [`TokenBundlePurchase`] persistence.
#[async_trait]
pub trait TokenBundlePurchaseRepository: Send + Sync {
    /// Find a purchase by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &PurchaseId) -> Result<Option<TokenBundlePurchase>, BillingError>;

    /// All purchases of a user, newest first.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Vec<TokenBundlePurchase>, BillingError>;

    /// Insert or update a purchase.
    async fn save(&self, purchase: &TokenBundlePurchase) -> Result<(), BillingError>;
}
