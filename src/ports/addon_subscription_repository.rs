//! Add-on subscription repository port.

use async_trait::async_trait;

use crate::domain::billing::{AddOnSubscription, BillingError};
use crate::domain::foundation::{AddOnSubscriptionId, SubscriptionId, UserId};

/// Repository port for [`AddOnSubscription`] persistence.
#[async_trait]
pub trait AddOnSubscriptionRepository: Send + Sync {
    /// Find an add-on subscription by id. Returns `None` if missing.
    async fn find_by_id(
        &self,
        id: &AddOnSubscriptionId,
    ) -> Result<Option<AddOnSubscription>, BillingError>;

    /// All add-on subscriptions of a user.
    async fn find_by_user(&self, user_id: &UserId)
        -> Result<Vec<AddOnSubscription>, BillingError>;

    /// Add-ons linked to a parent plan subscription.
    ///
    /// Used when a subscription cancellation cascades to its add-ons.
    async fn find_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<AddOnSubscription>, BillingError>;

    /// Insert or update an add-on subscription.
    async fn save(&self, addon_subscription: &AddOnSubscription) -> Result<(), BillingError>;
}
