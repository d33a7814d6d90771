//! Subscription repository port.

use async_trait::async_trait;

use crate::domain::billing::{BillingError, Subscription};
use crate::domain::foundation::{SubscriptionId, UserId};

/// Repository port for [`Subscription`] persistence.
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    /// Find a subscription by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, BillingError>;

    /// Find the user's single ACTIVE subscription, if any.
    ///
    /// This backs the at-most-one-active invariant: the capture saga
    /// cancels whatever this returns before activating a new enrollment.
    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, BillingError>;

    /// All subscriptions of a user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, BillingError>;

    /// Find a subscription by the provider-side subscription id.
    async fn find_by_provider_subscription_id(
        &self,
        provider_subscription_id: &str,
    ) -> Result<Option<Subscription>, BillingError>;

    /// ACTIVE subscriptions whose `expires_at` has passed.
    async fn find_expired(&self) -> Result<Vec<Subscription>, BillingError>;

    /// TRIALING subscriptions whose `trial_end_at` has passed.
    async fn find_expired_trials(&self) -> Result<Vec<Subscription>, BillingError>;

    /// ACTIVE subscriptions expiring within the given number of days.
    ///
    /// Used for renewal reminders.
    async fn find_expiring_within_days(
        &self,
        days: i64,
    ) -> Result<Vec<Subscription>, BillingError>;

    /// Insert or update a subscription.
    async fn save(&self, subscription: &Subscription) -> Result<(), BillingError>;
}
