//! Subscription-cancelled handler.
//!
//! Marks the subscription CANCELLED and cascades to its linked active
//! add-ons. No refund happens here; that is a separate, explicit flow.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::billing::{BillingError, BillingEvent, DomainEvent, SubscriptionStatus};
use crate::domain::foundation::SubscriptionId;
use crate::ports::{AddOnSubscriptionRepository, EventHandler, SubscriptionRepository};

/// Handler for `subscription.cancelled` events.
///
/// Idempotent: a missing or already-terminated subscription is a success
/// no-op, so provider replays converge.
pub struct SubscriptionCancelledHandler {
    subscriptions: Arc<dyn SubscriptionRepository>,
    addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
}

impl SubscriptionCancelledHandler {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
    ) -> Self {
        Self {
            subscriptions,
            addon_subscriptions,
        }
    }

    async fn cancel(
        &self,
        subscription_id: &SubscriptionId,
        reason: &str,
        provider: &str,
    ) -> Result<Value, BillingError> {
        let subscription = self.subscriptions.find_by_id(subscription_id).await?;

        let Some(mut subscription) = subscription else {
            return Ok(json!({ "subscription_id": subscription_id, "cancelled": false }));
        };
        if matches!(
            subscription.status,
            SubscriptionStatus::Cancelled | SubscriptionStatus::Expired
        ) {
            return Ok(json!({ "subscription_id": subscription_id, "cancelled": false }));
        }

        subscription.cancel()?;
        self.subscriptions.save(&subscription).await?;

        let mut addons_cancelled = Vec::new();
        for mut addon in self
            .addon_subscriptions
            .find_by_subscription(subscription_id)
            .await?
        {
            if addon.is_active() {
                addon.cancel()?;
                self.addon_subscriptions.save(&addon).await?;
                addons_cancelled.push(addon.id);
            }
        }

        info!(
            subscription = %subscription.id,
            reason,
            provider,
            add_ons = addons_cancelled.len(),
            "subscription cancelled"
        );

        Ok(json!({
            "subscription_id": subscription.id,
            "cancelled": true,
            "add_ons_cancelled": addons_cancelled,
        }))
    }
}

#[async_trait]
impl EventHandler for SubscriptionCancelledHandler {
    fn name(&self) -> &'static str {
        "subscription_cancelled"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::SubscriptionCancelled { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::SubscriptionCancelled {
                subscription_id,
                reason,
                provider,
                ..
            } => self.cancel(subscription_id, reason, provider).await,
            _ => Err(super::unexpected_event("subscription.cancelled")),
        }
    }
}
