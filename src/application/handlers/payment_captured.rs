//! Capture saga - turns a "money received" notification into a paid
//! invoice with activated entitlements.
//!
//! Delivery is at-least-once: an already-PAID invoice skips the payment
//! metadata write but still walks its line items, because each activation
//! is independently guarded by the record's own PENDING status. Replays
//! converge on the same end state with no double credit.

use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::billing::{
    AddOnSubscriptionStatus, BillingError, BillingEvent, DomainEvent, InvoiceStatus, LineItemType,
    PurchaseStatus, SubscriptionStatus, TokenTransactionType,
};
use crate::domain::foundation::{
    AddOnSubscriptionId, InvoiceId, PurchaseId, SubscriptionId, UserId,
};
use crate::ports::{
    AddOnSubscriptionRepository, EventHandler, InvoiceRepository, PlanRepository,
    SubscriptionRepository, TokenBundlePurchaseRepository,
};

use crate::application::services::TokenService;

/// What a capture activated, for logging and test assertions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct CaptureSummary {
    pub subscription: Option<SubscriptionId>,
    pub token_bundles: Vec<PurchaseId>,
    pub add_ons: Vec<AddOnSubscriptionId>,
    pub tokens_credited: i64,
}

/// Handler for `payment.captured` events.
pub struct PaymentCapturedHandler {
    invoices: Arc<dyn InvoiceRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    purchases: Arc<dyn TokenBundlePurchaseRepository>,
    addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
    tokens: Arc<TokenService>,
}

impl PaymentCapturedHandler {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        purchases: Arc<dyn TokenBundlePurchaseRepository>,
        addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            invoices,
            subscriptions,
            plans,
            purchases,
            addon_subscriptions,
            tokens,
        }
    }

    async fn capture(
        &self,
        invoice_id: &InvoiceId,
        payment_reference: &str,
        provider: &str,
    ) -> Result<Value, BillingError> {
        // Step 1: the invoice itself.
        let mut invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(BillingError::InvoiceNotFound(*invoice_id))?;

        match invoice.status {
            // Replay: keep the original payment metadata.
            InvoiceStatus::Paid => {}
            InvoiceStatus::Pending | InvoiceStatus::Failed => {
                invoice.mark_paid(payment_reference)?;
                invoice.payment_method = Some(provider.to_string());
                self.invoices.save(&invoice).await?;
            }
            // A capture for a refunded or cancelled invoice is a conflict,
            // not a replay; surface it instead of resurrecting the invoice.
            _ => {
                return Err(BillingError::InvoiceNotPayable {
                    status: invoice.status_label(),
                })
            }
        }

        // Step 2: per line item, each guarded by its own status.
        let mut summary = CaptureSummary::default();
        for line_item in &invoice.line_items {
            match line_item.item_type {
                LineItemType::Subscription => {
                    self.activate_subscription(line_item.item_id, &invoice.user_id, &mut summary)
                        .await?;
                }
                LineItemType::TokenBundle => {
                    self.complete_purchase(line_item.item_id, &invoice.user_id, &mut summary)
                        .await?;
                }
                LineItemType::AddOn => {
                    self.activate_addon(line_item.item_id, &mut summary).await?;
                }
            }
        }

        info!(
            invoice = %invoice.id,
            reference = payment_reference,
            provider,
            tokens_credited = summary.tokens_credited,
            "payment captured"
        );

        Ok(json!({
            "invoice_id": invoice.id,
            "status": "paid",
            "payment_reference": payment_reference,
            "items_activated": summary,
        }))
    }

    /// Activates a pending subscription, enforcing at-most-one-active by
    /// cancelling any other active subscription of the same user first.
    async fn activate_subscription(
        &self,
        item_id: uuid::Uuid,
        user_id: &UserId,
        summary: &mut CaptureSummary,
    ) -> Result<(), BillingError> {
        let id = SubscriptionId::from_uuid(item_id);
        let Some(mut subscription) = self.subscriptions.find_by_id(&id).await? else {
            return Ok(());
        };
        if subscription.status != SubscriptionStatus::Pending {
            return Ok(());
        }

        if let Some(mut previous) = self.subscriptions.find_active_by_user(user_id).await? {
            if previous.id != subscription.id {
                previous.cancel()?;
                self.subscriptions.save(&previous).await?;
                info!(
                    previous = %previous.id,
                    replacement = %subscription.id,
                    "previous active subscription cancelled"
                );
            }
        }

        let period_days = match self.plans.find_by_id(&subscription.plan_id).await? {
            Some(plan) => plan.period_days(),
            None => 30,
        };
        subscription.activate(period_days)?;
        self.subscriptions.save(&subscription).await?;
        summary.subscription = Some(subscription.id);
        Ok(())
    }

    /// Completes a pending purchase and credits its tokens.
    async fn complete_purchase(
        &self,
        item_id: uuid::Uuid,
        user_id: &UserId,
        summary: &mut CaptureSummary,
    ) -> Result<(), BillingError> {
        let id = PurchaseId::from_uuid(item_id);
        let Some(mut purchase) = self.purchases.find_by_id(&id).await? else {
            return Ok(());
        };
        if purchase.status != PurchaseStatus::Pending {
            return Ok(());
        }

        purchase.complete()?;
        self.purchases.save(&purchase).await?;

        self.tokens
            .credit(
                user_id,
                purchase.token_amount,
                TokenTransactionType::Purchase,
                Some(*purchase.id.as_uuid()),
                Some(format!(
                    "Token bundle purchase: {} tokens",
                    purchase.token_amount
                )),
            )
            .await?;

        summary.token_bundles.push(purchase.id);
        summary.tokens_credited += purchase.token_amount;
        Ok(())
    }

    /// Activates a pending add-on subscription.
    async fn activate_addon(
        &self,
        item_id: uuid::Uuid,
        summary: &mut CaptureSummary,
    ) -> Result<(), BillingError> {
        let id = AddOnSubscriptionId::from_uuid(item_id);
        let Some(mut addon) = self.addon_subscriptions.find_by_id(&id).await? else {
            return Ok(());
        };
        if addon.status != AddOnSubscriptionStatus::Pending {
            return Ok(());
        }

        addon.activate()?;
        self.addon_subscriptions.save(&addon).await?;
        summary.add_ons.push(addon.id);
        Ok(())
    }
}

#[async_trait]
impl EventHandler for PaymentCapturedHandler {
    fn name(&self) -> &'static str {
        "payment_captured"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::PaymentCaptured { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::PaymentCaptured {
                invoice_id,
                payment_reference,
                provider,
                ..
            } => self.capture(invoice_id, payment_reference, provider).await,
            _ => Err(super::unexpected_event("payment.captured")),
        }
    }
}
