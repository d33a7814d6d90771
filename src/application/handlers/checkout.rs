//! Checkout saga - turns a checkout request into pending records and one
//! pending invoice.
//!
//! Everything a checkout creates stays PENDING until the capture saga sees
//! money: the subscription, the token bundle purchases, the add-on
//! subscriptions, and the invoice itself. The one exception is a plan with
//! trial days, which starts TRIALING immediately and contributes no line
//! item (trial periods are invoice-free).

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::info;

use crate::domain::billing::{
    AddOnSubscription, BillingError, BillingEvent, DomainEvent, Invoice, LineItemType,
    Subscription, TokenBundlePurchase,
};
use crate::domain::catalog::{AddOn, Plan, TokenBundle};
use crate::domain::foundation::{AddOnId, PlanId, TokenBundleId, UserId};
use crate::ports::{
    AddOnRepository, AddOnSubscriptionRepository, EventHandler, InvoiceRepository, PlanRepository,
    SubscriptionRepository, TokenBundlePurchaseRepository, TokenBundleRepository,
};

/// Handler for `checkout.requested` events.
///
/// Validation is two-phase: every referenced catalog item is resolved and
/// checked before the first write, so a validation failure aborts with no
/// partial state.
pub struct CheckoutHandler {
    plans: Arc<dyn PlanRepository>,
    bundles: Arc<dyn TokenBundleRepository>,
    addons: Arc<dyn AddOnRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    purchases: Arc<dyn TokenBundlePurchaseRepository>,
    addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl CheckoutHandler {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        plans: Arc<dyn PlanRepository>,
        bundles: Arc<dyn TokenBundleRepository>,
        addons: Arc<dyn AddOnRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        purchases: Arc<dyn TokenBundlePurchaseRepository>,
        addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
        invoices: Arc<dyn InvoiceRepository>,
    ) -> Self {
        Self {
            plans,
            bundles,
            addons,
            subscriptions,
            purchases,
            addon_subscriptions,
            invoices,
        }
    }

    async fn checkout(
        &self,
        user_id: &UserId,
        plan_id: &Option<PlanId>,
        token_bundle_ids: &[TokenBundleId],
        add_on_ids: &[AddOnId],
        currency: &str,
        payment_method_code: &str,
    ) -> Result<Value, BillingError> {
        // Phase 1: resolve and validate every catalog reference.
        let plan = match plan_id {
            Some(id) => Some(self.active_plan(id).await?),
            None => None,
        };
        let mut bundles = Vec::with_capacity(token_bundle_ids.len());
        for id in token_bundle_ids {
            bundles.push(self.active_bundle(id).await?);
        }
        let mut addons = Vec::with_capacity(add_on_ids.len());
        for id in add_on_ids {
            addons.push(self.active_addon(id).await?);
        }

        // Phase 2: build the pending records and the invoice.
        let mut invoice = Invoice::new(*user_id, currency);
        invoice.payment_method = Some(payment_method_code.to_string());

        let subscription = plan.as_ref().map(|plan| {
            let mut subscription = Subscription::new(*user_id, plan.id);
            if plan.has_trial() {
                subscription.start_trial(plan.trial_days);
            } else {
                invoice.add_line_item(
                    LineItemType::Subscription,
                    *subscription.id.as_uuid(),
                    plan.name.clone(),
                    plan.price,
                );
            }
            subscription
        });
        if let Some(subscription) = &subscription {
            invoice.plan_id = Some(subscription.plan_id);
            invoice.subscription_id = Some(subscription.id);
        }

        let mut purchases: Vec<TokenBundlePurchase> = bundles
            .iter()
            .map(|bundle| {
                let purchase =
                    TokenBundlePurchase::new(*user_id, bundle.id, bundle.token_amount, bundle.price);
                invoice.add_line_item(
                    LineItemType::TokenBundle,
                    *purchase.id.as_uuid(),
                    bundle.name.clone(),
                    bundle.price,
                );
                purchase
            })
            .collect();

        let mut addon_subscriptions: Vec<AddOnSubscription> = addons
            .iter()
            .map(|addon| {
                let addon_sub = AddOnSubscription::new(
                    *user_id,
                    addon.id,
                    subscription.as_ref().map(|s| s.id),
                );
                invoice.add_line_item(
                    LineItemType::AddOn,
                    *addon_sub.id.as_uuid(),
                    addon.name.clone(),
                    addon.price,
                );
                addon_sub
            })
            .collect();

        // Phase 3: persist. Invoice first (line items reference its id),
        // then stamp the invoice id onto each purchase record.
        if let Some(subscription) = &subscription {
            self.subscriptions.save(subscription).await?;
        }
        self.invoices.save(&invoice).await?;

        for purchase in &mut purchases {
            purchase.invoice_id = Some(invoice.id);
            self.purchases.save(purchase).await?;
        }
        for addon_sub in &mut addon_subscriptions {
            addon_sub.invoice_id = Some(invoice.id);
            self.addon_subscriptions.save(addon_sub).await?;
        }

        info!(
            invoice = %invoice.id,
            number = %invoice.invoice_number,
            total = %invoice.total_amount,
            line_items = invoice.line_items.len(),
            "checkout created"
        );

        Ok(json!({
            "invoice": invoice,
            "subscription": subscription,
            "token_bundles": purchases.iter().map(|p| p.id).collect::<Vec<_>>(),
            "add_ons": addon_subscriptions.iter().map(|a| a.id).collect::<Vec<_>>(),
            "message": "Checkout created. Awaiting payment.",
        }))
    }

    async fn active_plan(&self, id: &PlanId) -> Result<Plan, BillingError> {
        let plan = self
            .plans
            .find_by_id(id)
            .await?
            .ok_or(BillingError::PlanNotFound(*id))?;
        if !plan.is_active {
            return Err(BillingError::PlanNotActive(*id));
        }
        Ok(plan)
    }

    async fn active_bundle(&self, id: &TokenBundleId) -> Result<TokenBundle, BillingError> {
        let bundle = self
            .bundles
            .find_by_id(id)
            .await?
            .ok_or(BillingError::TokenBundleNotFound(*id))?;
        if !bundle.is_active {
            return Err(BillingError::TokenBundleNotActive(*id));
        }
        Ok(bundle)
    }

    async fn active_addon(&self, id: &AddOnId) -> Result<AddOn, BillingError> {
        let addon = self
            .addons
            .find_by_id(id)
            .await?
            .ok_or(BillingError::AddOnNotFound(*id))?;
        if !addon.is_active {
            return Err(BillingError::AddOnNotActive(*id));
        }
        Ok(addon)
    }
}

#[async_trait]
impl EventHandler for CheckoutHandler {
    fn name(&self) -> &'static str {
        "checkout"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::CheckoutRequested { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::CheckoutRequested {
                user_id,
                plan_id,
                token_bundle_ids,
                add_on_ids,
                currency,
                payment_method_code,
            } => {
                self.checkout(
                    user_id,
                    plan_id,
                    token_bundle_ids,
                    add_on_ids,
                    currency,
                    payment_method_code,
                )
                .await
            }
            _ => Err(super::unexpected_event("checkout.requested")),
        }
    }
}
