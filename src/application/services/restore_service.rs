//! Restore service - reverses a refund.
//!
//! The mirror of the refund saga: invoice back to PAID, cancelled
//! subscription and add-ons re-activated, tokens re-credited. A restore is
//! a fresh activation window, not a resumption: subscription expiry is
//! recomputed from now.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::billing::{
    AddOnSubscriptionStatus, BillingError, Invoice, InvoiceStatus, LineItemType, PurchaseStatus,
    SubscriptionStatus, TokenTransactionType,
};
use crate::domain::foundation::{
    AddOnSubscriptionId, InvoiceId, PurchaseId, SubscriptionId, UserId,
};
use crate::ports::{
    AddOnSubscriptionRepository, InvoiceRepository, PlanRepository, SubscriptionRepository,
    TokenBundlePurchaseRepository,
};

use super::TokenService;

/// What a restore re-activated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RestoreSummary {
    pub subscription: Option<SubscriptionId>,
    pub token_bundles: Vec<PurchaseId>,
    pub add_ons: Vec<AddOnSubscriptionId>,
    pub tokens_credited: i64,
}

/// Result of a restore operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoreOutcome {
    pub invoice: Invoice,
    pub items_restored: RestoreSummary,
}

/// Service for restoring a refunded invoice after the provider cancels the
/// refund.
pub struct RestoreService {
    invoices: Arc<dyn InvoiceRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    purchases: Arc<dyn TokenBundlePurchaseRepository>,
    addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
    tokens: Arc<TokenService>,
}

impl RestoreService {
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

    /// Restores a refunded invoice back to PAID, re-activating its items.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice does not exist
    /// - `InvoiceNotRestorable` unless the invoice is REFUNDED
    pub async fn process_restore(
        &self,
        invoice_id: &InvoiceId,
        reason: &str,
    ) -> Result<RestoreOutcome, BillingError> {
        let mut invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(BillingError::InvoiceNotFound(*invoice_id))?;

        if invoice.status != InvoiceStatus::Refunded {
            return Err(BillingError::InvoiceNotRestorable {
                status: invoice.status_label(),
            });
        }

        invoice.mark_restored()?;
        self.invoices.save(&invoice).await?;

        let mut summary = RestoreSummary::default();
        for line_item in &invoice.line_items {
            match line_item.item_type {
                LineItemType::Subscription => {
                    self.restore_subscription(line_item.item_id, &mut summary)
                        .await?;
                }
                LineItemType::TokenBundle => {
                    self.restore_token_bundle(line_item.item_id, &invoice.user_id, &mut summary)
                        .await?;
                }
                LineItemType::AddOn => {
                    self.restore_addon(line_item.item_id, &mut summary).await?;
                }
            }
        }

        info!(
            invoice = %invoice.id,
            reason,
            tokens_credited = summary.tokens_credited,
            "refund reversed, invoice restored"
        );

        Ok(RestoreOutcome {
            invoice,
            items_restored: summary,
        })
    }

    /// Re-activates a cancelled subscription with a fresh expiry window.
    async fn restore_subscription(
        &self,
        item_id: uuid::Uuid,
        summary: &mut RestoreSummary,
    ) -> Result<(), BillingError> {
        let id = SubscriptionId::from_uuid(item_id);
        if let Some(mut subscription) = self.subscriptions.find_by_id(&id).await? {
            if subscription.status == SubscriptionStatus::Cancelled {
                let period_days = match self.plans.find_by_id(&subscription.plan_id).await? {
                    Some(plan) => plan.period_days(),
                    None => 30,
                };
                subscription.activate(period_days)?;
                self.subscriptions.save(&subscription).await?;
                summary.subscription = Some(subscription.id);
            }
        }
        Ok(())
    }

    /// Re-completes a refunded purchase and re-credits its nominal tokens.
    async fn restore_token_bundle(
        &self,
        item_id: uuid::Uuid,
        user_id: &UserId,
        summary: &mut RestoreSummary,
    ) -> Result<(), BillingError> {
        let id = PurchaseId::from_uuid(item_id);
        if let Some(mut purchase) = self.purchases.find_by_id(&id).await? {
            if purchase.status == PurchaseStatus::Refunded {
                purchase.complete()?;
                self.purchases.save(&purchase).await?;

                self.tokens
                    .credit(
                        user_id,
                        purchase.token_amount,
                        TokenTransactionType::Purchase,
                        Some(*purchase.id.as_uuid()),
                        Some(format!(
                            "Refund reversed: {} tokens restored",
                            purchase.token_amount
                        )),
                    )
                    .await?;

                summary.token_bundles.push(purchase.id);
                summary.tokens_credited += purchase.token_amount;
            }
        }
        Ok(())
    }

    /// Re-activates a cancelled add-on subscription.
    async fn restore_addon(
        &self,
        item_id: uuid::Uuid,
        summary: &mut RestoreSummary,
    ) -> Result<(), BillingError> {
        let id = AddOnSubscriptionId::from_uuid(item_id);
        if let Some(mut addon) = self.addon_subscriptions.find_by_id(&id).await? {
            if addon.status == AddOnSubscriptionStatus::Cancelled {
                addon.activate()?;
                self.addon_subscriptions.save(&addon).await?;
                summary.add_ons.push(addon.id);
            }
        }
        Ok(())
    }
}
