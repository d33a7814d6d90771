//! Refund service - orchestrates a full invoice refund.
//!
//! Reverses everything the capture saga activated: invoice to REFUNDED,
//! subscription and add-ons cancelled, tokens debited through the clamped
//! refund debit. Each reversal step is guarded by its own status check, so
//! a replayed refund converges on the same end state.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::domain::billing::{
    AddOnSubscriptionStatus, BillingError, Invoice, InvoiceStatus, LineItemType, PurchaseStatus,
};
use crate::domain::foundation::{
    AddOnSubscriptionId, InvoiceId, PurchaseId, SubscriptionId, UserId,
};
use crate::ports::{
    AddOnSubscriptionRepository, InvoiceRepository, SubscriptionRepository,
    TokenBundlePurchaseRepository,
};

use super::TokenService;

/// What a refund actually reversed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Default)]
pub struct RefundSummary {
    pub subscription: Option<SubscriptionId>,
    pub token_bundles: Vec<PurchaseId>,
    pub add_ons: Vec<AddOnSubscriptionId>,
    /// Tokens actually removed; may be less than the nominal bundle size
    /// when the user already spent some.
    pub tokens_debited: i64,
}

/// Result of a refund operation.
#[derive(Debug, Clone, PartialEq)]
pub struct RefundOutcome {
    pub invoice: Invoice,
    pub items_reversed: RefundSummary,
}

/// Service for processing provider-confirmed invoice refunds.
///
/// Refunds are never inferred from invoice age; only an explicit
/// `payment.refunded` event or an admin action reaches this service.
pub struct RefundService {
    invoices: Arc<dyn InvoiceRepository>,
    subscriptions: Arc<dyn SubscriptionRepository>,
    purchases: Arc<dyn TokenBundlePurchaseRepository>,
    addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
    tokens: Arc<TokenService>,
}

impl RefundService {
    pub fn new(
        invoices: Arc<dyn InvoiceRepository>,
        subscriptions: Arc<dyn SubscriptionRepository>,
        purchases: Arc<dyn TokenBundlePurchaseRepository>,
        addon_subscriptions: Arc<dyn AddOnSubscriptionRepository>,
        tokens: Arc<TokenService>,
    ) -> Self {
        Self {
            invoices,
            subscriptions,
            purchases,
            addon_subscriptions,
            tokens,
        }
    }

    /// Processes a full refund for an invoice.
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice does not exist
    /// - `InvoiceNotRefundable` unless the invoice is PAID
    pub async fn process_refund(
        &self,
        invoice_id: &InvoiceId,
        refund_reference: &str,
    ) -> Result<RefundOutcome, BillingError> {
        let mut invoice = self
            .invoices
            .find_by_id(invoice_id)
            .await?
            .ok_or(BillingError::InvoiceNotFound(*invoice_id))?;

        if invoice.status != InvoiceStatus::Paid {
            return Err(BillingError::InvoiceNotRefundable {
                status: invoice.status_label(),
            });
        }

        invoice.mark_refunded()?;
        self.invoices.save(&invoice).await?;

        let mut summary = RefundSummary::default();
        for line_item in &invoice.line_items {
            match line_item.item_type {
                LineItemType::Subscription => {
                    self.reverse_subscription(line_item.item_id, &mut summary)
                        .await?;
                }
                LineItemType::TokenBundle => {
                    self.reverse_token_bundle(line_item.item_id, &invoice.user_id, &mut summary)
                        .await?;
                }
                LineItemType::AddOn => {
                    self.reverse_addon(line_item.item_id, &mut summary).await?;
                }
            }
        }

        info!(
            invoice = %invoice.id,
            reference = refund_reference,
            tokens_debited = summary.tokens_debited,
            "invoice refunded"
        );

        Ok(RefundOutcome {
            invoice,
            items_reversed: summary,
        })
    }

    /// Cancels the subscription behind a line item if it is still active.
    async fn reverse_subscription(
        &self,
        item_id: uuid::Uuid,
        summary: &mut RefundSummary,
    ) -> Result<(), BillingError> {
        let id = SubscriptionId::from_uuid(item_id);
        if let Some(mut subscription) = self.subscriptions.find_by_id(&id).await? {
            if subscription.is_active() {
                subscription.cancel()?;
                self.subscriptions.save(&subscription).await?;
                summary.subscription = Some(subscription.id);
            }
        }
        Ok(())
    }

    /// Marks a completed purchase refunded and claws back its tokens.
    async fn reverse_token_bundle(
        &self,
        item_id: uuid::Uuid,
        user_id: &UserId,
        summary: &mut RefundSummary,
    ) -> Result<(), BillingError> {
        let id = PurchaseId::from_uuid(item_id);
        if let Some(mut purchase) = self.purchases.find_by_id(&id).await? {
            if purchase.status == PurchaseStatus::Completed {
                purchase.refund()?;
                self.purchases.save(&purchase).await?;

                let actual = self
                    .tokens
                    .refund_tokens(
                        user_id,
                        purchase.token_amount,
                        Some(*purchase.id.as_uuid()),
                        Some(format!("Refund: {} tokens", purchase.token_amount)),
                    )
                    .await?;

                summary.token_bundles.push(purchase.id);
                summary.tokens_debited += actual;
            }
        }
        Ok(())
    }

    /// Cancels an active add-on subscription.
    async fn reverse_addon(
        &self,
        item_id: uuid::Uuid,
        summary: &mut RefundSummary,
    ) -> Result<(), BillingError> {
        let id = AddOnSubscriptionId::from_uuid(item_id);
        if let Some(mut addon) = self.addon_subscriptions.find_by_id(&id).await? {
            if addon.status == AddOnSubscriptionStatus::Active {
                addon.cancel()?;
                self.addon_subscriptions.save(&addon).await?;
                summary.add_ons.push(addon.id);
            }
        }
        Ok(())
    }
}
