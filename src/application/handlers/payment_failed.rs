//! Payment-failed handler.
//!
//! A failed payment leaves every entitlement PENDING; the handler only
//! marks the subscription's open invoices FAILED and records the provider
//! error. A later successful capture can still pay a failed invoice.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};
use tracing::warn;

use crate::domain::billing::{BillingError, BillingEvent, DomainEvent, InvoiceStatus};
use crate::domain::foundation::SubscriptionId;
use crate::ports::{EventHandler, InvoiceRepository};

/// Handler for `payment.failed` events.
pub struct PaymentFailedHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl PaymentFailedHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    async fn record_failure(
        &self,
        subscription_id: &SubscriptionId,
        error_code: &str,
        error_message: &str,
        provider: &str,
    ) -> Result<Value, BillingError> {
        let mut failed = Vec::new();
        for mut invoice in self.invoices.find_by_subscription(subscription_id).await? {
            if invoice.status == InvoiceStatus::Pending {
                invoice.mark_failed()?;
                self.invoices.save(&invoice).await?;
                failed.push(invoice.id);
            }
        }

        warn!(
            subscription = %subscription_id,
            error_code,
            error_message,
            provider,
            invoices_failed = failed.len(),
            "payment failed"
        );

        Ok(json!({
            "subscription_id": subscription_id,
            "error_code": error_code,
            "invoices_failed": failed,
        }))
    }
}

#[async_trait]
impl EventHandler for PaymentFailedHandler {
    fn name(&self) -> &'static str {
        "payment_failed"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::PaymentFailed { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::PaymentFailed {
                subscription_id,
                error_code,
                error_message,
                provider,
                ..
            } => {
                self.record_failure(subscription_id, error_code, error_message, provider)
                    .await
            }
            _ => Err(super::unexpected_event("payment.failed")),
        }
    }
}
