//! Refund saga handler - thin delegation to the refund service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::application::services::RefundService;
use crate::domain::billing::{BillingError, BillingEvent, DomainEvent};
use crate::ports::EventHandler;

/// Handler for `payment.refunded` events.
pub struct PaymentRefundedHandler {
    refunds: Arc<RefundService>,
}

impl PaymentRefundedHandler {
    pub fn new(refunds: Arc<RefundService>) -> Self {
        Self { refunds }
    }
}

#[async_trait]
impl EventHandler for PaymentRefundedHandler {
    fn name(&self) -> &'static str {
        "payment_refunded"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::PaymentRefunded { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::PaymentRefunded {
                invoice_id,
                refund_reference,
            } => {
                let outcome = self
                    .refunds
                    .process_refund(invoice_id, refund_reference)
                    .await?;
                Ok(json!({
                    "invoice_id": outcome.invoice.id,
                    "status": "refunded",
                    "refund_reference": refund_reference,
                    "items_reversed": outcome.items_reversed,
                }))
            }
            _ => Err(super::unexpected_event("payment.refunded")),
        }
    }
}
