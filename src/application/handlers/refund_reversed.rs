//! Restore saga handler - thin delegation to the restore service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::application::services::RestoreService;
use crate::domain::billing::{BillingError, BillingEvent, DomainEvent};
use crate::ports::EventHandler;

/// Handler for `refund.reversed` events.
pub struct RefundReversedHandler {
    restores: Arc<RestoreService>,
}

impl RefundReversedHandler {
    pub fn new(restores: Arc<RestoreService>) -> Self {
        Self { restores }
    }
}

#[async_trait]
impl EventHandler for RefundReversedHandler {
    fn name(&self) -> &'static str {
        "refund_reversed"
    }

    fn can_handle(&self, event: &DomainEvent) -> bool {
        matches!(event.payload, BillingEvent::RefundReversed { .. })
    }

    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError> {
        match &event.payload {
            BillingEvent::RefundReversed { invoice_id, reason } => {
                let outcome = self.restores.process_restore(invoice_id, reason).await?;
                Ok(json!({
                    "invoice_id": outcome.invoice.id,
                    "status": "paid",
                    "reason": reason,
                    "items_restored": outcome.items_restored,
                }))
            }
            _ => Err(super::unexpected_event("refund.reversed")),
        }
    }
}
