//! EventHandler port - a saga step invoked by the dispatcher.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::billing::{BillingError, DomainEvent};

/// A handler for normalized billing events.
///
/// Handlers are registered with the dispatcher under an event name and are
/// additionally asked `can_handle` before each invocation. Every handler
/// MUST be idempotent: webhook delivery is at-least-once and out of order,
/// so the same event may arrive seconds or days apart. Idempotency comes
/// from status-field guards on the entities, not from the dispatcher.
///
/// On success the handler returns a JSON payload the ingestion layer can
/// embed in its response; on failure, a [`BillingError`]. The dispatcher
/// converts both (and panics) into an aggregate
/// [`EventResult`](crate::domain::billing::EventResult).
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Handler name, used in logs and aggregate result payloads.
    fn name(&self) -> &'static str;

    /// Returns true if this handler processes the given event.
    fn can_handle(&self, event: &DomainEvent) -> bool;

    /// Processes the event and returns a structured result payload.
    async fn handle(&self, event: &DomainEvent) -> Result<Value, BillingError>;
}
