//! Normalized domain events and the saga result type.
//!
//! The webhook ingestion layer (out of scope here) collapses provider
//! payloads from the card, wallet, and regional processors into this one
//! vocabulary. Routing is a `match` on the enum, never runtime type
//! inspection, and each event carries exactly the fields its saga needs.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::{
    AddOnId, InvoiceId, Money, PlanId, SubscriptionId, Timestamp, TokenBundleId, UserId,
};

/// Payload of a normalized billing event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "name")]
pub enum BillingEvent {
    /// A user asked to buy a plan and/or bundles and/or add-ons.
    #[serde(rename = "checkout.requested")]
    CheckoutRequested {
        user_id: UserId,
        plan_id: Option<PlanId>,
        token_bundle_ids: Vec<TokenBundleId>,
        add_on_ids: Vec<AddOnId>,
        currency: String,
        payment_method_code: String,
    },

    /// A provider confirmed money was received for an invoice.
    #[serde(rename = "payment.captured")]
    PaymentCaptured {
        invoice_id: InvoiceId,
        payment_reference: String,
        amount: Money,
        currency: String,
        provider: String,
        transaction_id: Option<String>,
    },

    /// A provider confirmed a refund was issued.
    #[serde(rename = "payment.refunded")]
    PaymentRefunded {
        invoice_id: InvoiceId,
        refund_reference: String,
    },

    /// A provider cancelled a previously issued refund.
    #[serde(rename = "refund.reversed")]
    RefundReversed { invoice_id: InvoiceId, reason: String },

    /// A provider-side subscription was cancelled.
    #[serde(rename = "subscription.cancelled")]
    SubscriptionCancelled {
        subscription_id: SubscriptionId,
        user_id: UserId,
        reason: String,
        provider: String,
    },

    /// A payment attempt failed at the provider.
    #[serde(rename = "payment.failed")]
    PaymentFailed {
        subscription_id: SubscriptionId,
        user_id: UserId,
        error_code: String,
        error_message: String,
        provider: String,
    },
}

impl BillingEvent {
    /// Stable event name used for dispatcher registration and logging.
    pub fn name(&self) -> &'static str {
        match self {
            BillingEvent::CheckoutRequested { .. } => "checkout.requested",
            BillingEvent::PaymentCaptured { .. } => "payment.captured",
            BillingEvent::PaymentRefunded { .. } => "payment.refunded",
            BillingEvent::RefundReversed { .. } => "refund.reversed",
            BillingEvent::SubscriptionCancelled { .. } => "subscription.cancelled",
            BillingEvent::PaymentFailed { .. } => "payment.failed",
        }
    }
}

/// A billing event with its occurrence time.
///
/// Constructed by the ingestion layer, consumed once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomainEvent {
    pub occurred_at: Timestamp,
    #[serde(flatten)]
    pub payload: BillingEvent,
}

impl DomainEvent {
    /// Wraps a payload, stamping the current time.
    pub fn new(payload: BillingEvent) -> Self {
        Self {
            occurred_at: Timestamp::now(),
            payload,
        }
    }

    pub fn name(&self) -> &'static str {
        self.payload.name()
    }
}

/// Outcome of handling (or dispatching) an event.
///
/// This is the contract with the ingestion layer: enough to build an HTTP
/// response without the saga knowing about HTTP. `success` is false only
/// when at least one invoked handler failed; `error` then carries the first
/// failure message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventResult {
    pub success: bool,
    #[serde(default)]
    pub data: Map<String, Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EventResult {
    /// Successful result with a data payload.
    ///
    /// A non-object `data` value is stored under the `"result"` key.
    pub fn ok(data: Value) -> Self {
        let data = match data {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                let mut map = Map::new();
                map.insert("result".to_string(), other);
                map
            }
        };
        Self {
            success: true,
            data,
            error: None,
        }
    }

    /// Successful result without data.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: Map::new(),
            error: None,
        }
    }

    /// Failure result carrying an error message.
    pub fn fail(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: Map::new(),
            error: Some(error.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
