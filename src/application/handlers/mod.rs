//! Saga handlers invoked by the event dispatcher.
//!
//! One handler per normalized event. Handlers destructure their event,
//! drive the entity mutations through repositories and services, and
//! return a structured JSON payload for the ingestion layer.

mod checkout;
mod payment_captured;
mod payment_failed;
mod payment_refunded;
mod refund_reversed;
mod subscription_cancelled;

pub use checkout::CheckoutHandler;
pub use payment_captured::{CaptureSummary, PaymentCapturedHandler};
pub use payment_failed::PaymentFailedHandler;
pub use payment_refunded::PaymentRefundedHandler;
pub use refund_reversed::RefundReversedHandler;
pub use subscription_cancelled::SubscriptionCancelledHandler;

use crate::domain::billing::BillingError;
use crate::domain::foundation::ValidationError;

/// Error for an event payload that does not match the handler.
///
/// Only reachable when a handler is registered under the wrong name AND its
/// `can_handle` is bypassed; kept as a guard rather than a panic.
fn unexpected_event(expected: &'static str) -> BillingError {
    BillingError::Validation(ValidationError::invalid_format(
        "event",
        format!("expected {}", expected),
    ))
}
