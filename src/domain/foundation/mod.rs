//! Foundation module - shared domain primitives.
//!
//! Contains the value objects, identifiers, and error types that form the
//! vocabulary of the Ledgerline billing domain.

mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use errors::{ErrorCode, ValidationError};
pub use ids::{
    AddOnId, AddOnSubscriptionId, InvoiceId, LineItemId, PlanId, PurchaseId, SubscriptionId,
    TokenBundleId, TransactionId, UserId,
};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
