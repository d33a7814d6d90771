//! Billing error taxonomy.
//!
//! Validation and precondition failures are terminal: they are returned to
//! the caller and must not be retried. Infrastructure failures are
//! converted to failure results at the dispatcher boundary and logged there.

use thiserror::Error;

use crate::domain::foundation::{
    AddOnId, AddOnSubscriptionId, ErrorCode, InvoiceId, PlanId, PurchaseId, SubscriptionId,
    TokenBundleId, ValidationError,
};

/// Errors produced by billing services and saga handlers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    // Catalog validation
    #[error("Plan {0} not found")]
    PlanNotFound(PlanId),

    #[error("Plan {0} is not active")]
    PlanNotActive(PlanId),

    #[error("Token bundle {0} not found")]
    TokenBundleNotFound(TokenBundleId),

    #[error("Token bundle {0} is not active")]
    TokenBundleNotActive(TokenBundleId),

    #[error("Add-on {0} not found")]
    AddOnNotFound(AddOnId),

    #[error("Add-on {0} is not active")]
    AddOnNotActive(AddOnId),

    // Record lookups
    #[error("Invoice {0} not found")]
    InvoiceNotFound(InvoiceId),

    #[error("Subscription {0} not found")]
    SubscriptionNotFound(SubscriptionId),

    #[error("Token bundle purchase {0} not found")]
    PurchaseNotFound(PurchaseId),

    #[error("Add-on subscription {0} not found")]
    AddOnSubscriptionNotFound(AddOnSubscriptionId),

    // Invoice preconditions
    #[error("Invoice already paid")]
    InvoiceAlreadyPaid,

    #[error("Cannot mark as paid: invoice status is {status}")]
    InvoiceNotPayable { status: String },

    #[error("Cannot refund: invoice status is {status}")]
    InvoiceNotRefundable { status: String },

    #[error("Cannot restore: invoice status is {status}, expected refunded")]
    InvoiceNotRestorable { status: String },

    // Subscription preconditions
    #[error("Subscription is already paused")]
    SubscriptionAlreadyPaused,

    #[error("Only active subscriptions can be {operation}")]
    SubscriptionNotActive { operation: &'static str },

    #[error("Subscription is not paused")]
    SubscriptionNotPaused,

    #[error("Trialing subscriptions cannot be activated directly")]
    TrialingNotActivatable,

    #[error("Already subscribed to this plan")]
    SamePlan,

    // Token preconditions
    #[error("Credit amount must be positive")]
    NonPositiveCredit,

    #[error("Debit amount must be positive")]
    NonPositiveDebit,

    #[error("Insufficient token balance")]
    InsufficientBalance,

    // State machine violations surfaced from entities
    #[error(transparent)]
    Validation(#[from] ValidationError),

    // Storage / unexpected
    #[error("Repository error: {0}")]
    Infrastructure(String),
}

impl BillingError {
    /// Creates an infrastructure error from any underlying cause.
    pub fn infrastructure(message: impl Into<String>) -> Self {
        BillingError::Infrastructure(message.into())
    }

    /// Returns the machine-readable error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::PlanNotFound(_) => ErrorCode::PlanNotFound,
            BillingError::PlanNotActive(_) => ErrorCode::PlanInactive,
            BillingError::TokenBundleNotFound(_) => ErrorCode::TokenBundleNotFound,
            BillingError::TokenBundleNotActive(_) => ErrorCode::TokenBundleInactive,
            BillingError::AddOnNotFound(_) => ErrorCode::AddOnNotFound,
            BillingError::AddOnNotActive(_) => ErrorCode::AddOnInactive,
            BillingError::InvoiceNotFound(_) => ErrorCode::InvoiceNotFound,
            BillingError::SubscriptionNotFound(_) => ErrorCode::SubscriptionNotFound,
            BillingError::PurchaseNotFound(_) => ErrorCode::PurchaseNotFound,
            BillingError::AddOnSubscriptionNotFound(_) => ErrorCode::AddOnSubscriptionNotFound,
            BillingError::InvoiceAlreadyPaid | BillingError::InvoiceNotPayable { .. } => {
                ErrorCode::InvoiceNotPayable
            }
            BillingError::InvoiceNotRefundable { .. } => ErrorCode::InvoiceNotRefundable,
            BillingError::InvoiceNotRestorable { .. } => ErrorCode::InvoiceNotRestorable,
            BillingError::SubscriptionAlreadyPaused
            | BillingError::SubscriptionNotActive { .. }
            | BillingError::SubscriptionNotPaused
            | BillingError::TrialingNotActivatable
            | BillingError::SamePlan => ErrorCode::InvalidStateTransition,
            BillingError::NonPositiveCredit | BillingError::NonPositiveDebit => {
                ErrorCode::ValidationFailed
            }
            BillingError::InsufficientBalance => ErrorCode::InsufficientBalance,
            BillingError::Validation(_) => ErrorCode::InvalidStateTransition,
            BillingError::Infrastructure(_) => ErrorCode::DatabaseError,
        }
    }

    /// Returns true for terminal errors that must not be retried.
    ///
    /// Everything except infrastructure failures is terminal: replaying the
    /// same event cannot change a validation or precondition outcome.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, BillingError::Infrastructure(_))
    }
}
