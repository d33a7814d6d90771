//! Error types for the domain layer.

use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction and state transitions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be positive, got {actual}")]
    NotPositive { field: String, actual: i64 },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: String, to: String },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates a not-positive validation error.
    pub fn not_positive(field: impl Into<String>, actual: i64) -> Self {
        ValidationError::NotPositive {
            field: field.into(),
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid state transition error.
    pub fn invalid_transition(from: impl fmt::Debug, to: impl fmt::Debug) -> Self {
        ValidationError::InvalidTransition {
            from: format!("{:?}", from),
            to: format!("{:?}", to),
        }
    }
}

/// Error codes organized by category.
///
/// The out-of-scope HTTP layer maps these onto status codes: not-found
/// codes to 404, precondition codes to 400/409, infrastructure to 500.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Not found errors
    PlanNotFound,
    TokenBundleNotFound,
    AddOnNotFound,
    InvoiceNotFound,
    SubscriptionNotFound,
    PurchaseNotFound,
    AddOnSubscriptionNotFound,

    // Catalog state errors
    PlanInactive,
    TokenBundleInactive,
    AddOnInactive,

    // Precondition / conflict errors
    InvalidStateTransition,
    InvoiceNotPayable,
    InvoiceNotRefundable,
    InvoiceNotRestorable,
    InsufficientBalance,

    // Infrastructure errors
    DatabaseError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::PlanNotFound => "PLAN_NOT_FOUND",
            ErrorCode::TokenBundleNotFound => "TOKEN_BUNDLE_NOT_FOUND",
            ErrorCode::AddOnNotFound => "ADD_ON_NOT_FOUND",
            ErrorCode::InvoiceNotFound => "INVOICE_NOT_FOUND",
            ErrorCode::SubscriptionNotFound => "SUBSCRIPTION_NOT_FOUND",
            ErrorCode::PurchaseNotFound => "PURCHASE_NOT_FOUND",
            ErrorCode::AddOnSubscriptionNotFound => "ADD_ON_SUBSCRIPTION_NOT_FOUND",
            ErrorCode::PlanInactive => "PLAN_INACTIVE",
            ErrorCode::TokenBundleInactive => "TOKEN_BUNDLE_INACTIVE",
            ErrorCode::AddOnInactive => "ADD_ON_INACTIVE",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::InvoiceNotPayable => "INVOICE_NOT_PAYABLE",
            ErrorCode::InvoiceNotRefundable => "INVOICE_NOT_REFUNDABLE",
            ErrorCode::InvoiceNotRestorable => "INVOICE_NOT_RESTORABLE",
            ErrorCode::InsufficientBalance => "INSUFFICIENT_BALANCE",
            ErrorCode::DatabaseError => "DATABASE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_error_empty_field_displays_correctly() {
        let err = ValidationError::empty_field("currency");
        assert_eq!(format!("{}", err), "Field 'currency' cannot be empty");
    }

    #[test]
    fn validation_error_not_positive_displays_correctly() {
        let err = ValidationError::not_positive("amount", -5);
        assert_eq!(format!("{}", err), "Field 'amount' must be positive, got -5");
    }

    #[test]
    fn invalid_transition_records_both_states() {
        #[derive(Debug)]
        enum S {
            Paid,
            Pending,
        }
        let err = ValidationError::invalid_transition(S::Paid, S::Pending);
        assert_eq!(format!("{}", err), "Cannot transition from Paid to Pending");
    }

    #[test]
    fn error_code_display_formats_correctly() {
        assert_eq!(format!("{}", ErrorCode::InvoiceNotFound), "INVOICE_NOT_FOUND");
        assert_eq!(
            format!("{}", ErrorCode::InsufficientBalance),
            "INSUFFICIENT_BALANCE"
        );
    }
}
