//! Billing configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Billing defaults.
#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// ISO 4217 currency used when an event does not carry one
    /// (e.g. trial renewal invoices).
    #[serde(default = "default_currency")]
    pub default_currency: String,

    /// Days until a pending invoice stops being payable.
    #[serde(default = "default_invoice_due_days")]
    pub invoice_due_days: i64,

    /// Days-ahead window for expiring-subscription reminders.
    #[serde(default = "default_renewal_reminder_days")]
    pub renewal_reminder_days: i64,
}

fn default_currency() -> String {
    "EUR".to_string()
}

fn default_invoice_due_days() -> i64 {
    30
}

fn default_renewal_reminder_days() -> i64 {
    7
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            default_currency: default_currency(),
            invoice_due_days: default_invoice_due_days(),
            renewal_reminder_days: default_renewal_reminder_days(),
        }
    }
}

impl BillingConfig {
    /// Validate billing configuration.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.default_currency.len() != 3 {
            return Err(ValidationError::InvalidCurrency);
        }
        if self.invoice_due_days <= 0 {
            return Err(ValidationError::InvalidDueDays);
        }
        if self.renewal_reminder_days < 0 {
            return Err(ValidationError::InvalidReminderDays);
        }
        Ok(())
    }
}
