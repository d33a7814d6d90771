//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Default currency must be a 3-letter ISO 4217 code")]
    InvalidCurrency,

    #[error("Invoice due days must be positive")]
    InvalidDueDays,

    #[error("Renewal reminder days cannot be negative")]
    InvalidReminderDays,

    #[error("Provider '{0}' is enabled but has no API key")]
    MissingProviderKey(&'static str),

    #[error("Provider '{0}' is enabled but has no webhook secret")]
    MissingWebhookSecret(&'static str),

    #[error("No payment provider enabled")]
    NoProviderEnabled,
}
