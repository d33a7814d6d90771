//! Application configuration module
//!
//! Type-safe configuration loading from environment variables using the
//! `config` and `dotenvy` crates. Configuration is loaded with the
//! `LEDGERLINE` prefix and nested values use double underscores as
//! separators.
//!
//! # Example
//!
//! ```no_run
//! use ledgerline::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Billing in {}", config.billing.default_currency);
//! ```

mod billing;
mod error;
mod payment;

pub use billing::BillingConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::{PaymentConfig, ProviderSettings};

use serde::Deserialize;

/// Root application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Billing defaults (currency, invoice due days, reminders).
    #[serde(default)]
    pub billing: BillingConfig,

    /// Payment provider credentials.
    #[serde(default)]
    pub payment: PaymentConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Loads a `.env` file if present (development), then reads variables
    /// with the `LEDGERLINE` prefix, e.g.:
    ///
    /// - `LEDGERLINE__BILLING__DEFAULT_CURRENCY=USD`
    /// - `LEDGERLINE__PAYMENT__CARD__API_KEY=...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into the expected
    /// types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("LEDGERLINE")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.billing.validate()?;
        self.payment.validate()?;
        Ok(())
    }
}
