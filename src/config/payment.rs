//! Payment provider configuration
//!
//! Three external processors can notify this system: a card processor, a
//! wallet provider, and a regional processor. Their webhook payloads are
//! normalized by the ingestion layer; this config only carries credentials
//! for the providers the deployment actually enables.

use serde::Deserialize;

use super::error::ValidationError;

/// Credentials for one payment provider.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProviderSettings {
    /// Whether webhooks from this provider are accepted.
    #[serde(default)]
    pub enabled: bool,

    /// Provider API key.
    #[serde(default)]
    pub api_key: String,

    /// Webhook signing secret.
    #[serde(default)]
    pub webhook_secret: String,
}

impl ProviderSettings {
    fn validate(&self, provider: &'static str) -> Result<(), ValidationError> {
        if !self.enabled {
            return Ok(());
        }
        if self.api_key.is_empty() {
            return Err(ValidationError::MissingProviderKey(provider));
        }
        if self.webhook_secret.is_empty() {
            return Err(ValidationError::MissingWebhookSecret(provider));
        }
        Ok(())
    }
}

/// Payment configuration for all supported providers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentConfig {
    /// Card processor.
    #[serde(default)]
    pub card: ProviderSettings,

    /// Wallet provider.
    #[serde(default)]
    pub wallet: ProviderSettings,

    /// Regional processor.
    #[serde(default)]
    pub regional: ProviderSettings,
}

impl PaymentConfig {
    /// Validate payment configuration.
    ///
    /// Every enabled provider needs credentials, and at least one provider
    /// must be enabled.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.card.validate("card")?;
        self.wallet.validate("wallet")?;
        self.regional.validate("regional")?;

        if !self.card.enabled && !self.wallet.enabled && !self.regional.enabled {
            return Err(ValidationError::NoProviderEnabled);
        }
        Ok(())
    }

    /// Returns true if the named provider is enabled.
    pub fn is_enabled(&self, provider: &str) -> bool {
        match provider {
            "card" => self.card.enabled,
            "wallet" => self.wallet.enabled,
            "regional" => self.regional.enabled,
            _ => false,
        }
    }
}
