//! Invoice repository port.
//!
//! The invoice aggregate is persisted whole: `save` writes the invoice and
//! its line items in one operation. Implementations own the transactional
//! mechanics; sagas only rely on read-then-write under isolation.

use async_trait::async_trait;

use crate::domain::billing::{BillingError, Invoice};
use crate::domain::foundation::{InvoiceId, SubscriptionId, UserId};

/// Repository port for [`Invoice`] persistence.
#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Find an invoice (with line items) by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, BillingError>;

    /// Find an invoice by the provider's checkout-session id.
    async fn find_by_provider_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<Invoice>, BillingError>;

    /// All invoices of a user, newest first.
    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Invoice>, BillingError>;

    /// All invoices referencing a subscription.
    async fn find_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Invoice>, BillingError>;

    /// All pending invoices.
    async fn find_pending(&self) -> Result<Vec<Invoice>, BillingError>;

    /// Pending invoices whose payment deadline has passed.
    async fn find_overdue(&self) -> Result<Vec<Invoice>, BillingError>;

    /// Insert or update an invoice with its line items.
    async fn save(&self, invoice: &Invoice) -> Result<(), BillingError>;
}
