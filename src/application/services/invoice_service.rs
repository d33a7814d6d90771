//! Invoice service.
//!
//! Admin- and renewal-facing invoice operations. The capture saga has its
//! own paid-marking path with replay semantics; this service backs the
//! manual flows, where a repeated mark-paid is an operator error, not a
//! webhook replay.

use std::sync::Arc;

use tracing::info;

use crate::domain::billing::{BillingError, Invoice, InvoiceStatus};
use crate::domain::foundation::{InvoiceId, SubscriptionId, UserId};
use crate::ports::InvoiceRepository;

/// Service for managing invoices.
pub struct InvoiceService {
    invoices: Arc<dyn InvoiceRepository>,
}

impl InvoiceService {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    /// Invoice by id, or `None`.
    pub async fn get_invoice(&self, invoice_id: &InvoiceId) -> Result<Option<Invoice>, BillingError> {
        self.invoices.find_by_id(invoice_id).await
    }

    /// All invoices of a user.
    pub async fn get_user_invoices(&self, user_id: &UserId) -> Result<Vec<Invoice>, BillingError> {
        self.invoices.find_by_user(user_id).await
    }

    /// All invoices of a subscription.
    pub async fn get_subscription_invoices(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Invoice>, BillingError> {
        self.invoices.find_by_subscription(subscription_id).await
    }

    /// All pending invoices.
    pub async fn get_pending_invoices(&self) -> Result<Vec<Invoice>, BillingError> {
        self.invoices.find_pending().await
    }

    /// Pending invoices past their payment deadline.
    pub async fn get_overdue_invoices(&self) -> Result<Vec<Invoice>, BillingError> {
        self.invoices.find_overdue().await
    }

    /// Manually marks an invoice paid (operator flow).
    ///
    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice does not exist
    /// - `InvoiceAlreadyPaid` on a repeated mark-paid
    /// - `InvoiceNotPayable` for any other non-pending status
    pub async fn mark_paid(
        &self,
        invoice_id: &InvoiceId,
        payment_reference: &str,
        payment_method: &str,
    ) -> Result<Invoice, BillingError> {
        let mut invoice = self.required(invoice_id).await?;

        match invoice.status {
            InvoiceStatus::Paid => return Err(BillingError::InvoiceAlreadyPaid),
            InvoiceStatus::Pending => {}
            _ => {
                return Err(BillingError::InvoiceNotPayable {
                    status: invoice.status_label(),
                })
            }
        }

        invoice.mark_paid(payment_reference)?;
        invoice.payment_method = Some(payment_method.to_string());
        self.invoices.save(&invoice).await?;

        info!(invoice = %invoice.id, reference = payment_reference, "invoice marked paid");
        Ok(invoice)
    }

    /// Marks an invoice failed after a payment attempt.
    pub async fn mark_failed(&self, invoice_id: &InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.required(invoice_id).await?;
        invoice.mark_failed()?;
        self.invoices.save(&invoice).await?;
        Ok(invoice)
    }

    /// Cancels an unpaid invoice.
    pub async fn mark_cancelled(&self, invoice_id: &InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.required(invoice_id).await?;
        invoice.mark_cancelled()?;
        self.invoices.save(&invoice).await?;
        Ok(invoice)
    }

    /// Marks a paid invoice refunded (bookkeeping only; the refund saga
    /// owns entitlement reversal).
    pub async fn mark_refunded(&self, invoice_id: &InvoiceId) -> Result<Invoice, BillingError> {
        let mut invoice = self.required(invoice_id).await?;
        if invoice.status != InvoiceStatus::Paid {
            return Err(BillingError::InvoiceNotRefundable {
                status: invoice.status_label(),
            });
        }
        invoice.mark_refunded()?;
        self.invoices.save(&invoice).await?;
        Ok(invoice)
    }

    async fn required(&self, id: &InvoiceId) -> Result<Invoice, BillingError> {
        self.invoices
            .find_by_id(id)
            .await?
            .ok_or(BillingError::InvoiceNotFound(*id))
    }
}
