//! Invoice aggregate.
//!
//! An invoice records one billable transaction, possibly spanning a plan
//! subscription, token bundles and add-ons. The aggregate owns its line
//! items; the sum of line-item totals always equals `total_amount`.
//!
//! Sagas never delete invoices. Hard deletion exists only in admin tooling
//! outside this crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{
    InvoiceId, Money, PlanId, StateMachine, SubscriptionId, Timestamp, UserId, ValidationError,
};

use super::{InvoiceLineItem, LineItemType};

/// Invoice payment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InvoiceStatus {
    /// Awaiting payment.
    Pending,
    /// Money received and entitlements activated.
    Paid,
    /// Provider reported a failed payment attempt.
    Failed,
    /// Abandoned or voided before payment.
    Cancelled,
    /// Payment returned to the customer.
    Refunded,
}

impl StateMachine for InvoiceStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use InvoiceStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Paid)
                | (Pending, Failed)
                | (Pending, Cancelled)
            // From FAILED (a later capture attempt may still succeed)
                | (Failed, Paid)
                | (Failed, Cancelled)
            // From PAID
                | (Paid, Refunded)
            // From REFUNDED (refund reversal restores the payment)
                | (Refunded, Paid)
        )
    }
}

/// Invoice aggregate - one billable transaction with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub user_id: UserId,
    pub plan_id: Option<PlanId>,
    pub subscription_id: Option<SubscriptionId>,

    /// Human-readable unique number, e.g. `INV-20260805143000-9F21A3`.
    pub invoice_number: String,

    pub subtotal: Money,
    pub tax_amount: Money,
    pub total_amount: Money,

    /// ISO 4217 currency code.
    pub currency: String,

    pub status: InvoiceStatus,

    /// Provider tag supplied at checkout ("card", "wallet", "regional", ...).
    pub payment_method: Option<String>,

    /// External payment reference recorded at capture.
    pub payment_ref: Option<String>,

    /// Provider checkout-session id, when the provider uses sessions.
    pub provider_session_id: Option<String>,

    pub line_items: Vec<InvoiceLineItem>,

    pub invoiced_at: Timestamp,
    pub paid_at: Option<Timestamp>,

    /// Payment deadline; a pending invoice past this point is not payable.
    pub expires_at: Option<Timestamp>,
}

impl Invoice {
    /// Creates an empty pending invoice. Line items are attached with
    /// [`Invoice::add_line_item`], which keeps the totals in sync.
    pub fn new(user_id: UserId, currency: impl Into<String>) -> Self {
        let now = Timestamp::now();
        Self {
            id: InvoiceId::new(),
            user_id,
            plan_id: None,
            subscription_id: None,
            invoice_number: Self::generate_invoice_number(),
            subtotal: Money::ZERO,
            tax_amount: Money::ZERO,
            total_amount: Money::ZERO,
            currency: currency.into(),
            status: InvoiceStatus::Pending,
            payment_method: None,
            payment_ref: None,
            provider_session_id: None,
            line_items: Vec::new(),
            invoiced_at: now,
            paid_at: None,
            expires_at: None,
        }
    }

    /// Generates a unique human-readable invoice number.
    pub fn generate_invoice_number() -> String {
        let stamp = Timestamp::now().compact();
        let unique = Uuid::new_v4().simple().to_string()[..6].to_uppercase();
        format!("INV-{}-{}", stamp, unique)
    }

    /// Attaches a single-quantity line item and folds its price into the
    /// invoice totals. This is the only way totals change, so
    /// `total_amount == sum(line_items.total_price)` holds by construction.
    pub fn add_line_item(
        &mut self,
        item_type: LineItemType,
        item_id: Uuid,
        description: impl Into<String>,
        unit_price: Money,
    ) {
        let item = InvoiceLineItem::new(self.id, item_type, item_id, description, unit_price);
        self.subtotal += item.total_price;
        self.total_amount += item.total_price;
        self.line_items.push(item);
    }

    /// Returns true if this invoice can still be paid.
    pub fn is_payable(&self) -> bool {
        if self.status != InvoiceStatus::Pending {
            return false;
        }
        match self.expires_at {
            Some(deadline) => Timestamp::now() <= deadline,
            None => true,
        }
    }

    /// Records a successful capture.
    pub fn mark_paid(&mut self, payment_ref: impl Into<String>) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(InvoiceStatus::Paid)?;
        self.payment_ref = Some(payment_ref.into());
        self.paid_at = Some(Timestamp::now());
        Ok(())
    }

    /// Records a failed payment attempt.
    pub fn mark_failed(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(InvoiceStatus::Failed)?;
        Ok(())
    }

    /// Voids the invoice before payment.
    pub fn mark_cancelled(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(InvoiceStatus::Cancelled)?;
        Ok(())
    }

    /// Records a provider-confirmed refund.
    pub fn mark_refunded(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(InvoiceStatus::Refunded)?;
        Ok(())
    }

    /// Reverses a refund, restoring the invoice to paid.
    pub fn mark_restored(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(InvoiceStatus::Paid)?;
        Ok(())
    }

    /// Status as its wire string (`PENDING`, `PAID`, ...), used in error
    /// messages and result payloads.
    pub fn status_label(&self) -> String {
        format!("{:?}", self.status).to_uppercase()
    }
}
