//! Add-on subscription record.
//!
//! Lifecycle mirrors the plan subscription but is simpler: no trial, no
//! pause.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    AddOnId, AddOnSubscriptionId, InvoiceId, StateMachine, SubscriptionId, Timestamp, UserId,
    ValidationError,
};

/// Add-on subscription status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AddOnSubscriptionStatus {
    Pending,
    Active,
    Cancelled,
    Expired,
}

impl StateMachine for AddOnSubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use AddOnSubscriptionStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Cancelled)
                | (Pending, Expired)
                | (Active, Cancelled)
                | (Active, Expired)
            // Refund reversal re-activates
                | (Cancelled, Active)
        )
    }
}

/// An add-on attached to a user, optionally under a parent subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOnSubscription {
    pub id: AddOnSubscriptionId,
    pub user_id: UserId,
    pub addon_id: AddOnId,
    /// Parent plan subscription, when the add-on was bought alongside one.
    pub subscription_id: Option<SubscriptionId>,
    pub invoice_id: Option<InvoiceId>,
    pub status: AddOnSubscriptionStatus,
    pub activated_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

impl AddOnSubscription {
    /// Creates a pending add-on subscription awaiting payment.
    pub fn new(user_id: UserId, addon_id: AddOnId, subscription_id: Option<SubscriptionId>) -> Self {
        Self {
            id: AddOnSubscriptionId::new(),
            user_id,
            addon_id,
            subscription_id,
            invoice_id: None,
            status: AddOnSubscriptionStatus::Pending,
            activated_at: None,
            expires_at: None,
            cancelled_at: None,
            created_at: Timestamp::now(),
        }
    }

    /// Activates the add-on. Also used by restore: activation time is
    /// always stamped fresh.
    pub fn activate(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(AddOnSubscriptionStatus::Active)?;
        self.activated_at = Some(Timestamp::now());
        self.cancelled_at = None;
        Ok(())
    }

    /// Cancels the add-on.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(AddOnSubscriptionStatus::Cancelled)?;
        self.cancelled_at = Some(Timestamp::now());
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == AddOnSubscriptionStatus::Active
    }

    /// Status as its wire string (`PENDING`, `ACTIVE`, ...).
    pub fn status_label(&self) -> String {
        format!("{:?}", self.status).to_uppercase()
    }
}
