//! Subscription aggregate - a user's plan enrollment.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    PlanId, StateMachine, SubscriptionId, Timestamp, UserId, ValidationError,
};

/// Subscription lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubscriptionStatus {
    /// Created at checkout, awaiting first payment.
    Pending,
    /// In a free trial window; no invoice exists for this period.
    Trialing,
    /// Paid and entitled.
    Active,
    /// Temporarily suspended; the expiry clock is stopped.
    Paused,
    /// Terminated by the user, an admin, or a refund.
    Cancelled,
    /// Ran past its expiry (or trial end) without renewal.
    Expired,
}

impl StateMachine for SubscriptionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SubscriptionStatus::*;
        matches!(
            (self, target),
            // From PENDING
            (Pending, Active)
                | (Pending, Cancelled)
                | (Pending, Expired)
            // From TRIALING (conversion happens via capture or the trial sweep)
                | (Trialing, Active)
                | (Trialing, Cancelled)
                | (Trialing, Expired)
            // From ACTIVE
                | (Active, Active) // Renewal
                | (Active, Paused)
                | (Active, Cancelled)
                | (Active, Expired)
            // From PAUSED
                | (Paused, Active)
                | (Paused, Cancelled)
                | (Paused, Expired)
            // From CANCELLED (refund reversal re-activates)
                | (Cancelled, Active)
            // From EXPIRED (renewal after payment)
                | (Expired, Active)
        )
    }
}

/// Subscription aggregate.
///
/// # Invariants
///
/// - At most one ACTIVE subscription per user; enforced at activation time
///   by the capture saga, which cancels any previous active subscription.
/// - `paused_at` is set exactly while status is PAUSED.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub user_id: UserId,
    pub plan_id: PlanId,

    /// Plan to switch to at the next renewal (downgrade flow).
    pub pending_plan_id: Option<PlanId>,

    pub status: SubscriptionStatus,

    pub started_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub cancelled_at: Option<Timestamp>,
    pub paused_at: Option<Timestamp>,
    pub trial_end_at: Option<Timestamp>,

    /// Provider-side subscription id, when the provider models one.
    pub provider_subscription_id: Option<String>,

    pub created_at: Timestamp,
}

impl Subscription {
    /// Creates a pending subscription awaiting payment.
    pub fn new(user_id: UserId, plan_id: PlanId) -> Self {
        Self {
            id: SubscriptionId::new(),
            user_id,
            plan_id,
            pending_plan_id: None,
            status: SubscriptionStatus::Pending,
            started_at: None,
            expires_at: None,
            cancelled_at: None,
            paused_at: None,
            trial_end_at: None,
            provider_subscription_id: None,
            created_at: Timestamp::now(),
        }
    }

    /// Puts a freshly created subscription into its free trial window.
    ///
    /// Trial periods are invoice-free; the subscription expires with the
    /// trial unless converted by the trial sweep.
    pub fn start_trial(&mut self, trial_days: u32) {
        let now = Timestamp::now();
        let end = now.add_days(trial_days as i64);
        self.status = SubscriptionStatus::Trialing;
        self.started_at = Some(now);
        self.trial_end_at = Some(end);
        self.expires_at = Some(end);
    }

    /// Activates the subscription for one billing period from now.
    ///
    /// Used both for first activation after capture and for renewal or
    /// restore: the expiry window is always recomputed from now, never
    /// resumed from a previous value.
    pub fn activate(&mut self, period_days: i64) -> Result<(), ValidationError> {
        let now = Timestamp::now();
        self.status = self.status.transition_to(SubscriptionStatus::Active)?;
        self.started_at = Some(now);
        self.expires_at = Some(now.add_days(period_days));
        self.cancelled_at = None;
        self.paused_at = None;
        Ok(())
    }

    /// Cancels the subscription.
    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SubscriptionStatus::Cancelled)?;
        self.cancelled_at = Some(Timestamp::now());
        Ok(())
    }

    /// Pauses an active subscription, stopping the expiry clock.
    pub fn pause(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SubscriptionStatus::Paused)?;
        self.paused_at = Some(Timestamp::now());
        Ok(())
    }

    /// Resumes a paused subscription, extending the expiry by the paused
    /// duration.
    pub fn resume(&mut self) -> Result<(), ValidationError> {
        let now = Timestamp::now();
        self.status = self.status.transition_to(SubscriptionStatus::Active)?;
        if let (Some(paused_at), Some(expires_at)) = (self.paused_at, self.expires_at) {
            let paused_for = now.duration_since(&paused_at);
            self.expires_at = Some(expires_at.add_duration(paused_for));
        }
        self.paused_at = None;
        Ok(())
    }

    /// Marks the subscription expired.
    pub fn expire(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(SubscriptionStatus::Expired)?;
        Ok(())
    }

    pub fn is_active(&self) -> bool {
        self.status == SubscriptionStatus::Active
    }

    /// Status as its wire string (`PENDING`, `ACTIVE`, ...).
    pub fn status_label(&self) -> String {
        format!("{:?}", self.status).to_uppercase()
    }
}
