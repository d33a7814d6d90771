//! Subscription lifecycle service.
//!
//! Creation, activation, cancellation, pause/resume, plan changes with
//! proration, and the expiry sweeps. Activation windows always come from
//! the plan's billing period; trials convert only through the checkout →
//! capture path or the trial sweep, never through direct activation.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::config::BillingConfig;
use crate::domain::billing::{
    BillingError, Invoice, LineItemType, Subscription, SubscriptionStatus,
};
use crate::domain::catalog::Plan;
use crate::domain::foundation::{InvoiceId, Money, PlanId, SubscriptionId, Timestamp, UserId};
use crate::ports::{InvoiceRepository, PlanRepository, SubscriptionRepository};

/// Result of a proration calculation for a plan change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProrationResult {
    /// Credit for unused time on the current plan.
    pub credit: Money,
    /// Price of the new plan minus the credit, floored at zero.
    pub amount_due: Money,
    /// Whole days remaining on the current plan.
    pub days_remaining: i64,
}

/// Outcome of converting one expired trial in the sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TrialConversion {
    /// The trial subscription that lapsed.
    pub expired_subscription_id: SubscriptionId,
    /// Fresh pending enrollment awaiting payment.
    pub renewal_subscription_id: SubscriptionId,
    /// Pending invoice whose capture activates the renewal.
    pub renewal_invoice_id: InvoiceId,
}

/// Subscription lifecycle management service.
pub struct SubscriptionService {
    subscriptions: Arc<dyn SubscriptionRepository>,
    plans: Arc<dyn PlanRepository>,
    invoices: Arc<dyn InvoiceRepository>,
    billing: BillingConfig,
}

impl SubscriptionService {
    pub fn new(
        subscriptions: Arc<dyn SubscriptionRepository>,
        plans: Arc<dyn PlanRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        billing: BillingConfig,
    ) -> Self {
        Self {
            subscriptions,
            plans,
            invoices,
            billing,
        }
    }

    /// The user's single active subscription, if any.
    pub async fn get_active_subscription(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, BillingError> {
        self.subscriptions.find_active_by_user(user_id).await
    }

    /// All subscriptions of a user.
    pub async fn get_user_subscriptions(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<Subscription>, BillingError> {
        self.subscriptions.find_by_user(user_id).await
    }

    /// Active subscriptions expiring within `days`, for renewal reminders.
    pub async fn get_expiring_subscriptions(
        &self,
        days: i64,
    ) -> Result<Vec<Subscription>, BillingError> {
        self.subscriptions.find_expiring_within_days(days).await
    }

    /// Creates a new pending subscription after validating the plan.
    pub async fn create_subscription(
        &self,
        user_id: &UserId,
        plan_id: &PlanId,
    ) -> Result<Subscription, BillingError> {
        self.active_plan(plan_id).await?;

        let subscription = Subscription::new(*user_id, *plan_id);
        self.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }

    /// Activates a pending subscription, computing the expiry window from
    /// the plan's billing period.
    ///
    /// Trialing subscriptions are rejected: trials convert only through the
    /// capture saga or the trial sweep.
    pub async fn activate_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        if subscription.status == SubscriptionStatus::Trialing {
            return Err(BillingError::TrialingNotActivatable);
        }

        let period_days = self.period_days_for(&subscription.plan_id).await?;
        subscription.activate(period_days)?;
        self.subscriptions.save(&subscription).await?;

        info!(subscription = %subscription.id, "subscription activated");
        Ok(subscription)
    }

    /// Cancels a subscription.
    pub async fn cancel_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        subscription.cancel()?;
        self.subscriptions.save(&subscription).await?;

        info!(subscription = %subscription.id, "subscription cancelled");
        Ok(subscription)
    }

    /// Pauses an active subscription, stopping the expiry clock.
    pub async fn pause_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        match subscription.status {
            SubscriptionStatus::Paused => return Err(BillingError::SubscriptionAlreadyPaused),
            SubscriptionStatus::Active => {}
            _ => return Err(BillingError::SubscriptionNotActive { operation: "paused" }),
        }

        subscription.pause()?;
        self.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }

    /// Resumes a paused subscription, extending the expiry by the paused
    /// duration.
    pub async fn resume_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        if subscription.status != SubscriptionStatus::Paused {
            return Err(BillingError::SubscriptionNotPaused);
        }

        subscription.resume()?;
        self.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }

    /// Renews a subscription for another billing period from now.
    ///
    /// A pending downgrade is applied here: the plan switch scheduled by
    /// [`SubscriptionService::downgrade_subscription`] takes effect at
    /// renewal, and the new plan drives both price bookkeeping and the
    /// renewed window.
    pub async fn renew_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;

        if let Some(next_plan_id) = subscription.pending_plan_id.take() {
            self.active_plan(&next_plan_id).await?;
            subscription.plan_id = next_plan_id;
        }

        let period_days = self.period_days_for(&subscription.plan_id).await?;
        subscription.activate(period_days)?;
        self.subscriptions.save(&subscription).await?;

        info!(subscription = %subscription.id, "subscription renewed");
        Ok(subscription)
    }

    /// Switches an active subscription to a higher-tier plan immediately.
    pub async fn upgrade_subscription(
        &self,
        subscription_id: &SubscriptionId,
        new_plan_id: &PlanId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        if subscription.plan_id == *new_plan_id {
            return Err(BillingError::SamePlan);
        }
        if subscription.status != SubscriptionStatus::Active {
            return Err(BillingError::SubscriptionNotActive {
                operation: "upgraded",
            });
        }
        self.active_plan(new_plan_id).await?;

        subscription.plan_id = *new_plan_id;
        subscription.pending_plan_id = None;
        self.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }

    /// Schedules a plan downgrade to take effect at the next renewal.
    pub async fn downgrade_subscription(
        &self,
        subscription_id: &SubscriptionId,
        new_plan_id: &PlanId,
    ) -> Result<Subscription, BillingError> {
        let mut subscription = self.required(subscription_id).await?;
        if subscription.plan_id == *new_plan_id {
            return Err(BillingError::SamePlan);
        }
        if subscription.status != SubscriptionStatus::Active {
            return Err(BillingError::SubscriptionNotActive {
                operation: "downgraded",
            });
        }
        self.active_plan(new_plan_id).await?;

        subscription.pending_plan_id = Some(*new_plan_id);
        self.subscriptions.save(&subscription).await?;
        Ok(subscription)
    }

    /// Daily-rate credit for unused time on the current plan against the
    /// new plan's price.
    ///
    /// A subscription without an expiry contributes no credit.
    pub async fn calculate_proration(
        &self,
        subscription_id: &SubscriptionId,
        new_plan_id: &PlanId,
    ) -> Result<ProrationResult, BillingError> {
        let subscription = self.required(subscription_id).await?;
        let current_plan = self.existing_plan(&subscription.plan_id).await?;
        let new_plan = self.existing_plan(new_plan_id).await?;

        let days_remaining = subscription
            .expires_at
            .map(|expires| expires.duration_since(&Timestamp::now()).num_days().max(0))
            .unwrap_or(0);
        let total_days = current_plan.period_days();

        let credit = current_plan.price.prorated(days_remaining, total_days);
        let amount_due = (new_plan.price - credit).max_zero();

        Ok(ProrationResult {
            credit,
            amount_due,
            days_remaining,
        })
    }

    /// Sweep: marks active subscriptions past their expiry as EXPIRED.
    pub async fn expire_subscriptions(&self) -> Result<Vec<Subscription>, BillingError> {
        let mut expired = Vec::new();
        for mut subscription in self.subscriptions.find_expired().await? {
            subscription.expire()?;
            self.subscriptions.save(&subscription).await?;
            info!(subscription = %subscription.id, "subscription expired");
            expired.push(subscription);
        }
        Ok(expired)
    }

    /// Sweep: lapses trials past `trial_end_at` and opens the paid path.
    ///
    /// Each lapsed trial is expired and replaced with a fresh PENDING
    /// subscription plus a PENDING renewal invoice carrying one
    /// SUBSCRIPTION line item at plan price. Capturing that invoice runs
    /// the ordinary activation saga, so trial conversion needs no special
    /// casing downstream.
    pub async fn expire_trials(&self) -> Result<Vec<TrialConversion>, BillingError> {
        let mut conversions = Vec::new();

        for mut trial in self.subscriptions.find_expired_trials().await? {
            let plan = self.existing_plan(&trial.plan_id).await?;

            trial.expire()?;
            self.subscriptions.save(&trial).await?;

            let renewal = Subscription::new(trial.user_id, trial.plan_id);
            self.subscriptions.save(&renewal).await?;

            let mut invoice = Invoice::new(trial.user_id, self.billing.default_currency.clone());
            invoice.plan_id = Some(plan.id);
            invoice.subscription_id = Some(renewal.id);
            invoice.expires_at =
                Some(Timestamp::now().add_days(self.billing.invoice_due_days));
            invoice.add_line_item(
                LineItemType::Subscription,
                *renewal.id.as_uuid(),
                plan.name.clone(),
                plan.price,
            );
            self.invoices.save(&invoice).await?;

            info!(
                trial = %trial.id,
                renewal = %renewal.id,
                invoice = %invoice.id,
                "trial expired, renewal invoice created"
            );

            conversions.push(TrialConversion {
                expired_subscription_id: trial.id,
                renewal_subscription_id: renewal.id,
                renewal_invoice_id: invoice.id,
            });
        }

        Ok(conversions)
    }

    async fn required(&self, id: &SubscriptionId) -> Result<Subscription, BillingError> {
        self.subscriptions
            .find_by_id(id)
            .await?
            .ok_or(BillingError::SubscriptionNotFound(*id))
    }

    async fn existing_plan(&self, id: &PlanId) -> Result<Plan, BillingError> {
        self.plans
            .find_by_id(id)
            .await?
            .ok_or(BillingError::PlanNotFound(*id))
    }

    async fn active_plan(&self, id: &PlanId) -> Result<Plan, BillingError> {
        let plan = self.existing_plan(id).await?;
        if !plan.is_active {
            return Err(BillingError::PlanNotActive(*id));
        }
        Ok(plan)
    }

    async fn period_days_for(&self, plan_id: &PlanId) -> Result<i64, BillingError> {
        Ok(self.existing_plan(plan_id).await?.period_days())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::memory::{
        InMemoryInvoiceRepository, InMemoryPlanRepository, InMemorySubscriptionRepository,
    };
    use crate::domain::catalog::BillingPeriod;

    struct Harness {
        service: SubscriptionService,
        subscriptions: Arc<InMemorySubscriptionRepository>,
        invoices: Arc<InMemoryInvoiceRepository>,
        monthly: Plan,
        yearly: Plan,
        inactive: Plan,
    }

    fn harness() -> Harness {
        let monthly = Plan::new(
            PlanId::new(),
            "Starter",
            Money::from_cents(2900),
            BillingPeriod::Monthly,
        );
        let yearly = Plan::new(
            PlanId::new(),
            "Annual",
            Money::from_cents(29_000),
            BillingPeriod::Yearly,
        );
        let mut inactive = Plan::new(
            PlanId::new(),
            "Legacy",
            Money::from_cents(999),
            BillingPeriod::Monthly,
        );
        inactive.is_active = false;

        let plans = Arc::new(InMemoryPlanRepository::with_plans(vec![
            monthly.clone(),
            yearly.clone(),
            inactive.clone(),
        ]));
        let subscriptions = Arc::new(InMemorySubscriptionRepository::new());
        let invoices = Arc::new(InMemoryInvoiceRepository::new());

        let service = SubscriptionService::new(
            Arc::clone(&subscriptions) as Arc<dyn SubscriptionRepository>,
            plans,
            Arc::clone(&invoices) as Arc<dyn InvoiceRepository>,
            BillingConfig::default(),
        );

        Harness {
            service,
            subscriptions,
            invoices,
            monthly,
            yearly,
            inactive,
        }
    }

    #[tokio::test]
    async fn create_subscription_is_pending() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();
        assert_eq!(sub.status, SubscriptionStatus::Pending);
    }

    #[tokio::test]
    async fn create_subscription_rejects_unknown_plan() {
        let h = harness();
        let missing = PlanId::new();
        let result = h.service.create_subscription(&UserId::new(), &missing).await;
        assert_eq!(result, Err(BillingError::PlanNotFound(missing)));
    }

    #[tokio::test]
    async fn create_subscription_rejects_inactive_plan() {
        let h = harness();
        let result = h
            .service
            .create_subscription(&UserId::new(), &h.inactive.id)
            .await;
        assert_eq!(result, Err(BillingError::PlanNotActive(h.inactive.id)));
    }

    #[tokio::test]
    async fn activate_uses_plan_period() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.yearly.id)
            .await
            .unwrap();

        let activated = h.service.activate_subscription(&sub.id).await.unwrap();
        let started = activated.started_at.unwrap();
        let expires = activated.expires_at.unwrap();
        assert_eq!(expires.duration_since(&started).num_days(), 365);
    }

    #[tokio::test]
    async fn activate_rejects_trialing_subscription() {
        let h = harness();
        let mut sub = Subscription::new(UserId::new(), h.monthly.id);
        sub.start_trial(14);
        h.subscriptions.save(&sub).await.unwrap();

        let result = h.service.activate_subscription(&sub.id).await;
        assert_eq!(result, Err(BillingError::TrialingNotActivatable));
    }

    #[tokio::test]
    async fn pause_requires_active() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();

        let result = h.service.pause_subscription(&sub.id).await;
        assert_eq!(
            result,
            Err(BillingError::SubscriptionNotActive { operation: "paused" })
        );
    }

    #[tokio::test]
    async fn pause_twice_reports_already_paused() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();
        h.service.pause_subscription(&sub.id).await.unwrap();

        let result = h.service.pause_subscription(&sub.id).await;
        assert_eq!(result, Err(BillingError::SubscriptionAlreadyPaused));
    }

    #[tokio::test]
    async fn resume_requires_paused() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();

        let result = h.service.resume_subscription(&sub.id).await;
        assert_eq!(result, Err(BillingError::SubscriptionNotPaused));
    }

    #[tokio::test]
    async fn pause_resume_round_trip_keeps_subscription_active() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();
        let activated = h.service.activate_subscription(&sub.id).await.unwrap();
        let original_expiry = activated.expires_at.unwrap();

        h.service.pause_subscription(&sub.id).await.unwrap();
        let resumed = h.service.resume_subscription(&sub.id).await.unwrap();

        assert_eq!(resumed.status, SubscriptionStatus::Active);
        assert!(resumed.expires_at.unwrap() >= original_expiry);
    }

    #[tokio::test]
    async fn upgrade_swaps_plan_immediately() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();

        let upgraded = h
            .service
            .upgrade_subscription(&sub.id, &h.yearly.id)
            .await
            .unwrap();
        assert_eq!(upgraded.plan_id, h.yearly.id);
        assert!(upgraded.pending_plan_id.is_none());
    }

    #[tokio::test]
    async fn upgrade_rejects_same_plan_and_inactive_subscription() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.monthly.id)
            .await
            .unwrap();

        assert_eq!(
            h.service.upgrade_subscription(&sub.id, &h.monthly.id).await,
            Err(BillingError::SamePlan)
        );
        assert_eq!(
            h.service.upgrade_subscription(&sub.id, &h.yearly.id).await,
            Err(BillingError::SubscriptionNotActive {
                operation: "upgraded"
            })
        );
    }

    #[tokio::test]
    async fn downgrade_defers_to_renewal() {
        let h = harness();
        let sub = h
            .service
            .create_subscription(&UserId::new(), &h.yearly.id)
            .await
            .unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();

        let downgraded = h
            .service
            .downgrade_subscription(&sub.id, &h.monthly.id)
            .await
            .unwrap();
        // Plan unchanged until renewal.
        assert_eq!(downgraded.plan_id, h.yearly.id);
        assert_eq!(downgraded.pending_plan_id, Some(h.monthly.id));

        let renewed = h.service.renew_subscription(&sub.id).await.unwrap();
        assert_eq!(renewed.plan_id, h.monthly.id);
        assert!(renewed.pending_plan_id.is_none());
        let window = renewed
            .expires_at
            .unwrap()
            .duration_since(&renewed.started_at.unwrap());
        assert_eq!(window.num_days(), 30);
    }

    #[tokio::test]
    async fn proration_credits_unused_days() {
        let h = harness();
        let user = UserId::new();
        let sub = h.service.create_subscription(&user, &h.monthly.id).await.unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();

        // Freshly activated monthly plan: ~29-30 days remain of 30.
        let proration = h
            .service
            .calculate_proration(&sub.id, &h.yearly.id)
            .await
            .unwrap();

        assert!(proration.days_remaining >= 29 && proration.days_remaining <= 30);
        assert!(proration.credit > Money::ZERO);
        assert!(proration.credit <= h.monthly.price);
        assert_eq!(
            proration.amount_due,
            (h.yearly.price - proration.credit).max_zero()
        );
    }

    #[tokio::test]
    async fn proration_floors_amount_due_at_zero() {
        let h = harness();
        let user = UserId::new();
        let sub = h.service.create_subscription(&user, &h.yearly.id).await.unwrap();
        h.service.activate_subscription(&sub.id).await.unwrap();

        // Yearly credit dwarfs the monthly price.
        let proration = h
            .service
            .calculate_proration(&sub.id, &h.monthly.id)
            .await
            .unwrap();
        assert_eq!(proration.amount_due, Money::ZERO);
    }

    #[tokio::test]
    async fn proration_without_expiry_gives_no_credit() {
        let h = harness();
        let user = UserId::new();
        let sub = h.service.create_subscription(&user, &h.monthly.id).await.unwrap();

        let proration = h
            .service
            .calculate_proration(&sub.id, &h.yearly.id)
            .await
            .unwrap();
        assert_eq!(proration.days_remaining, 0);
        assert_eq!(proration.credit, Money::ZERO);
        assert_eq!(proration.amount_due, h.yearly.price);
    }

    #[tokio::test]
    async fn expire_subscriptions_sweeps_past_expiry() {
        let h = harness();
        let user = UserId::new();
        let mut sub = Subscription::new(user, h.monthly.id);
        sub.activate(30).unwrap();
        // Force the window into the past.
        sub.started_at = Some(Timestamp::now().add_days(-40));
        sub.expires_at = Some(Timestamp::now().add_days(-10));
        h.subscriptions.save(&sub).await.unwrap();

        let expired = h.service.expire_subscriptions().await.unwrap();
        assert_eq!(expired.len(), 1);
        assert_eq!(expired[0].status, SubscriptionStatus::Expired);
    }

    #[tokio::test]
    async fn expire_trials_creates_pending_renewal_and_invoice() {
        let h = harness();
        let user = UserId::new();
        let mut trial = Subscription::new(user, h.monthly.id);
        trial.start_trial(14);
        // Trial ended yesterday.
        trial.trial_end_at = Some(Timestamp::now().add_days(-1));
        trial.expires_at = trial.trial_end_at;
        h.subscriptions.save(&trial).await.unwrap();

        let conversions = h.service.expire_trials().await.unwrap();
        assert_eq!(conversions.len(), 1);
        let conversion = &conversions[0];

        let old = h
            .subscriptions
            .find_by_id(&conversion.expired_subscription_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(old.status, SubscriptionStatus::Expired);

        let renewal = h
            .subscriptions
            .find_by_id(&conversion.renewal_subscription_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(renewal.status, SubscriptionStatus::Pending);
        assert_eq!(renewal.plan_id, h.monthly.id);

        let invoice = h
            .invoices
            .find_by_id(&conversion.renewal_invoice_id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(invoice.total_amount, h.monthly.price);
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(invoice.line_items[0].item_type, LineItemType::Subscription);
        assert_eq!(
            invoice.line_items[0].item_id,
            *renewal.id.as_uuid()
        );
    }
}
