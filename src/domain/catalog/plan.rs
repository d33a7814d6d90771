//! Tariff plan catalog entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{Money, PlanId};

use super::BillingPeriod;

/// A subscribable tariff plan.
///
/// Inactive plans remain in the catalog for historical invoices but cannot
/// be checked out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub id: PlanId,
    pub name: String,
    pub price: Money,
    pub billing_period: BillingPeriod,
    /// Free trial length in days; zero means no trial.
    pub trial_days: u32,
    pub is_active: bool,
}

impl Plan {
    /// Creates an active plan without a trial period.
    pub fn new(
        id: PlanId,
        name: impl Into<String>,
        price: Money,
        billing_period: BillingPeriod,
    ) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            billing_period,
            trial_days: 0,
            is_active: true,
        }
    }

    /// Sets a free trial period on the plan.
    pub fn with_trial_days(mut self, days: u32) -> Self {
        self.trial_days = days;
        self
    }

    /// Returns true if checkouts on this plan start with a free trial.
    pub fn has_trial(&self) -> bool {
        self.trial_days > 0
    }

    /// Subscription duration in days for one billing period.
    pub fn period_days(&self) -> i64 {
        self.billing_period.days()
    }
}
