//! Billing period for tariff plans.

use serde::{Deserialize, Serialize};

/// How often a plan renews.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingPeriod {
    Monthly,
    Quarterly,
    Yearly,
    /// Lifetime purchase; treated as ~100 years.
    OneTime,
}

impl BillingPeriod {
    /// Fixed subscription duration in days for each period.
    pub fn days(&self) -> i64 {
        match self {
            BillingPeriod::Monthly => 30,
            BillingPeriod::Quarterly => 90,
            BillingPeriod::Yearly => 365,
            BillingPeriod::OneTime => 36_500,
        }
    }
}
