//! Catalog repository ports.
//!
//! Catalog items are managed by admin tooling outside this crate; the sagas
//! only need lookups to validate checkouts and price line items.

use async_trait::async_trait;

use crate::domain::billing::BillingError;
use crate::domain::catalog::{AddOn, Plan, TokenBundle};
use crate::domain::foundation::{AddOnId, PlanId, TokenBundleId};

/// Read port for tariff plans.
#[async_trait]
pub trait PlanRepository: Send + Sync {
    /// Find a plan by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, BillingError>;
}

/// Read port for token bundles.
#[async_trait]
pub trait TokenBundleRepository: Send + Sync {
    /// Find a bundle by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &TokenBundleId) -> Result<Option<TokenBundle>, BillingError>;
}

/// Read port for add-ons.
#[async_trait]
pub trait AddOnRepository: Send + Sync {
    /// Find an add-on by id. Returns `None` if missing.
    async fn find_by_id(&self, id: &AddOnId) -> Result<Option<AddOn>, BillingError>;
}
