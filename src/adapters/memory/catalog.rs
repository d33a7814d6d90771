//! In-memory catalog repositories.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::billing::BillingError;
use crate::domain::catalog::{AddOn, Plan, TokenBundle};
use crate::domain::foundation::{AddOnId, PlanId, TokenBundleId};
use crate::ports::{AddOnRepository, PlanRepository, TokenBundleRepository};

/// In-memory plan catalog.
#[derive(Default)]
pub struct InMemoryPlanRepository {
    plans: RwLock<HashMap<PlanId, Plan>>,
}

impl InMemoryPlanRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with plans.
    pub fn with_plans(plans: Vec<Plan>) -> Self {
        let map = plans.into_iter().map(|p| (p.id, p)).collect();
        Self {
            plans: RwLock::new(map),
        }
    }

    pub fn insert(&self, plan: Plan) {
        self.plans
            .write()
            .expect("InMemoryPlanRepository: lock poisoned")
            .insert(plan.id, plan);
    }
}

#[async_trait]
impl PlanRepository for InMemoryPlanRepository {
    async fn find_by_id(&self, id: &PlanId) -> Result<Option<Plan>, BillingError> {
        Ok(self
            .plans
            .read()
            .expect("InMemoryPlanRepository: lock poisoned")
            .get(id)
            .cloned())
    }
}

/// In-memory token bundle catalog.
#[derive(Default)]
pub struct InMemoryTokenBundleRepository {
    bundles: RwLock<HashMap<TokenBundleId, TokenBundle>>,
}

impl InMemoryTokenBundleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with bundles.
    pub fn with_bundles(bundles: Vec<TokenBundle>) -> Self {
        let map = bundles.into_iter().map(|b| (b.id, b)).collect();
        Self {
            bundles: RwLock::new(map),
        }
    }

    pub fn insert(&self, bundle: TokenBundle) {
        self.bundles
            .write()
            .expect("InMemoryTokenBundleRepository: lock poisoned")
            .insert(bundle.id, bundle);
    }
}

#[async_trait]
impl TokenBundleRepository for InMemoryTokenBundleRepository {
    async fn find_by_id(&self, id: &TokenBundleId) -> Result<Option<TokenBundle>, BillingError> {
        Ok(self
            .bundles
            .read()
            .expect("InMemoryTokenBundleRepository: lock poisoned")
            .get(id)
            .cloned())
    }
}

/// In-memory add-on catalog.
#[derive(Default)]
pub struct InMemoryAddOnRepository {
    addons: RwLock<HashMap<AddOnId, AddOn>>,
}

impl InMemoryAddOnRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a repository pre-seeded with add-ons.
    pub fn with_addons(addons: Vec<AddOn>) -> Self {
        let map = addons.into_iter().map(|a| (a.id, a)).collect();
        Self {
            addons: RwLock::new(map),
        }
    }

    pub fn insert(&self, addon: AddOn) {
        self.addons
            .write()
            .expect("InMemoryAddOnRepository: lock poisoned")
            .insert(addon.id, addon);
    }
}

#[async_trait]
impl AddOnRepository for InMemoryAddOnRepository {
    async fn find_by_id(&self, id: &AddOnId) -> Result<Option<AddOn>, BillingError> {
        Ok(self
            .addons
            .read()
            .expect("InMemoryAddOnRepository: lock poisoned")
            .get(id)
            .cloned())
    }
}
