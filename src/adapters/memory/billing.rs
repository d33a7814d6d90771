//! In-memory billing entity repositories.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::domain::billing::{
    AddOnSubscription, BillingError, Invoice, InvoiceStatus, Subscription, SubscriptionStatus,
    TokenBundlePurchase,
};
use crate::domain::foundation::{
    AddOnSubscriptionId, InvoiceId, PurchaseId, SubscriptionId, Timestamp, UserId,
};
use crate::ports::{
    AddOnSubscriptionRepository, InvoiceRepository, SubscriptionRepository,
    TokenBundlePurchaseRepository,
};

/// In-memory invoice store.
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<HashMap<InvoiceId, Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn all(&self) -> Vec<Invoice> {
        self.invoices
            .read()
            .expect("InMemoryInvoiceRepository: lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn find_by_id(&self, id: &InvoiceId) -> Result<Option<Invoice>, BillingError> {
        Ok(self
            .invoices
            .read()
            .expect("InMemoryInvoiceRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_provider_session_id(
        &self,
        session_id: &str,
    ) -> Result<Option<Invoice>, BillingError> {
        Ok(self
            .all()
            .into_iter()
            .find(|i| i.provider_session_id.as_deref() == Some(session_id)))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Invoice>, BillingError> {
        let mut invoices: Vec<Invoice> = self
            .all()
            .into_iter()
            .filter(|i| i.user_id == *user_id)
            .collect();
        invoices.sort_by(|a, b| b.invoiced_at.cmp(&a.invoiced_at));
        Ok(invoices)
    }

    async fn find_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<Invoice>, BillingError> {
        let mut invoices: Vec<Invoice> = self
            .all()
            .into_iter()
            .filter(|i| i.subscription_id == Some(*subscription_id))
            .collect();
        invoices.sort_by(|a, b| b.invoiced_at.cmp(&a.invoiced_at));
        Ok(invoices)
    }

    async fn find_pending(&self) -> Result<Vec<Invoice>, BillingError> {
        Ok(self
            .all()
            .into_iter()
            .filter(|i| i.status == InvoiceStatus::Pending)
            .collect())
    }

    async fn find_overdue(&self) -> Result<Vec<Invoice>, BillingError> {
        let now = Timestamp::now();
        Ok(self
            .all()
            .into_iter()
            .filter(|i| {
                i.status == InvoiceStatus::Pending
                    && i.expires_at.map_or(false, |deadline| deadline < now)
            })
            .collect())
    }

    async fn save(&self, invoice: &Invoice) -> Result<(), BillingError> {
        self.invoices
            .write()
            .expect("InMemoryInvoiceRepository: lock poisoned")
            .insert(invoice.id, invoice.clone());
        Ok(())
    }
}

/// In-memory subscription store.
#[derive(Default)]
pub struct InMemorySubscriptionRepository {
    subscriptions: RwLock<HashMap<SubscriptionId, Subscription>>,
}

impl InMemorySubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn all(&self) -> Vec<Subscription> {
        self.subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .values()
            .cloned()
            .collect()
    }
}

#[async_trait]
impl SubscriptionRepository for InMemorySubscriptionRepository {
    async fn find_by_id(&self, id: &SubscriptionId) -> Result<Option<Subscription>, BillingError> {
        Ok(self
            .subscriptions
            .read()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_active_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Option<Subscription>, BillingError> {
        Ok(self
            .all()
            .into_iter()
            .find(|s| s.user_id == *user_id && s.status == SubscriptionStatus::Active))
    }

    async fn find_by_user(&self, user_id: &UserId) -> Result<Vec<Subscription>, BillingError> {
        let mut subscriptions: Vec<Subscription> = self
            .all()
            .into_iter()
            .filter(|s| s.user_id == *user_id)
            .collect();
        subscriptions.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(subscriptions)
    }

    async fn find_by_provider_subscription_id(
        &self,
        provider_subscription_id: &str,
    ) -> Result<Option<Subscription>, BillingError> {
        Ok(self.all().into_iter().find(|s| {
            s.provider_subscription_id.as_deref() == Some(provider_subscription_id)
        }))
    }

    async fn find_expired(&self) -> Result<Vec<Subscription>, BillingError> {
        let now = Timestamp::now();
        Ok(self
            .all()
            .into_iter()
            .filter(|s| {
                s.status == SubscriptionStatus::Active
                    && s.expires_at.map_or(false, |expires| expires < now)
            })
            .collect())
    }

    async fn find_expired_trials(&self) -> Result<Vec<Subscription>, BillingError> {
        let now = Timestamp::now();
        Ok(self
            .all()
            .into_iter()
            .filter(|s| {
                s.status == SubscriptionStatus::Trialing
                    && s.trial_end_at.map_or(false, |end| end <= now)
            })
            .collect())
    }

    async fn find_expiring_within_days(
        &self,
        days: i64,
    ) -> Result<Vec<Subscription>, BillingError> {
        let now = Timestamp::now();
        let cutoff = now.add_days(days);
        Ok(self
            .all()
            .into_iter()
            .filter(|s| {
                s.status == SubscriptionStatus::Active
                    && s.expires_at
                        .map_or(false, |expires| expires >= now && expires <= cutoff)
            })
            .collect())
    }

    async fn save(&self, subscription: &Subscription) -> Result<(), BillingError> {
        self.subscriptions
            .write()
            .expect("InMemorySubscriptionRepository: lock poisoned")
            .insert(subscription.id, subscription.clone());
        Ok(())
    }
}

/// In-memory token bundle purchase store.
#[derive(Default)]
pub struct InMemoryTokenBundlePurchaseRepository {
    purchases: RwLock<HashMap<PurchaseId, TokenBundlePurchase>>,
}

impl InMemoryTokenBundlePurchaseRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenBundlePurchaseRepository for InMemoryTokenBundlePurchaseRepository {
    async fn find_by_id(
        &self,
        id: &PurchaseId,
    ) -> Result<Option<TokenBundlePurchase>, BillingError> {
        Ok(self
            .purchases
            .read()
            .expect("InMemoryTokenBundlePurchaseRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<TokenBundlePurchase>, BillingError> {
        let mut purchases: Vec<TokenBundlePurchase> = self
            .purchases
            .read()
            .expect("InMemoryTokenBundlePurchaseRepository: lock poisoned")
            .values()
            .filter(|p| p.user_id == *user_id)
            .cloned()
            .collect();
        purchases.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(purchases)
    }

    async fn save(&self, purchase: &TokenBundlePurchase) -> Result<(), BillingError> {
        self.purchases
            .write()
            .expect("InMemoryTokenBundlePurchaseRepository: lock poisoned")
            .insert(purchase.id, purchase.clone());
        Ok(())
    }
}

/// In-memory add-on subscription store.
#[derive(Default)]
pub struct InMemoryAddOnSubscriptionRepository {
    addon_subscriptions: RwLock<HashMap<AddOnSubscriptionId, AddOnSubscription>>,
}

impl InMemoryAddOnSubscriptionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AddOnSubscriptionRepository for InMemoryAddOnSubscriptionRepository {
    async fn find_by_id(
        &self,
        id: &AddOnSubscriptionId,
    ) -> Result<Option<AddOnSubscription>, BillingError> {
        Ok(self
            .addon_subscriptions
            .read()
            .expect("InMemoryAddOnSubscriptionRepository: lock poisoned")
            .get(id)
            .cloned())
    }

    async fn find_by_user(
        &self,
        user_id: &UserId,
    ) -> Result<Vec<AddOnSubscription>, BillingError> {
        Ok(self
            .addon_subscriptions
            .read()
            .expect("InMemoryAddOnSubscriptionRepository: lock poisoned")
            .values()
            .filter(|a| a.user_id == *user_id)
            .cloned()
            .collect())
    }

    async fn find_by_subscription(
        &self,
        subscription_id: &SubscriptionId,
    ) -> Result<Vec<AddOnSubscription>, BillingError> {
        Ok(self
            .addon_subscriptions
            .read()
            .expect("InMemoryAddOnSubscriptionRepository: lock poisoned")
            .values()
            .filter(|a| a.subscription_id == Some(*subscription_id))
            .cloned()
            .collect())
    }

    async fn save(&self, addon_subscription: &AddOnSubscription) -> Result<(), BillingError> {
        self.addon_subscriptions
            .write()
            .expect("InMemoryAddOnSubscriptionRepository: lock poisoned")
            .insert(addon_subscription.id, addon_subscription.clone());
        Ok(())
    }
}
