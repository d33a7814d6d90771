//! In-memory repository adapters.
//!
//! Synchronous, deterministic implementations of every repository port,
//! backed by `RwLock<HashMap>`. Intended for unit and integration tests
//! and local harnesses.
//!
//! # Panics
//!
//! Methods panic if an internal lock is poisoned. That is acceptable for
//! test code; production deployments use the embedding service's storage
//! adapter instead.

mod billing;
mod catalog;
mod tokens;

pub use billing::{
    InMemoryAddOnSubscriptionRepository, InMemoryInvoiceRepository,
    InMemorySubscriptionRepository, InMemoryTokenBundlePurchaseRepository,
};
pub use catalog::{InMemoryAddOnRepository, InMemoryPlanRepository, InMemoryTokenBundleRepository};
pub use tokens::{InMemoryTokenBalanceRepository, InMemoryTokenTransactionRepository};
