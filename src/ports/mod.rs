//! Ports - interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between the
//! billing domain and the outside world. The storage layer implements the
//! repository ports; the dispatcher invokes the `EventHandler` port.
//!
//! All repository methods run inside the caller's unit of work: one saga
//! invocation equals one logical transaction, so repositories only need
//! read-then-write semantics under the store's isolation.

mod addon_subscription_repository;
mod catalog_repository;
mod event_handler;
mod invoice_repository;
mod purchase_repository;
mod subscription_repository;
mod token_repository;

pub use addon_subscription_repository::AddOnSubscriptionRepository;
pub use catalog_repository::{AddOnRepository, PlanRepository, TokenBundleRepository};
pub use event_handler::EventHandler;
pub use invoice_repository::InvoiceRepository;
pub use purchase_repository::TokenBundlePurchaseRepository;
pub use subscription_repository::SubscriptionRepository;
pub use token_repository::{TokenBalanceRepository, TokenTransactionRepository};
