//! Billing domain module - ledger primitives and the event vocabulary.
//!
//! # Module Structure
//!
//! - `invoice` / `line_item` - the invoice aggregate and its priced entries
//! - `subscription` - plan enrollment lifecycle
//! - `token_purchase` - one-time token bundle purchases
//! - `addon_subscription` - add-on enrollments
//! - `tokens` - per-user token balance and append-only transaction ledger
//! - `events` - normalized provider events and the saga result type
//! - `errors` - billing error taxonomy

mod addon_subscription;
mod errors;
mod events;
mod invoice;
mod line_item;
mod subscription;
mod token_purchase;
mod tokens;

pub use addon_subscription::{AddOnSubscription, AddOnSubscriptionStatus};
pub use errors::BillingError;
pub use events::{BillingEvent, DomainEvent, EventResult};
pub use invoice::{Invoice, InvoiceStatus};
pub use line_item::{InvoiceLineItem, LineItemType};
pub use subscription::{Subscription, SubscriptionStatus};
pub use token_purchase::{PurchaseStatus, TokenBundlePurchase};
pub use tokens::{TokenTransaction, TokenTransactionType, UserTokenBalance};
