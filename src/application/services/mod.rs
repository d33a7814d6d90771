//! Application services - reusable billing lifecycle logic.
//!
//! Services hold the operations shared between saga handlers and the
//! (out-of-scope) admin surface. Each service receives its repository
//! handles at construction, scoped to one unit of work per invocation.

mod invoice_service;
mod refund_service;
mod restore_service;
mod subscription_service;
mod token_service;

pub use invoice_service::InvoiceService;
pub use refund_service::{RefundOutcome, RefundService, RefundSummary};
pub use restore_service::{RestoreOutcome, RestoreService, RestoreSummary};
pub use subscription_service::{ProrationResult, SubscriptionService, TrialConversion};
pub use token_service::TokenService;
