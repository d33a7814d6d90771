//! Catalog module - purchasable items.
//!
//! Plans, token bundles and add-ons are managed by admin tooling outside
//! this crate; the sagas only read them to validate checkouts and price
//! line items.

mod addon;
mod billing_period;
mod plan;
mod token_bundle;

pub use addon::AddOn;
pub use billing_period::BillingPeriod;
pub use plan::Plan;
pub use token_bundle::TokenBundle;
