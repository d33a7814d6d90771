//! Strongly-typed identifier value objects.
//!
//! Every entity family gets its own UUID newtype so that an invoice id can
//! never be passed where a subscription id is expected. Line items reference
//! purchase records through these ids, not catalog ids.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Declares a UUID-backed identifier newtype.
macro_rules! define_id {
    ($(#[$doc:meta])* $name:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(Uuid);

        impl $name {
            /// Creates a new random identifier.
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            /// Wraps an existing UUID.
            pub fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }

            /// Returns the inner UUID.
            pub fn as_uuid(&self) -> &Uuid {
                &self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Uuid {
                id.0
            }
        }
    };
}

define_id!(
    /// Identifier of a platform user (account owner of balances and invoices).
    UserId
);
define_id!(
    /// Identifier of a tariff plan in the catalog.
    PlanId
);
define_id!(
    /// Identifier of a token bundle in the catalog.
    TokenBundleId
);
define_id!(
    /// Identifier of an add-on in the catalog.
    AddOnId
);
define_id!(
    /// Identifier of an invoice.
    InvoiceId
);
define_id!(
    /// Identifier of a single invoice line item.
    LineItemId
);
define_id!(
    /// Identifier of a plan subscription (enrollment record, not catalog plan).
    SubscriptionId
);
define_id!(
    /// Identifier of a token bundle purchase record.
    PurchaseId
);
define_id!(
    /// Identifier of an add-on subscription record.
    AddOnSubscriptionId
);
define_id!(
    /// Identifier of a token ledger transaction.
    TransactionId
);
