//! Add-on catalog entity.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{AddOnId, Money};

/// An optional feature attachable to a user, with or without a parent plan
/// subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddOn {
    pub id: AddOnId,
    pub name: String,
    pub price: Money,
    pub is_active: bool,
}

impl AddOn {
    pub fn new(id: AddOnId, name: impl Into<String>, price: Money) -> Self {
        Self {
            id,
            name: name.into(),
            price,
            is_active: true,
        }
    }
}
