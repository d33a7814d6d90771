//! Invoice line items.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::foundation::{InvoiceId, LineItemId, Money};

/// Kind of purchase record a line item points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LineItemType {
    Subscription,
    TokenBundle,
    AddOn,
}

/// One priced entry on an invoice.
///
/// `item_id` references the purchase record created at checkout
/// (subscription, token bundle purchase, or add-on subscription), never the
/// catalog item. Line items are immutable once attached to an invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvoiceLineItem {
    pub id: LineItemId,
    pub invoice_id: InvoiceId,
    pub item_type: LineItemType,
    pub item_id: Uuid,
    pub description: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
}

impl InvoiceLineItem {
    /// Creates a single-quantity line item.
    pub fn new(
        invoice_id: InvoiceId,
        item_type: LineItemType,
        item_id: Uuid,
        description: impl Into<String>,
        unit_price: Money,
    ) -> Self {
        Self {
            id: LineItemId::new(),
            invoice_id,
            item_type,
            item_id,
            description: description.into(),
            quantity: 1,
            unit_price,
            total_price: unit_price,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_quantity_total_equals_unit_price() {
        let item = InvoiceLineItem::new(
            InvoiceId::new(),
            LineItemType::TokenBundle,
            Uuid::new_v4(),
            "500 pack",
            Money::from_cents(1000),
        );
        assert_eq!(item.quantity, 1);
        assert_eq!(item.total_price, item.unit_price);
    }

    #[test]
    fn item_type_serializes_screaming_snake() {
        let json = serde_json::to_string(&LineItemType::TokenBundle).unwrap();
        assert_eq!(json, "\"TOKEN_BUNDLE\"");
        let json = serde_json::to_string(&LineItemType::AddOn).unwrap();
        assert_eq!(json, "\"ADD_ON\"");
    }
}
