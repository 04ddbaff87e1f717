//! Order records.
//!
//! Orders are created at checkout and never edited by the storefront
//! except for cancellation, which rewrites the full record with the
//! status overwritten. The resource store offers no atomic transition,
//! so concurrent cancellations inherit the same last-write-wins risk
//! as cart writes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::cart::CartLine;
use super::id::{OwnerId, RecordId};
use super::status::OrderStatus;

/// An order record as persisted in the resource store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    /// Store-assigned ID; absent until the record is first created.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RecordId>,
    #[serde(rename = "userId")]
    pub owner: OwnerId,
    pub date: DateTime<Utc>,
    pub items: Vec<CartLine>,
    pub total: f64,
    pub status: OrderStatus,
    /// Free-form address object; the storefront never interprets it.
    #[serde(rename = "shippingAddress", default)]
    pub shipping_address: serde_json::Value,
    #[serde(rename = "paymentMethod")]
    pub payment_method: String,
}

/// Client-supplied order payload, before server-side defaults apply.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewOrder {
    #[serde(default)]
    pub items: Vec<CartLine>,
    #[serde(default)]
    pub total: f64,
    #[serde(default)]
    pub status: Option<OrderStatus>,
    #[serde(rename = "shippingAddress", default)]
    pub shipping_address: Option<serde_json::Value>,
    #[serde(rename = "paymentMethod", default)]
    pub payment_method: Option<String>,
}

impl NewOrder {
    /// Build the full record for an owner, filling server-side defaults.
    #[must_use]
    pub fn into_order(self, owner: OwnerId, date: DateTime<Utc>) -> Order {
        Order {
            id: None,
            owner,
            date,
            items: self.items,
            total: self.total,
            status: self.status.unwrap_or_default(),
            shipping_address: self
                .shipping_address
                .unwrap_or_else(|| serde_json::json!({})),
            payment_method: self.payment_method.unwrap_or_else(|| "credit".to_owned()),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn defaults_applied_on_creation() {
        let new_order: NewOrder = serde_json::from_value(serde_json::json!({
            "items": [],
            "total": 0
        }))
        .unwrap();
        let order = new_order.into_order(OwnerId::new("1"), Utc::now());
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.payment_method, "credit");
        assert_eq!(order.shipping_address, serde_json::json!({}));
    }

    #[test]
    fn wire_shape_uses_camel_case_keys() {
        let order = NewOrder::default().into_order(OwnerId::new("7"), Utc::now());
        let json = serde_json::to_value(&order).unwrap();
        assert_eq!(json["userId"], "7");
        assert!(json.get("shippingAddress").is_some());
        assert!(json.get("paymentMethod").is_some());
        assert_eq!(json["status"], "Hazırlanıyor");
    }
}
