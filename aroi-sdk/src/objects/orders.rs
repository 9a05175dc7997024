//! Order API request and response types.
//!
//! An [`OrderDraft`] is what a storefront submits; it carries no invariants
//! of its own and is turned into a canonical order by the normalizer in
//! `aroi-core`. The [`OrderResponse`] is the canonical order as exposed
//! back over the wire.

use std::collections::BTreeMap;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::payments::{PaymentMethod, PaymentStatus};

/// Current lifecycle position of an order.
///
/// `received` is the unique initial status; `completed`, `delivered`, and
/// `cancelled` are terminal. Which transitions between these are legal is
/// decided by the state machine in `aroi-core`, not here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderStatus {
    Received,
    Preparing,
    OutForDelivery,
    Completed,
    Delivered,
    Cancelled,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Received => write!(f, "received"),
            OrderStatus::Preparing => write!(f, "preparing"),
            OrderStatus::OutForDelivery => write!(f, "out-for-delivery"),
            OrderStatus::Completed => write!(f, "completed"),
            OrderStatus::Delivered => write!(f, "delivered"),
            OrderStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

/// How an order leaves the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryType {
    Delivery,
    Pickup,
}

/// One line item of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderItemDraft {
    pub menu_item_id: CompactString,
    pub name: String,
    pub qty: i64,
    /// Whole currency units, never fractional.
    pub unit_price: i64,
    /// Free-form option selections (e.g. spice level, extras).
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub options: BTreeMap<String, String>,
}

/// Customer contact block of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomerDraft {
    pub name: String,
    pub phone: String,
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
}

/// Delivery block of an order submission.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryDraft {
    #[serde(rename = "type")]
    pub delivery_type: DeliveryType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
    /// Explicit delivery fee in whole currency units. When absent for a
    /// delivery-type order, the server computes it from `distance_km`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fee: Option<i64>,
}

/// A raw order submission as posted by a storefront.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderDraft {
    pub customer: CustomerDraft,
    pub items: Vec<OrderItemDraft>,
    pub delivery: DeliveryDraft,
    pub payment_method: PaymentMethod,
}

/// The canonical order as returned by the Order API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: Uuid,
    pub customer: CustomerDraft,
    pub items: Vec<OrderItemDraft>,
    pub delivery: DeliveryDraft,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_status: Option<PaymentStatus>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
    /// Unix timestamp of when the order was created.
    pub created_at: i64,
}

/// Request body for `POST /orders/{order_id}/status`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusUpdateRequest {
    pub status: OrderStatus,
    /// Optional driver annotation; recorded but never affects whether the
    /// transition is legal.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub driver_name: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_status_uses_kebab_case_on_the_wire() {
        let json = serde_json::to_string(&OrderStatus::OutForDelivery).unwrap();
        assert_eq!(json, "\"out-for-delivery\"");

        let back: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(back, OrderStatus::Cancelled);
    }

    #[test]
    fn delivery_draft_uses_type_field_name() {
        let draft: DeliveryDraft =
            serde_json::from_str(r#"{"type":"pickup"}"#).unwrap();
        assert_eq!(draft.delivery_type, DeliveryType::Pickup);
        assert_eq!(draft.distance_km, None);
        assert_eq!(draft.fee, None);
    }
}
