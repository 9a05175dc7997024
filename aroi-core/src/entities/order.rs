//! Canonical order entities.
//!
//! An [`Order`] only ever comes into existence through the normalizer
//! (`crate::normalize`), which is the single path into the `received`
//! status. After creation, `status` moves exclusively through the state
//! machine in `crate::lifecycle`, and `payment_status` is written only
//! from payment-collaborator updates.

use std::collections::BTreeMap;

use aroi_sdk::objects::{DeliveryType, OrderStatus, PaymentMethod, PaymentStatus};
use compact_str::CompactString;
use uuid::Uuid;

/// Who ordered and where to bring the food.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub address: String,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
}

/// One validated line item. `qty` is at least 1 and `unit_price` is a
/// non-negative whole currency amount.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub menu_item_id: CompactString,
    pub name: String,
    pub qty: u32,
    pub unit_price: i64,
    pub options: BTreeMap<String, String>,
}

impl OrderItem {
    /// Line total (`qty * unit_price`).
    pub fn line_total(&self) -> i64 {
        i64::from(self.qty) * self.unit_price
    }
}

/// Resolved delivery details. Unlike the wire draft, `fee` is always
/// known here: pickup orders carry 0, delivery orders carry either the
/// supplied fee or the tier-computed one.
#[derive(Debug, Clone, PartialEq)]
pub struct DeliveryInfo {
    pub delivery_type: DeliveryType,
    pub distance_km: Option<f64>,
    pub fee: i64,
}

/// A canonical, validated order.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub order_id: Uuid,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub delivery: DeliveryInfo,
    pub payment_method: PaymentMethod,
    pub status: OrderStatus,
    /// Unset until the payment collaborator reports settlement state.
    pub payment_status: Option<PaymentStatus>,
    /// Whether funds were actually captured, per the collaborator.
    pub paid: bool,
    pub driver_name: Option<String>,
    pub created_at: time::OffsetDateTime,
}

impl Order {
    /// Sum of all line totals, excluding the delivery fee.
    pub fn items_total(&self) -> i64 {
        self.items.iter().map(OrderItem::line_total).sum()
    }

    /// Grand total: items plus delivery fee.
    pub fn total(&self) -> i64 {
        self.items_total() + self.delivery.fee
    }
}

/// Test fixture shared across the crate's unit tests.
#[cfg(test)]
pub(crate) fn sample_order() -> Order {
    Order {
        order_id: Uuid::new_v4(),
        customer: Customer {
            name: "Somchai".to_owned(),
            phone: "0812345678".to_owned(),
            address: "99 Sukhumvit Rd".to_owned(),
            lat: None,
            lng: None,
        },
        items: vec![
            OrderItem {
                menu_item_id: CompactString::from("pad-thai"),
                name: "Pad Thai".to_owned(),
                qty: 2,
                unit_price: 80,
                options: BTreeMap::new(),
            },
            OrderItem {
                menu_item_id: CompactString::from("som-tam"),
                name: "Som Tam".to_owned(),
                qty: 1,
                unit_price: 60,
                options: BTreeMap::new(),
            },
        ],
        delivery: DeliveryInfo {
            delivery_type: DeliveryType::Delivery,
            distance_km: Some(4.0),
            fee: 60,
        },
        payment_method: PaymentMethod::Promptpay,
        status: OrderStatus::Received,
        payment_status: None,
        paid: false,
        driver_name: None,
        created_at: time::OffsetDateTime::now_utc(),
    }
}
