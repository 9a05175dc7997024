//! Order normalization.
//!
//! Turns a raw [`OrderDraft`] into a canonical [`Order`], enforcing the
//! structural and business constraints before anything is persisted.
//! Violations are aggregated per field rather than failing on the first
//! one, so a storefront can fix an entire submission in one round trip.
//!
//! Unknown payment methods and delivery types never reach this module:
//! the wire enums are closed, so they are rejected at deserialization.

use aroi_sdk::objects::{DeliveryType, OrderDraft, OrderStatus};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::entities::{Customer, DeliveryInfo, Order, OrderItem};
use crate::pricing::{DeliveryTier, calc_fee};

/// Minimum accepted phone number length.
const MIN_PHONE_LEN: usize = 6;

/// Machine-readable category of a single violation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationCode {
    Empty,
    TooShort,
    OutOfRange,
    NotANumber,
    /// Delivery-type order with neither a fee nor a distance: the fee
    /// cannot be determined and the order must be resubmitted with one.
    UndeterminedFee,
}

/// One field-level problem with a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldViolation {
    /// Dotted path into the draft, e.g. `items[2].qty`.
    pub field: String,
    pub code: ViolationCode,
    pub message: String,
}

/// Aggregated validation failure. Never fatal; always recoverable by
/// resubmitting a corrected draft.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("invalid order submission: {} field violation(s)", .violations.len())]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn has_code(&self, code: ViolationCode) -> bool {
        self.violations.iter().any(|v| v.code == code)
    }
}

/// Accumulates violations while the draft is walked.
#[derive(Debug, Default)]
struct Violations(Vec<FieldViolation>);

impl Violations {
    fn push(&mut self, field: impl Into<String>, code: ViolationCode, message: impl Into<String>) {
        self.0.push(FieldViolation {
            field: field.into(),
            code,
            message: message.into(),
        });
    }

    /// Finish validation: the value only survives if nothing was flagged.
    fn into_result<T>(self, value: T) -> Result<T, ValidationError> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(ValidationError { violations: self.0 })
        }
    }
}

/// Validate and reshape a draft into a canonical order.
///
/// This is the only path by which an order enters the `received` status.
/// The returned order has no payment status yet; that arrives later from
/// the payment collaborator.
pub fn normalize_order(draft: OrderDraft, tiers: &[DeliveryTier]) -> Result<Order, ValidationError> {
    let mut violations = Violations::default();

    let customer = check_customer(&draft, &mut violations);
    let items = check_items(&draft, &mut violations);
    let delivery = check_delivery(&draft, tiers, &mut violations);

    let order = Order {
        order_id: Uuid::new_v4(),
        customer,
        items,
        delivery,
        payment_method: draft.payment_method,
        status: OrderStatus::Received,
        payment_status: None,
        paid: false,
        driver_name: None,
        created_at: time::OffsetDateTime::now_utc(),
    };

    violations.into_result(order)
}

fn check_customer(draft: &OrderDraft, violations: &mut Violations) -> Customer {
    let customer = &draft.customer;

    if customer.name.trim().is_empty() {
        violations.push("customer.name", ViolationCode::Empty, "name is required");
    }
    if customer.phone.trim().len() < MIN_PHONE_LEN {
        violations.push(
            "customer.phone",
            ViolationCode::TooShort,
            format!("phone must be at least {MIN_PHONE_LEN} characters"),
        );
    }
    if draft.delivery.delivery_type == DeliveryType::Delivery && customer.address.trim().is_empty()
    {
        violations.push(
            "customer.address",
            ViolationCode::Empty,
            "address is required for delivery orders",
        );
    }

    Customer {
        name: customer.name.trim().to_owned(),
        phone: customer.phone.trim().to_owned(),
        address: customer.address.trim().to_owned(),
        lat: customer.lat,
        lng: customer.lng,
    }
}

fn check_items(draft: &OrderDraft, violations: &mut Violations) -> Vec<OrderItem> {
    if draft.items.is_empty() {
        violations.push("items", ViolationCode::Empty, "order has no items");
    }

    let mut items = Vec::with_capacity(draft.items.len());
    for (idx, item) in draft.items.iter().enumerate() {
        if item.menu_item_id.is_empty() {
            violations.push(
                format!("items[{idx}].menu_item_id"),
                ViolationCode::Empty,
                "menu item id is required",
            );
        }
        // Canonical items store qty as u32, so anything outside 1..=u32::MAX
        // is flagged here rather than narrowed silently.
        let qty = match u32::try_from(item.qty) {
            Ok(qty) if qty >= 1 => qty,
            _ => {
                violations.push(
                    format!("items[{idx}].qty"),
                    ViolationCode::OutOfRange,
                    format!("quantity must be between 1 and {}", u32::MAX),
                );
                0
            }
        };
        if item.unit_price < 0 {
            violations.push(
                format!("items[{idx}].unit_price"),
                ViolationCode::OutOfRange,
                "unit price must not be negative",
            );
        }

        items.push(OrderItem {
            menu_item_id: item.menu_item_id.clone(),
            name: item.name.clone(),
            qty,
            unit_price: item.unit_price,
            options: item.options.clone(),
        });
    }
    items
}

fn check_delivery(
    draft: &OrderDraft,
    tiers: &[DeliveryTier],
    violations: &mut Violations,
) -> DeliveryInfo {
    let delivery = &draft.delivery;

    if let Some(distance) = delivery.distance_km {
        if !distance.is_finite() {
            violations.push(
                "delivery.distance_km",
                ViolationCode::NotANumber,
                "distance must be a finite number",
            );
        }
    }

    let fee = match delivery.delivery_type {
        // Pickup never carries a delivery fee, whatever was supplied.
        DeliveryType::Pickup => 0,
        DeliveryType::Delivery => match (delivery.fee, delivery.distance_km) {
            (Some(fee), _) if fee >= 0 => fee,
            (Some(_), _) => {
                violations.push(
                    "delivery.fee",
                    ViolationCode::OutOfRange,
                    "delivery fee must not be negative",
                );
                0
            }
            (None, Some(distance)) if distance.is_finite() => calc_fee(distance, tiers),
            (None, Some(_)) => 0, // non-finite distance already flagged above
            (None, None) => {
                violations.push(
                    "delivery.fee",
                    ViolationCode::UndeterminedFee,
                    "supply either a delivery fee or a distance",
                );
                0
            }
        },
    };

    DeliveryInfo {
        delivery_type: delivery.delivery_type,
        distance_km: delivery.distance_km,
        fee,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use aroi_sdk::objects::{
        CustomerDraft, DeliveryDraft, OrderItemDraft, PaymentMethod, PaymentStatus,
    };
    use crate::pricing::default_tiers;
    use std::collections::BTreeMap;

    fn draft() -> OrderDraft {
        OrderDraft {
            customer: CustomerDraft {
                name: "Nok".to_owned(),
                phone: "021234567".to_owned(),
                address: "12 Rama IV Rd".to_owned(),
                lat: Some(13.73),
                lng: Some(100.53),
            },
            items: vec![OrderItemDraft {
                menu_item_id: "green-curry".into(),
                name: "Green Curry".to_owned(),
                qty: 1,
                unit_price: 120,
                options: BTreeMap::new(),
            }],
            delivery: DeliveryDraft {
                delivery_type: DeliveryType::Delivery,
                distance_km: Some(4.0),
                fee: None,
            },
            payment_method: PaymentMethod::Promptpay,
        }
    }

    #[test]
    fn valid_delivery_draft_gets_tier_fee_and_received_status() {
        let order = normalize_order(draft(), &default_tiers()).unwrap();
        assert_eq!(order.status, OrderStatus::Received);
        assert_eq!(order.payment_status, None);
        assert_eq!(order.delivery.fee, 60); // 4 km falls in the 3-6 km tier
        assert!(!order.paid);
        assert_eq!(order.driver_name, None);
    }

    #[test]
    fn pickup_forces_fee_to_zero() {
        let mut d = draft();
        d.delivery = DeliveryDraft {
            delivery_type: DeliveryType::Pickup,
            distance_km: None,
            fee: Some(999),
        };
        let order = normalize_order(d, &default_tiers()).unwrap();
        assert_eq!(order.delivery.fee, 0);
    }

    #[test]
    fn explicit_fee_on_delivery_is_trusted() {
        let mut d = draft();
        d.delivery.fee = Some(75);
        let order = normalize_order(d, &default_tiers()).unwrap();
        assert_eq!(order.delivery.fee, 75);
    }

    #[test]
    fn delivery_without_fee_or_distance_is_undetermined() {
        let mut d = draft();
        d.delivery.distance_km = None;
        d.delivery.fee = None;
        let err = normalize_order(d, &default_tiers()).unwrap_err();
        assert!(err.has_code(ViolationCode::UndeterminedFee));
    }

    #[test]
    fn violations_are_aggregated_across_fields() {
        let mut d = draft();
        d.customer.phone = "123".to_owned();
        d.items[0].qty = 0;
        d.items.push(OrderItemDraft {
            menu_item_id: "".into(),
            name: "Mystery".to_owned(),
            qty: 1,
            unit_price: -5,
            options: BTreeMap::new(),
        });

        let err = normalize_order(d, &default_tiers()).unwrap_err();
        let fields: Vec<&str> = err.violations.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(
            fields,
            [
                "customer.phone",
                "items[0].qty",
                "items[1].menu_item_id",
                "items[1].unit_price",
            ]
        );
    }

    #[test]
    fn qty_wider_than_item_width_is_rejected() {
        let mut d = draft();
        d.items[0].qty = i64::from(u32::MAX) + 1;
        let err = normalize_order(d, &default_tiers()).unwrap_err();
        assert!(err.has_code(ViolationCode::OutOfRange));
        assert_eq!(err.violations[0].field, "items[0].qty");

        let mut max = draft();
        max.items[0].qty = i64::from(u32::MAX);
        let order = normalize_order(max, &default_tiers()).unwrap();
        assert_eq!(order.items[0].qty, u32::MAX);
    }

    #[test]
    fn empty_items_list_is_rejected() {
        let mut d = draft();
        d.items.clear();
        let err = normalize_order(d, &default_tiers()).unwrap_err();
        assert_eq!(err.violations.len(), 1);
        assert_eq!(err.violations[0].field, "items");
    }

    #[test]
    fn short_phone_is_rejected() {
        let mut d = draft();
        d.customer.phone = "  12345  ".to_owned(); // 5 after trimming
        let err = normalize_order(d, &default_tiers()).unwrap_err();
        assert!(err.has_code(ViolationCode::TooShort));
    }

    #[test]
    fn missing_address_only_matters_for_delivery() {
        let mut pickup = draft();
        pickup.customer.address = String::new();
        pickup.delivery = DeliveryDraft {
            delivery_type: DeliveryType::Pickup,
            distance_km: None,
            fee: None,
        };
        assert!(normalize_order(pickup, &default_tiers()).is_ok());

        let mut delivery = draft();
        delivery.customer.address = String::new();
        let err = normalize_order(delivery, &default_tiers()).unwrap_err();
        assert_eq!(err.violations[0].field, "customer.address");
    }

    #[test]
    fn validation_error_serializes_for_the_wire() {
        let mut d = draft();
        d.customer.phone = "12".to_owned();
        let err = normalize_order(d, &default_tiers()).unwrap_err();
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(
            json["violations"][0]["code"],
            serde_json::json!("too_short")
        );
    }

    #[test]
    fn payment_status_is_unset_at_creation() {
        let order = normalize_order(draft(), &default_tiers()).unwrap();
        assert_ne!(order.payment_status, Some(PaymentStatus::Pending));
        assert_eq!(order.payment_status, None);
    }
}
