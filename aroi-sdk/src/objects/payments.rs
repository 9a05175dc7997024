//! Payment-side wire types.
//!
//! Aroi never talks to a payment gateway itself; the payment collaborator
//! reports settlement state through these types and acts on the refund
//! signals the core emits.

use serde::{Deserialize, Serialize};

/// How the customer pays for an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Promptpay,
    Card,
    /// Cash on delivery; no upfront capture.
    Cod,
}

impl std::fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentMethod::Promptpay => write!(f, "promptpay"),
            PaymentMethod::Card => write!(f, "card"),
            PaymentMethod::Cod => write!(f, "cod"),
        }
    }
}

/// Settlement state reported by the payment collaborator.
///
/// Unset on a freshly created order; only the collaborator moves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    /// Authorization created, not yet settled.
    Pending,
    /// No authorization succeeded yet.
    Unpaid,
    /// Funds captured.
    Paid,
    Failed,
    Refunded,
}

impl std::fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaymentStatus::Pending => write!(f, "pending"),
            PaymentStatus::Unpaid => write!(f, "unpaid"),
            PaymentStatus::Paid => write!(f, "paid"),
            PaymentStatus::Failed => write!(f, "failed"),
            PaymentStatus::Refunded => write!(f, "refunded"),
        }
    }
}

/// Request body for `POST /orders/{order_id}/payment`, sent by the payment
/// collaborator when settlement state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentUpdateRequest {
    pub payment_status: PaymentStatus,
    /// Whether funds were actually captured for this order.
    #[serde(default)]
    pub paid: bool,
}
