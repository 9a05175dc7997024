//! Refund reconciliation.
//!
//! Decides whether a cancellation implies a payment-side action. The
//! engine is pure; every transition into `cancelled` and every payment
//! update is run through [`evaluate`] by the caller, and the resulting
//! decision travels to the payment collaborator as a
//! [`crate::events::RefundSignal`].

use aroi_sdk::objects::{OrderStatus, PaymentStatus};
use serde::{Deserialize, Serialize};

use crate::entities::Order;

/// Outcome of reconciling an order's payment and lifecycle state.
///
/// `ReleaseHold` and `RefundCaptured` both mean "the payment side must
/// act" but require different downstream handling: releasing an
/// unsettled authorization is free, reversing captured funds is not.
/// The two are kept distinct all the way to the collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RefundDecision {
    /// Nothing to do on the payment side.
    NoAction,
    /// Drop an authorization that was never settled.
    ReleaseHold,
    /// Captured funds must be reversed; flagged for reconciliation.
    RefundCaptured,
}

impl RefundDecision {
    /// Whether the payment collaborator has anything to do.
    pub fn requires_action(self) -> bool {
        !matches!(self, RefundDecision::NoAction)
    }
}

/// Reconcile payment status against lifecycle status.
///
/// Refunds are only ever triggered by cancellation, and only when the
/// payment collaborator has reported *some* settlement state. A
/// `pending`/`unpaid` status on a cancelled order means an unsettled
/// hold to release; any other status with `is_paid` set means captured
/// funds to reverse.
pub fn evaluate(
    payment_status: Option<PaymentStatus>,
    order_status: OrderStatus,
    is_paid: bool,
) -> RefundDecision {
    let Some(payment_status) = payment_status else {
        // Nothing was ever authorized against this order.
        return RefundDecision::NoAction;
    };
    if order_status != OrderStatus::Cancelled {
        return RefundDecision::NoAction;
    }
    match payment_status {
        PaymentStatus::Pending | PaymentStatus::Unpaid => RefundDecision::ReleaseHold,
        _ if is_paid => RefundDecision::RefundCaptured,
        _ => RefundDecision::NoAction,
    }
}

/// [`evaluate`] over a whole order.
pub fn evaluate_order(order: &Order) -> RefundDecision {
    evaluate(order.payment_status, order.status, order.paid)
}

/// The collapsed boolean contract: `true` when any payment-side action
/// is required. Callers that need to know *which* action should use
/// [`evaluate`] instead.
pub fn should_refund(
    payment_status: Option<PaymentStatus>,
    order_status: OrderStatus,
    is_paid: bool,
) -> bool {
    evaluate(payment_status, order_status, is_paid).requires_action()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_payment_status_means_no_action() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Cancelled,
            OrderStatus::Delivered,
        ] {
            assert_eq!(evaluate(None, status, true), RefundDecision::NoAction);
            assert!(!should_refund(None, status, true));
        }
    }

    #[test]
    fn only_cancellation_triggers_a_refund() {
        for status in [
            OrderStatus::Received,
            OrderStatus::Preparing,
            OrderStatus::OutForDelivery,
            OrderStatus::Completed,
            OrderStatus::Delivered,
        ] {
            assert_eq!(
                evaluate(Some(PaymentStatus::Pending), status, true),
                RefundDecision::NoAction
            );
        }
    }

    #[test]
    fn cancelled_pending_or_unpaid_releases_the_hold() {
        for payment in [PaymentStatus::Pending, PaymentStatus::Unpaid] {
            assert_eq!(
                evaluate(Some(payment), OrderStatus::Cancelled, false),
                RefundDecision::ReleaseHold
            );
            assert!(should_refund(Some(payment), OrderStatus::Cancelled, false));
        }
    }

    #[test]
    fn cancelled_and_captured_flags_a_real_refund() {
        assert_eq!(
            evaluate(Some(PaymentStatus::Paid), OrderStatus::Cancelled, true),
            RefundDecision::RefundCaptured
        );
        // Same boolean as the hold-release case, different decision.
        assert!(should_refund(
            Some(PaymentStatus::Paid),
            OrderStatus::Cancelled,
            true
        ));
    }

    #[test]
    fn cancelled_but_not_paid_and_not_pending_does_nothing() {
        for payment in [
            PaymentStatus::Paid,
            PaymentStatus::Failed,
            PaymentStatus::Refunded,
        ] {
            assert_eq!(
                evaluate(Some(payment), OrderStatus::Cancelled, false),
                RefundDecision::NoAction
            );
        }
    }

    #[test]
    fn documented_examples_hold() {
        assert!(should_refund(
            Some(PaymentStatus::Pending),
            OrderStatus::Cancelled,
            false
        ));
        assert!(!should_refund(
            Some(PaymentStatus::Pending),
            OrderStatus::Received,
            false
        ));
        assert!(!should_refund(None, OrderStatus::Cancelled, false));
    }
}
