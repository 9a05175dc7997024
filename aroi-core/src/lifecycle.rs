//! The order status state machine.
//!
//! `received` is the unique initial status, reachable only through order
//! creation. `completed`, `delivered`, and `cancelled` are terminal.
//! Everything else moves through [`apply`], which either updates the
//! order or rejects the change leaving it untouched.

use aroi_sdk::objects::OrderStatus;
use thiserror::Error;

use crate::entities::Order;

/// Attempted a status change not in the transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("illegal status transition: {from} -> {to}")]
pub struct InvalidTransition {
    pub from: OrderStatus,
    pub to: OrderStatus,
}

/// A requested status change, with the optional driver annotation a
/// cancellation or dispatch may carry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusChange {
    pub to: OrderStatus,
    pub driver_name: Option<String>,
}

impl StatusChange {
    pub fn to(status: OrderStatus) -> Self {
        Self {
            to: status,
            driver_name: None,
        }
    }

    pub fn with_driver(status: OrderStatus, driver_name: impl Into<String>) -> Self {
        Self {
            to: status,
            driver_name: Some(driver_name.into()),
        }
    }
}

/// The transition table, keyed by source status.
///
/// Matching on `from` exhaustively means adding a status without
/// deciding its outgoing edges fails to compile.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    use OrderStatus::*;
    match from {
        Received => &[Preparing, Cancelled],
        Preparing => &[OutForDelivery, Cancelled],
        OutForDelivery => &[Delivered, Completed, Cancelled],
        Completed | Delivered | Cancelled => &[],
    }
}

/// Whether a status has no outgoing transitions.
pub fn is_terminal(status: OrderStatus) -> bool {
    allowed_targets(status).is_empty()
}

/// Check a transition against the table without applying it.
pub fn check_transition(from: OrderStatus, to: OrderStatus) -> Result<(), InvalidTransition> {
    if allowed_targets(from).contains(&to) {
        Ok(())
    } else {
        Err(InvalidTransition { from, to })
    }
}

/// Apply a status change to an order.
///
/// On success the order's status (and driver annotation, when supplied)
/// is updated; nothing else changes. On failure the order is left
/// exactly as it was. The driver annotation never affects legality.
pub fn apply(order: &mut Order, change: StatusChange) -> Result<(), InvalidTransition> {
    check_transition(order.status, change.to)?;
    order.status = change.to;
    if let Some(driver) = change.driver_name {
        order.driver_name = Some(driver);
    }
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::order::sample_order;

    const ALL: [OrderStatus; 6] = [
        OrderStatus::Received,
        OrderStatus::Preparing,
        OrderStatus::OutForDelivery,
        OrderStatus::Completed,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    fn is_allowed(from: OrderStatus, to: OrderStatus) -> bool {
        use OrderStatus::*;
        matches!(
            (from, to),
            (Received, Preparing)
                | (Received, Cancelled)
                | (Preparing, OutForDelivery)
                | (Preparing, Cancelled)
                | (OutForDelivery, Delivered)
                | (OutForDelivery, Completed)
                | (OutForDelivery, Cancelled)
        )
    }

    #[test]
    fn all_thirty_six_pairs_match_the_table() {
        for from in ALL {
            for to in ALL {
                let mut order = sample_order();
                order.status = from;
                let result = apply(&mut order, StatusChange::to(to));

                if is_allowed(from, to) {
                    assert_eq!(result, Ok(()), "{from} -> {to} should be legal");
                    assert_eq!(order.status, to);
                } else {
                    assert_eq!(
                        result,
                        Err(InvalidTransition { from, to }),
                        "{from} -> {to} should be rejected"
                    );
                    // Rejection leaves the order unchanged.
                    assert_eq!(order.status, from);
                }
            }
        }
    }

    #[test]
    fn terminal_statuses_have_no_outgoing_edges() {
        assert!(is_terminal(OrderStatus::Completed));
        assert!(is_terminal(OrderStatus::Delivered));
        assert!(is_terminal(OrderStatus::Cancelled));
        assert!(!is_terminal(OrderStatus::Received));
        assert!(!is_terminal(OrderStatus::Preparing));
        assert!(!is_terminal(OrderStatus::OutForDelivery));
    }

    #[test]
    fn driver_annotation_is_recorded_but_never_legalizes() {
        let mut order = sample_order();
        order.status = OrderStatus::Preparing;

        // Legal cancellation records the driver.
        apply(
            &mut order,
            StatusChange::with_driver(OrderStatus::Cancelled, "Anan"),
        )
        .unwrap();
        assert_eq!(order.driver_name.as_deref(), Some("Anan"));

        // An annotated but illegal transition still fails.
        let mut done = sample_order();
        done.status = OrderStatus::Delivered;
        let result = apply(
            &mut done,
            StatusChange::with_driver(OrderStatus::Cancelled, "Anan"),
        );
        assert!(result.is_err());
        assert_eq!(done.driver_name, None);
    }
}
