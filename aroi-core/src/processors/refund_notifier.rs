//! RefundNotifier processor.
//!
//! Drains [`RefundSignal`]s emitted after cancellations and payment
//! updates and hands them to the payment collaborator. The bundled
//! implementation records them in the log; a production deployment
//! replaces the body of `handle_signal` with the collaborator call.
//!
//! The two actionable decisions are deliberately kept apart here:
//! releasing an unsettled hold is routine, while reversing captured
//! funds is flagged loudly for reconciliation.

use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::events::{RefundSignal, RefundSignalReceiver};
use crate::refund::RefundDecision;

/// Worker that forwards refund signals to the payment side.
pub struct RefundNotifier {
    refund_rx: RefundSignalReceiver,
    shutdown_rx: watch::Receiver<bool>,
}

impl RefundNotifier {
    pub fn new(refund_rx: RefundSignalReceiver, shutdown_rx: watch::Receiver<bool>) -> Self {
        Self {
            refund_rx,
            shutdown_rx,
        }
    }

    /// Run until the channel closes or shutdown is signalled.
    ///
    /// Returns the number of signals handled, mainly for tests.
    pub async fn run(mut self) -> u64 {
        let mut handled = 0u64;
        loop {
            tokio::select! {
                signal = self.refund_rx.recv() => {
                    match signal {
                        Some(signal) => {
                            handle_signal(&signal);
                            handled += 1;
                        }
                        None => {
                            debug!("refund signal channel closed");
                            break;
                        }
                    }
                }
                result = self.shutdown_rx.changed() => {
                    if result.is_err() || *self.shutdown_rx.borrow() {
                        debug!("refund notifier shutting down");
                        break;
                    }
                }
            }
        }
        handled
    }
}

fn handle_signal(signal: &RefundSignal) {
    match signal.decision {
        RefundDecision::NoAction => {
            debug!(order_id = %signal.order_id, "refund signal with no action");
        }
        RefundDecision::ReleaseHold => {
            info!(
                order_id = %signal.order_id,
                payment_status = ?signal.payment_status,
                "releasing unsettled authorization for cancelled order"
            );
        }
        RefundDecision::RefundCaptured => {
            warn!(
                order_id = %signal.order_id,
                payment_status = ?signal.payment_status,
                "captured funds require reversal; flagged for reconciliation"
            );
        }
    }
}
