//! Refund signal events.
//!
//! Signals are ephemeral and idempotent: they carry the order id and the
//! decision, and the consumer re-reads current order state if it needs
//! more. The channel is the seam to the external payment collaborator.

use aroi_sdk::objects::{OrderStatus, PaymentStatus};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::refund::RefundDecision;

/// A payment-side action requested by the refund engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundSignal {
    pub order_id: Uuid,
    pub order_status: OrderStatus,
    pub payment_status: Option<PaymentStatus>,
    pub decision: RefundDecision,
}

pub type RefundSignalSender = mpsc::Sender<RefundSignal>;
pub type RefundSignalReceiver = mpsc::Receiver<RefundSignal>;

/// Default buffer size for the refund signal channel.
pub const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Create the refund signal channel.
pub fn refund_signal_channel() -> (RefundSignalSender, RefundSignalReceiver) {
    mpsc::channel(DEFAULT_CHANNEL_SIZE)
}
