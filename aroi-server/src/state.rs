//! Application state shared across all request handlers.

use std::sync::Arc;

use aroi_core::events::RefundSignalSender;
use aroi_core::handshake::HandshakeStore;
use aroi_core::pricing::DeliveryTier;
use aroi_core::storage::OrderStore;
use tokio::sync::RwLock;

/// Application state that is shared across all request handlers.
///
/// This is cloneable and cheap to pass around (everything is behind Arc).
#[derive(Clone)]
pub struct AppState {
    /// Process-wide single-use handshake token store.
    pub handshake: HandshakeStore,
    /// Order storage seam (in-memory by default).
    pub orders: Arc<dyn OrderStore>,
    /// Delivery fee tiers (can be reloaded via SIGHUP).
    pub tiers: Arc<RwLock<Vec<DeliveryTier>>>,
    /// Channel into the refund notifier / payment collaborator.
    pub refund_tx: RefundSignalSender,
}

impl AppState {
    pub fn new(
        handshake: HandshakeStore,
        orders: Arc<dyn OrderStore>,
        tiers: Vec<DeliveryTier>,
        refund_tx: RefundSignalSender,
    ) -> Self {
        Self {
            handshake,
            orders,
            tiers: Arc::new(RwLock::new(tiers)),
            refund_tx,
        }
    }

    /// Replace the delivery tiers (used during SIGHUP reload).
    pub async fn update_tiers(&self, tiers: Vec<DeliveryTier>) {
        let mut guard = self.tiers.write().await;
        *guard = tiers;
    }
}
