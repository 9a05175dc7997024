//! Order storage seam.
//!
//! Persistence engines are external collaborators; [`OrderStore`] is the
//! interface they plug into, and [`InMemoryOrderStore`] is the bundled
//! implementation. Status changes are applied *inside* the store, under
//! its write lock, so the single-writer-per-order discipline holds
//! without the domain functions needing locks of their own.

use std::collections::HashMap;
use std::sync::Arc;

use aroi_sdk::objects::PaymentStatus;
use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::entities::Order;
use crate::lifecycle::{self, InvalidTransition, StatusChange};

/// Errors surfaced by order stores.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OrderStoreError {
    #[error("order {0} not found")]
    NotFound(Uuid),
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// Storage interface for canonical orders.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persist a freshly normalized order.
    async fn insert(&self, order: Order) -> Result<(), OrderStoreError>;

    /// Fetch an order by id.
    async fn get(&self, order_id: Uuid) -> Result<Option<Order>, OrderStoreError>;

    /// Apply a status change through the state machine, returning the
    /// updated order. An illegal transition leaves the stored order
    /// untouched.
    async fn apply_status(
        &self,
        order_id: Uuid,
        change: StatusChange,
    ) -> Result<Order, OrderStoreError>;

    /// Record a settlement update from the payment collaborator.
    async fn apply_payment_update(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
        paid: bool,
    ) -> Result<Order, OrderStoreError>;
}

/// A thread-safe in-memory order store.
#[derive(Default, Clone)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<HashMap<Uuid, Order>>>,
}

impl InMemoryOrderStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert(&self, order: Order) -> Result<(), OrderStoreError> {
        let mut orders = self.orders.write().await;
        orders.insert(order.order_id, order);
        Ok(())
    }

    async fn get(&self, order_id: Uuid) -> Result<Option<Order>, OrderStoreError> {
        let orders = self.orders.read().await;
        Ok(orders.get(&order_id).cloned())
    }

    async fn apply_status(
        &self,
        order_id: Uuid,
        change: StatusChange,
    ) -> Result<Order, OrderStoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::NotFound(order_id))?;
        lifecycle::apply(order, change)?;
        Ok(order.clone())
    }

    async fn apply_payment_update(
        &self,
        order_id: Uuid,
        payment_status: PaymentStatus,
        paid: bool,
    ) -> Result<Order, OrderStoreError> {
        let mut orders = self.orders.write().await;
        let order = orders
            .get_mut(&order_id)
            .ok_or(OrderStoreError::NotFound(order_id))?;
        order.payment_status = Some(payment_status);
        order.paid = paid;
        Ok(order.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::entities::order::sample_order;
    use aroi_sdk::objects::OrderStatus;

    #[tokio::test]
    async fn insert_and_get_round_trip() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        let id = order.order_id;

        store.insert(order.clone()).await.unwrap();
        assert_eq!(store.get(id).await.unwrap(), Some(order));
        assert_eq!(store.get(Uuid::new_v4()).await.unwrap(), None);
    }

    #[tokio::test]
    async fn legal_transition_updates_the_stored_order() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        let id = order.order_id;
        store.insert(order).await.unwrap();

        let updated = store
            .apply_status(id, StatusChange::to(OrderStatus::Preparing))
            .await
            .unwrap();
        assert_eq!(updated.status, OrderStatus::Preparing);
        assert_eq!(
            store.get(id).await.unwrap().unwrap().status,
            OrderStatus::Preparing
        );
    }

    #[tokio::test]
    async fn illegal_transition_leaves_the_stored_order_unchanged() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        let id = order.order_id;
        store.insert(order).await.unwrap();

        let err = store
            .apply_status(id, StatusChange::to(OrderStatus::Delivered))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderStoreError::Transition(_)));
        assert_eq!(
            store.get(id).await.unwrap().unwrap().status,
            OrderStatus::Received
        );
    }

    #[tokio::test]
    async fn missing_order_is_reported() {
        let store = InMemoryOrderStore::new();
        let id = Uuid::new_v4();
        let err = store
            .apply_status(id, StatusChange::to(OrderStatus::Preparing))
            .await
            .unwrap_err();
        assert_eq!(err, OrderStoreError::NotFound(id));
    }

    #[tokio::test]
    async fn payment_update_sets_status_and_paid_flag() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        let id = order.order_id;
        store.insert(order).await.unwrap();

        let updated = store
            .apply_payment_update(id, PaymentStatus::Paid, true)
            .await
            .unwrap();
        assert_eq!(updated.payment_status, Some(PaymentStatus::Paid));
        assert!(updated.paid);
    }
}
