//! Order API handlers.
//!
//! # Endpoints
//!
//! - `POST /orders`                     – submit an order (token-guarded)
//! - `GET  /orders/{order_id}`          – fetch an order
//! - `POST /orders/{order_id}/status`   – apply a lifecycle transition (token-guarded)
//! - `POST /orders/{order_id}/payment`  – settlement update from the payment collaborator
//!
//! Every path that can move an order into `cancelled` — and every
//! payment update — runs the refund engine and forwards an actionable
//! decision to the refund notifier.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use uuid::Uuid;

use aroi_core::entities::Order;
use aroi_core::events::RefundSignal;
use aroi_core::lifecycle::{InvalidTransition, StatusChange};
use aroi_core::normalize::{ValidationError, normalize_order};
use aroi_core::refund;
use aroi_core::storage::OrderStoreError;
use aroi_sdk::objects::{
    CustomerDraft, DeliveryDraft, OrderDraft, OrderItemDraft, OrderResponse, PaymentUpdateRequest,
    StatusUpdateRequest,
};

use crate::api::extractors::FormToken;
use crate::state::AppState;

/// Build the Order API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", post(submit_order))
        .route("/orders/{order_id}", get(get_order))
        .route("/orders/{order_id}/status", post(update_status))
        .route("/orders/{order_id}/payment", post(payment_update))
}

/// Convert a canonical `Order` into an `OrderResponse` (API model).
fn to_response(order: &Order) -> OrderResponse {
    OrderResponse {
        order_id: order.order_id,
        customer: CustomerDraft {
            name: order.customer.name.clone(),
            phone: order.customer.phone.clone(),
            address: order.customer.address.clone(),
            lat: order.customer.lat,
            lng: order.customer.lng,
        },
        items: order
            .items
            .iter()
            .map(|item| OrderItemDraft {
                menu_item_id: item.menu_item_id.clone(),
                name: item.name.clone(),
                qty: i64::from(item.qty),
                unit_price: item.unit_price,
                options: item.options.clone(),
            })
            .collect(),
        delivery: DeliveryDraft {
            delivery_type: order.delivery.delivery_type,
            distance_km: order.delivery.distance_km,
            fee: Some(order.delivery.fee),
        },
        payment_method: order.payment_method,
        status: order.status,
        payment_status: order.payment_status,
        driver_name: order.driver_name.clone(),
        created_at: order.created_at.unix_timestamp(),
    }
}

// ---------------------------------------------------------------------------
// POST /orders
// ---------------------------------------------------------------------------

/// `POST /orders` — submit an order.
///
/// Normalizes the draft against the current delivery tiers and persists
/// the canonical order with status `received`. A draft that fails
/// validation gets the full aggregated violation list back in one 422.
async fn submit_order(
    state: State<AppState>,
    token: FormToken,
    Json(draft): Json<OrderDraft>,
) -> Result<impl IntoResponse, OrderApiError> {
    let tiers = state.tiers.read().await;
    let order = normalize_order(draft, &tiers)?;
    drop(tiers);

    tracing::info!(
        order_id = %order.order_id,
        nonce = %token.nonce,
        total = order.total(),
        "order received"
    );

    let response = to_response(&order);
    state.orders.insert(order).await?;

    Ok((StatusCode::CREATED, Json(response)))
}

// ---------------------------------------------------------------------------
// GET /orders/{order_id}
// ---------------------------------------------------------------------------

/// `GET /orders/{order_id}` — fetch the current state of an order.
async fn get_order(
    state: State<AppState>,
    Path(order_id): Path<Uuid>,
) -> Result<impl IntoResponse, OrderApiError> {
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or(OrderApiError::NotFound)?;
    Ok(Json(to_response(&order)))
}

// ---------------------------------------------------------------------------
// POST /orders/{order_id}/status
// ---------------------------------------------------------------------------

/// `POST /orders/{order_id}/status` — apply a lifecycle transition.
///
/// Illegal transitions are rejected with 409 and leave the order
/// unchanged. A transition into `cancelled` is reconciled against the
/// order's payment state and any actionable decision is forwarded to
/// the refund notifier.
async fn update_status(
    state: State<AppState>,
    _token: FormToken,
    Path(order_id): Path<Uuid>,
    Json(body): Json<StatusUpdateRequest>,
) -> Result<impl IntoResponse, OrderApiError> {
    let change = StatusChange {
        to: body.status,
        driver_name: body.driver_name,
    };
    let updated = state.orders.apply_status(order_id, change).await?;

    tracing::info!(%order_id, status = %updated.status, "order status updated");
    emit_refund_signal(&state, &updated).await;

    Ok(Json(to_response(&updated)))
}

// ---------------------------------------------------------------------------
// POST /orders/{order_id}/payment
// ---------------------------------------------------------------------------

/// `POST /orders/{order_id}/payment` — settlement update from the
/// payment collaborator.
///
/// Records the reported status and re-runs refund reconciliation: a
/// payment update landing on an already-cancelled order may still
/// require a hold release or a captured-fund reversal.
async fn payment_update(
    state: State<AppState>,
    Path(order_id): Path<Uuid>,
    Json(body): Json<PaymentUpdateRequest>,
) -> Result<impl IntoResponse, OrderApiError> {
    let updated = state
        .orders
        .apply_payment_update(order_id, body.payment_status, body.paid)
        .await?;

    tracing::info!(
        %order_id,
        payment_status = %body.payment_status,
        paid = body.paid,
        "payment status updated"
    );
    emit_refund_signal(&state, &updated).await;

    Ok(Json(to_response(&updated)))
}

/// Run the refund engine over the order and forward an actionable
/// decision. Losing a signal is logged, never fatal to the request.
async fn emit_refund_signal(state: &AppState, order: &Order) {
    let decision = refund::evaluate_order(order);
    if !decision.requires_action() {
        return;
    }

    let signal = RefundSignal {
        order_id: order.order_id,
        order_status: order.status,
        payment_status: order.payment_status,
        decision,
    };
    if let Err(e) = state.refund_tx.send(signal).await {
        tracing::error!(error = %e, order_id = %order.order_id, "failed to emit refund signal");
    }
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Order API handlers.
#[derive(Debug)]
enum OrderApiError {
    /// The requested order was not found.
    NotFound,
    /// The requested status change is not in the transition table.
    Transition(InvalidTransition),
    /// The submitted draft failed validation.
    Validation(ValidationError),
}

impl From<ValidationError> for OrderApiError {
    fn from(err: ValidationError) -> Self {
        Self::Validation(err)
    }
}

impl From<OrderStoreError> for OrderApiError {
    fn from(err: OrderStoreError) -> Self {
        match err {
            OrderStoreError::NotFound(_) => Self::NotFound,
            OrderStoreError::Transition(t) => Self::Transition(t),
        }
    }
}

impl IntoResponse for OrderApiError {
    fn into_response(self) -> Response {
        match self {
            OrderApiError::NotFound => (StatusCode::NOT_FOUND, "order not found").into_response(),
            OrderApiError::Transition(err) => (
                StatusCode::CONFLICT,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response(),
            OrderApiError::Validation(err) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(serde_json::json!({
                    "error": err.to_string(),
                    "violations": err.violations,
                })),
            )
                .into_response(),
        }
    }
}
