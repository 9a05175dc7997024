//! Wire types for the Aroi APIs.
//!
//! Everything in this module is a serde-facing DTO. The canonical domain
//! entities (with their invariants enforced) live in `aroi-core`; these
//! types only describe what travels over the wire.

pub mod handshake;
pub mod orders;
pub mod payments;

pub use handshake::{AuthProvider, HandshakeIssued, HandshakePurpose, IssueHandshakeRequest};
pub use orders::{
    CustomerDraft, DeliveryDraft, DeliveryType, OrderDraft, OrderItemDraft, OrderResponse,
    OrderStatus, StatusUpdateRequest,
};
pub use payments::{PaymentMethod, PaymentStatus, PaymentUpdateRequest};

/// Header carrying the single-use form-submit token for protected mutations.
pub const FORM_TOKEN_HEADER: &str = "Aroi-Form-Token";
