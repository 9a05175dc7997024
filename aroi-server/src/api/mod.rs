//! HTTP API surface.
//!
//! Two areas, each with its own router:
//!
//! - `handshake` — token issuance and the third-party login handshake.
//! - `orders` — order submission, status reads, lifecycle transitions,
//!   and payment-collaborator updates.

pub mod extractors;
pub mod handshake;
pub mod orders;
