#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod entities;
pub mod events;
pub mod handshake;
pub mod lifecycle;
pub mod normalize;
pub mod pricing;
pub mod processors;
pub mod refund;
pub mod storage;
