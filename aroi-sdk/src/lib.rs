//! SDK for Aroi, a headless food-ordering backend.
//!
//! This crate contains the wire types shared between the Aroi server and
//! its clients (storefront frontends and application backends), plus the
//! token generator used for handshake credentials.

pub mod objects;
pub mod token;
