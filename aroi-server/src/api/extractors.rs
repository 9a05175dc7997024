//! Custom Axum extractors for request authentication.
//!
//! Provides `FormToken`, which consumes a single-use form-submit token
//! from the `Aroi-Form-Token` header against the handshake store. Every
//! state-changing storefront endpoint takes this extractor, so a token
//! can never authorize two mutations and a replayed request fails.

use axum::{
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};

use aroi_sdk::objects::{FORM_TOKEN_HEADER, HandshakePurpose};

use crate::state::AppState;

/// Proof that a valid, previously unconsumed form-submit token
/// accompanied the request. Extraction burns the token.
pub struct FormToken {
    /// Nonce of the consumed handshake, for correlation in logs.
    pub nonce: compact_str::CompactString,
}

/// Errors that can occur during form-token verification.
///
/// Unknown, already-consumed, expired, and wrong-purpose tokens all map
/// to the same rejection: the caller learns only that the handshake must
/// be restarted.
#[derive(Debug, thiserror::Error)]
pub enum FormTokenError {
    #[error("missing Aroi-Form-Token header")]
    MissingHeader,
    #[error("invalid Aroi-Form-Token header")]
    InvalidHeader,
    #[error("token expired, already used, or unknown")]
    NotUsable,
}

impl IntoResponse for FormTokenError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            FormTokenError::MissingHeader => {
                (StatusCode::UNAUTHORIZED, "missing Aroi-Form-Token header")
            }
            FormTokenError::InvalidHeader => {
                (StatusCode::BAD_REQUEST, "invalid Aroi-Form-Token header")
            }
            FormTokenError::NotUsable => (
                StatusCode::UNAUTHORIZED,
                "token expired, already used, or unknown",
            ),
        };
        (status, message).into_response()
    }
}

impl FromRequestParts<AppState> for FormToken {
    type Rejection = FormTokenError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(FORM_TOKEN_HEADER)
            .ok_or(FormTokenError::MissingHeader)?
            .to_str()
            .map_err(|_| FormTokenError::InvalidHeader)?;

        let record = state
            .handshake
            .consume(token, None)
            .await
            .ok_or(FormTokenError::NotUsable)?;

        // An oauth-purpose token must not authorize a form mutation.
        if record.purpose != HandshakePurpose::FormSubmit {
            return Err(FormTokenError::NotUsable);
        }

        Ok(FormToken {
            nonce: record.nonce,
        })
    }
}
