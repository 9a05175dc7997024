//! Handshake API handlers.
//!
//! # Endpoints
//!
//! - `POST /handshake`                    – issue a single-use token
//! - `GET  /auth/{provider}/start`        – begin a third-party login handshake
//! - `GET  /auth/{provider}/callback`     – complete the handshake (consume `state`)
//!
//! The actual token exchange with the provider is out of scope; these
//! endpoints only manage the replay/forgery boundary around it.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};

use aroi_sdk::objects::{AuthProvider, HandshakeIssued, HandshakePurpose, IssueHandshakeRequest};

use crate::state::AppState;

/// Build the Handshake API router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/handshake", post(issue_token))
        .route("/auth/{provider}/start", get(begin_auth))
        .route("/auth/{provider}/callback", get(auth_callback))
}

// ---------------------------------------------------------------------------
// POST /handshake
// ---------------------------------------------------------------------------

/// `POST /handshake` — issue a single-use token and nonce.
///
/// Storefronts call this before a protected form submission and send
/// the token back in the `Aroi-Form-Token` header.
async fn issue_token(
    state: State<AppState>,
    Json(body): Json<IssueHandshakeRequest>,
) -> Result<impl IntoResponse, HandshakeApiError> {
    if let Some(target) = body.redirect_target.as_deref() {
        check_redirect_target(target)?;
    }

    let issued = state
        .handshake
        .issue(body.purpose, body.provider, body.redirect_target)
        .await;

    Ok((StatusCode::CREATED, Json(issued)))
}

// ---------------------------------------------------------------------------
// GET /auth/{provider}/start
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct BeginAuthQuery {
    /// Where to send the user once the provider redirects back.
    redirect: Option<String>,
}

/// `GET /auth/{provider}/start` — begin a third-party login handshake.
///
/// Issues an oauth-purpose token bound to the provider. The frontend
/// embeds the token as the `state` parameter of the provider's
/// authorization URL; the callback consumes it.
async fn begin_auth(
    state: State<AppState>,
    Path(provider): Path<AuthProvider>,
    Query(query): Query<BeginAuthQuery>,
) -> Result<Json<HandshakeIssued>, HandshakeApiError> {
    if let Some(target) = query.redirect.as_deref() {
        check_redirect_target(target)?;
    }

    let issued = state
        .handshake
        .issue(HandshakePurpose::Oauth, Some(provider), query.redirect)
        .await;

    tracing::debug!(%provider, "issued oauth handshake token");
    Ok(Json(issued))
}

// ---------------------------------------------------------------------------
// GET /auth/{provider}/callback
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CallbackQuery {
    /// The handshake token issued at `/auth/{provider}/start`.
    state: String,
}

#[derive(Debug, Serialize)]
struct CallbackOk {
    provider: AuthProvider,
    nonce: compact_str::CompactString,
}

/// `GET /auth/{provider}/callback` — complete a login handshake.
///
/// Consumes the `state` token with the provider it must have been
/// issued for. Expired, unknown, replayed, and wrong-provider tokens
/// all produce the same 401 — the caller restarts the handshake either
/// way. On success, redirects to the stored target when one exists.
async fn auth_callback(
    state: State<AppState>,
    Path(provider): Path<AuthProvider>,
    Query(query): Query<CallbackQuery>,
) -> Result<Response, HandshakeApiError> {
    let record = state
        .handshake
        .consume(&query.state, Some(provider))
        .await
        .ok_or(HandshakeApiError::ExpiredOrUnknown)?;

    match record.redirect_target {
        Some(target) => {
            let location = format!(
                "{target}?login=ok&nonce={}",
                urlencoding::encode(&record.nonce)
            );
            Ok(Redirect::to(&location).into_response())
        }
        None => Ok(Json(CallbackOk {
            provider,
            nonce: record.nonce,
        })
        .into_response()),
    }
}

// ---------------------------------------------------------------------------
// Error handling
// ---------------------------------------------------------------------------

/// Errors that can occur in Handshake API handlers.
#[derive(Debug)]
enum HandshakeApiError {
    /// The supplied redirect target is not a valid absolute URL.
    InvalidRedirect,
    /// Token absent, already consumed, expired, or issued for a
    /// different provider. One message for all of them, by contract.
    ExpiredOrUnknown,
}

impl IntoResponse for HandshakeApiError {
    fn into_response(self) -> Response {
        match self {
            HandshakeApiError::InvalidRedirect => {
                (StatusCode::BAD_REQUEST, "invalid redirect target").into_response()
            }
            HandshakeApiError::ExpiredOrUnknown => (
                StatusCode::UNAUTHORIZED,
                "handshake expired or unknown; restart the handshake",
            )
                .into_response(),
        }
    }
}

fn check_redirect_target(target: &str) -> Result<(), HandshakeApiError> {
    url::Url::parse(target).map_err(|_| HandshakeApiError::InvalidRedirect)?;
    Ok(())
}
