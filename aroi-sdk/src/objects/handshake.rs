//! Handshake API request and response types.
//!
//! A handshake token is a single-use credential correlating a request
//! across a redirect (third-party login) or resubmission (protected form
//! post) boundary. Tokens are issued by `POST /handshake` and the
//! `/auth/{provider}/start` endpoints and consumed exactly once.

use compact_str::CompactString;
use serde::{Deserialize, Serialize};

/// What a handshake token authorizes once consumed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum HandshakePurpose {
    /// Correlates a third-party authorization redirect with its callback.
    Oauth,
    /// Backs a state-changing form submission against replay/forgery.
    FormSubmit,
}

impl std::fmt::Display for HandshakePurpose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HandshakePurpose::Oauth => write!(f, "oauth"),
            HandshakePurpose::FormSubmit => write!(f, "form-submit"),
        }
    }
}

/// Third-party login providers Aroi can hand off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    Line,
}

impl std::fmt::Display for AuthProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuthProvider::Google => write!(f, "google"),
            AuthProvider::Line => write!(f, "line"),
        }
    }
}

/// Request body for issuing a handshake token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IssueHandshakeRequest {
    pub purpose: HandshakePurpose,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<AuthProvider>,
    /// Where to send the user after the handshake completes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redirect_target: Option<String>,
}

/// Response returned when a handshake token is issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandshakeIssued {
    pub token: CompactString,
    pub nonce: CompactString,
}
