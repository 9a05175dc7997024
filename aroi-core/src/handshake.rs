//! Single-use, TTL-bounded handshake token store.
//!
//! The store backs two trust boundaries: third-party login handshakes
//! (the `state` parameter of an authorization redirect) and anti-forgery
//! tokens for state-changing form submissions. A record is keyed by its
//! token and destroyed on the first consumption attempt, successful or
//! not, so a token can never authorize two continuations.
//!
//! State is process-local and lost on restart. That only degrades
//! in-flight handshakes, never stored data, and keeps the store free to
//! swap for a distributed one behind the same handle later.

use std::collections::HashMap;
use std::sync::Arc;

use aroi_sdk::objects::{AuthProvider, HandshakeIssued, HandshakePurpose};
use aroi_sdk::token;
use compact_str::CompactString;
use time::{Duration, OffsetDateTime};
use tokio::sync::Mutex;

/// Hard floor for the effective TTL. A lower configured TTL would make
/// small clock skews lock users out of their own handshakes.
pub const MIN_TTL: Duration = Duration::seconds(60);

/// How many issues may pass between opportunistic expiry sweeps.
const SWEEP_EVERY: u32 = 64;

/// A stored handshake awaiting its single consumption.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandshakeRecord {
    pub token: CompactString,
    pub purpose: HandshakePurpose,
    pub provider: Option<AuthProvider>,
    pub nonce: CompactString,
    pub created_at: OffsetDateTime,
    pub redirect_target: Option<String>,
}

struct StoreState {
    records: HashMap<CompactString, HandshakeRecord>,
    ttl: Duration,
    issues_since_sweep: u32,
}

/// Shared handle to the process-wide handshake store.
///
/// Cloning is cheap; all clones see the same records. Every operation
/// takes the single internal lock, so lookup-then-delete on consumption
/// is atomic with respect to concurrent issues and consumes.
#[derive(Clone)]
pub struct HandshakeStore {
    inner: Arc<Mutex<StoreState>>,
}

impl HandshakeStore {
    /// Create a store with the given configured TTL. The effective TTL
    /// never drops below [`MIN_TTL`].
    pub fn new(configured_ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(StoreState {
                records: HashMap::new(),
                ttl: configured_ttl,
                issues_since_sweep: 0,
            })),
        }
    }

    /// Issue a fresh single-use token and nonce.
    pub async fn issue(
        &self,
        purpose: HandshakePurpose,
        provider: Option<AuthProvider>,
        redirect_target: Option<String>,
    ) -> HandshakeIssued {
        self.issue_at(purpose, provider, redirect_target, OffsetDateTime::now_utc())
            .await
    }

    /// Consume a token, removing it regardless of the outcome.
    ///
    /// Returns `None` for unknown, already-consumed, or expired tokens,
    /// and for provider mismatches. All four cases are deliberately
    /// indistinguishable to the caller.
    pub async fn consume(
        &self,
        token: &str,
        expected_provider: Option<AuthProvider>,
    ) -> Option<HandshakeRecord> {
        self.consume_at(token, expected_provider, OffsetDateTime::now_utc())
            .await
    }

    /// Drop every expired record, returning how many were removed.
    pub async fn sweep_expired(&self) -> usize {
        self.sweep_expired_at(OffsetDateTime::now_utc()).await
    }

    /// Replace the configured TTL (applied on config reload).
    pub async fn set_ttl(&self, configured_ttl: Duration) {
        let mut state = self.inner.lock().await;
        state.ttl = configured_ttl;
    }

    /// Number of live (not yet consumed or swept) records.
    pub async fn len(&self) -> usize {
        self.inner.lock().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn issue_at(
        &self,
        purpose: HandshakePurpose,
        provider: Option<AuthProvider>,
        redirect_target: Option<String>,
        now: OffsetDateTime,
    ) -> HandshakeIssued {
        let record = HandshakeRecord {
            token: token::generate_token(),
            purpose,
            provider,
            nonce: token::generate_nonce(),
            created_at: now,
            redirect_target,
        };
        let issued = HandshakeIssued {
            token: record.token.clone(),
            nonce: record.nonce.clone(),
        };

        let mut state = self.inner.lock().await;
        state.issues_since_sweep += 1;
        if state.issues_since_sweep >= SWEEP_EVERY {
            state.issues_since_sweep = 0;
            let swept = remove_expired(&mut state, now);
            if swept > 0 {
                tracing::debug!(swept, "swept expired handshake records");
            }
        }
        state.records.insert(record.token.clone(), record);
        issued
    }

    async fn consume_at(
        &self,
        token: &str,
        expected_provider: Option<AuthProvider>,
        now: OffsetDateTime,
    ) -> Option<HandshakeRecord> {
        let mut state = self.inner.lock().await;
        // Single-use: the record leaves the map before any check runs.
        let record = state.records.remove(token)?;
        let ttl = effective_ttl(state.ttl);
        drop(state);

        if now - record.created_at > ttl {
            tracing::debug!(purpose = %record.purpose, "handshake token expired");
            return None;
        }
        if expected_provider.is_some() && expected_provider != record.provider {
            tracing::debug!(purpose = %record.purpose, "handshake provider mismatch");
            return None;
        }
        Some(record)
    }

    async fn sweep_expired_at(&self, now: OffsetDateTime) -> usize {
        let mut state = self.inner.lock().await;
        remove_expired(&mut state, now)
    }
}

fn effective_ttl(configured: Duration) -> Duration {
    configured.max(MIN_TTL)
}

fn remove_expired(state: &mut StoreState, now: OffsetDateTime) -> usize {
    let ttl = effective_ttl(state.ttl);
    let before = state.records.len();
    state.records.retain(|_, record| now - record.created_at <= ttl);
    before - state.records.len()
}
