//! Random credential generation for handshake tokens and nonces.
//!
//! Tokens correlate a request across a redirect or resubmission boundary
//! and must be unguessable: both the token and its nonce are drawn from a
//! CSPRNG and encoded as Crockford base32 for safe transport in headers,
//! query strings, and form fields.

use compact_str::CompactString;
use rand::RngCore;

/// Raw entropy per handshake token, before encoding.
pub const TOKEN_BYTES: usize = 24;

/// Raw entropy per nonce, before encoding.
pub const NONCE_BYTES: usize = 16;

/// Generate a fresh handshake token (39 base32 characters).
pub fn generate_token() -> CompactString {
    random_base32(TOKEN_BYTES)
}

/// Generate a fresh nonce (26 base32 characters).
pub fn generate_nonce() -> CompactString {
    random_base32(NONCE_BYTES)
}

fn random_base32(len: usize) -> CompactString {
    let mut buf = vec![0u8; len];
    rand::rng().fill_bytes(&mut buf);
    CompactString::from(fast32::base32::CROCKFORD.encode(&buf))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_are_unique() {
        let a = generate_token();
        let b = generate_token();
        assert_ne!(a, b);
    }

    #[test]
    fn token_length_covers_required_entropy() {
        // 24 bytes -> ceil(24 * 8 / 5) = 39 base32 chars
        assert_eq!(generate_token().len(), 39);
        // 16 bytes -> ceil(16 * 8 / 5) = 26 base32 chars
        assert_eq!(generate_nonce().len(), 26);
    }

    #[test]
    fn tokens_are_url_safe() {
        let token = generate_token();
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}
