//! Payload signature verification.
//!
//! The platform signs every delivery with an HMAC-SHA256 digest of the raw
//! request body, sent as `X-Hub-Signature-256: sha256=<hex>`. Verification
//! must run over the raw bytes — re-serializing a parsed document changes
//! key order and whitespace and produces false negatives.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::error::WebhookError;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 digest of `body` keyed by `secret`.
///
/// # Errors
///
/// Returns `WebhookError::InvalidSecret` when the secret cannot be used as
/// an HMAC key.
pub fn signature_hex(body: &[u8], secret: &str) -> Result<String, WebhookError> {
    let mut mac = HmacSha256::new_from_slice(secret.as_bytes())
        .map_err(|_| WebhookError::InvalidSecret)?;
    mac.update(body);
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Verifies a raw request body against an expected hex digest.
///
/// Pure function of its inputs: recomputes the digest over `body` with
/// `secret` and compares in constant time. Returns `false` on any digest
/// mismatch or unusable secret, never an error.
pub fn verify_signature(body: &[u8], expected_hex: &str, secret: &str) -> bool {
    match signature_hex(body, secret) {
        Ok(actual) => constant_time_eq(&actual, expected_hex),
        Err(_) => false,
    }
}

/// Extracts the hex digest from a signature header value.
///
/// Accepts the platform's `sha256=<hex>` format and bare 64-character hex.
/// Returns `None` for anything else.
pub fn parse_signature_header(value: &str) -> Option<&str> {
    if let Some(hex_digest) = value.strip_prefix("sha256=") {
        return Some(hex_digest);
    }

    if value.len() == 64 && value.chars().all(|c| c.is_ascii_hexdigit()) {
        return Some(value);
    }

    None
}

/// Constant-time string comparison.
///
/// Avoids leaking the expected digest through timing differences.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (a_byte, b_byte) in a.bytes().zip(b.bytes()) {
        result |= a_byte ^ b_byte;
    }

    result == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_round_trip_verifies() {
        let body = br#"{"object":"whatsapp_business_account","entry":[]}"#;
        let digest = signature_hex(body, "app-secret").unwrap();

        assert_eq!(digest.len(), 64);
        assert!(verify_signature(body, &digest, "app-secret"));
    }

    #[test]
    fn wrong_secret_fails_verification() {
        let body = b"payload bytes";
        let digest = signature_hex(body, "secret-one").unwrap();

        assert!(!verify_signature(body, &digest, "secret-two"));
    }

    #[test]
    fn altered_body_fails_verification() {
        let digest = signature_hex(b"original", "secret").unwrap();

        assert!(!verify_signature(b"tampered", &digest, "secret"));
    }

    #[test]
    fn digest_is_deterministic() {
        let first = signature_hex(b"same bytes", "secret").unwrap();
        let second = signature_hex(b"same bytes", "secret").unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn header_parsing_strips_platform_prefix() {
        assert_eq!(parse_signature_header("sha256=abc123"), Some("abc123"));
    }

    #[test]
    fn header_parsing_accepts_bare_hex() {
        let digest = "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
        assert_eq!(parse_signature_header(digest), Some(digest));
    }

    #[test]
    fn header_parsing_rejects_other_formats() {
        assert_eq!(parse_signature_header("md5=abc"), None);
        assert_eq!(parse_signature_header("not-hex-at-all"), None);
    }

    #[test]
    fn constant_time_eq_behaves() {
        assert!(constant_time_eq("deadbeef", "deadbeef"));
        assert!(!constant_time_eq("deadbeef", "deadbeee"));
        assert!(!constant_time_eq("deadbeef", "deadbeef00"));
    }
}
