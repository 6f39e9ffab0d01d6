//! ENS webhook signature verification.
//!
//! ENS signs each callback with HMAC-SHA256 over the raw request body,
//! using a shared key delivered (base64-encoded) at callback registration.
//! Verification must run on the exact bytes received - re-serializing the
//! parsed JSON would corrupt the digest.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Outcome of verifying one callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyOutcome {
    /// Signature matches; the event may be processed
    Valid,
    /// No signature key configured (or the configured key is not valid base64)
    MissingConfig,
    /// The request carried no signature header
    MissingSignature,
    /// Signature present but does not match the body
    Mismatch,
}

/// Verifies an ENS callback signature against the raw body bytes.
///
/// Pure function over its inputs. The caller acknowledges the request with
/// 200 regardless of the outcome; only `Valid` lets processing continue.
pub fn verify(
    raw_body: &[u8],
    provided_signature: Option<&str>,
    signature_key_b64: Option<&str>,
) -> VerifyOutcome {
    let key_b64 = match signature_key_b64 {
        Some(k) => k,
        None => return VerifyOutcome::MissingConfig,
    };

    let provided = match provided_signature {
        Some(s) => s,
        None => return VerifyOutcome::MissingSignature,
    };

    // An undecodable key is an operator fault, not a caller fault
    let key = match BASE64.decode(key_b64) {
        Ok(k) => k,
        Err(_) => return VerifyOutcome::MissingConfig,
    };

    let expected = match BASE64.decode(provided) {
        Ok(sig) => sig,
        Err(_) => return VerifyOutcome::Mismatch,
    };

    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(raw_body);

    // verify_slice is constant-time
    match mac.verify_slice(&expected) {
        Ok(()) => VerifyOutcome::Valid,
        Err(_) => VerifyOutcome::Mismatch,
    }
}

/// Computes the base64 signature ENS would send for `body` under `key_b64`.
///
/// Used by tests and local tooling; the relay itself only verifies.
pub fn sign(body: &[u8], key_b64: &str) -> Option<String> {
    let key = BASE64.decode(key_b64).ok()?;
    let mut mac = HmacSha256::new_from_slice(&key).expect("HMAC can take key of any size");
    mac.update(body);
    Some(BASE64.encode(mac.finalize().into_bytes()))
}
