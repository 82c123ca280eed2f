//! Loggable fingerprint of the session signing key.
//!
//! Operators compare fingerprints across replicas to confirm they share a key
//! without the key itself ever reaching the logs.

use actix_web::cookie::Key;
use sha2::{Digest, Sha256};

const FINGERPRINT_BYTES: usize = 8;

/// Hex of the first eight bytes of SHA-256 over the signing half of `key`.
///
/// # Examples
/// ```
/// use actix_web::cookie::Key;
/// use tracker::inbound::http::session_config::fingerprint::key_fingerprint;
///
/// let fingerprint = key_fingerprint(&Key::derive_from(&[7; 64]));
/// assert_eq!(fingerprint.len(), 16);
/// ```
#[must_use]
pub fn key_fingerprint(key: &Key) -> String {
    let digest = Sha256::digest(key.signing());
    hex::encode(digest.get(..FINGERPRINT_BYTES).unwrap_or_default())
}
