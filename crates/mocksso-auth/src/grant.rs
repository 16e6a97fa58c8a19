//! Authorization grant management.
//!
//! An [`AuthorizationGrant`] tracks one authorization code from issuance
//! through exchange.
//!
//! # Lifecycle
//!
//! 1. Grant issued when a login starts
//! 2. Client exchanges the code and state for a token (grant consumed)
//! 3. Grant discarded when superseded by the next login or by revocation
//!
//! # Security
//!
//! - Codes and state nonces are cryptographically random (256 bits)
//! - Grants expire after a short time (default 10 minutes)
//! - Codes are single-use (consumed on exchange)
//! - Code and state comparison goes through SHA-256 digests, so a mismatch
//!   costs the same no matter where the strings differ

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::time::Duration;
use time::OffsetDateTime;
use uuid::Uuid;

/// A single-use authorization grant.
///
/// Binds an authorization code to the state nonce echoed back by the caller
/// at exchange time. At most one grant is active per session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationGrant {
    /// Unique grant identifier.
    pub id: Uuid,

    /// Authorization code (one-time use).
    /// 256-bit random value, base64url-encoded.
    pub code: String,

    /// State nonce issued alongside the code and echoed at exchange.
    pub state_nonce: String,

    /// Timestamp when the grant was issued.
    #[serde(with = "time::serde::rfc3339")]
    pub issued_at: OffsetDateTime,

    /// Timestamp when the grant expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Timestamp when the code was exchanged (consumed).
    /// None until the code is used; never reverts to None once set.
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "time::serde::rfc3339::option"
    )]
    pub consumed_at: Option<OffsetDateTime>,
}

impl AuthorizationGrant {
    /// Issues a fresh grant with a random code and state nonce.
    #[must_use]
    pub fn issue(lifetime: Duration) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            code: Self::generate_code(),
            state_nonce: Self::generate_code(),
            issued_at: now,
            expires_at: now + lifetime,
            consumed_at: None,
        }
    }

    /// Generates a new cryptographically secure opaque value.
    ///
    /// The value is 256 bits (32 bytes) of random data, encoded as
    /// base64url without padding (43 characters).
    #[must_use]
    pub fn generate_code() -> String {
        let mut bytes = [0u8; 32];
        rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
        URL_SAFE_NO_PAD.encode(bytes)
    }

    /// Returns `true` if the presented code and state both match this grant.
    ///
    /// Both values are always compared; the comparison works on SHA-256
    /// digests of the inputs.
    #[must_use]
    pub fn matches(&self, presented_code: &str, presented_state: &str) -> bool {
        digest_eq(presented_code, &self.code) & digest_eq(presented_state, &self.state_nonce)
    }

    /// Returns `true` if the grant has expired.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Returns `true` if the authorization code has been consumed.
    ///
    /// Consumed codes cannot be used again (single-use requirement).
    #[must_use]
    pub fn is_consumed(&self) -> bool {
        self.consumed_at.is_some()
    }

    /// Marks the code as consumed.
    ///
    /// The first call records the consumption time; later calls leave the
    /// original timestamp in place.
    pub fn consume(&mut self) {
        if self.consumed_at.is_none() {
            self.consumed_at = Some(OffsetDateTime::now_utc());
        }
    }
}

/// Compares two strings via their SHA-256 digests.
fn digest_eq(a: &str, b: &str) -> bool {
    Sha256::digest(a.as_bytes()) == Sha256::digest(b.as_bytes())
}
