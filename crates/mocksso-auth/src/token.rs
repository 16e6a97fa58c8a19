//! Issued token pair and validation helpers.
//!
//! An [`IssuedToken`] is the ID token + access token pair minted when an
//! authorization code is exchanged. Both strings are minted in JWT compact
//! shape (`header.payload.signature`, base64url segments) but the signature
//! segment is random mock material; nothing here performs cryptographic
//! verification. Validation covers expiry, structure, and claim presence
//! only.

use std::collections::BTreeSet;

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use time::OffsetDateTime;

use crate::claims::{CLAIM_ISSUER, CLAIM_SUBJECT, ClaimSet};
use crate::config::AuthConfig;

/// An issued ID token / access token pair.
///
/// A token is either fully populated or absent; `SessionState` only ever
/// stores a completely minted value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IssuedToken {
    /// ID token in compact signed form (mock signature).
    pub id_token: String,

    /// Access token in compact signed form (mock signature).
    pub access_token: String,

    /// Timestamp when the token expires.
    #[serde(with = "time::serde::rfc3339")]
    pub expires_at: OffsetDateTime,

    /// Granted scopes.
    pub scopes: BTreeSet<String>,

    /// Claims carried by the token.
    pub claims: ClaimSet,
}

impl IssuedToken {
    /// Mints a fresh token pair from the session configuration.
    ///
    /// Claims carry the configured mock identity; expiry is `now + ttl`.
    #[must_use]
    pub fn mint(config: &AuthConfig) -> Self {
        let expires_at = OffsetDateTime::now_utc() + config.token.ttl;
        let claims = ClaimSet::standard(
            config.identity.subject.as_str(),
            config.issuer.as_str(),
            config.identity.role.as_str(),
        );

        Self {
            id_token: compact_token("id", &claims, expires_at),
            access_token: compact_token("access", &claims, expires_at),
            expires_at,
            scopes: config.token.scopes.iter().cloned().collect(),
            claims,
        }
    }

    /// Returns `true` if the token is past its expiry.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        OffsetDateTime::now_utc() > self.expires_at
    }

    /// Returns `true` if both token strings are in compact multi-segment
    /// form (three non-empty dot-separated segments).
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        has_compact_form(&self.id_token) && has_compact_form(&self.access_token)
    }

    /// Returns the granted scopes as a space-separated string.
    #[must_use]
    pub fn scope(&self) -> String {
        self.scopes.iter().cloned().collect::<Vec<_>>().join(" ")
    }

    /// Returns an RFC 7662-style summary of this token.
    #[must_use]
    pub fn introspect(&self) -> TokenIntrospection {
        TokenIntrospection {
            active: !self.is_expired(),
            scope: self.scope(),
            exp: self.expires_at.unix_timestamp(),
            sub: self.claims.get(CLAIM_SUBJECT).map(str::to_string),
            iss: self.claims.get(CLAIM_ISSUER).map(str::to_string),
        }
    }
}

/// Token introspection summary (RFC 7662 shape).
#[derive(Debug, Clone, Serialize)]
pub struct TokenIntrospection {
    /// Whether the token is currently valid.
    pub active: bool,

    /// Granted scopes (space-separated).
    pub scope: String,

    /// Expiry as a unix timestamp.
    pub exp: i64,

    /// Subject claim, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<String>,

    /// Issuer claim, if present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Returns `true` if `s` has exactly three non-empty dot-separated segments.
fn has_compact_form(s: &str) -> bool {
    let segments: Vec<&str> = s.split('.').collect();
    segments.len() == 3 && segments.iter().all(|seg| !seg.is_empty())
}

/// Assembles a compact-form token string around the given claims.
fn compact_token(token_use: &str, claims: &ClaimSet, expires_at: OffsetDateTime) -> String {
    let header = serde_json::json!({ "alg": "none", "typ": "JWT" });

    let mut payload = serde_json::Map::new();
    for (name, value) in claims.iter() {
        payload.insert(name.to_string(), Value::String(value.to_string()));
    }
    payload.insert("token_use".to_string(), Value::String(token_use.to_string()));
    payload.insert("exp".to_string(), Value::from(expires_at.unix_timestamp()));

    format!(
        "{}.{}.{}",
        encode_segment(&header),
        encode_segment(&Value::Object(payload)),
        mock_signature()
    )
}

/// Encodes a JSON value as a base64url segment.
fn encode_segment(value: &Value) -> String {
    URL_SAFE_NO_PAD.encode(value.to_string())
}

/// Random signature-shaped filler; carries no cryptographic meaning.
fn mock_signature() -> String {
    let mut bytes = [0u8; 32];
    rand::Rng::fill(&mut rand::thread_rng(), &mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
