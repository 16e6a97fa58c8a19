//! Session configuration.
//!
//! Configuration for the authorization-code flow simulator: token lifetime
//! and contents, authorization-code lifetime, and the mock identity minted
//! into claims.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration for an authorization session.
///
/// # Example (TOML)
///
/// ```toml
/// issuer = "mock-idp"
///
/// [token]
/// ttl = "30s"
/// scopes = ["profile", "email"]
///
/// [grant]
/// lifetime = "10m"
/// ```
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AuthConfig {
    /// Issuer identifier minted into the token `iss` claim.
    pub issuer: String,

    /// Token issuance and validation settings.
    pub token: TokenConfig,

    /// Authorization grant settings.
    pub grant: GrantConfig,

    /// Mock identity minted into token claims.
    pub identity: IdentityConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            issuer: "mock-idp".to_string(),
            token: TokenConfig::default(),
            grant: GrantConfig::default(),
            identity: IdentityConfig::default(),
        }
    }
}

/// Token issuance and validation configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TokenConfig {
    /// Token lifetime.
    /// Short by default so expiry is easy to observe in a demo session.
    #[serde(with = "humantime_serde")]
    pub ttl: Duration,

    /// Scopes granted on exchange.
    pub scopes: Vec<String>,

    /// Claims that must be present and non-empty for a token to verify.
    pub required_claims: Vec<String>,
}

impl Default for TokenConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
            scopes: vec!["profile".to_string(), "email".to_string()],
            required_claims: vec![
                "sub".to_string(),
                "iss".to_string(),
                "role".to_string(),
            ],
        }
    }
}

/// Authorization grant configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct GrantConfig {
    /// Authorization code lifetime.
    /// Codes should be short-lived; an unexchanged code expires after this.
    #[serde(with = "humantime_serde")]
    pub lifetime: Duration,
}

impl Default for GrantConfig {
    fn default() -> Self {
        Self {
            lifetime: Duration::from_secs(600), // 10 minutes
        }
    }
}

/// Mock identity configuration.
///
/// The simulator mints the same identity into every token regardless of the
/// username entered at login. Binding `sub` to the authenticated identity is
/// an extension point on the credential verifier.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Subject identifier minted into the `sub` claim.
    pub subject: String,

    /// Role minted into the `role` claim.
    pub role: String,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            subject: "user123".to_string(),
            role: "user".to_string(),
        }
    }
}

/// Configuration validation errors.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// An invalid configuration value was provided.
    #[error("Invalid configuration value: {0}")]
    InvalidValue(String),

    /// A required configuration value is missing.
    #[error("Missing required configuration: {0}")]
    Missing(String),
}

impl AuthConfig {
    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - The issuer is empty
    /// - The token ttl or grant lifetime is zero
    /// - The scope set or required-claim set is empty, or contains an
    ///   empty string
    /// - The mock identity subject or role is empty
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.issuer.is_empty() {
            return Err(ConfigError::InvalidValue(
                "issuer cannot be empty".to_string(),
            ));
        }

        if self.token.ttl.is_zero() {
            return Err(ConfigError::InvalidValue(
                "token ttl must be > 0".to_string(),
            ));
        }

        if self.grant.lifetime.is_zero() {
            return Err(ConfigError::InvalidValue(
                "grant lifetime must be > 0".to_string(),
            ));
        }

        if self.token.scopes.is_empty() {
            return Err(ConfigError::InvalidValue(
                "scopes cannot be empty".to_string(),
            ));
        }
        if self.token.scopes.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue(
                "scopes cannot contain an empty string".to_string(),
            ));
        }

        if self.token.required_claims.is_empty() {
            return Err(ConfigError::InvalidValue(
                "required_claims cannot be empty".to_string(),
            ));
        }
        if self.token.required_claims.iter().any(String::is_empty) {
            return Err(ConfigError::InvalidValue(
                "required_claims cannot contain an empty string".to_string(),
            ));
        }

        if self.identity.subject.is_empty() {
            return Err(ConfigError::InvalidValue(
                "identity subject cannot be empty".to_string(),
            ));
        }
        if self.identity.role.is_empty() {
            return Err(ConfigError::InvalidValue(
                "identity role cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}
