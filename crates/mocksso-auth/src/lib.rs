//! # mocksso-auth
//!
//! Lifecycle core of the MockSSO authorization-code flow simulator.
//!
//! This crate provides:
//! - A single-session OAuth2/OIDC-style state machine (login, code
//!   exchange, token verification, revocation)
//! - Single-use authorization grants with random codes and state nonces
//! - Mock token minting in compact signed form (no real cryptography)
//! - Structural and claim validation with a typed error taxonomy
//!
//! ## Overview
//!
//! The flow mirrors the authorization-code grant: [`SessionState`] issues an
//! [`AuthorizationGrant`], the caller exchanges it (consuming the grant) for
//! an [`IssuedToken`], and later verifies or revokes that token. Everything
//! is in-process and synchronous; transport, storage, and real signing are
//! collaborator concerns outside this crate.
//!
//! ## Modules
//!
//! - [`config`] - Session, token, and grant configuration
//! - [`claims`] - Claim sets carried by issued tokens
//! - [`grant`] - Single-use authorization grants
//! - [`token`] - Issued token pair and introspection
//! - [`session`] - The lifecycle state machine
//! - [`verifier`] - Credential verification seam
//!
//! ## Example
//!
//! ```
//! use mocksso_auth::{AuthConfig, SessionState};
//!
//! let mut session = SessionState::new(AuthConfig::default());
//! let grant = session.start_login("alice", "pw")?;
//! let token = session.exchange_grant(&grant.code, &grant.state_nonce)?;
//! assert!(!token.is_expired());
//!
//! let claims = session.verify_token()?;
//! assert_eq!(claims.get("iss"), Some("mock-idp"));
//!
//! session.revoke();
//! # Ok::<(), mocksso_auth::AuthError>(())
//! ```

pub mod claims;
pub mod config;
pub mod error;
pub mod grant;
pub mod session;
pub mod token;
pub mod verifier;

pub use claims::{CLAIM_ISSUER, CLAIM_ROLE, CLAIM_SUBJECT, ClaimError, ClaimSet};
pub use config::{AuthConfig, ConfigError, GrantConfig, IdentityConfig, TokenConfig};
pub use error::{AuthError, ErrorCategory};
pub use grant::AuthorizationGrant;
pub use session::{SessionState, SessionStatus, SharedSession};
pub use token::{IssuedToken, TokenIntrospection};
pub use verifier::{CredentialVerifier, MockCredentialVerifier};

/// Type alias for authorization flow results.
pub type AuthResult<T> = Result<T, AuthError>;

/// Prelude module for convenient imports.
///
/// ```ignore
/// use mocksso_auth::prelude::*;
/// ```
pub mod prelude {
    pub use crate::AuthResult;
    pub use crate::claims::{ClaimError, ClaimSet};
    pub use crate::config::{AuthConfig, ConfigError};
    pub use crate::error::{AuthError, ErrorCategory};
    pub use crate::grant::AuthorizationGrant;
    pub use crate::session::{SessionState, SessionStatus, SharedSession};
    pub use crate::token::{IssuedToken, TokenIntrospection};
    pub use crate::verifier::{CredentialVerifier, MockCredentialVerifier};
}
