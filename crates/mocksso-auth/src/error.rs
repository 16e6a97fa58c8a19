//! Authorization flow error types.
//!
//! This module defines all errors a session can report to its caller. Every
//! error is local, recoverable, and caller-facing; none is fatal to the
//! process. The core never prints — rendering is the presentation layer's
//! responsibility.

use std::fmt;

/// Errors that can occur during the authorization-code flow.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// The supplied credentials were rejected by the credential verifier.
    #[error("Authentication failed: {message}")]
    AuthenticationFailed {
        /// Description of why authentication failed.
        message: String,
    },

    /// No authorization grant exists (no login has been started).
    #[error("No active authorization grant")]
    NoActiveGrant,

    /// The authorization code was already exchanged.
    ///
    /// Codes are single-use; a second exchange is a replay and never
    /// re-mints a token.
    #[error("Authorization code already used")]
    GrantAlreadyUsed,

    /// The presented code or state does not match the active grant.
    #[error("Invalid authorization code or state")]
    InvalidGrant,

    /// The authorization grant expired before it was exchanged.
    #[error("Authorization code expired")]
    GrantExpired,

    /// No token has been issued in this session.
    #[error("No token present")]
    TokenAbsent,

    /// The issued token is past its expiry.
    #[error("Token expired")]
    TokenExpired,

    /// The token material is not in the expected multi-segment form.
    #[error("Malformed token: {message}")]
    MalformedToken {
        /// Description of the structural problem.
        message: String,
    },

    /// A required claim is missing or empty.
    #[error("Missing required claim: {claim}")]
    MissingClaim {
        /// Name of the missing claim.
        claim: String,
    },
}

impl AuthError {
    /// Creates a new `AuthenticationFailed` error.
    #[must_use]
    pub fn authentication_failed(message: impl Into<String>) -> Self {
        Self::AuthenticationFailed {
            message: message.into(),
        }
    }

    /// Creates a new `MalformedToken` error.
    #[must_use]
    pub fn malformed_token(message: impl Into<String>) -> Self {
        Self::MalformedToken {
            message: message.into(),
        }
    }

    /// Creates a new `MissingClaim` error.
    #[must_use]
    pub fn missing_claim(claim: impl Into<String>) -> Self {
        Self::MissingClaim {
            claim: claim.into(),
        }
    }

    /// Returns `true` if this is an authentication error.
    #[must_use]
    pub fn is_authentication_error(&self) -> bool {
        matches!(self, Self::AuthenticationFailed { .. })
    }

    /// Returns `true` if this is a grant-related error.
    #[must_use]
    pub fn is_grant_error(&self) -> bool {
        matches!(
            self,
            Self::NoActiveGrant | Self::GrantAlreadyUsed | Self::InvalidGrant | Self::GrantExpired
        )
    }

    /// Returns `true` if this is a token-related error.
    #[must_use]
    pub fn is_token_error(&self) -> bool {
        matches!(
            self,
            Self::TokenAbsent
                | Self::TokenExpired
                | Self::MalformedToken { .. }
                | Self::MissingClaim { .. }
        )
    }

    /// Returns the error category for logging/monitoring purposes.
    #[must_use]
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::AuthenticationFailed { .. } => ErrorCategory::Authentication,
            Self::NoActiveGrant
            | Self::GrantAlreadyUsed
            | Self::InvalidGrant
            | Self::GrantExpired => ErrorCategory::Grant,
            Self::TokenAbsent
            | Self::TokenExpired
            | Self::MalformedToken { .. }
            | Self::MissingClaim { .. } => ErrorCategory::Token,
        }
    }

    /// Returns the OAuth 2.0 error code for this error.
    #[must_use]
    pub fn oauth_error_code(&self) -> &'static str {
        match self {
            Self::AuthenticationFailed { .. } => "access_denied",
            Self::NoActiveGrant
            | Self::GrantAlreadyUsed
            | Self::InvalidGrant
            | Self::GrantExpired => "invalid_grant",
            Self::TokenAbsent
            | Self::TokenExpired
            | Self::MalformedToken { .. }
            | Self::MissingClaim { .. } => "invalid_token",
        }
    }
}

/// Categories of authorization flow errors for logging and monitoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Credential verification errors.
    Authentication,
    /// Authorization grant errors (issuance, exchange).
    Grant,
    /// Token errors (validation, expiration).
    Token,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Authentication => write!(f, "authentication"),
            Self::Grant => write!(f, "grant"),
            Self::Token => write!(f, "token"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = AuthError::authentication_failed("username cannot be empty");
        assert_eq!(
            err.to_string(),
            "Authentication failed: username cannot be empty"
        );

        let err = AuthError::GrantAlreadyUsed;
        assert_eq!(err.to_string(), "Authorization code already used");

        let err = AuthError::missing_claim("sub");
        assert_eq!(err.to_string(), "Missing required claim: sub");

        let err = AuthError::malformed_token("expected three segments");
        assert_eq!(err.to_string(), "Malformed token: expected three segments");
    }

    #[test]
    fn test_error_predicates() {
        let err = AuthError::authentication_failed("bad credentials");
        assert!(err.is_authentication_error());
        assert!(!err.is_grant_error());
        assert!(!err.is_token_error());

        let err = AuthError::InvalidGrant;
        assert!(err.is_grant_error());
        assert!(!err.is_token_error());

        let err = AuthError::GrantExpired;
        assert!(err.is_grant_error());

        let err = AuthError::TokenExpired;
        assert!(err.is_token_error());
        assert!(!err.is_grant_error());

        let err = AuthError::missing_claim("iss");
        assert!(err.is_token_error());
    }

    #[test]
    fn test_error_category() {
        assert_eq!(
            AuthError::authentication_failed("x").category(),
            ErrorCategory::Authentication
        );
        assert_eq!(AuthError::NoActiveGrant.category(), ErrorCategory::Grant);
        assert_eq!(AuthError::GrantAlreadyUsed.category(), ErrorCategory::Grant);
        assert_eq!(AuthError::TokenAbsent.category(), ErrorCategory::Token);
        assert_eq!(
            AuthError::missing_claim("role").category(),
            ErrorCategory::Token
        );
    }

    #[test]
    fn test_oauth_error_code() {
        assert_eq!(
            AuthError::authentication_failed("x").oauth_error_code(),
            "access_denied"
        );
        assert_eq!(AuthError::NoActiveGrant.oauth_error_code(), "invalid_grant");
        assert_eq!(
            AuthError::GrantAlreadyUsed.oauth_error_code(),
            "invalid_grant"
        );
        assert_eq!(AuthError::InvalidGrant.oauth_error_code(), "invalid_grant");
        assert_eq!(AuthError::TokenExpired.oauth_error_code(), "invalid_token");
        assert_eq!(
            AuthError::malformed_token("x").oauth_error_code(),
            "invalid_token"
        );
    }

    #[test]
    fn test_error_category_display() {
        assert_eq!(ErrorCategory::Authentication.to_string(), "authentication");
        assert_eq!(ErrorCategory::Grant.to_string(), "grant");
        assert_eq!(ErrorCategory::Token.to_string(), "token");
    }
}
