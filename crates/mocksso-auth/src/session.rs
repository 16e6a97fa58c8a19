//! Session lifecycle state machine.
//!
//! [`SessionState`] coordinates the authorization-code flow for a single
//! session: grant issuance, code exchange, token verification, and
//! revocation.
//!
//! # Lifecycle
//!
//! ```text
//! LoggedOut -> GrantIssued -> TokenIssued -> (LoggedOut)
//! ```
//!
//! `LoggedOut` is both the initial state and the state revocation returns
//! to. Starting a new login from any state discards everything issued under
//! the previous one.
//!
//! # Concurrency
//!
//! `SessionState` has no interior locking; the exchange check-then-set on
//! the consumed flag must not race with itself. [`SharedSession`] wraps a
//! session in a mutex and serializes every operation. Distinct sessions are
//! fully independent.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::claims::ClaimSet;
use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::grant::AuthorizationGrant;
use crate::token::IssuedToken;
use crate::verifier::{CredentialVerifier, MockCredentialVerifier};

/// Where a session currently is in the lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    /// No grant and no token.
    LoggedOut,
    /// A grant has been issued and not yet exchanged.
    GrantIssued,
    /// A token has been minted.
    TokenIssued,
}

impl SessionStatus {
    /// Returns the status as a string.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::LoggedOut => "logged_out",
            Self::GrantIssued => "grant_issued",
            Self::TokenIssued => "token_issued",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// The authorization-code flow state machine for one session.
///
/// Owns at most one [`AuthorizationGrant`] and at most one [`IssuedToken`]
/// at a time. Every operation either succeeds or fails with a specific
/// [`AuthError`]; no failure path leaves partial state behind.
pub struct SessionState {
    config: AuthConfig,
    verifier: Arc<dyn CredentialVerifier>,
    grant: Option<AuthorizationGrant>,
    token: Option<IssuedToken>,
}

impl SessionState {
    /// Creates a logged-out session with the mock credential verifier.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self::with_verifier(config, Arc::new(MockCredentialVerifier))
    }

    /// Creates a logged-out session with a custom credential verifier.
    #[must_use]
    pub fn with_verifier(config: AuthConfig, verifier: Arc<dyn CredentialVerifier>) -> Self {
        Self {
            config,
            verifier,
            grant: None,
            token: None,
        }
    }

    /// Returns the session configuration.
    #[must_use]
    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    /// Returns the issued token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&IssuedToken> {
        self.token.as_ref()
    }

    /// Returns the current lifecycle state.
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        if self.token.is_some() {
            SessionStatus::TokenIssued
        } else if self.grant.is_some() {
            SessionStatus::GrantIssued
        } else {
            SessionStatus::LoggedOut
        }
    }

    /// Starts a new login, issuing a fresh authorization grant.
    ///
    /// Any prior grant and token are discarded: a new login invalidates
    /// everything issued under the old session. On failure nothing changes.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::AuthenticationFailed` if the credential verifier
    /// rejects the credentials.
    pub fn start_login(
        &mut self,
        username: &str,
        credential: &str,
    ) -> Result<AuthorizationGrant, AuthError> {
        self.verifier.verify(username, credential)?;

        let grant = AuthorizationGrant::issue(self.config.grant.lifetime);
        tracing::debug!(grant = %grant.id, username, "issued authorization grant");

        self.token = None;
        self.grant = Some(grant.clone());
        Ok(grant)
    }

    /// Exchanges an authorization code and state nonce for a token.
    ///
    /// On success the grant is consumed and a fresh token is minted,
    /// superseding any previously issued token.
    ///
    /// # Errors
    ///
    /// Checked in order:
    ///
    /// 1. `NoActiveGrant` if no login has been started
    /// 2. `GrantAlreadyUsed` if the code was already exchanged
    /// 3. `InvalidGrant` if the code or state does not match
    /// 4. `GrantExpired` if the grant outlived its lifetime
    ///
    /// A failed exchange never marks the grant consumed.
    pub fn exchange_grant(
        &mut self,
        presented_code: &str,
        presented_state: &str,
    ) -> Result<IssuedToken, AuthError> {
        let grant = self.grant.as_mut().ok_or(AuthError::NoActiveGrant)?;

        if grant.is_consumed() {
            tracing::warn!(grant = %grant.id, "replayed authorization code rejected");
            return Err(AuthError::GrantAlreadyUsed);
        }
        if !grant.matches(presented_code, presented_state) {
            tracing::warn!(grant = %grant.id, "code or state mismatch");
            return Err(AuthError::InvalidGrant);
        }
        if grant.is_expired() {
            tracing::warn!(grant = %grant.id, "expired authorization code rejected");
            return Err(AuthError::GrantExpired);
        }

        grant.consume();
        let grant_id = grant.id;

        let token = IssuedToken::mint(&self.config);
        tracing::debug!(
            grant = %grant_id,
            expires_at = %token.expires_at,
            scope = %token.scope(),
            "authorization code exchanged for token"
        );

        self.token = Some(token.clone());
        Ok(token)
    }

    /// Verifies the issued token and returns its claims.
    ///
    /// Verification is a pure read; it can be repeated any number of times
    /// while the token remains valid.
    ///
    /// # Errors
    ///
    /// Checked in order, failing fast:
    ///
    /// 1. `TokenAbsent` if no token has been issued
    /// 2. `TokenExpired` if the token is past its expiry
    /// 3. `MalformedToken` if either token string is not in compact form
    /// 4. `MissingClaim` if a required claim is missing or empty
    pub fn verify_token(&self) -> Result<ClaimSet, AuthError> {
        let token = self.token.as_ref().ok_or(AuthError::TokenAbsent)?;

        if token.is_expired() {
            return Err(AuthError::TokenExpired);
        }
        if !token.is_well_formed() {
            return Err(AuthError::malformed_token(
                "token is not in compact multi-segment form",
            ));
        }
        for claim in &self.config.token.required_claims {
            if !token.claims.has_value(claim) {
                return Err(AuthError::missing_claim(claim));
            }
        }

        Ok(token.claims.clone())
    }

    /// Revokes the session, clearing the token, grant, and state nonce.
    ///
    /// Idempotent: revoking with nothing active is a no-op, not an error.
    pub fn revoke(&mut self) {
        self.grant = None;
        self.token = None;
        tracing::debug!("session revoked");
    }
}

/// A session behind a mutex, safe to share across threads.
///
/// Every operation takes the lock for its full duration, so the exchange
/// check-then-set cannot race: of N threads presenting the same code,
/// exactly one wins and the rest observe `GrantAlreadyUsed`.
#[derive(Clone)]
pub struct SharedSession {
    inner: Arc<Mutex<SessionState>>,
}

impl SharedSession {
    /// Creates a shared logged-out session.
    #[must_use]
    pub fn new(config: AuthConfig) -> Self {
        Self::from_state(SessionState::new(config))
    }

    /// Wraps an existing session.
    #[must_use]
    pub fn from_state(state: SessionState) -> Self {
        Self {
            inner: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// See [`SessionState::start_login`].
    pub fn start_login(
        &self,
        username: &str,
        credential: &str,
    ) -> Result<AuthorizationGrant, AuthError> {
        self.lock().start_login(username, credential)
    }

    /// See [`SessionState::exchange_grant`].
    pub fn exchange_grant(
        &self,
        presented_code: &str,
        presented_state: &str,
    ) -> Result<IssuedToken, AuthError> {
        self.lock().exchange_grant(presented_code, presented_state)
    }

    /// See [`SessionState::verify_token`].
    pub fn verify_token(&self) -> Result<ClaimSet, AuthError> {
        self.lock().verify_token()
    }

    /// See [`SessionState::revoke`].
    pub fn revoke(&self) {
        self.lock().revoke();
    }

    /// See [`SessionState::status`].
    #[must_use]
    pub fn status(&self) -> SessionStatus {
        self.lock().status()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;
    use time::OffsetDateTime;

    fn logged_in_session() -> (SessionState, AuthorizationGrant) {
        let mut session = SessionState::new(AuthConfig::default());
        let grant = session.start_login("alice", "pw").unwrap();
        (session, grant)
    }

    #[test]
    fn test_status_transitions() {
        let mut session = SessionState::new(AuthConfig::default());
        assert_eq!(session.status(), SessionStatus::LoggedOut);

        let grant = session.start_login("alice", "pw").unwrap();
        assert_eq!(session.status(), SessionStatus::GrantIssued);

        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();
        assert_eq!(session.status(), SessionStatus::TokenIssued);

        session.revoke();
        assert_eq!(session.status(), SessionStatus::LoggedOut);
    }

    #[test]
    fn test_exchange_before_login_fails() {
        let mut session = SessionState::new(AuthConfig::default());
        let err = session.exchange_grant("code", "state").unwrap_err();
        assert!(matches!(err, AuthError::NoActiveGrant));
    }

    #[test]
    fn test_happy_path_verification() {
        let (mut session, grant) = logged_in_session();
        let token = session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        assert_eq!(token.scope(), "email profile");
        assert!(token.is_well_formed());

        let claims = session.verify_token().unwrap();
        assert_eq!(claims.get("sub"), Some("user123"));
        assert_eq!(claims.get("iss"), Some("mock-idp"));
        assert_eq!(claims.get("role"), Some("user"));

        // Verification is a pure read and can be repeated
        assert!(session.verify_token().is_ok());
        assert_eq!(session.status(), SessionStatus::TokenIssued);
    }

    #[test]
    fn test_replay_fails_and_never_remints() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        for _ in 0..3 {
            let err = session
                .exchange_grant(&grant.code, &grant.state_nonce)
                .unwrap_err();
            assert!(matches!(err, AuthError::GrantAlreadyUsed));
        }

        // The token from the first exchange is still the one verifying
        assert!(session.verify_token().is_ok());
    }

    #[test]
    fn test_mismatch_does_not_consume_grant() {
        let (mut session, grant) = logged_in_session();

        let err = session
            .exchange_grant("wrong-code", &grant.state_nonce)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant));

        let err = session
            .exchange_grant(&grant.code, "wrong-state")
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant));

        // The grant survived both mismatches and still exchanges cleanly
        assert!(
            session
                .exchange_grant(&grant.code, &grant.state_nonce)
                .is_ok()
        );
    }

    #[test]
    fn test_expired_grant_fails_and_is_not_consumed() {
        let (mut session, grant) = logged_in_session();
        session.grant.as_mut().unwrap().expires_at =
            OffsetDateTime::now_utc() - time::Duration::seconds(1);

        let err = session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap_err();
        assert!(matches!(err, AuthError::GrantExpired));
        assert!(!session.grant.as_ref().unwrap().is_consumed());
    }

    #[test]
    fn test_new_login_supersedes_grant() {
        let (mut session, first) = logged_in_session();
        let second = session.start_login("alice", "pw").unwrap();
        assert_ne!(first.code, second.code);

        // The old code no longer matches the active grant
        let err = session
            .exchange_grant(&first.code, &first.state_nonce)
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidGrant));

        // The new grant is unaffected
        assert!(
            session
                .exchange_grant(&second.code, &second.state_nonce)
                .is_ok()
        );
    }

    #[test]
    fn test_new_login_discards_token() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();
        assert!(session.verify_token().is_ok());

        session.start_login("alice", "pw").unwrap();
        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::TokenAbsent));
    }

    #[test]
    fn test_revoke_is_idempotent() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        session.revoke();
        session.revoke();
        assert_eq!(session.status(), SessionStatus::LoggedOut);

        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::TokenAbsent));

        let err = session.exchange_grant("x", "y").unwrap_err();
        assert!(matches!(err, AuthError::NoActiveGrant));
    }

    #[test]
    fn test_verify_expired_token() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        session.token.as_mut().unwrap().expires_at =
            OffsetDateTime::now_utc() - time::Duration::seconds(1);

        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }

    #[test]
    fn test_verify_malformed_token() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        session.token.as_mut().unwrap().id_token = "not-compact".to_string();

        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::MalformedToken { .. }));
    }

    #[test]
    fn test_verify_missing_required_claim() {
        let mut config = AuthConfig::default();
        config.token.required_claims.push("email".to_string());

        let mut session = SessionState::new(config);
        let grant = session.start_login("alice", "pw").unwrap();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        // The minted claims carry only sub/iss/role
        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::MissingClaim { claim } if claim == "email"));
    }

    #[test]
    fn test_rejected_login_leaves_state_untouched() {
        let (mut session, grant) = logged_in_session();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        // The mock verifier rejects an empty username
        let err = session.start_login("", "pw").unwrap_err();
        assert!(err.is_authentication_error());

        // The existing token is still there and still valid
        assert_eq!(session.status(), SessionStatus::TokenIssued);
        assert!(session.verify_token().is_ok());
    }

    #[test]
    fn test_custom_verifier_rejection() {
        struct DenyAll;

        impl CredentialVerifier for DenyAll {
            fn verify(&self, _username: &str, _credential: &str) -> Result<(), AuthError> {
                Err(AuthError::authentication_failed("denied"))
            }
        }

        let mut session = SessionState::with_verifier(AuthConfig::default(), Arc::new(DenyAll));
        let err = session.start_login("alice", "pw").unwrap_err();
        assert!(err.is_authentication_error());
        assert_eq!(session.status(), SessionStatus::LoggedOut);
    }

    #[test]
    fn test_shared_session_race_has_one_winner() {
        let session = SharedSession::new(AuthConfig::default());
        let grant = session.start_login("alice", "pw").unwrap();

        let mut outcomes = Vec::new();
        std::thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let session = session.clone();
                    let code = grant.code.clone();
                    let state = grant.state_nonce.clone();
                    scope.spawn(move || session.exchange_grant(&code, &state))
                })
                .collect();
            for handle in handles {
                outcomes.push(handle.join().unwrap());
            }
        });

        let wins = outcomes.iter().filter(|r| r.is_ok()).count();
        assert_eq!(wins, 1);
        for outcome in outcomes.iter().filter(|r| r.is_err()) {
            assert!(matches!(
                outcome.as_ref().unwrap_err(),
                AuthError::GrantAlreadyUsed
            ));
        }
    }

    #[test]
    fn test_shared_session_full_flow() {
        let session = SharedSession::new(AuthConfig::default());
        assert_eq!(session.status(), SessionStatus::LoggedOut);

        let grant = session.start_login("alice", "pw").unwrap();
        let token = session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();
        assert!(!token.is_expired());

        assert!(session.verify_token().is_ok());
        session.revoke();
        assert!(matches!(
            session.verify_token().unwrap_err(),
            AuthError::TokenAbsent
        ));
    }

    #[test]
    fn test_short_ttl_expires_token() {
        let mut config = AuthConfig::default();
        config.token.ttl = Duration::from_millis(1);

        let mut session = SessionState::new(config);
        let grant = session.start_login("alice", "pw").unwrap();
        session
            .exchange_grant(&grant.code, &grant.state_nonce)
            .unwrap();

        std::thread::sleep(Duration::from_millis(10));
        let err = session.verify_token().unwrap_err();
        assert!(matches!(err, AuthError::TokenExpired));
    }
}
