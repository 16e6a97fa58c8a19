//! Claim sets carried by issued tokens.
//!
//! A [`ClaimSet`] is a mapping from claim name to claim value. Order is
//! irrelevant. Claim names must be non-empty; the map structure itself rules
//! out duplicate names (inserting an existing name replaces its value).

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Registered claim name for the subject identifier.
pub const CLAIM_SUBJECT: &str = "sub";

/// Registered claim name for the token issuer.
pub const CLAIM_ISSUER: &str = "iss";

/// Registered claim name for the subject's role.
pub const CLAIM_ROLE: &str = "role";

/// Errors that can occur when building a claim set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClaimError {
    /// Claim names must be non-empty.
    #[error("Claim name cannot be empty")]
    EmptyName,
}

/// A mapping from claim name to claim value.
///
/// Used as the payload of issued tokens. Verification reads it; nothing
/// mutates a claim set once it is attached to a token.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClaimSet(BTreeMap<String, String>);

impl ClaimSet {
    /// Creates an empty claim set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a claim set carrying the registered `sub`, `iss`, and `role`
    /// claims.
    #[must_use]
    pub fn standard(
        subject: impl Into<String>,
        issuer: impl Into<String>,
        role: impl Into<String>,
    ) -> Self {
        let mut claims = BTreeMap::new();
        claims.insert(CLAIM_SUBJECT.to_string(), subject.into());
        claims.insert(CLAIM_ISSUER.to_string(), issuer.into());
        claims.insert(CLAIM_ROLE.to_string(), role.into());
        Self(claims)
    }

    /// Inserts a claim, returning the previous value if the name was already
    /// present.
    ///
    /// # Errors
    ///
    /// Returns `ClaimError::EmptyName` if the claim name is empty.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<Option<String>, ClaimError> {
        let name = name.into();
        if name.is_empty() {
            return Err(ClaimError::EmptyName);
        }
        Ok(self.0.insert(name, value.into()))
    }

    /// Returns the value of a claim, if present.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    /// Returns `true` if the claim is present with a non-empty value.
    #[must_use]
    pub fn has_value(&self, name: &str) -> bool {
        self.get(name).is_some_and(|v| !v.is_empty())
    }

    /// Returns the number of claims.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if the set contains no claims.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates over `(name, value)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}
