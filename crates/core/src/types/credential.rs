//! Bearer credentials.
//!
//! Tokens come back from the platform's token endpoints as bare JSON strings.
//! They are held as secrets so a stray `{:?}` never prints one.

use core::fmt;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Deserializer};

/// Opaque bearer token returned by a token endpoint.
#[derive(Clone)]
pub struct AuthToken(SecretString);

impl AuthToken {
    /// Wrap a raw token string.
    #[must_use]
    pub fn new(token: impl Into<String>) -> Self {
        Self(SecretString::from(token.into()))
    }

    /// Expose the raw token (for the `Authorization` header).
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Returns `true` when the platform handed back an empty string.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken([REDACTED])")
    }
}

impl<'de> Deserialize<'de> for AuthToken {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        String::deserialize(deserializer).map(Self::new)
    }
}

/// Identity a token was issued for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenScope {
    /// Issued by `/integration/admin/token`.
    Admin,
    /// Issued by `/integration/customer/token`.
    Customer,
}

impl fmt::Display for TokenScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => write!(f, "admin"),
            Self::Customer => write!(f, "customer"),
        }
    }
}

/// A token together with the identity it speaks for.
///
/// Credentials are plain values: a client carrying one is a different value
/// from a client carrying none, so nothing changes identity behind a caller's
/// back.
#[derive(Debug, Clone)]
pub struct Credential {
    scope: TokenScope,
    token: AuthToken,
}

impl Credential {
    /// Admin-scoped credential.
    #[must_use]
    pub const fn admin(token: AuthToken) -> Self {
        Self {
            scope: TokenScope::Admin,
            token,
        }
    }

    /// Customer-scoped credential.
    #[must_use]
    pub const fn customer(token: AuthToken) -> Self {
        Self {
            scope: TokenScope::Customer,
            token,
        }
    }

    /// Which identity this credential represents.
    #[must_use]
    pub const fn scope(&self) -> TokenScope {
        self.scope
    }

    /// The bearer token.
    #[must_use]
    pub const fn token(&self) -> &AuthToken {
        &self.token
    }
}
