//! The client-held session: an opaque bearer token plus the user's role.
//!
//! [`SessionHandle`] is the one object through which the executor, the guard
//! and the auth flow read or tear down the session. It is created at start
//! up, hydrates from whatever [`TokenStore`] backs it, and is cleared on
//! logout or on any unauthorised response.

use std::fmt;
use std::sync::Arc;

use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::Role;
use super::ports::{TokenStore, TokenStoreError};

/// Validation error for [`AuthToken`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthTokenValidationError {
    /// Token was empty or whitespace.
    #[error("auth token must not be empty")]
    Empty,
    /// Token contained whitespace and cannot travel in a bearer header.
    #[error("auth token must not contain whitespace")]
    ContainsWhitespace,
}

/// Opaque bearer token issued by the backend.
///
/// ## Invariants
/// - Non-empty and free of whitespace, so `Bearer <token>` is a single
///   well-formed header value.
///
/// The value is zeroised on drop and redacted from `Debug` output.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Validate and wrap a raw token string.
    ///
    /// # Examples
    /// ```
    /// use amep_client::domain::AuthToken;
    ///
    /// let token = AuthToken::new("eyJhbGciOi").expect("valid token");
    /// assert_eq!(token.bearer(), "Bearer eyJhbGciOi");
    /// assert!(AuthToken::new("  ").is_err());
    /// ```
    pub fn new(raw: impl Into<String>) -> Result<Self, AuthTokenValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return Err(AuthTokenValidationError::Empty);
        }
        if raw.chars().any(char::is_whitespace) {
            return Err(AuthTokenValidationError::ContainsWhitespace);
        }
        Ok(Self(raw))
    }

    /// The raw token. Avoid logging it.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// `Authorization` header value for this token.
    #[must_use]
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.expose())
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(<redacted>)")
    }
}

/// Snapshot of the persisted session.
///
/// ## Invariants
/// - The role is only reported while a token is present.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Session {
    token: Option<AuthToken>,
    role: Option<Role>,
}

impl Session {
    /// Session with neither token nor role.
    #[must_use]
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Session holding `token` and, optionally, `role`.
    #[must_use]
    pub fn authenticated(token: AuthToken, role: Option<Role>) -> Self {
        Self {
            token: Some(token),
            role,
        }
    }

    /// Stored token, if any.
    #[must_use]
    pub fn token(&self) -> Option<&AuthToken> {
        self.token.as_ref()
    }

    /// Stored role; `None` whenever no token is present.
    #[must_use]
    pub fn role(&self) -> Option<Role> {
        self.token.as_ref().and(self.role)
    }

    /// Whether a token is stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// Shared handle over the session store.
///
/// Cloning is cheap; all clones observe the same store.
#[derive(Clone)]
pub struct SessionHandle {
    store: Arc<dyn TokenStore>,
}

impl fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionHandle").finish_non_exhaustive()
    }
}

impl SessionHandle {
    /// Wrap a token store.
    #[must_use]
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self { store }
    }

    /// Read the current session from the store.
    ///
    /// A stored role that no longer parses is dropped with a warning; the
    /// token is kept so the user is still treated as signed in.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be read.
    pub fn current(&self) -> Result<Session, TokenStoreError> {
        let Some(token) = self.store.token()? else {
            return Ok(Session::anonymous());
        };
        let role = match self.store.role()? {
            Some(raw) => match raw.parse::<Role>() {
                Ok(role) => Some(role),
                Err(error) => {
                    warn!(%error, "ignoring unrecognised stored role");
                    None
                }
            },
            None => None,
        };
        Ok(Session::authenticated(token, role))
    }

    /// Stored token only; cheaper than [`Self::current`] for request signing.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the store cannot be read.
    pub fn token(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        self.store.token()
    }

    /// Persist a freshly issued token and role.
    ///
    /// Passing `None` for the role clears any role left over from an earlier
    /// session so the two values never disagree.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when either value cannot be written.
    pub fn establish(&self, token: &AuthToken, role: Option<Role>) -> Result<(), TokenStoreError> {
        self.store.set_token(token)?;
        match role {
            Some(role) => self.store.set_role(role)?,
            None => self.store.clear_role()?,
        }
        info!(role = role.map(Role::as_str), "session established");
        Ok(())
    }

    /// Remove both token and role.
    ///
    /// Both removals are attempted even if the first fails; the first error
    /// is returned.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when either value cannot be removed.
    pub fn clear(&self) -> Result<(), TokenStoreError> {
        let token_result = self.store.clear_token();
        let role_result = self.store.clear_role();
        token_result.and(role_result)?;
        info!("session cleared");
        Ok(())
    }
}
