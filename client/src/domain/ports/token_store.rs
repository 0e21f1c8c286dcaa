//! Driven port for the persisted session: one auth token and one role.
//!
//! The two values are keyed independently. Adapters perform no expiry
//! tracking; the server decides whether a token is still valid.

use std::sync::{Mutex, PoisonError};

use super::define_port_error;
use crate::domain::{AuthToken, Role};

define_port_error! {
    /// Errors surfaced by session storage adapters.
    pub enum TokenStoreError {
        /// Persisted state could not be read.
        Read { message: String } =>
            "session store read failed: {message}",
        /// Persisted state could not be written or removed.
        Write { message: String } =>
            "session store write failed: {message}",
    }
}

/// Port for reading and writing the persisted session values.
///
/// The role is returned as the raw stored string; interpreting it is the
/// session layer's job so that unknown values can be handled in one place.
#[cfg_attr(test, mockall::automock)]
pub trait TokenStore: Send + Sync {
    /// Current auth token, if one is stored.
    fn token(&self) -> Result<Option<AuthToken>, TokenStoreError>;

    /// Persist `token`, replacing any previous value.
    fn set_token(&self, token: &AuthToken) -> Result<(), TokenStoreError>;

    /// Remove the stored token. Removing an absent token is not an error.
    fn clear_token(&self) -> Result<(), TokenStoreError>;

    /// Raw stored role string, if any.
    fn role(&self) -> Result<Option<String>, TokenStoreError>;

    /// Persist `role`, replacing any previous value.
    fn set_role(&self, role: Role) -> Result<(), TokenStoreError>;

    /// Remove the stored role.
    fn clear_role(&self) -> Result<(), TokenStoreError>;
}

#[derive(Debug, Default)]
struct StoredValues {
    token: Option<AuthToken>,
    role: Option<String>,
}

/// Process-local token store.
///
/// Used by tests and by callers that do not want the session to outlive the
/// process.
///
/// # Examples
/// ```
/// use amep_client::domain::AuthToken;
/// use amep_client::domain::ports::{InMemoryTokenStore, TokenStore};
///
/// let store = InMemoryTokenStore::default();
/// let token = AuthToken::new("abc").expect("non-empty token");
/// store.set_token(&token).expect("in-memory writes succeed");
/// assert_eq!(store.token().expect("read").map(|t| t.expose().to_owned()), Some("abc".to_owned()));
/// store.clear_token().expect("clear");
/// assert!(store.token().expect("read").is_none());
/// ```
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    values: Mutex<StoredValues>,
}

impl InMemoryTokenStore {
    /// Build a store pre-populated with a raw role string.
    ///
    /// Lets tests reproduce persisted state that no longer parses as a
    /// [`Role`].
    #[must_use]
    pub fn with_raw_role(token: Option<AuthToken>, role: Option<&str>) -> Self {
        Self {
            values: Mutex::new(StoredValues {
                token,
                role: role.map(str::to_owned),
            }),
        }
    }

    fn with_values<T>(&self, f: impl FnOnce(&mut StoredValues) -> T) -> T {
        let mut guard = self.values.lock().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl TokenStore for InMemoryTokenStore {
    fn token(&self) -> Result<Option<AuthToken>, TokenStoreError> {
        Ok(self.with_values(|values| values.token.clone()))
    }

    fn set_token(&self, token: &AuthToken) -> Result<(), TokenStoreError> {
        self.with_values(|values| values.token = Some(token.clone()));
        Ok(())
    }

    fn clear_token(&self) -> Result<(), TokenStoreError> {
        self.with_values(|values| values.token = None);
        Ok(())
    }

    fn role(&self) -> Result<Option<String>, TokenStoreError> {
        Ok(self.with_values(|values| values.role.clone()))
    }

    fn set_role(&self, role: Role) -> Result<(), TokenStoreError> {
        self.with_values(|values| values.role = Some(role.as_str().to_owned()));
        Ok(())
    }

    fn clear_role(&self) -> Result<(), TokenStoreError> {
        self.with_values(|values| values.role = None);
        Ok(())
    }
}
