//! Sign-in, sign-out and registration.
//!
//! Credentials are validated before anything is sent. Passwords live in
//! [`Zeroizing`] buffers and are only borrowed while the request body is
//! serialised.

use std::fmt;

use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use zeroize::Zeroizing;

use super::catalog::auth::{CURRENT_USER, LOGIN, SIGNUP, TOKEN};
use super::endpoint::{EndpointParams, FormFields, RequestBody};
use super::executor::RequestExecutor;
use super::models::{TokenResponse, User};
use super::navigation::View;
use super::outcome::{Failure, Outcome};
use super::ports::TokenStoreError;
use super::role::Role;
use super::session::{AuthToken, Session};

/// Reasons sign-in or registration input is rejected locally.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialsValidationError {
    /// Email was missing or blank once trimmed.
    #[error("email must not be empty")]
    EmptyEmail,
    /// Password was blank.
    #[error("password must not be empty")]
    EmptyPassword,
    /// Display name was missing or blank once trimmed.
    #[error("name must not be empty")]
    EmptyName,
}

/// Validated sign-in credentials.
///
/// ## Invariants
/// - `email` is trimmed and non-empty.
/// - `password` is non-empty and keeps caller-provided whitespace.
///
/// # Examples
/// ```
/// use amep_client::domain::Credentials;
///
/// let creds = Credentials::try_from_parts("  ada@amep.test ", "pw").expect("valid");
/// assert_eq!(creds.email(), "ada@amep.test");
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    email: String,
    password: Zeroizing<String>,
}

impl Credentials {
    /// Validate raw email and password input.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] when either value is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, CredentialsValidationError> {
        let email = email.trim();
        if email.is_empty() {
            return Err(CredentialsValidationError::EmptyEmail);
        }
        if password.is_empty() {
            return Err(CredentialsValidationError::EmptyPassword);
        }
        Ok(Self {
            email: email.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Normalised email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Password as supplied.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Validated registration details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    name: String,
    credentials: Credentials,
    role: Role,
}

impl Registration {
    /// Validate raw registration input.
    ///
    /// # Errors
    ///
    /// Returns [`CredentialsValidationError`] when any value is blank.
    pub fn try_from_parts(
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<Self, CredentialsValidationError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CredentialsValidationError::EmptyName);
        }
        Ok(Self {
            name: name.to_owned(),
            credentials: Credentials::try_from_parts(email, password)?,
            role,
        })
    }

    /// Display name for the new account.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub const fn role(&self) -> Role {
        self.role
    }
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct SignupRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    role: Role,
}

/// Account flows built on the request executor.
#[derive(Debug, Clone)]
pub struct AuthService {
    executor: RequestExecutor,
}

impl AuthService {
    /// Account flows that send through `executor`.
    #[must_use]
    pub const fn new(executor: RequestExecutor) -> Self {
        Self { executor }
    }

    /// Sign in with email and password against the JSON login endpoint.
    ///
    /// On success the token and role are persisted. When the login response
    /// carries no role, it is read from `current_user`; if that lookup fails
    /// the session keeps the token without a role.
    pub async fn login(&self, credentials: &Credentials) -> Outcome<Session> {
        let request = LoginRequest {
            email: credentials.email(),
            password: credentials.password(),
        };
        let outcome = self
            .executor
            .execute_json(&LOGIN, &EndpointParams::new(), &request)
            .await
            .decode::<TokenResponse>();
        match outcome {
            Outcome::Success(response) => self.start_session(response).await,
            Outcome::Unauthorized => Outcome::Unauthorized,
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Sign in through the OAuth2 password form (`/token`).
    pub async fn login_with_form(&self, credentials: &Credentials) -> Outcome<Session> {
        let body = RequestBody::Form(
            FormFields::new()
                .field("username", credentials.email())
                .field("password", credentials.password()),
        );
        let outcome = self
            .executor
            .execute(&TOKEN, &EndpointParams::new(), body)
            .await
            .decode::<TokenResponse>();
        match outcome {
            Outcome::Success(response) => self.start_session(response).await,
            Outcome::Unauthorized => Outcome::Unauthorized,
            Outcome::Failure(failure) => Outcome::Failure(failure),
        }
    }

    /// Clear the session and return to the public landing page.
    ///
    /// The redirect happens even when the store cannot be cleared.
    ///
    /// # Errors
    ///
    /// Returns [`TokenStoreError`] when the stored values cannot be removed.
    pub fn logout(&self) -> Result<(), TokenStoreError> {
        let cleared = self.executor.session().clear();
        self.executor.navigator().navigate(View::Landing);
        cleared
    }

    /// Register a new account. Does not sign in.
    pub async fn signup(&self, registration: &Registration) -> Outcome<User> {
        let request = SignupRequest {
            name: registration.name(),
            email: registration.credentials.email(),
            password: registration.credentials.password(),
            role: registration.role,
        };
        self.executor
            .execute_json(&SIGNUP, &EndpointParams::new(), &request)
            .await
            .decode()
    }

    /// Profile of the signed-in user.
    pub async fn current_user(&self) -> Outcome<User> {
        self.executor
            .execute(&CURRENT_USER, &EndpointParams::new(), RequestBody::Empty)
            .await
            .decode()
    }

    async fn start_session(&self, response: TokenResponse) -> Outcome<Session> {
        let token = match AuthToken::new(response.access_token) {
            Ok(token) => token,
            Err(error) => {
                return Outcome::Failure(Failure::local(format!("login returned {error}")));
            }
        };
        if let Err(error) = self.executor.session().establish(&token, response.role) {
            return Outcome::Failure(Failure::local(error.to_string()));
        }

        let role = match response.role {
            Some(role) => Some(role),
            None => match self.current_user().await {
                Outcome::Success(user) => {
                    if let Err(error) = self.executor.session().establish(&token, Some(user.role)) {
                        return Outcome::Failure(Failure::local(error.to_string()));
                    }
                    Some(user.role)
                }
                Outcome::Unauthorized => return Outcome::Unauthorized,
                Outcome::Failure(failure) => {
                    warn!(%failure, "role lookup failed; session has no role");
                    None
                }
            },
        };

        info!(role = role.map(Role::as_str), "signed in");
        Outcome::Success(Session::authenticated(token, role))
    }
}
