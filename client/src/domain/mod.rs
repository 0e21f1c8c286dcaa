//! Domain types, ports and services for the AMEP API client.
//!
//! Purpose: hold everything that does not depend on a concrete transport,
//! storage medium or user interface. Adapters in `outbound` and `inbound`
//! implement or drive the ports declared in [`ports`].
//!
//! Public surface:
//! - RequestExecutor: signs, sends and classifies one catalog request.
//! - SessionGuard: advisory role checks with redirects.
//! - SessionHandle: shared view over the persisted token and role.
//! - Outcome: `Success | Unauthorized | Failure` result of every request.
//! - catalog: static endpoint descriptors and typed per-section wrappers.

pub mod auth;
pub mod catalog;
pub mod endpoint;
pub mod executor;
pub mod guard;
pub mod models;
pub mod navigation;
pub mod outcome;
pub mod ports;
pub mod role;
pub mod session;
pub mod view_state;

pub use self::auth::{AuthService, Credentials, CredentialsValidationError, Registration};
pub use self::endpoint::{
    BodyEncoding, EndpointDescriptor, EndpointParams, FormFields, HttpMethod, QueryParam,
    RequestBody, RequestBuildError,
};
pub use self::executor::RequestExecutor;
pub use self::guard::SessionGuard;
pub use self::navigation::View;
pub use self::outcome::{Failure, Outcome, Payload, RequestError};
pub use self::role::{Role, RoleParseError};
pub use self::session::{AuthToken, AuthTokenValidationError, Session, SessionHandle};
pub use self::view_state::LatestValue;
