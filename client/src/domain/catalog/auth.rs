//! Account endpoints shared by every role catalog.

use crate::domain::endpoint::{BodyEncoding, EndpointDescriptor};

/// Register a new account.
pub const SIGNUP: EndpointDescriptor =
    EndpointDescriptor::post("signup", "/student/signup", BodyEncoding::Json);
/// Exchange email and password for a bearer token.
pub const LOGIN: EndpointDescriptor =
    EndpointDescriptor::post("login", "/student/login", BodyEncoding::Json);
/// OAuth2 password-form login (`username`, `password`).
pub const TOKEN: EndpointDescriptor = EndpointDescriptor::post("token", "/token", BodyEncoding::Form);
/// Profile of the signed-in user.
pub const CURRENT_USER: EndpointDescriptor = EndpointDescriptor::get("current_user", "/student/me");

/// Every endpoint in this section.
pub const ENDPOINTS: &[EndpointDescriptor] = &[SIGNUP, LOGIN, TOKEN, CURRENT_USER];
