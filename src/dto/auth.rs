//! Login payloads of the REST API.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Credentials exchanged for a session token.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct LoginRequest {
    /// Login name.
    #[serde(default)]
    #[validate(required(message = "Missing username"))]
    pub username: Option<String>,
    /// Plaintext password.
    #[serde(default)]
    #[validate(required(message = "Missing password"))]
    pub password: Option<String>,
}

/// Session token to send as `Authorization: Bearer <token>`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    /// Opaque bearer token.
    pub token: String,
}
