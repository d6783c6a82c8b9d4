use crate::models::User;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// Missing fields deserialize to empty strings and are rejected by handler
// validation with a 400, matching the wire behavior of form-style binding.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct RegisterRequest {
    pub email: String,
    #[schema(value_type = String, format = "password")]
    pub password: String,
    pub username: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    #[schema(value_type = String, format = "password")]
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
