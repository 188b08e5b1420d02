use serde::Deserialize;

/// Request body for signing in.
#[derive(Debug, Deserialize)]
pub struct SignInRequest {
    pub email: String,
    pub password: String,
}
