use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::users::repo::User;

/// Request body for user registration.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub height: f64,
    pub weight: f64,
}

/// Request body for profile update.
#[derive(Debug, Deserialize)]
pub struct UpdateUserRequest {
    pub name: String,
    pub email: String,
}

/// Request body for password update.
#[derive(Debug, Deserialize)]
pub struct UpdatePasswordRequest {
    pub password: String,
}

/// Request body for height/weight update.
#[derive(Debug, Deserialize)]
pub struct UpdateMeasurementsRequest {
    pub height: f64,
    pub weight: f64,
}

/// Public part of the user returned to clients, never the password hash.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub height: f64,
    pub weight: f64,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl From<User> for PublicUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            name: u.name,
            email: u.email,
            height: u.height,
            weight: u.weight,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: PublicUser,
}

#[derive(Debug, Serialize)]
pub struct UsersResponse {
    pub users: Vec<PublicUser>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_user_never_serializes_the_hash() {
        let user = User {
            id: Uuid::new_v4(),
            name: "Jo".into(),
            email: "jo@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            height: 1.7,
            weight: 70.0,
            created_at: OffsetDateTime::UNIX_EPOCH,
        };
        let json = serde_json::to_string(&UserResponse { user: user.into() }).unwrap();
        assert!(json.contains("jo@example.com"));
        assert!(!json.contains("argon2id"));
        assert!(!json.contains("password"));
    }
}
