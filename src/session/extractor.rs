use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::{request::Parts, StatusCode},
};
use tracing::warn;
use uuid::Uuid;

use crate::config::SessionConfig;
use crate::state::AppState;

/// Extracts the signed-in user id from the session cookie.
///
/// Routes that take this extractor reject with 401 before any handler
/// logic runs when the cookie is missing or not a uuid.
#[derive(Debug, Clone, Copy)]
pub struct SessionUser(pub Uuid);

impl FromRef<AppState> for SessionConfig {
    fn from_ref(state: &AppState) -> Self {
        state.config.session.clone()
    }
}

/// Finds `name` in a `Cookie` request header value.
pub(crate) fn cookie_value<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header.split(';').find_map(|pair| {
        let (k, v) = pair.trim().split_once('=')?;
        (k == name).then_some(v)
    })
}

#[async_trait]
impl<S> FromRequestParts<S> for SessionUser
where
    S: Send + Sync,
    SessionConfig: FromRef<S>,
{
    type Rejection = (StatusCode, String);

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = SessionConfig::from_ref(state);

        let cookies = parts
            .headers
            .get(axum::http::header::COOKIE)
            .and_then(|v| v.to_str().ok())
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

        let raw = cookie_value(cookies, &session.cookie_name)
            .ok_or((StatusCode::UNAUTHORIZED, "Unauthorized".to_string()))?;

        let user_id = Uuid::parse_str(raw).map_err(|_| {
            warn!("malformed session cookie");
            (StatusCode::UNAUTHORIZED, "Unauthorized".to_string())
        })?;

        Ok(SessionUser(user_id))
    }
}
