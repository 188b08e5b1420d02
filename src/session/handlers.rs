use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    routing::{delete, post},
    Json, Router,
};
use tracing::{error, info, instrument, warn};

use crate::session::dto::SignInRequest;
use crate::session::password::verify_password;
use crate::state::AppState;
use crate::users::repo::User;

pub fn session_routes() -> Router<AppState> {
    Router::new()
        .route("/session", post(sign_in))
        .route("/session/signOut", delete(sign_out))
}

#[instrument(skip(state, payload))]
pub async fn sign_in(
    State(state): State<AppState>,
    Json(mut payload): Json<SignInRequest>,
) -> Result<(StatusCode, HeaderMap), (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    let user = match User::find_by_email(&state.db, &payload.email).await {
        Ok(Some(u)) => u,
        Ok(None) => {
            warn!(email = %payload.email, "sign in unknown email");
            return Err((
                StatusCode::UNAUTHORIZED,
                "Incorrect email/password combination".into(),
            ));
        }
        Err(e) => {
            error!(error = %e, "find_by_email failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let ok = match verify_password(&payload.password, &user.password_hash) {
        Ok(v) => v,
        Err(e) => {
            error!(error = %e, "verify_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    if !ok {
        warn!(user_id = %user.id, "sign in invalid password");
        return Err((
            StatusCode::UNAUTHORIZED,
            "Incorrect email/password combination".into(),
        ));
    }

    let session = &state.config.session;
    let cookie = format!(
        "{}={}; Path=/; Max-Age={}",
        session.cookie_name,
        user.id,
        session.ttl_minutes * 60
    );
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "bad cookie value".to_string()))?,
    );

    info!(user_id = %user.id, "session created");
    Ok((StatusCode::CREATED, headers))
}

#[instrument(skip(state))]
pub async fn sign_out(
    State(state): State<AppState>,
) -> Result<(StatusCode, HeaderMap), (StatusCode, String)> {
    let cookie = format!("{}=; Path=/; Max-Age=0", state.config.session.cookie_name);
    let mut headers = HeaderMap::new();
    headers.insert(
        header::SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| (StatusCode::INTERNAL_SERVER_ERROR, "bad cookie value".to_string()))?,
    );

    info!("session cleared");
    Ok((StatusCode::NO_CONTENT, headers))
}

#[cfg(test)]
mod tests {
    #[test]
    fn session_cookie_format() {
        let cookie = format!("{}={}; Path=/; Max-Age={}", "userId", "abc", 1440 * 60);
        assert_eq!(cookie, "userId=abc; Path=/; Max-Age=86400");
    }

    #[test]
    fn sign_out_cookie_expires_immediately() {
        let cookie = format!("{}=; Path=/; Max-Age=0", "userId");
        assert!(cookie.ends_with("Max-Age=0"));
        assert!(cookie.starts_with("userId=;"));
    }
}
