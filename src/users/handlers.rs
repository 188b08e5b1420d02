use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use lazy_static::lazy_static;
use regex::Regex;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::session::extractor::SessionUser;
use crate::session::password::hash_password;
use crate::state::AppState;
use crate::users::dto::{
    RegisterRequest, UpdateMeasurementsRequest, UpdatePasswordRequest, UpdateUserRequest,
    UserResponse, UsersResponse,
};
use crate::users::repo::User;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub fn public_routes() -> Router<AppState> {
    Router::new().route("/users", post(register))
}

pub fn guarded_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(index))
        .route("/users/:id", get(show))
        .route("/users/:id", put(update))
        .route("/users/:id", delete(remove))
        .route("/users/:id/password", patch(update_password))
        .route("/users/:id/heightAndWeight", patch(update_measurements))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    Json(mut payload): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<UserResponse>), (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }
    if payload.height <= 0.0 || payload.weight <= 0.0 {
        warn!("non-positive height or weight");
        return Err((
            StatusCode::BAD_REQUEST,
            "Height and weight must be positive".into(),
        ));
    }

    if let Ok(Some(_)) = User::find_by_email(&state.db, &payload.email).await {
        warn!(email = %payload.email, "email already registered");
        return Err((StatusCode::CONFLICT, "Email already exists".into()));
    }

    let hash = match hash_password(&payload.password) {
        Ok(h) => h,
        Err(e) => {
            error!(error = %e, "hash_password failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    let user = match User::create(
        &state.db,
        &payload.name,
        &payload.email,
        &hash,
        payload.height,
        payload.weight,
    )
    .await
    {
        Ok(u) => u,
        Err(e) => {
            error!(error = %e, "create user failed");
            return Err((StatusCode::INTERNAL_SERVER_ERROR, e.to_string()));
        }
    };

    info!(user_id = %user.id, email = %user.email, "user registered");
    Ok((
        StatusCode::CREATED,
        Json(UserResponse { user: user.into() }),
    ))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    _session: SessionUser,
) -> Result<Json<UsersResponse>, (StatusCode, String)> {
    let users = User::list(&state.db).await.map_err(internal)?;
    Ok(Json(UsersResponse {
        users: users.into_iter().map(Into::into).collect(),
    }))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    match User::find_by_id(&state.db, id).await.map_err(internal)? {
        Some(user) => Ok(Json(UserResponse { user: user.into() })),
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(id): Path<Uuid>,
    Json(mut payload): Json<UpdateUserRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    payload.email = payload.email.trim().to_lowercase();

    if !is_valid_email(&payload.email) {
        warn!(email = %payload.email, "invalid email");
        return Err((StatusCode::BAD_REQUEST, "Invalid email".into()));
    }

    // The new email may only belong to the user being updated
    if let Some(existing) = User::find_by_email(&state.db, &payload.email)
        .await
        .map_err(internal)?
    {
        if existing.id != id {
            warn!(email = %payload.email, "email taken by another user");
            return Err((StatusCode::CONFLICT, "Email already exists".into()));
        }
    }

    match User::update_profile(&state.db, id, &payload.name, &payload.email)
        .await
        .map_err(internal)?
    {
        Some(user) => {
            info!(user_id = %user.id, "user profile updated");
            Ok(Json(UserResponse { user: user.into() }))
        }
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_password(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePasswordRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    if payload.password.len() < 8 {
        warn!("password too short");
        return Err((StatusCode::BAD_REQUEST, "Password too short".into()));
    }

    let hash = hash_password(&payload.password).map_err(internal)?;

    match User::update_password(&state.db, id, &hash)
        .await
        .map_err(internal)?
    {
        Some(user) => {
            info!(user_id = %user.id, "user password updated");
            Ok(Json(UserResponse { user: user.into() }))
        }
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn update_measurements(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateMeasurementsRequest>,
) -> Result<Json<UserResponse>, (StatusCode, String)> {
    if payload.height <= 0.0 || payload.weight <= 0.0 {
        warn!("non-positive height or weight");
        return Err((
            StatusCode::BAD_REQUEST,
            "Height and weight must be positive".into(),
        ));
    }

    match User::update_measurements(&state.db, id, payload.height, payload.weight)
        .await
        .map_err(internal)?
    {
        Some(user) => {
            info!(user_id = %user.id, "user measurements updated");
            Ok(Json(UserResponse { user: user.into() }))
        }
        None => Err((StatusCode::NOT_FOUND, "User not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    _session: SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if User::delete(&state.db, id).await.map_err(internal)? {
        info!(user_id = %id, "user deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "User not found".into()))
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
