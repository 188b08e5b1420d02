use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::meals::dto::{MealRequest, MealResponse, MealsResponse, SummaryResponse};
use crate::meals::repo::Meal;
use crate::meals::summary::build_summary;
use crate::session::extractor::SessionUser;
use crate::state::AppState;
use crate::users::repo::User;

pub fn read_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", get(index))
        .route("/meals/summary", get(summary))
        .route("/meals/:id", get(show))
}

pub fn write_routes() -> Router<AppState> {
    Router::new()
        .route("/meals", post(create))
        .route("/meals/:id", put(update))
        .route("/meals/:id", delete(remove))
}

#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<MealsResponse>, (StatusCode, String)> {
    let meals = Meal::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    Ok(Json(MealsResponse { meals }))
}

/// Aggregates one snapshot of the user's meals: totals, the longest
/// in-diet streak over storage order, and the user's IMC. A user row
/// that vanished between login and now empties the imc section only.
#[instrument(skip(state))]
pub async fn summary(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
) -> Result<Json<SummaryResponse>, (StatusCode, String)> {
    let meals = Meal::list_by_user(&state.db, user_id)
        .await
        .map_err(internal)?;
    let user = User::find_by_id(&state.db, user_id)
        .await
        .map_err(internal)?;

    if user.is_none() {
        warn!(user_id = %user_id, "summary for unknown user");
    }

    Ok(Json(SummaryResponse {
        summary: build_summary(&meals, user.as_ref()),
    }))
}

#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<Json<MealResponse>, (StatusCode, String)> {
    match Meal::find_by_id(&state.db, user_id, id)
        .await
        .map_err(internal)?
    {
        Some(meal) => Ok(Json(MealResponse { meal })),
        None => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
    }
}

#[instrument(skip(state, payload))]
pub async fn create(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Json(payload): Json<MealRequest>,
) -> Result<StatusCode, (StatusCode, String)> {
    let duplicate = Meal::exists_natural_key(
        &state.db,
        &payload.name,
        &payload.description,
        payload.date,
        payload.in_the_diet,
    )
    .await
    .map_err(internal)?;

    if duplicate {
        warn!(name = %payload.name, "meal already exists");
        return Err((StatusCode::CONFLICT, "Meal already exists".into()));
    }

    let meal = Meal::create(
        &state.db,
        user_id,
        &payload.name,
        &payload.description,
        payload.date,
        payload.in_the_diet,
    )
    .await
    .map_err(internal)?;

    info!(meal_id = %meal.id, user_id = %user_id, "meal created");
    Ok(StatusCode::CREATED)
}

#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MealRequest>,
) -> Result<Json<MealResponse>, (StatusCode, String)> {
    match Meal::update(
        &state.db,
        user_id,
        id,
        &payload.name,
        &payload.description,
        payload.date,
        payload.in_the_diet,
    )
    .await
    .map_err(internal)?
    {
        Some(meal) => {
            info!(meal_id = %meal.id, user_id = %user_id, "meal updated");
            Ok(Json(MealResponse { meal }))
        }
        None => Err((StatusCode::NOT_FOUND, "Meal not found".into())),
    }
}

#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    SessionUser(user_id): SessionUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, (StatusCode, String)> {
    if Meal::delete(&state.db, user_id, id)
        .await
        .map_err(internal)?
    {
        info!(meal_id = %id, user_id = %user_id, "meal deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err((StatusCode::NOT_FOUND, "Meal not found".into()))
    }
}

fn internal(e: anyhow::Error) -> (StatusCode, String) {
    tracing::error!(error = %e, "internal error");
    (StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
}
