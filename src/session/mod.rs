mod dto;
pub mod extractor;
pub mod handlers;
pub mod password;

use crate::state::AppState;
use axum::Router;

pub fn router() -> Router<AppState> {
    handlers::session_routes()
}
