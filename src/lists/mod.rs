mod dto;
pub mod handlers;
pub mod naming;
pub mod repo;

use axum::Router;

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    handlers::list_routes()
}
