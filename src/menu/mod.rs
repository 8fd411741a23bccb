use crate::state::AppState;
use axum::Router;

pub mod classifier;
mod dto;
pub mod handlers;

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::classify_routes())
}
