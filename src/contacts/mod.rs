mod dto;
pub mod handlers;
pub mod repo;
mod repo_types;
mod services;

use crate::state::AppState;
use axum::Router;

pub use repo::{ContactRepository, SqlContactRepository};

pub fn router() -> Router<AppState> {
    Router::new()
        .merge(handlers::write_routes())
        .merge(handlers::read_routes())
}
