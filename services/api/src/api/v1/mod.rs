//! API v1 routes.

mod periods;

use axum::Router;

use crate::state::AppState;

/// Create API v1 routes.
pub fn routes() -> Router<AppState> {
    Router::new().nest("/periods", periods::routes())
}
