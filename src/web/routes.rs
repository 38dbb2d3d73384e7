//! Route definitions for the local HTTP front door.

use axum::routing::any;
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::web::handlers;
use crate::web::state::AppState;

/// One path per service; the services dispatch on the method themselves
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/users", any(handlers::users_endpoint))
        .route("/tasks", any(handlers::tasks_endpoint))
        .route("/tasks/{id}", any(handlers::task_endpoint))
        .route("/achievements", any(handlers::achievements_endpoint))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
