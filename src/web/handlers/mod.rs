//! # HTTP Endpoints
//!
//! Each endpoint rebuilds the fabric event from the HTTP request and hands it
//! to the matching service unchanged.

use axum::extract::{Path, Query, State};
use axum::http::Method as HttpMethod;
use axum::response::{IntoResponse, Response};
use std::collections::HashMap;

use crate::handlers::{EventHandler, HandlerEvent};
use crate::web::state::AppState;

/// Build the event a serverless fabric would have produced
pub fn to_event(
    method: &HttpMethod,
    query: HashMap<String, String>,
    path_params: HashMap<String, String>,
    body: String,
) -> HandlerEvent {
    HandlerEvent {
        http_method: method.as_str().to_string(),
        query_string_parameters: (!query.is_empty()).then_some(query),
        path_params: (!path_params.is_empty()).then_some(path_params),
        body: (!body.is_empty()).then_some(body),
    }
}

/// `/users`
pub async fn users_endpoint(
    State(state): State<AppState>,
    method: HttpMethod,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let event = to_event(&method, query, HashMap::new(), body);
    state.users.handle(event).await.into_response()
}

/// `/tasks`
pub async fn tasks_endpoint(
    State(state): State<AppState>,
    method: HttpMethod,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let event = to_event(&method, query, HashMap::new(), body);
    state.tasks.handle(event).await.into_response()
}

/// `/tasks/{id}`
pub async fn task_endpoint(
    State(state): State<AppState>,
    method: HttpMethod,
    Path(id): Path<String>,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let path_params = HashMap::from([("id".to_string(), id)]);
    let event = to_event(&method, query, path_params, body);
    state.tasks.handle(event).await.into_response()
}

/// `/achievements`
pub async fn achievements_endpoint(
    State(state): State<AppState>,
    method: HttpMethod,
    Query(query): Query<HashMap<String, String>>,
    body: String,
) -> Response {
    let event = to_event(&method, query, HashMap::new(), body);
    state.achievements.handle(event).await.into_response()
}
