//! # Request Handlers
//!
//! Three independent services, one per resource. Each decodes an
//! [`HandlerEvent`], dispatches on the HTTP method, performs one store
//! operation and shapes the JSON response. Every failure becomes a JSON
//! error response; nothing escapes [`EventHandler::handle`].

pub mod achievements;
pub mod event;
pub mod tasks;
pub mod users;

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::GamifyConfig;
use crate::error::{GamifyError, Result};
use crate::store::{AchievementStore, TaskStore, UserStore};

pub use achievements::AchievementService;
pub use event::{Cors, HandlerEvent, HandlerResponse, Method};
pub use tasks::TaskService;
pub use users::UserService;

/// Shared request lifecycle of the three services
#[async_trait]
pub trait EventHandler: Send + Sync {
    /// Service name used in logs
    fn name(&self) -> &'static str;

    /// Value of `Access-Control-Allow-Methods` on pre-flight responses
    fn allowed_methods(&self) -> &'static str;

    fn cors(&self) -> &Cors;

    /// Run the operation selected by `method`
    async fn dispatch(&self, method: Method, event: &HandlerEvent) -> Result<HandlerResponse>;

    /// Entry point: answers pre-flight requests without touching the store
    /// and converts every error into a response
    async fn handle(&self, event: HandlerEvent) -> HandlerResponse {
        let method = event.method();
        debug!(service = self.name(), method = %method, "Handling event");

        if method == Method::Options {
            return self.cors().preflight(self.allowed_methods());
        }

        match self.dispatch(method.clone(), &event).await {
            Ok(response) => response,
            Err(err) => {
                if err.is_client_error() {
                    debug!(
                        service = self.name(),
                        method = %method,
                        status = err.status_code(),
                        error = %err,
                        "Request rejected"
                    );
                } else {
                    error!(
                        service = self.name(),
                        method = %method,
                        status = err.status_code(),
                        error = %err,
                        "Request failed"
                    );
                }
                self.cors().error(&err)
            }
        }
    }
}

pub(crate) fn method_not_allowed(method: &Method) -> GamifyError {
    GamifyError::unsupported_method(method.as_str())
}

/// All three services wired to one store
#[derive(Clone)]
pub struct GamifyHandlers {
    pub users: Arc<UserService>,
    pub tasks: Arc<TaskService>,
    pub achievements: Arc<AchievementService>,
}

impl GamifyHandlers {
    pub fn new<S>(store: Arc<S>, config: &GamifyConfig) -> Self
    where
        S: UserStore + TaskStore + AchievementStore + 'static,
    {
        let cors = Cors::from(&config.cors);
        Self {
            users: Arc::new(UserService::new(store.clone(), cors.clone())),
            tasks: Arc::new(TaskService::new(store.clone(), cors.clone())),
            achievements: Arc::new(AchievementService::new(store, cors)),
        }
    }
}
