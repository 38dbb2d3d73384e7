//! # Web Application State
//!
//! Shared state for the local HTTP front door: the three services, already
//! wired to their store.

use std::sync::Arc;

use crate::handlers::{AchievementService, GamifyHandlers, TaskService, UserService};

#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserService>,
    pub tasks: Arc<TaskService>,
    pub achievements: Arc<AchievementService>,
}

impl From<GamifyHandlers> for AppState {
    fn from(handlers: GamifyHandlers) -> Self {
        Self {
            users: handlers.users,
            tasks: handlers.tasks,
            achievements: handlers.achievements,
        }
    }
}
