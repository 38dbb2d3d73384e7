//! # User Handlers
//!
//! Fetch a user by telegram id, create-or-rename a user, and award
//! experience with single-step level promotion.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::event::{format_timestamp, parse_required_id, Cors, HandlerEvent, HandlerResponse, Method};
use super::{method_not_allowed, EventHandler};
use crate::error::{GamifyError, Result};
use crate::models::{NewUser, User, XpAward};
use crate::store::UserStore;

const TELEGRAM_ID_REQUIRED: &str = "telegram_id is required";
const USER_ID_REQUIRED: &str = "user_id is required";
const USER_NOT_FOUND: &str = "User not found";

/// POST body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateUserRequest {
    pub telegram_id: Option<i64>,
    pub username: Option<String>,
}

/// PUT body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplyProgressRequest {
    pub user_id: Option<i64>,
    pub xp_increment: Option<i32>,
    pub complete_task: Option<bool>,
}

/// User as rendered in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserView {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub level: i32,
    pub xp: i32,
    #[serde(rename = "totalCompleted")]
    pub total_completed: i32,
    pub streak: i32,
    #[serde(rename = "createdAt")]
    pub created_at: Option<String>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            telegram_id: user.telegram_id,
            username: user.username,
            level: user.level,
            xp: user.xp,
            total_completed: user.total_completed,
            streak: user.streak,
            created_at: format_timestamp(Some(user.created_at)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEnvelope {
    pub user: UserView,
}

pub struct UserService {
    store: Arc<dyn UserStore>,
    cors: Cors,
}

impl UserService {
    pub fn new(store: Arc<dyn UserStore>, cors: Cors) -> Self {
        Self { store, cors }
    }

    pub async fn fetch_by_telegram_id(&self, telegram_id: i64) -> Result<UserView> {
        self.store
            .find_by_telegram_id(telegram_id)
            .await?
            .map(UserView::from)
            .ok_or_else(|| GamifyError::not_found(USER_NOT_FOUND))
    }

    pub async fn create_or_update(&self, request: CreateUserRequest) -> Result<UserView> {
        let telegram_id = request
            .telegram_id
            .ok_or_else(|| GamifyError::validation(TELEGRAM_ID_REQUIRED))?;

        let user = self
            .store
            .upsert_user(NewUser {
                telegram_id,
                username: request.username,
            })
            .await?;

        info!(user_id = user.id, telegram_id, "User created or updated");
        Ok(user.into())
    }

    pub async fn apply_progress(&self, request: ApplyProgressRequest) -> Result<UserView> {
        let user_id = request
            .user_id
            .ok_or_else(|| GamifyError::validation(USER_ID_REQUIRED))?;
        let xp_increment = request.xp_increment.unwrap_or(0);
        if xp_increment < 0 {
            return Err(GamifyError::validation("xp_increment must not be negative"));
        }
        let award = XpAward {
            xp_increment,
            completed_task: request.complete_task.unwrap_or(false),
        };

        let user = self
            .store
            .apply_award(user_id, award)
            .await?
            .ok_or_else(|| GamifyError::not_found(USER_NOT_FOUND))?;

        info!(
            user_id,
            xp_increment,
            completed_task = award.completed_task,
            level = user.level,
            xp = user.xp,
            "Experience applied"
        );
        Ok(user.into())
    }
}

#[async_trait]
impl EventHandler for UserService {
    fn name(&self) -> &'static str {
        "users"
    }

    fn allowed_methods(&self) -> &'static str {
        "GET, POST, PUT, OPTIONS"
    }

    fn cors(&self) -> &Cors {
        &self.cors
    }

    async fn dispatch(&self, method: Method, event: &HandlerEvent) -> Result<HandlerResponse> {
        match method {
            Method::Get => {
                let telegram_id = parse_required_id(
                    event.query("telegram_id"),
                    "telegram_id",
                    TELEGRAM_ID_REQUIRED,
                )?;
                let user = self.fetch_by_telegram_id(telegram_id).await?;
                Ok(self.cors.json(200, &UserEnvelope { user }))
            }
            Method::Post => {
                let user = self.create_or_update(event.json_body()?).await?;
                Ok(self.cors.json(201, &UserEnvelope { user }))
            }
            Method::Put => {
                let user = self.apply_progress(event.json_body()?).await?;
                Ok(self.cors.json(200, &UserEnvelope { user }))
            }
            other => Err(method_not_allowed(&other)),
        }
    }
}
