//! # Achievement Handlers
//!
//! List the whole catalog with one user's progress, and add progress toward
//! an achievement, unlocking it when its requirement is met.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::event::{format_timestamp, parse_required_id, Cors, HandlerEvent, HandlerResponse, Method};
use super::{method_not_allowed, EventHandler};
use crate::constants::DEFAULT_PROGRESS_INCREMENT;
use crate::error::{GamifyError, Result};
use crate::models::{AchievementProgress, ProgressOutcome};
use crate::progression::progress_percent;
use crate::store::AchievementStore;

const USER_ID_REQUIRED: &str = "user_id is required";
const IDS_REQUIRED: &str = "user_id and achievement_id are required";
const ACHIEVEMENT_NOT_FOUND: &str = "Achievement not found";

/// POST body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IncrementProgressRequest {
    pub user_id: Option<i64>,
    pub achievement_id: Option<i64>,
    pub progress_increment: Option<i32>,
}

/// Achievement as rendered in responses; `progress` is a percentage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub progress: i32,
    pub unlocked: bool,
    pub unlocked_at: Option<String>,
}

impl From<AchievementProgress> for AchievementView {
    fn from(row: AchievementProgress) -> Self {
        Self {
            id: row.id.to_string(),
            progress: progress_percent(row.progress, row.required_count),
            title: row.title,
            description: row.description,
            icon: row.icon,
            unlocked: row.unlocked,
            unlocked_at: format_timestamp(row.unlocked_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AchievementListEnvelope {
    pub achievements: Vec<AchievementView>,
}

pub struct AchievementService {
    store: Arc<dyn AchievementStore>,
    cors: Cors,
}

impl AchievementService {
    pub fn new(store: Arc<dyn AchievementStore>, cors: Cors) -> Self {
        Self { store, cors }
    }

    pub async fn list(&self, user_id: i64) -> Result<Vec<AchievementView>> {
        let rows = self.store.list_progress(user_id).await?;
        Ok(rows.into_iter().map(AchievementView::from).collect())
    }

    pub async fn increment(&self, request: IncrementProgressRequest) -> Result<ProgressOutcome> {
        let (Some(user_id), Some(achievement_id)) = (request.user_id, request.achievement_id)
        else {
            return Err(GamifyError::validation(IDS_REQUIRED));
        };
        let increment = request
            .progress_increment
            .unwrap_or(DEFAULT_PROGRESS_INCREMENT);
        if increment < 0 {
            return Err(GamifyError::validation(
                "progress_increment must not be negative",
            ));
        }

        let outcome = self
            .store
            .increment_progress(user_id, achievement_id, increment)
            .await?
            .ok_or_else(|| GamifyError::not_found(ACHIEVEMENT_NOT_FOUND))?;

        info!(
            user_id,
            achievement_id,
            increment,
            progress = outcome.progress,
            unlocked = outcome.unlocked,
            "Achievement progress recorded"
        );
        Ok(outcome)
    }
}

#[async_trait]
impl EventHandler for AchievementService {
    fn name(&self) -> &'static str {
        "achievements"
    }

    fn allowed_methods(&self) -> &'static str {
        "GET, POST, OPTIONS"
    }

    fn cors(&self) -> &Cors {
        &self.cors
    }

    async fn dispatch(&self, method: Method, event: &HandlerEvent) -> Result<HandlerResponse> {
        match method {
            Method::Get => {
                let user_id =
                    parse_required_id(event.query("user_id"), "user_id", USER_ID_REQUIRED)?;
                let achievements = self.list(user_id).await?;
                Ok(self.cors.json(200, &AchievementListEnvelope { achievements }))
            }
            Method::Post => {
                let outcome = self.increment(event.json_body()?).await?;
                Ok(self.cors.json(200, &outcome))
            }
            other => Err(method_not_allowed(&other)),
        }
    }
}
