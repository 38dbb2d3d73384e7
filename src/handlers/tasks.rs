//! # Task Handlers
//!
//! List a user's tasks by status, create tasks, and move tasks between
//! statuses. Tasks are never deleted here.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

use super::event::{
    format_timestamp, non_empty, parse_required_id, Cors, HandlerEvent, HandlerResponse, Method,
};
use super::{method_not_allowed, EventHandler};
use crate::constants::{task_status, TaskPriority};
use crate::error::{GamifyError, Result};
use crate::models::{NewTask, Task};
use crate::store::TaskStore;

const USER_ID_REQUIRED: &str = "user_id is required";
const CREATE_FIELDS_REQUIRED: &str = "user_id, title and interval are required";
const TASK_ID_REQUIRED: &str = "task_id is required";
const STATUS_REQUIRED: &str = "status is required";
const TASK_NOT_FOUND: &str = "Task not found";

/// POST body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CreateTaskRequest {
    pub user_id: Option<i64>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub interval: Option<String>,
    pub assigned_to: Option<String>,
    pub priority: Option<TaskPriority>,
}

/// PUT body
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UpdateTaskRequest {
    pub status: Option<String>,
}

/// Task as rendered in responses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub description: String,
    pub interval: String,
    pub assigned_to: Option<String>,
    pub status: String,
    pub priority: String,
    pub reminder_count: i32,
    pub created_at: Option<String>,
    pub completed_at: Option<String>,
}

impl From<Task> for TaskView {
    fn from(task: Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title,
            description: task.description,
            interval: task.interval,
            assigned_to: task.assigned_to,
            status: task.status,
            priority: task.priority,
            reminder_count: task.reminder_count,
            created_at: format_timestamp(Some(task.created_at)),
            completed_at: format_timestamp(task.completed_at),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEnvelope {
    pub task: TaskView,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskListEnvelope {
    pub tasks: Vec<TaskView>,
}

pub struct TaskService {
    store: Arc<dyn TaskStore>,
    cors: Cors,
}

impl TaskService {
    pub fn new(store: Arc<dyn TaskStore>, cors: Cors) -> Self {
        Self { store, cors }
    }

    /// Tasks of `user_id` with `status` (default `active`), newest first
    pub async fn list(&self, user_id: i64, status: Option<&str>) -> Result<Vec<TaskView>> {
        let status = status
            .filter(|s| !s.trim().is_empty())
            .unwrap_or(task_status::ACTIVE);
        let tasks = self.store.list_tasks(user_id, status).await?;
        Ok(tasks.into_iter().map(TaskView::from).collect())
    }

    pub async fn create(&self, request: CreateTaskRequest) -> Result<TaskView> {
        let (Some(user_id), Some(title), Some(interval)) = (
            request.user_id,
            non_empty(request.title),
            non_empty(request.interval),
        ) else {
            return Err(GamifyError::validation(CREATE_FIELDS_REQUIRED));
        };

        let task = self
            .store
            .create_task(NewTask {
                user_id,
                title,
                description: request.description.unwrap_or_default(),
                interval,
                assigned_to: request.assigned_to,
                priority: request.priority.unwrap_or_default(),
            })
            .await?;

        info!(task_id = task.id, user_id, "Task created");
        Ok(task.into())
    }

    pub async fn update_status(&self, task_id: i64, request: UpdateTaskRequest) -> Result<TaskView> {
        let status =
            non_empty(request.status).ok_or_else(|| GamifyError::validation(STATUS_REQUIRED))?;

        let task = self
            .store
            .update_task_status(task_id, &status)
            .await?
            .ok_or_else(|| GamifyError::not_found(TASK_NOT_FOUND))?;

        info!(task_id, status = %task.status, "Task status updated");
        Ok(task.into())
    }
}

#[async_trait]
impl EventHandler for TaskService {
    fn name(&self) -> &'static str {
        "tasks"
    }

    fn allowed_methods(&self) -> &'static str {
        "GET, POST, PUT, DELETE, OPTIONS"
    }

    fn cors(&self) -> &Cors {
        &self.cors
    }

    async fn dispatch(&self, method: Method, event: &HandlerEvent) -> Result<HandlerResponse> {
        match method {
            Method::Get => {
                let user_id =
                    parse_required_id(event.query("user_id"), "user_id", USER_ID_REQUIRED)?;
                let tasks = self.list(user_id, event.query("status")).await?;
                Ok(self.cors.json(200, &TaskListEnvelope { tasks }))
            }
            Method::Post => {
                let task = self.create(event.json_body()?).await?;
                Ok(self.cors.json(201, &TaskEnvelope { task }))
            }
            Method::Put => {
                let task_id = parse_required_id(event.path_param("id"), "id", TASK_ID_REQUIRED)?;
                let task = self.update_status(task_id, event.json_body()?).await?;
                Ok(self.cors.json(200, &TaskEnvelope { task }))
            }
            other => Err(method_not_allowed(&other)),
        }
    }
}
