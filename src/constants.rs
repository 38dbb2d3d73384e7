//! # System Constants
//!
//! Task vocabulary, progression tuning and the CORS header names shared by
//! all three handlers.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GamifyError;

/// Experience points needed per level: a user at level `L` is promoted once
/// their xp reaches `L * XP_PER_LEVEL`.
pub const XP_PER_LEVEL: i32 = 100;

/// Level assigned to freshly created users
pub const STARTING_LEVEL: i32 = 1;

/// Progress added when an increment request omits `progress_increment`
pub const DEFAULT_PROGRESS_INCREMENT: i32 = 1;

/// Task status values the handlers give meaning to. Any other string is
/// stored verbatim.
pub mod task_status {
    pub const ACTIVE: &str = "active";
    pub const COMPLETED: &str = "completed";
}

/// Response and preflight header names
pub mod headers {
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const ALLOW_ORIGIN: &str = "Access-Control-Allow-Origin";
    pub const ALLOW_METHODS: &str = "Access-Control-Allow-Methods";
    pub const ALLOW_HEADERS: &str = "Access-Control-Allow-Headers";
    pub const MAX_AGE: &str = "Access-Control-Max-Age";
    pub const APPLICATION_JSON: &str = "application/json";
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl fmt::Display for TaskPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaskPriority {
    type Err = GamifyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(GamifyError::validation(format!(
                "priority must be one of low, medium, high (got '{other}')"
            ))),
        }
    }
}
