//! In-memory store
//!
//! Mirrors the PostgreSQL semantics closely enough for handler tests:
//! unique telegram ids, foreign keys from tasks and progress rows to users,
//! single-step promotion and first-crossing unlock timestamps. One mutex
//! guards all tables, which gives every call the atomicity a single SQL
//! statement has.

use async_trait::async_trait;
use chrono::{NaiveDateTime, Utc};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashMap};

use super::{AchievementStore, TaskStore, UserStore};
use crate::constants::{task_status, STARTING_LEVEL};
use crate::error::{GamifyError, Result};
use crate::models::{
    Achievement, AchievementProgress, NewTask, NewUser, ProgressOutcome, Task, User,
    UserAchievement, XpAward,
};
use crate::progression::{accumulate_progress, apply_xp, UnlockState};

#[derive(Debug, Default)]
struct Tables {
    users: BTreeMap<i64, User>,
    tasks: BTreeMap<i64, Task>,
    achievements: BTreeMap<i64, Achievement>,
    user_achievements: HashMap<(i64, i64), UserAchievement>,
    next_user_id: i64,
    next_task_id: i64,
}

#[derive(Debug, Default)]
pub struct InMemoryStore {
    tables: Mutex<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store seeded with an achievement catalog
    pub fn with_catalog(catalog: impl IntoIterator<Item = Achievement>) -> Self {
        let store = Self::new();
        for achievement in catalog {
            store.add_achievement(achievement);
        }
        store
    }

    pub fn add_achievement(&self, achievement: Achievement) {
        self.tables
            .lock()
            .achievements
            .insert(achievement.id, achievement);
    }

    /// Raw progress row, for assertions
    pub fn user_achievement(&self, user_id: i64, achievement_id: i64) -> Option<UserAchievement> {
        self.tables
            .lock()
            .user_achievements
            .get(&(user_id, achievement_id))
            .cloned()
    }

    /// Raw task row, for assertions
    pub fn task(&self, task_id: i64) -> Option<Task> {
        self.tables.lock().tasks.get(&task_id).cloned()
    }

    fn now() -> NaiveDateTime {
        Utc::now().naive_utc()
    }
}

/// Same wording PostgreSQL uses for an `INTEGER` overflow
fn out_of_range() -> GamifyError {
    GamifyError::validation("integer out of range")
}

fn missing_user(user_id: i64) -> GamifyError {
    GamifyError::Conflict(format!("user {user_id} does not exist"))
}

#[async_trait]
impl UserStore for InMemoryStore {
    async fn find_by_telegram_id(&self, telegram_id: i64) -> Result<Option<User>> {
        let tables = self.tables.lock();
        Ok(tables
            .users
            .values()
            .find(|user| user.telegram_id == telegram_id)
            .cloned())
    }

    async fn upsert_user(&self, new_user: NewUser) -> Result<User> {
        let mut tables = self.tables.lock();

        if let Some(existing) = tables
            .users
            .values_mut()
            .find(|user| user.telegram_id == new_user.telegram_id)
        {
            existing.username = new_user.username;
            return Ok(existing.clone());
        }

        tables.next_user_id += 1;
        let user = User {
            id: tables.next_user_id,
            telegram_id: new_user.telegram_id,
            username: new_user.username,
            level: STARTING_LEVEL,
            xp: 0,
            total_completed: 0,
            streak: 0,
            created_at: Self::now(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn apply_award(&self, user_id: i64, award: XpAward) -> Result<Option<User>> {
        let mut tables = self.tables.lock();
        let Some(user) = tables.users.get_mut(&user_id) else {
            return Ok(None);
        };

        let progression = apply_xp(user.level, user.xp, award.xp_increment)
            .ok_or_else(out_of_range)?;
        user.xp = progression.xp;
        user.level = progression.level;
        if award.completed_task {
            user.total_completed += 1;
        }
        Ok(Some(user.clone()))
    }
}

#[async_trait]
impl TaskStore for InMemoryStore {
    async fn list_tasks(&self, user_id: i64, status: &str) -> Result<Vec<Task>> {
        let tables = self.tables.lock();
        let mut tasks: Vec<Task> = tables
            .tasks
            .values()
            .filter(|task| task.user_id == user_id && task.status == status)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tasks)
    }

    async fn create_task(&self, new_task: NewTask) -> Result<Task> {
        let mut tables = self.tables.lock();
        if !tables.users.contains_key(&new_task.user_id) {
            return Err(missing_user(new_task.user_id));
        }

        tables.next_task_id += 1;
        let task = Task {
            id: tables.next_task_id,
            user_id: new_task.user_id,
            title: new_task.title,
            description: new_task.description,
            interval: new_task.interval,
            assigned_to: new_task.assigned_to,
            status: task_status::ACTIVE.to_string(),
            priority: new_task.priority.as_str().to_string(),
            reminder_count: 0,
            created_at: Self::now(),
            completed_at: None,
        };
        tables.tasks.insert(task.id, task.clone());
        Ok(task)
    }

    async fn update_task_status(&self, task_id: i64, status: &str) -> Result<Option<Task>> {
        let mut tables = self.tables.lock();
        let Some(task) = tables.tasks.get_mut(&task_id) else {
            return Ok(None);
        };

        task.status = status.to_string();
        if status == task_status::COMPLETED {
            task.completed_at = Some(Self::now());
        }
        Ok(Some(task.clone()))
    }
}

#[async_trait]
impl AchievementStore for InMemoryStore {
    async fn list_progress(&self, user_id: i64) -> Result<Vec<AchievementProgress>> {
        let tables = self.tables.lock();
        Ok(tables
            .achievements
            .values()
            .map(|achievement| {
                let row = tables
                    .user_achievements
                    .get(&(user_id, achievement.id))
                    .map(|ua| (ua.progress, ua.unlocked, ua.unlocked_at));
                AchievementProgress::from_parts(achievement, row)
            })
            .collect())
    }

    async fn increment_progress(
        &self,
        user_id: i64,
        achievement_id: i64,
        increment: i32,
    ) -> Result<Option<ProgressOutcome>> {
        let mut tables = self.tables.lock();
        let Some(required_count) = tables
            .achievements
            .get(&achievement_id)
            .map(|achievement| achievement.required_count)
        else {
            return Ok(None);
        };
        if !tables.users.contains_key(&user_id) {
            return Err(missing_user(user_id));
        }

        let current = tables
            .user_achievements
            .get(&(user_id, achievement_id))
            .map(|ua| UnlockState {
                progress: ua.progress,
                unlocked: ua.unlocked,
                unlocked_at: ua.unlocked_at,
            });
        let next = accumulate_progress(current, increment, required_count, Self::now())
            .ok_or_else(out_of_range)?;

        tables.user_achievements.insert(
            (user_id, achievement_id),
            UserAchievement {
                user_id,
                achievement_id,
                progress: next.progress,
                unlocked: next.unlocked,
                unlocked_at: next.unlocked_at,
            },
        );

        Ok(Some(ProgressOutcome {
            progress: next.progress,
            unlocked: next.unlocked,
        }))
    }
}
