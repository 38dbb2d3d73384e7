//! # Data Layer
//!
//! Row types for the four tables and the SQL that reads and writes them.
//! Every write that must be atomic is a single statement.

pub mod achievement;
pub mod task;
pub mod user;
pub mod user_achievement;

pub use achievement::{Achievement, AchievementProgress};
pub use task::{NewTask, Task};
pub use user::{NewUser, User, XpAward};
pub use user_achievement::{ProgressOutcome, UserAchievement};
