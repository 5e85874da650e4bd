/// Database models for TaskNest
///
/// # Models
///
/// - `user`: User accounts (credential store)
/// - `task`: Tasks, each owned by exactly one user

pub mod task;
pub mod user;
