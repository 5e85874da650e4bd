/// API route handlers
///
/// - `health`: Health check endpoint
/// - `auth`: Signup and login
/// - `tasks`: Task create, list and update
/// - `users`: Current user profile and the public user view

pub mod auth;
pub mod health;
pub mod tasks;
pub mod users;
