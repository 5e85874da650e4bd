//! # TaskNest Shared Library
//!
//! Types and logic shared by the TaskNest API server: password hashing,
//! token issuance, the access gate, and the SQLite-backed user and task
//! stores.
//!
//! ## Module Organization
//!
//! - `auth`: Password hashing, JWT, access gate
//! - `db`: Connection pool and schema bootstrap
//! - `models`: Users and tasks with their queries

pub mod auth;
pub mod db;
pub mod models;

/// Current version of the TaskNest shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
