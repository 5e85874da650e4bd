//! # TaskNest API Server Library
//!
//! HTTP surface of the TaskNest task tracker: account signup, form login
//! issuing bearer tokens, and per-user task management.
//!
//! ## Modules
//!
//! - `app`: Application state, router builder and access gate layer
//! - `config`: Configuration management
//! - `error`: Error handling and HTTP response mapping
//! - `routes`: API route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod routes;
