// covenant_server/src/lib.rs

//! HTTP backend for membership registration and the artifact shop.

pub mod config;
pub mod db;
pub mod errors;
pub mod pipelines;
pub mod services;
pub mod state;
pub mod web;

pub use crate::config::AppConfig;
pub use crate::errors::{AppError, Result};
pub use crate::state::AppState;
