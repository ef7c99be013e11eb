//! DSpace REST repository access layer
//!
//! Typed entity and link repositories over a read-only DSpace store, each
//! behind a permission gate, served as HAL JSON by an axum router.

pub mod api;
pub mod auth;
pub mod authorize;
pub mod config;
pub mod context;
pub mod converter;
pub mod db;
pub mod error;
pub mod logging;
pub mod models;
pub mod repository;
pub mod services;
pub mod state;

pub use config::Config;
pub use error::{Error, Result};
