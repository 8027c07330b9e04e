//! Shared types, errors, and configuration for the chart builder.
//!
//! This crate provides common types used across all other crates:
//! - User identities for per-user editor state
//! - Application-wide error types
//! - Configuration management
//! - JWT claims and token handling

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::Claims;
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService};
pub use types::UserId;
