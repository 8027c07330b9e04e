//! Common types used across the application.

pub mod user;

pub use user::UserId;
