//! Core business logic for the chart of accounts builder.
//!
//! This crate has no web or database dependencies. Persistence is reached
//! through the store traits in [`chart::store`], implemented by the db crate
//! and by the in-memory backend used in tests.

pub mod chart;
