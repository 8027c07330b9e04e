//! Repository implementations of the chart store traits.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.

pub mod account;
pub mod company;
pub mod reference;

pub use account::AccountRepository;
pub use company::CompanyRepository;
pub use reference::ReferenceRepository;

use coa_core::chart::ChartError;
use sea_orm::DbErr;

/// Maps a database error into the chart error type.
pub(crate) fn repo_err(e: DbErr) -> ChartError {
    tracing::error!(error = %e, "database error");
    ChartError::Repository(e.to_string())
}
