//! Chart of accounts editing, validation and export.
//!
//! - `types` - companies, accounts and the known root/account types
//! - `validation` - submission gates and record-level account rules
//! - `tree` - nested-set indexing and the exported tree shape
//! - `service` - the operations exposed over HTTP
//! - `session` - per-user editor state
//! - `export` - JSON files and tar.gz archives of submitted charts

pub mod demo;
pub mod error;
pub mod export;
pub mod memory;
pub mod naming;
pub mod service;
pub mod session;
pub mod store;
pub mod tree;
pub mod types;
pub mod validation;

#[cfg(test)]
mod tests;
#[cfg(test)]
mod validation_props;

pub use error::ChartError;
pub use export::{ChartDocument, ChartExporter, ExportReport};
pub use memory::MemoryBackend;
pub use service::ChartService;
pub use session::{ChartSession, MokaStateStore, Namespace, UserStateStore};
pub use store::{AccountStore, ChartBackend, CompanyStore, ReferenceStore};
pub use types::{
    Account, AccountType, AddAccountInput, ChartSummary, Company, CompanyDetails, CompanyFilter,
    Country, FieldMeta, InitDetails, RootType, UpdateAccountInput, ValidationMode,
};
