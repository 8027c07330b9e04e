//! Repository traits for chart persistence.
//!
//! These traits are implemented by the db crate for PostgreSQL and by
//! [`MemoryBackend`](super::memory::MemoryBackend) for tests and local runs.

use std::future::Future;

use super::error::ChartError;
use super::types::{Account, Company, CompanyFilter, Country};

/// Persistence for companies.
pub trait CompanyStore: Send + Sync {
    /// Find a company by name.
    fn find(&self, name: &str) -> impl Future<Output = Result<Option<Company>, ChartError>> + Send;

    /// Names equal to `base` or starting with `"<base>-"`.
    fn names_like(&self, base: &str) -> impl Future<Output = Result<Vec<String>, ChartError>> + Send;

    /// Insert a new company.
    fn insert(&self, company: &Company) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Overwrite every field of an existing company.
    fn save(&self, company: &Company) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Set the submitted flag only.
    fn set_submitted(
        &self,
        name: &str,
        submitted: bool,
    ) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Name of a company other than `exclude` using `chart_name`, if any.
    fn find_by_chart_name(
        &self,
        chart_name: &str,
        exclude: &str,
    ) -> impl Future<Output = Result<Option<String>, ChartError>> + Send;

    /// List companies matching a filter.
    fn list(
        &self,
        filter: &CompanyFilter,
    ) -> impl Future<Output = Result<Vec<Company>, ChartError>> + Send;

    /// Delete a company. Returns false if it did not exist.
    fn delete(&self, name: &str) -> impl Future<Output = Result<bool, ChartError>> + Send;
}

/// Persistence for accounts.
pub trait AccountStore: Send + Sync {
    /// Find an account by document name.
    fn find(&self, name: &str) -> impl Future<Output = Result<Option<Account>, ChartError>> + Send;

    /// All accounts of a company, ordered by `lft` then `rgt`.
    fn list_by_company(
        &self,
        company: &str,
    ) -> impl Future<Output = Result<Vec<Account>, ChartError>> + Send;

    /// Insert accounts in one batch.
    fn insert_many(&self, accounts: &[Account]) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Overwrite every field of an existing account.
    fn save(&self, account: &Account) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Rename an account; children's `parent_account` follows.
    fn rename(
        &self,
        old_name: &str,
        new_name: &str,
    ) -> impl Future<Output = Result<(), ChartError>> + Send;

    /// Delete one account.
    fn delete(&self, name: &str) -> impl Future<Output = Result<bool, ChartError>> + Send;

    /// Delete every account of a company, returning how many were removed.
    fn delete_by_company(&self, company: &str) -> impl Future<Output = Result<u64, ChartError>> + Send;

    /// Persist recomputed nested-set indexes as `(name, lft, rgt)`.
    fn save_tree_indexes(
        &self,
        indexes: &[(String, i32, i32)],
    ) -> impl Future<Output = Result<(), ChartError>> + Send;
}

/// Read access to reference data.
pub trait ReferenceStore: Send + Sync {
    /// All countries, ordered by name.
    fn countries(&self) -> impl Future<Output = Result<Vec<Country>, ChartError>> + Send;

    /// Find a country by name.
    fn find_country(
        &self,
        name: &str,
    ) -> impl Future<Output = Result<Option<Country>, ChartError>> + Send;

    /// All business domain names, ordered.
    fn domains(&self) -> impl Future<Output = Result<Vec<String>, ChartError>> + Send;
}

/// Bundle of stores a [`ChartService`](super::service::ChartService) runs against.
pub trait ChartBackend: Send + Sync + 'static {
    /// Company store.
    type Companies: CompanyStore;
    /// Account store.
    type Accounts: AccountStore;
    /// Reference data store.
    type Reference: ReferenceStore;

    /// Company store.
    fn companies(&self) -> &Self::Companies;
    /// Account store.
    fn accounts(&self) -> &Self::Accounts;
    /// Reference data store.
    fn reference(&self) -> &Self::Reference;
}
