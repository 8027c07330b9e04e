//! PostgreSQL chart backend.

use coa_core::chart::ChartBackend;
use sea_orm::DatabaseConnection;

use crate::repositories::{AccountRepository, CompanyRepository, ReferenceRepository};

/// Chart backend over a shared connection pool.
#[derive(Debug, Clone)]
pub struct PostgresBackend {
    companies: CompanyRepository,
    accounts: AccountRepository,
    reference: ReferenceRepository,
}

impl PostgresBackend {
    /// Creates repositories sharing one connection pool.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self {
            companies: CompanyRepository::new(db.clone()),
            accounts: AccountRepository::new(db.clone()),
            reference: ReferenceRepository::new(db),
        }
    }
}

impl ChartBackend for PostgresBackend {
    type Companies = CompanyRepository;
    type Accounts = AccountRepository;
    type Reference = ReferenceRepository;

    fn companies(&self) -> &CompanyRepository {
        &self.companies
    }

    fn accounts(&self) -> &AccountRepository {
        &self.accounts
    }

    fn reference(&self) -> &ReferenceRepository {
        &self.reference
    }
}
