//! In-memory chart backend.

use std::sync::Arc;

use dashmap::DashMap;

use super::error::ChartError;
use super::store::{AccountStore, ChartBackend, CompanyStore, ReferenceStore};
use super::types::{Account, Company, CompanyFilter, Country};

/// Chart backend holding everything in concurrent maps.
///
/// Cloning shares the underlying data.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    companies: Arc<DashMap<String, Company>>,
    accounts: Arc<DashMap<String, Account>>,
    countries: Arc<DashMap<String, Country>>,
    domains: Arc<DashMap<String, ()>>,
}

impl MemoryBackend {
    /// Creates an empty backend.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds or replaces a country.
    pub fn add_country(&self, name: &str, code: &str) {
        self.countries.insert(
            name.to_string(),
            Country {
                name: name.to_string(),
                code: code.to_string(),
            },
        );
    }

    /// Adds a business domain.
    pub fn add_domain(&self, name: &str) {
        self.domains.insert(name.to_string(), ());
    }
}

impl CompanyStore for MemoryBackend {
    async fn find(&self, name: &str) -> Result<Option<Company>, ChartError> {
        Ok(self.companies.get(name).map(|c| c.clone()))
    }

    async fn names_like(&self, base: &str) -> Result<Vec<String>, ChartError> {
        let prefix = format!("{base}-");
        Ok(self
            .companies
            .iter()
            .filter(|c| c.key() == base || c.key().starts_with(&prefix))
            .map(|c| c.key().clone())
            .collect())
    }

    async fn insert(&self, company: &Company) -> Result<(), ChartError> {
        if self.companies.contains_key(&company.name) {
            return Err(ChartError::Repository(format!(
                "company {} already exists",
                company.name
            )));
        }
        self.companies.insert(company.name.clone(), company.clone());
        Ok(())
    }

    async fn save(&self, company: &Company) -> Result<(), ChartError> {
        match self.companies.get_mut(&company.name) {
            Some(mut existing) => {
                *existing = company.clone();
                Ok(())
            }
            None => Err(ChartError::CompanyNotFound(company.name.clone())),
        }
    }

    async fn set_submitted(&self, name: &str, submitted: bool) -> Result<(), ChartError> {
        let mut company = self
            .companies
            .get_mut(name)
            .ok_or_else(|| ChartError::CompanyNotFound(name.to_string()))?;
        company.submitted = submitted;
        Ok(())
    }

    async fn find_by_chart_name(
        &self,
        chart_name: &str,
        exclude: &str,
    ) -> Result<Option<String>, ChartError> {
        Ok(self
            .companies
            .iter()
            .find(|c| {
                c.name != exclude && c.chart_of_accounts_name.as_deref() == Some(chart_name)
            })
            .map(|c| c.name.clone()))
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, ChartError> {
        let mut companies: Vec<Company> = self
            .companies
            .iter()
            .filter(|c| filter.submitted.is_none_or(|s| c.submitted == s))
            .filter(|c| filter.country.as_ref().is_none_or(|country| &c.country == country))
            .filter(|c| filter.name.as_ref().is_none_or(|name| &c.name == name))
            .map(|c| c.clone())
            .collect();
        companies.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(companies)
    }

    async fn delete(&self, name: &str) -> Result<bool, ChartError> {
        Ok(self.companies.remove(name).is_some())
    }
}

impl AccountStore for MemoryBackend {
    async fn find(&self, name: &str) -> Result<Option<Account>, ChartError> {
        Ok(self.accounts.get(name).map(|a| a.clone()))
    }

    async fn list_by_company(&self, company: &str) -> Result<Vec<Account>, ChartError> {
        let mut accounts: Vec<Account> = self
            .accounts
            .iter()
            .filter(|a| a.company == company)
            .map(|a| a.clone())
            .collect();
        accounts.sort_by(|a, b| (a.lft, a.rgt, &a.name).cmp(&(b.lft, b.rgt, &b.name)));
        Ok(accounts)
    }

    async fn insert_many(&self, accounts: &[Account]) -> Result<(), ChartError> {
        if let Some(existing) = accounts.iter().find(|a| self.accounts.contains_key(&a.name)) {
            return Err(ChartError::DuplicateAccount(existing.name.clone()));
        }
        for account in accounts {
            self.accounts.insert(account.name.clone(), account.clone());
        }
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), ChartError> {
        match self.accounts.get_mut(&account.name) {
            Some(mut existing) => {
                *existing = account.clone();
                Ok(())
            }
            None => Err(ChartError::AccountNotFound(account.name.clone())),
        }
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<(), ChartError> {
        if self.accounts.contains_key(new_name) {
            return Err(ChartError::DuplicateAccount(new_name.to_string()));
        }
        let (_, mut account) = self
            .accounts
            .remove(old_name)
            .ok_or_else(|| ChartError::AccountNotFound(old_name.to_string()))?;
        account.name = new_name.to_string();
        self.accounts.insert(new_name.to_string(), account);

        for mut child in self.accounts.iter_mut() {
            if child.parent_account.as_deref() == Some(old_name) {
                child.parent_account = Some(new_name.to_string());
            }
        }
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, ChartError> {
        Ok(self.accounts.remove(name).is_some())
    }

    async fn delete_by_company(&self, company: &str) -> Result<u64, ChartError> {
        let before = self.accounts.len();
        self.accounts.retain(|_, a| a.company != company);
        Ok(u64::try_from(before - self.accounts.len()).unwrap_or(u64::MAX))
    }

    async fn save_tree_indexes(&self, indexes: &[(String, i32, i32)]) -> Result<(), ChartError> {
        for (name, lft, rgt) in indexes {
            if let Some(mut account) = self.accounts.get_mut(name) {
                account.lft = *lft;
                account.rgt = *rgt;
            }
        }
        Ok(())
    }
}

impl ReferenceStore for MemoryBackend {
    async fn countries(&self) -> Result<Vec<Country>, ChartError> {
        let mut countries: Vec<Country> = self.countries.iter().map(|c| c.clone()).collect();
        countries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(countries)
    }

    async fn find_country(&self, name: &str) -> Result<Option<Country>, ChartError> {
        Ok(self.countries.get(name).map(|c| c.clone()))
    }

    async fn domains(&self) -> Result<Vec<String>, ChartError> {
        let mut domains: Vec<String> = self.domains.iter().map(|d| d.key().clone()).collect();
        domains.sort();
        Ok(domains)
    }
}

impl ChartBackend for MemoryBackend {
    type Companies = Self;
    type Accounts = Self;
    type Reference = Self;

    fn companies(&self) -> &Self {
        self
    }

    fn accounts(&self) -> &Self {
        self
    }

    fn reference(&self) -> &Self {
        self
    }
}
