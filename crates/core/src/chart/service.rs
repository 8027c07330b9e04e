//! Chart service: account editing, chart lifecycle and export.

use std::collections::HashMap;
use std::sync::Arc;

use coa_shared::UserId;
use tracing::{debug, info, warn};

use super::error::ChartError;
use super::export::{ChartDocument, ChartExporter, ExportReport};
use super::naming::{account_document_name, numbered_name, random_abbr, validate_chart_name};
use super::session::ChartSession;
use super::store::{AccountStore, ChartBackend, CompanyStore, ReferenceStore};
use super::tree::{build_account_tree, has_children, reindex};
use super::types::{
    Account, AccountType, AddAccountInput, ChartSummary, Company, CompanyDetails, CompanyFilter,
    InitDetails, UpdateAccountInput, ValidationMode, accounts_meta,
};
use super::validation::{validate_account, validate_account_number, validate_chart};

/// Currency given to charts created from scratch.
pub const NEW_CHART_CURRENCY: &str = "INR";

/// Turns an optional form value into `None` when blank.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn parse_account_type(value: Option<String>) -> Result<Option<AccountType>, ChartError> {
    match non_empty(value) {
        None => Ok(None),
        Some(v) => v
            .parse::<AccountType>()
            .map(Some)
            .map_err(|()| ChartError::InvalidAccountType(v)),
    }
}

/// Chart service orchestrating stores, per-user state and export.
pub struct ChartService<B: ChartBackend> {
    backend: B,
    session: ChartSession,
    exporter: ChartExporter,
    abbr_source: AbbrSource,
}

/// Generator for new company abbreviations.
pub type AbbrSource = Arc<dyn Fn() -> String + Send + Sync>;

/// Abbreviations tried per fork before giving up.
const ABBR_ATTEMPTS: usize = 8;

impl<B: ChartBackend> ChartService<B> {
    /// Creates a new chart service.
    #[must_use]
    pub fn new(backend: B, session: ChartSession, exporter: ChartExporter) -> Self {
        Self {
            backend,
            session,
            exporter,
            abbr_source: Arc::new(random_abbr),
        }
    }

    /// Replaces the company abbreviation generator.
    #[must_use]
    pub fn with_abbr_source(mut self, abbr_source: AbbrSource) -> Self {
        self.abbr_source = abbr_source;
        self
    }

    /// Underlying backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========== Helpers ==========

    async fn company(&self, name: &str) -> Result<Company, ChartError> {
        self.backend
            .companies()
            .find(name)
            .await?
            .ok_or_else(|| ChartError::CompanyNotFound(name.to_string()))
    }

    async fn account_in(&self, company: &str, name: &str) -> Result<Account, ChartError> {
        self.backend
            .accounts()
            .find(name)
            .await?
            .filter(|a| a.company == company)
            .ok_or_else(|| ChartError::AccountNotFound(name.to_string()))
    }

    /// Recomputes and stores nested-set indexes for a company.
    async fn reindex(&self, company: &str) -> Result<(), ChartError> {
        let mut accounts = self.backend.accounts().list_by_company(company).await?;
        let changed = reindex(&mut accounts);
        if !changed.is_empty() {
            debug!(company, changed = changed.len(), "tree indexes rebuilt");
            self.backend.accounts().save_tree_indexes(&changed).await?;
        }
        Ok(())
    }

    /// Clears the submitted flag if the user is in edit mode, then leaves edit mode.
    async fn disable_submitted(&self, user: &UserId, company: &str) -> Result<(), ChartError> {
        if self.session.is_editing(user) {
            self.backend.companies().set_submitted(company, false).await?;
            self.session.set_editing(user, false);
            info!(company, user = %user, "chart reverted to draft after edit");
        }
        Ok(())
    }

    /// Picks an abbreviation under which none of `accounts` would clash
    /// with an existing account name.
    async fn free_abbr(&self, accounts: &[Account]) -> Result<String, ChartError> {
        'attempts: for _ in 0..ABBR_ATTEMPTS {
            let abbr = (self.abbr_source)();
            for account in accounts {
                let name =
                    account_document_name(account.account_number.as_deref(), &account.account_name, &abbr);
                if self.backend.accounts().find(&name).await?.is_some() {
                    debug!(abbr = %abbr, account = %name, "abbreviation taken, retrying");
                    continue 'attempts;
                }
            }
            return Ok(abbr);
        }
        Err(ChartError::NoFreeAbbreviation(ABBR_ATTEMPTS))
    }

    async fn create_company(
        &self,
        company_name: &str,
        country: &str,
        default_currency: &str,
        chart_of_accounts: Option<String>,
        forked_from: Option<String>,
        abbr: String,
    ) -> Result<Company, ChartError> {
        let taken = self.backend.companies().names_like(company_name).await?;
        let name = numbered_name(company_name, &taken);

        let company = Company {
            name: name.clone(),
            company_name: name,
            abbr,
            country: country.to_string(),
            default_currency: default_currency.to_string(),
            chart_of_accounts,
            chart_of_accounts_name: None,
            submitted: false,
            forked: true,
            forked_from,
            stars: 0,
            stars_given_by: Vec::new(),
            domain: None,
            included_in_erpnext: false,
        };
        self.backend.companies().insert(&company).await?;
        info!(company = %company.name, country, "company created");
        Ok(company)
    }

    // ========== Account Editing ==========

    /// Updates an account's fields.
    ///
    /// `account_type` and `is_group` are always applied. Other fields are
    /// applied when present; a blank `parent_account` detaches the account,
    /// which is only allowed when `is_root` is set.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, its parent is missing,
    /// the change would create a loop or turn a group with children into a
    /// ledger, or the account number is taken.
    pub async fn update_account(
        &self,
        user: &UserId,
        input: UpdateAccountInput,
    ) -> Result<Account, ChartError> {
        let mut account = self.account_in(&input.company, &input.name).await?;
        let mut accounts = self
            .backend
            .accounts()
            .list_by_company(&input.company)
            .await?;

        if let Some(account_name) = non_empty(input.account_name) {
            account.account_name = account_name;
        }
        if let Some(number) = input.account_number {
            account.account_number = non_empty(Some(number));
        }
        if let Some(parent) = input.parent_account {
            account.parent_account = non_empty(Some(parent));
        }
        if let Some(root_type) = input.root_type {
            account.root_type = non_empty(Some(root_type));
        }
        if let Some(currency) = input.account_currency {
            account.account_currency = non_empty(Some(currency));
        }
        account.account_type = parse_account_type(input.account_type)?;
        account.is_group = input.is_group;

        if account.is_root() && !input.is_root {
            return Err(ChartError::ParentRequired(account.name.clone()));
        }

        if let Some(slot) = accounts.iter_mut().find(|a| a.name == account.name) {
            *slot = account.clone();
        }
        validate_account(&account, &accounts, ValidationMode::Unverified)?;
        validate_account_number(&account, &accounts)?;

        self.backend.accounts().save(&account).await?;
        self.reindex(&input.company).await?;
        self.disable_submitted(user, &input.company).await?;

        info!(account = %account.name, company = %account.company, "account updated");
        Ok(account)
    }

    /// Adds an account and returns its document name.
    ///
    /// Children inherit the parent's root type; roots must bring their own.
    ///
    /// # Errors
    ///
    /// Returns an error if the company does not exist, a non-root account
    /// has no parent, record validation fails, or the name or number is taken.
    pub async fn add_account(
        &self,
        user: &UserId,
        input: AddAccountInput,
    ) -> Result<String, ChartError> {
        let company = self.company(&input.company).await?;
        let accounts = self
            .backend
            .accounts()
            .list_by_company(&company.name)
            .await?;

        let account_name = input.account_name.trim().to_string();
        if account_name.is_empty() {
            return Err(ChartError::invalid(&company.name, "Account Name is mandatory"));
        }
        let account_number = non_empty(input.account_number);
        let name = account_document_name(account_number.as_deref(), &account_name, &company.abbr);

        let (parent_account, root_type) = if input.is_root {
            (None, non_empty(input.root_type))
        } else {
            let parent_name =
                non_empty(input.parent_account).ok_or_else(|| ChartError::ParentRequired(name.clone()))?;
            let inherited = accounts
                .iter()
                .find(|a| a.name == parent_name)
                .and_then(|p| p.root_type.clone());
            (Some(parent_name), inherited)
        };

        let account = Account {
            name: name.clone(),
            account_name,
            account_number,
            company: company.name.clone(),
            parent_account,
            root_type,
            account_type: parse_account_type(input.account_type)?,
            is_group: input.is_group,
            lft: 0,
            rgt: 0,
            account_currency: non_empty(input.account_currency),
        };

        if self.backend.accounts().find(&name).await?.is_some() {
            return Err(ChartError::DuplicateAccount(name));
        }
        validate_account(&account, &accounts, ValidationMode::Full)?;

        self.backend
            .accounts()
            .insert_many(std::slice::from_ref(&account))
            .await?;
        self.reindex(&company.name).await?;
        self.disable_submitted(user, &company.name).await?;

        info!(account = %name, company = %company.name, "account added");
        Ok(name)
    }

    /// Changes an account's name and number and returns the new document name.
    ///
    /// # Errors
    ///
    /// Returns an error if the account does not exist, the number is used by
    /// another account, or the derived name is taken.
    pub async fn rename_account(
        &self,
        user: &UserId,
        company: &str,
        old_name: &str,
        new_account_name: &str,
        new_account_number: Option<String>,
    ) -> Result<String, ChartError> {
        let company = self.company(company).await?;
        let mut account = self.account_in(&company.name, old_name).await?;
        let accounts = self
            .backend
            .accounts()
            .list_by_company(&company.name)
            .await?;

        let new_account_name = new_account_name.trim();
        if new_account_name.is_empty() {
            return Err(ChartError::invalid(old_name, "Account Name is mandatory"));
        }
        account.account_name = new_account_name.to_string();
        account.account_number = non_empty(new_account_number);
        validate_account_number(&account, &accounts)?;

        let new_name = account_document_name(
            account.account_number.as_deref(),
            new_account_name,
            &company.abbr,
        );
        if new_name != old_name && self.backend.accounts().find(&new_name).await?.is_some() {
            return Err(ChartError::DuplicateAccount(new_name));
        }

        self.backend.accounts().save(&account).await?;
        if new_name != old_name {
            self.backend.accounts().rename(old_name, &new_name).await?;
        }
        self.reindex(&company.name).await?;
        self.disable_submitted(user, &company.name).await?;

        info!(old = old_name, new = %new_name, company = %company.name, "account renamed");
        Ok(new_name)
    }

    /// Deletes an account without children.
    ///
    /// # Errors
    ///
    /// Returns `ChildAccountsExist` if the account has children, or
    /// `AccountNotFound` if it is not in the company.
    pub async fn delete_account(
        &self,
        user: &UserId,
        company: &str,
        account: &str,
    ) -> Result<(), ChartError> {
        let account = self.account_in(company, account).await?;
        let accounts = self.backend.accounts().list_by_company(company).await?;
        if has_children(&accounts, &account.name) {
            return Err(ChartError::ChildAccountsExist(account.name));
        }

        self.backend.accounts().delete(&account.name).await?;
        self.reindex(company).await?;
        self.disable_submitted(user, company).await?;

        info!(account = %account.name, company, "account deleted");
        Ok(())
    }

    /// Lists a company's accounts in tree order.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if the company does not exist.
    pub async fn list_accounts(&self, company: &str) -> Result<Vec<Account>, ChartError> {
        let company = self.company(company).await?;
        self.backend.accounts().list_by_company(&company.name).await
    }

    // ========== Chart Lifecycle ==========

    /// Copies a company and its chart into a new draft; returns the new name.
    ///
    /// The draft is named after the chart the source was forked from, or the
    /// source itself, numbered if taken. The new company's abbreviation is
    /// chosen so that no copied account name already exists; nothing is left
    /// behind if copying fails.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if the source does not exist, or
    /// `NoFreeAbbreviation` if every generated abbreviation clashes.
    pub async fn fork(&self, company: &str) -> Result<String, ChartError> {
        let source = self.company(company).await?;
        let base = source
            .forked_from
            .clone()
            .filter(|f| !f.is_empty())
            .unwrap_or_else(|| source.name.clone());

        let source_accounts = self
            .backend
            .accounts()
            .list_by_company(&source.name)
            .await?;
        let abbr = self.free_abbr(&source_accounts).await?;

        let fork = self
            .create_company(
                &base,
                &source.country,
                &source.default_currency,
                source.chart_of_accounts.clone(),
                Some(source.name.clone()),
                abbr,
            )
            .await?;

        let renamed: HashMap<&str, String> = source_accounts
            .iter()
            .map(|a| {
                (
                    a.name.as_str(),
                    account_document_name(a.account_number.as_deref(), &a.account_name, &fork.abbr),
                )
            })
            .collect();

        let mut copies: Vec<Account> = source_accounts
            .iter()
            .map(|a| Account {
                name: renamed[a.name.as_str()].clone(),
                company: fork.name.clone(),
                parent_account: a.parent().and_then(|p| renamed.get(p).cloned()),
                ..a.clone()
            })
            .collect();
        reindex(&mut copies);
        if let Err(e) = self.backend.accounts().insert_many(&copies).await {
            warn!(fork = %fork.name, error = %e, "copying accounts failed, removing fork");
            self.backend.companies().delete(&fork.name).await?;
            return Err(e);
        }

        info!(
            source = %source.name,
            fork = %fork.name,
            accounts = copies.len(),
            "chart forked"
        );
        Ok(fork.name)
    }

    /// Creates an empty draft chart for a country; returns the company name.
    ///
    /// # Errors
    ///
    /// Returns `CountryNotFound` for an unknown country.
    pub async fn create_new_chart(&self, country: &str) -> Result<String, ChartError> {
        if self.backend.reference().find_country(country).await?.is_none() {
            return Err(ChartError::CountryNotFound(country.to_string()));
        }
        let company = self
            .create_company(
                &format!("{country} - Chart of Accounts"),
                country,
                NEW_CHART_CURRENCY,
                None,
                None,
                (self.abbr_source)(),
            )
            .await?;
        Ok(company.name)
    }

    /// Validates a chart and marks it submitted under `chart_of_accounts_name`.
    ///
    /// Nothing is written unless every check passes.
    ///
    /// # Errors
    ///
    /// Returns `InvalidChartName` for a blank or path-like name, the first
    /// failing validation gate, or `DuplicateChartName` if another company
    /// already uses the name.
    pub async fn submit_chart(
        &self,
        user: &UserId,
        company: &str,
        chart_of_accounts_name: &str,
        domain: Option<String>,
    ) -> Result<Company, ChartError> {
        let chart_of_accounts_name = validate_chart_name(chart_of_accounts_name)?;
        let mut company = self.company(company).await?;
        let accounts = self
            .backend
            .accounts()
            .list_by_company(&company.name)
            .await?;

        validate_chart(&accounts)?;

        if let Some(other) = self
            .backend
            .companies()
            .find_by_chart_name(chart_of_accounts_name, &company.name)
            .await?
        {
            debug!(company = %company.name, other = %other, "chart name already taken");
            return Err(ChartError::DuplicateChartName(
                chart_of_accounts_name.to_string(),
            ));
        }

        company.submitted = true;
        company.chart_of_accounts_name = Some(chart_of_accounts_name.to_string());
        if let Some(domain) = non_empty(domain) {
            company.domain = Some(domain);
        }
        self.backend.companies().save(&company).await?;
        self.session.reset_init_details(user);

        info!(
            company = %company.name,
            chart = chart_of_accounts_name,
            country = %company.country,
            user = %user,
            "chart of accounts submitted"
        );
        Ok(company)
    }

    /// Deletes a company and all its accounts.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if the company does not exist.
    pub async fn delete_chart(&self, user: &UserId, company: &str) -> Result<(), ChartError> {
        let company = self.company(company).await?;
        let removed = self
            .backend
            .accounts()
            .delete_by_company(&company.name)
            .await?;
        self.backend.companies().delete(&company.name).await?;
        self.session.reset_init_details(user);

        info!(company = %company.name, accounts = removed, "chart deleted");
        Ok(())
    }

    /// Stars a chart for the user and returns the star count.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if the company does not exist.
    pub async fn add_star(&self, user: &UserId, company: &str) -> Result<i32, ChartError> {
        let mut company = self.company(company).await?;
        if !company.stars_given_by.iter().any(|u| u == user.as_str()) {
            company.stars_given_by.push(user.as_str().to_string());
        }
        company.stars = i32::try_from(company.stars_given_by.len()).unwrap_or(i32::MAX);
        self.backend.companies().save(&company).await?;
        Ok(company.stars)
    }

    /// Sets the user's edit flag.
    pub fn edit_chart(&self, user: &UserId, chart: &str) {
        debug!(chart, user = %user, "entering edit mode");
        self.session.set_editing(user, true);
    }

    /// Returns the editor bootstrap bundle, cached per user.
    ///
    /// The cache is reused only when it was built for the same company.
    ///
    /// # Errors
    ///
    /// Returns `CompanyNotFound` if the company does not exist.
    pub async fn init_details(
        &self,
        user: &UserId,
        company: &str,
    ) -> Result<InitDetails, ChartError> {
        if let Some(cached) = self.session.init_details_for(user, company) {
            return Ok(cached);
        }

        let company = self.company(company).await?;
        let details = InitDetails {
            accounts_meta: accounts_meta(),
            company: CompanyDetails::from(&company),
            domains: self.backend.reference().domains().await?,
        };
        self.session.store_init_details(user, &details);
        Ok(details)
    }

    // ========== Listings ==========

    /// Names of every known country.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the store fails.
    pub async fn get_countries(&self) -> Result<Vec<String>, ChartError> {
        Ok(self
            .backend
            .reference()
            .countries()
            .await?
            .into_iter()
            .map(|c| c.name)
            .collect())
    }

    /// Company summaries, most starred first.
    ///
    /// # Errors
    ///
    /// Returns a repository error if the store fails.
    pub async fn list_charts(&self, filter: &CompanyFilter) -> Result<Vec<ChartSummary>, ChartError> {
        let mut charts: Vec<ChartSummary> = self
            .backend
            .companies()
            .list(filter)
            .await?
            .iter()
            .map(ChartSummary::from)
            .collect();
        charts.sort_by(|a, b| b.stars.cmp(&a.stars).then_with(|| a.name.cmp(&b.name)));
        Ok(charts)
    }

    // ========== Export ==========

    /// Writes every matching submitted chart to disk and archives them.
    ///
    /// With `chart` set, only that company is exported and the archive holds
    /// just its file; otherwise all matching charts are bundled.
    ///
    /// # Errors
    ///
    /// Returns `NoSubmittedCharts` when nothing matches, or an I/O error.
    pub async fn export_submitted_coa(
        &self,
        country: Option<String>,
        chart: Option<String>,
    ) -> Result<ExportReport, ChartError> {
        let filter = CompanyFilter {
            submitted: Some(true),
            country: non_empty(country),
            name: non_empty(chart),
        };
        let companies = self.backend.companies().list(&filter).await?;
        let Some(first) = companies.first() else {
            return Err(ChartError::NoSubmittedCharts);
        };
        let single = filter
            .name
            .as_ref()
            .map(|_| first.chart_display_name().to_string());

        let mut documents = Vec::with_capacity(companies.len());
        for company in &companies {
            let accounts = self
                .backend
                .accounts()
                .list_by_company(&company.name)
                .await?;
            let country_code = self
                .backend
                .reference()
                .find_country(&company.country)
                .await?
                .map(|c| c.code);
            documents.push(ChartDocument {
                name: company.chart_display_name().to_string(),
                domain: company.domain.clone().filter(|d| !d.is_empty()),
                country_code,
                tree: build_account_tree(&accounts),
            });
        }

        let exporter = self.exporter.clone();
        let report = tokio::task::spawn_blocking(move || -> Result<ExportReport, ChartError> {
            // Refuse the whole run before touching the disk
            for document in &documents {
                exporter.chart_path(&document.name)?;
            }
            exporter.prepare()?;
            let mut report = ExportReport {
                directory: exporter.dir().to_path_buf(),
                ..ExportReport::default()
            };
            for document in &documents {
                if exporter.write_chart(document)? {
                    report.written.push(document.name.clone());
                } else {
                    report.skipped.push(document.name.clone());
                }
            }
            report.archive = exporter.make_archive(single.as_deref())?;
            Ok(report)
        })
        .await
        .map_err(|e| ChartError::Io(std::io::Error::other(e)))??;

        info!(
            written = report.written.len(),
            skipped = report.skipped.len(),
            archive = %report.archive.display(),
            "submitted charts exported"
        );
        Ok(report)
    }
}
