//! Chart of accounts domain types.
//!
//! Companies own a forest of accounts. Each account carries nested-set
//! indexes (`lft`/`rgt`) so a company's tree can be walked in order without
//! recursion on the database side.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Top-level classification of a root account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RootType {
    /// Things the company owns.
    Asset,
    /// Things the company owes.
    Liability,
    /// Costs incurred.
    Expense,
    /// Revenue earned.
    Income,
    /// Owner's interest.
    Equity,
}

impl RootType {
    /// Every root type, in the order they are usually listed.
    pub const ALL: [Self; 5] = [
        Self::Asset,
        Self::Liability,
        Self::Expense,
        Self::Income,
        Self::Equity,
    ];

    /// Returns the string representation of the root type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "Asset",
            Self::Liability => "Liability",
            Self::Expense => "Expense",
            Self::Income => "Income",
            Self::Equity => "Equity",
        }
    }
}

impl fmt::Display for RootType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RootType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// Functional classification of an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AccountType {
    /// Contra-asset for depreciation.
    #[serde(rename = "Accumulated Depreciation")]
    AccumulatedDepreciation,
    /// Bank accounts.
    Bank,
    /// Cash in hand.
    Cash,
    /// Chargeable expense heads.
    Chargeable,
    /// Cost of goods sold.
    #[serde(rename = "Cost of Goods Sold")]
    CostOfGoodsSold,
    /// Depreciation expense.
    Depreciation,
    /// Equity accounts.
    Equity,
    /// Generic expense account.
    #[serde(rename = "Expense Account")]
    ExpenseAccount,
    /// Expenses included in stock valuation.
    #[serde(rename = "Expenses Included In Valuation")]
    ExpensesIncludedInValuation,
    /// Fixed assets.
    #[serde(rename = "Fixed Asset")]
    FixedAsset,
    /// Generic income account.
    #[serde(rename = "Income Account")]
    IncomeAccount,
    /// Creditors.
    Payable,
    /// Debtors.
    Receivable,
    /// Rounding differences.
    #[serde(rename = "Round Off")]
    RoundOff,
    /// Inventory.
    Stock,
    /// Stock adjustment.
    #[serde(rename = "Stock Adjustment")]
    StockAdjustment,
    /// Goods received but not yet billed.
    #[serde(rename = "Stock Received But Not Billed")]
    StockReceivedButNotBilled,
    /// Taxes and duties.
    Tax,
    /// Temporary opening accounts.
    Temporary,
}

impl AccountType {
    /// Every known account type.
    pub const ALL: [Self; 19] = [
        Self::AccumulatedDepreciation,
        Self::Bank,
        Self::Cash,
        Self::Chargeable,
        Self::CostOfGoodsSold,
        Self::Depreciation,
        Self::Equity,
        Self::ExpenseAccount,
        Self::ExpensesIncludedInValuation,
        Self::FixedAsset,
        Self::IncomeAccount,
        Self::Payable,
        Self::Receivable,
        Self::RoundOff,
        Self::Stock,
        Self::StockAdjustment,
        Self::StockReceivedButNotBilled,
        Self::Tax,
        Self::Temporary,
    ];

    /// Returns the display name of the account type.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AccumulatedDepreciation => "Accumulated Depreciation",
            Self::Bank => "Bank",
            Self::Cash => "Cash",
            Self::Chargeable => "Chargeable",
            Self::CostOfGoodsSold => "Cost of Goods Sold",
            Self::Depreciation => "Depreciation",
            Self::Equity => "Equity",
            Self::ExpenseAccount => "Expense Account",
            Self::ExpensesIncludedInValuation => "Expenses Included In Valuation",
            Self::FixedAsset => "Fixed Asset",
            Self::IncomeAccount => "Income Account",
            Self::Payable => "Payable",
            Self::Receivable => "Receivable",
            Self::RoundOff => "Round Off",
            Self::Stock => "Stock",
            Self::StockAdjustment => "Stock Adjustment",
            Self::StockReceivedButNotBilled => "Stock Received But Not Billed",
            Self::Tax => "Tax",
            Self::Temporary => "Temporary",
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccountType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|t| t.as_str() == s).ok_or(())
    }
}

/// Ledger account types every submitted chart must contain.
pub const REQUIRED_LEDGER_TYPES: [AccountType; 6] = [
    AccountType::CostOfGoodsSold,
    AccountType::Depreciation,
    AccountType::FixedAsset,
    AccountType::Payable,
    AccountType::Receivable,
    AccountType::StockAdjustment,
];

/// Group account types every submitted chart must contain.
pub const REQUIRED_GROUP_TYPES: [AccountType; 3] =
    [AccountType::Bank, AccountType::Cash, AccountType::Stock];

/// Minimum number of root accounts in a submitted chart.
pub const MIN_ROOT_ACCOUNTS: usize = 4;

/// A ledger or group account within a company's chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Document name, e.g. `"1100 - Cash - AC"`.
    pub name: String,
    /// Human-readable account name.
    pub account_name: String,
    /// Optional account number.
    pub account_number: Option<String>,
    /// Owning company.
    pub company: String,
    /// Parent account name; `None` for roots.
    pub parent_account: Option<String>,
    /// Root type as entered; only checked against [`RootType`] on submit.
    pub root_type: Option<String>,
    /// Functional account type.
    pub account_type: Option<AccountType>,
    /// Group accounts hold children and are never posted to.
    pub is_group: bool,
    /// Nested-set left index.
    pub lft: i32,
    /// Nested-set right index.
    pub rgt: i32,
    /// Account currency, when different from the company's.
    pub account_currency: Option<String>,
}

impl Account {
    /// Returns true when the account has no parent.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent_account.as_deref().is_none_or(str::is_empty)
    }

    /// Returns the parent name, treating an empty string as no parent.
    #[must_use]
    pub fn parent(&self) -> Option<&str> {
        self.parent_account.as_deref().filter(|p| !p.is_empty())
    }
}

/// A company and the chart of accounts it carries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    /// Document name (unique).
    pub name: String,
    /// Display name.
    pub company_name: String,
    /// Abbreviation appended to account names.
    pub abbr: String,
    /// Country name.
    pub country: String,
    /// Default currency code.
    pub default_currency: String,
    /// Template the chart was created from.
    pub chart_of_accounts: Option<String>,
    /// Name the chart was submitted under.
    pub chart_of_accounts_name: Option<String>,
    /// Whether the chart passed validation and was submitted.
    pub submitted: bool,
    /// Whether the company is a user-created draft.
    pub forked: bool,
    /// Company this one was forked from.
    pub forked_from: Option<String>,
    /// Number of distinct users who starred the chart.
    pub stars: i32,
    /// Users who starred the chart.
    pub stars_given_by: Vec<String>,
    /// Business domain of the chart.
    pub domain: Option<String>,
    /// Whether the chart ships with the ERP distribution.
    pub included_in_erpnext: bool,
}

impl Company {
    /// Name used for exported files: the submitted chart name, else the company name.
    #[must_use]
    pub fn chart_display_name(&self) -> &str {
        self.chart_of_accounts_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .unwrap_or(&self.name)
    }
}

/// A country with its ISO code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Country {
    /// Country name.
    pub name: String,
    /// Two-letter code, lowercase.
    pub code: String,
}

/// Nested-set position for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeIndex<'a> {
    /// Account name.
    pub name: &'a str,
    /// Left index.
    pub lft: i32,
    /// Right index.
    pub rgt: i32,
}

/// Filter for listing companies.
#[derive(Debug, Clone, Default)]
pub struct CompanyFilter {
    /// Only submitted (or only unsubmitted) companies.
    pub submitted: Option<bool>,
    /// Only companies in this country.
    pub country: Option<String>,
    /// Only the company with this name.
    pub name: Option<String>,
}

/// How strictly an account save is validated.
///
/// Editing a draft chart tolerates incomplete records; record-level rules
/// run in full when an account is added and when a chart is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationMode {
    /// Run every record-level rule.
    Full,
    /// Only keep the tree well-formed (parent exists, no loops).
    Unverified,
}

/// Input for adding an account.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AddAccountInput {
    /// Owning company.
    pub company: String,
    /// Account name.
    pub account_name: String,
    /// Optional account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Parent account name.
    #[serde(default, alias = "parent")]
    pub parent_account: Option<String>,
    /// Create a root account (no parent).
    #[serde(default)]
    pub is_root: bool,
    /// Root type, required for roots and inherited otherwise.
    #[serde(default)]
    pub root_type: Option<String>,
    /// Account type; empty means none.
    #[serde(default)]
    pub account_type: Option<String>,
    /// Whether the new account is a group.
    #[serde(default)]
    pub is_group: bool,
    /// Account currency.
    #[serde(default)]
    pub account_currency: Option<String>,
}

/// Input for updating an account.
///
/// `account_type` and `is_group` are always applied: an absent type clears it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAccountInput {
    /// Account document name.
    pub name: String,
    /// Owning company.
    pub company: String,
    /// New account name.
    #[serde(default)]
    pub account_name: Option<String>,
    /// New account number; the document name is left as is.
    #[serde(default)]
    pub account_number: Option<String>,
    /// New parent; empty string detaches the account.
    #[serde(default)]
    pub parent_account: Option<String>,
    /// Root type.
    #[serde(default)]
    pub root_type: Option<String>,
    /// Account type; `None` or empty clears it.
    #[serde(default)]
    pub account_type: Option<String>,
    /// Group flag.
    #[serde(default)]
    pub is_group: bool,
    /// Saving a root account, which needs no parent.
    #[serde(default)]
    pub is_root: bool,
    /// Account currency.
    #[serde(default)]
    pub account_currency: Option<String>,
}

/// Company summary for chart listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartSummary {
    /// Company name.
    pub name: String,
    /// Submitted chart name.
    pub chart_of_accounts_name: Option<String>,
    /// Country name.
    pub country: String,
    /// Star count.
    pub stars: i32,
    /// Submission flag.
    pub submitted: bool,
    /// Draft flag.
    pub forked: bool,
    /// Business domain.
    pub domain: Option<String>,
}

impl From<&Company> for ChartSummary {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            chart_of_accounts_name: company.chart_of_accounts_name.clone(),
            country: company.country.clone(),
            stars: company.stars,
            submitted: company.submitted,
            forked: company.forked,
            domain: company.domain.clone(),
        }
    }
}

/// Company fields the chart editor needs on load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyDetails {
    /// Company name.
    pub name: String,
    /// Submitted chart name.
    pub chart_of_accounts_name: Option<String>,
    /// Submission flag.
    pub submitted: bool,
    /// Draft flag.
    pub forked: bool,
    /// Whether the chart ships with the ERP distribution.
    pub included_in_erpnext: bool,
    /// Business domain.
    pub domain: Option<String>,
}

impl From<&Company> for CompanyDetails {
    fn from(company: &Company) -> Self {
        Self {
            name: company.name.clone(),
            chart_of_accounts_name: company.chart_of_accounts_name.clone(),
            submitted: company.submitted,
            forked: company.forked,
            included_in_erpnext: company.included_in_erpnext,
            domain: company.domain.clone(),
        }
    }
}

/// Description of one editable account field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Field name.
    pub fieldname: String,
    /// Label shown in the editor.
    pub label: String,
    /// Field type (`Data`, `Link`, `Select`, `Check`).
    pub fieldtype: String,
    /// Select options, newline separated, or the linked entity.
    pub options: Option<String>,
    /// Whether the field is mandatory.
    pub reqd: bool,
}

/// Editor bootstrap bundle, cached per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InitDetails {
    /// Account field metadata.
    pub accounts_meta: Vec<FieldMeta>,
    /// The company being edited.
    pub company: CompanyDetails,
    /// Known business domains.
    pub domains: Vec<String>,
}

/// Builds the account field metadata served to the editor.
#[must_use]
pub fn accounts_meta() -> Vec<FieldMeta> {
    fn field(fieldname: &str, label: &str, fieldtype: &str, options: Option<String>, reqd: bool) -> FieldMeta {
        FieldMeta {
            fieldname: fieldname.to_string(),
            label: label.to_string(),
            fieldtype: fieldtype.to_string(),
            options,
            reqd,
        }
    }

    let join = |items: &mut dyn Iterator<Item = &'static str>| -> String {
        std::iter::once("").chain(items).collect::<Vec<_>>().join("\n")
    };

    vec![
        field("account_name", "Account Name", "Data", None, true),
        field("account_number", "Account Number", "Data", None, false),
        field("is_group", "Is Group", "Check", None, false),
        field("parent_account", "Parent Account", "Link", Some("Account".to_string()), false),
        field(
            "root_type",
            "Root Type",
            "Select",
            Some(join(&mut RootType::ALL.iter().map(RootType::as_str))),
            false,
        ),
        field(
            "account_type",
            "Account Type",
            "Select",
            Some(join(&mut AccountType::ALL.iter().map(AccountType::as_str))),
            false,
        ),
        field("account_currency", "Currency", "Link", Some("Currency".to_string()), false),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Asset", Some(RootType::Asset))]
    #[case("Equity", Some(RootType::Equity))]
    #[case("asset", None)]
    #[case("Revenue", None)]
    #[case("", None)]
    fn test_root_type_parse(#[case] input: &str, #[case] expected: Option<RootType>) {
        assert_eq!(input.parse::<RootType>().ok(), expected);
    }

    #[test]
    fn test_account_type_names_roundtrip() {
        for account_type in AccountType::ALL {
            assert_eq!(account_type.as_str().parse::<AccountType>(), Ok(account_type));
            let json = serde_json::to_string(&account_type).expect("serialize");
            assert_eq!(json, format!("\"{}\"", account_type.as_str()));
        }
    }

    #[test]
    fn test_is_root_treats_empty_parent_as_root() {
        let mut account = Account {
            name: "Assets - AC".into(),
            account_name: "Assets".into(),
            account_number: None,
            company: "Acme".into(),
            parent_account: Some(String::new()),
            root_type: Some("Asset".into()),
            account_type: None,
            is_group: true,
            lft: 0,
            rgt: 0,
            account_currency: None,
        };
        assert!(account.is_root());
        assert_eq!(account.parent(), None);

        account.parent_account = Some("Root - AC".into());
        assert!(!account.is_root());
    }

    #[test]
    fn test_accounts_meta_lists_root_types() {
        let meta = accounts_meta();
        let root_type = meta
            .iter()
            .find(|f| f.fieldname == "root_type")
            .expect("root_type field");
        let options = root_type.options.as_deref().unwrap_or_default();
        for rt in RootType::ALL {
            assert!(options.lines().any(|l| l == rt.as_str()));
        }
    }
}
