//! Chart error types.

use coa_shared::AppError;
use thiserror::Error;

use super::types::AccountType;

/// Errors that can occur while editing, validating or exporting a chart.
#[derive(Debug, Error)]
pub enum ChartError {
    // ========== Submission Errors ==========
    /// Fewer root accounts than a chart needs.
    #[error("Number of root accounts cannot be less than 4")]
    TooFewRoots {
        /// Number of roots found.
        count: usize,
    },

    /// A root account has no root type.
    #[error("Please enter Root Type for {0}")]
    MissingRootType(String),

    /// A root account's root type is not one of the known values.
    #[error("Root Type for {account} must be one of the Asset, Liability, Income, Expense and Equity, got {root_type}")]
    InvalidRootType {
        /// Offending account.
        account: String,
        /// Root type as entered.
        root_type: String,
    },

    /// No ledger account of a required type.
    #[error("Please identify / create {0} Account (Ledger)")]
    MissingLedgerAccount(AccountType),

    /// No group account of a required type.
    #[error("Please identify / create {0} Account (Group)")]
    MissingGroupAccount(AccountType),

    /// Chart name is blank or cannot be used as an export file name.
    #[error("Invalid Chart of Accounts name: {0:?}")]
    InvalidChartName(String),

    /// Another company already uses the requested chart name.
    #[error("Another Chart of Accounts with the same name already exists: {0}")]
    DuplicateChartName(String),

    // ========== Account Errors ==========
    /// Record-level validation failed for an account.
    #[error("Account {account}: {reason}")]
    InvalidAccount {
        /// Offending account.
        account: String,
        /// What is wrong with it.
        reason: String,
    },

    /// Setting the parent would create a cycle.
    #[error("Account {0} cannot be its own ancestor")]
    TreeLoop(String),

    /// Account number already used in the company.
    #[error("Account Number {number} already used in account {account}")]
    DuplicateAccountNumber {
        /// The number in question.
        number: String,
        /// Account already holding it.
        account: String,
    },

    /// An account with the same document name exists.
    #[error("Account {0} already exists")]
    DuplicateAccount(String),

    /// Non-root account saved without a parent.
    #[error("Parent Account is mandatory for {0}")]
    ParentRequired(String),

    /// Deleting (or ungrouping) an account that still has children.
    #[error("Child account exists for this account. You can not delete this account.")]
    ChildAccountsExist(String),

    /// Unknown account type string.
    #[error("Invalid account type: {0}")]
    InvalidAccountType(String),

    // ========== Lookup Errors ==========
    /// Company does not exist.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// Account does not exist.
    #[error("Account not found: {0}")]
    AccountNotFound(String),

    /// Country does not exist.
    #[error("Country not found: {0}")]
    CountryNotFound(String),

    /// Nothing to export.
    #[error("No submitted charts match the given filters")]
    NoSubmittedCharts,

    /// Every generated company abbreviation clashed with existing accounts.
    #[error("No free company abbreviation found after {0} attempts")]
    NoFreeAbbreviation(usize),

    // ========== Lower-level Errors ==========
    /// Filesystem failure during export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization failure.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Storage backend failure.
    #[error("Repository error: {0}")]
    Repository(String),
}

impl ChartError {
    /// Creates an invalid-account error.
    pub fn invalid(account: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAccount {
            account: account.into(),
            reason: reason.into(),
        }
    }

    /// Returns true for errors that reject a submission or an edit.
    #[must_use]
    pub const fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::TooFewRoots { .. }
                | Self::MissingRootType(_)
                | Self::InvalidRootType { .. }
                | Self::MissingLedgerAccount(_)
                | Self::MissingGroupAccount(_)
                | Self::InvalidAccount { .. }
                | Self::TreeLoop(_)
                | Self::ParentRequired(_)
                | Self::ChildAccountsExist(_)
                | Self::InvalidAccountType(_)
                | Self::InvalidChartName(_)
        )
    }
}

impl From<ChartError> for AppError {
    fn from(err: ChartError) -> Self {
        let message = err.to_string();
        match err {
            ChartError::DuplicateChartName(_)
            | ChartError::DuplicateAccountNumber { .. }
            | ChartError::DuplicateAccount(_) => Self::Conflict(message),
            ChartError::CompanyNotFound(_)
            | ChartError::AccountNotFound(_)
            | ChartError::CountryNotFound(_)
            | ChartError::NoSubmittedCharts => Self::NotFound(message),
            ChartError::Io(_) | ChartError::Serialization(_) => Self::Export(message),
            ChartError::Repository(_) => Self::Database(message),
            e if e.is_validation() => Self::Validation(message),
            _ => Self::Internal(message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_messages() {
        assert_eq!(
            ChartError::TooFewRoots { count: 3 }.to_string(),
            "Number of root accounts cannot be less than 4"
        );
        assert_eq!(
            ChartError::MissingLedgerAccount(AccountType::CostOfGoodsSold).to_string(),
            "Please identify / create Cost of Goods Sold Account (Ledger)"
        );
        assert_eq!(
            ChartError::MissingGroupAccount(AccountType::Bank).to_string(),
            "Please identify / create Bank Account (Group)"
        );
        assert_eq!(
            ChartError::MissingRootType("Assets - AC".into()).to_string(),
            "Please enter Root Type for Assets - AC"
        );
    }

    #[rstest]
    #[case(ChartError::TooFewRoots { count: 1 }, 400)]
    #[case(ChartError::ChildAccountsExist("x".into()), 400)]
    #[case(ChartError::InvalidChartName("../x".into()), 400)]
    #[case(ChartError::DuplicateChartName("x".into()), 409)]
    #[case(ChartError::DuplicateAccountNumber { number: "1".into(), account: "x".into() }, 409)]
    #[case(ChartError::CompanyNotFound("x".into()), 404)]
    #[case(ChartError::NoSubmittedCharts, 404)]
    #[case(ChartError::Repository("down".into()), 500)]
    #[case(ChartError::Io(std::io::Error::other("disk")), 500)]
    fn test_app_error_status(#[case] err: ChartError, #[case] status: u16) {
        assert_eq!(AppError::from(err).status_code(), status);
    }
}
