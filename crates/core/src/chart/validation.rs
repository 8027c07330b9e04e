//! Chart validation rules.
//!
//! Submission runs four fail-fast gates in order: root accounts, required
//! account types, record-level validation of every non-root account in tree
//! order, and (in the service) chart name uniqueness. Edits to a draft chart
//! only run the structural subset of the record rules.

use std::str::FromStr;

use super::error::ChartError;
use super::tree::{creates_loop, has_children, tree_order};
use super::types::{
    Account, MIN_ROOT_ACCOUNTS, REQUIRED_GROUP_TYPES, REQUIRED_LEDGER_TYPES, RootType,
    ValidationMode,
};

/// Checks root count and root types.
///
/// # Errors
///
/// Returns `TooFewRoots` when fewer than four roots exist, `MissingRootType`
/// or `InvalidRootType` naming the first offending root.
pub fn validate_roots(accounts: &[Account]) -> Result<(), ChartError> {
    let roots: Vec<&Account> = accounts.iter().filter(|a| a.is_root()).collect();
    if roots.len() < MIN_ROOT_ACCOUNTS {
        return Err(ChartError::TooFewRoots { count: roots.len() });
    }

    for root in roots {
        match root.root_type.as_deref().filter(|r| !r.is_empty()) {
            None => return Err(ChartError::MissingRootType(root.account_name.clone())),
            Some(root_type) if RootType::from_str(root_type).is_err() => {
                return Err(ChartError::InvalidRootType {
                    account: root.account_name.clone(),
                    root_type: root_type.to_string(),
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}

/// Checks that every required ledger and group account type is present.
///
/// # Errors
///
/// Returns `MissingLedgerAccount` or `MissingGroupAccount` for the first
/// type with no matching account.
pub fn validate_account_types(accounts: &[Account]) -> Result<(), ChartError> {
    for account_type in REQUIRED_LEDGER_TYPES {
        if !accounts
            .iter()
            .any(|a| a.account_type == Some(account_type) && !a.is_group)
        {
            return Err(ChartError::MissingLedgerAccount(account_type));
        }
    }

    for account_type in REQUIRED_GROUP_TYPES {
        if !accounts
            .iter()
            .any(|a| a.account_type == Some(account_type) && a.is_group)
        {
            return Err(ChartError::MissingGroupAccount(account_type));
        }
    }
    Ok(())
}

/// Runs record-level validation on every non-root account in `lft`/`rgt` order.
///
/// # Errors
///
/// Returns the first record-level failure.
pub fn validate_accounts(accounts: &[Account]) -> Result<(), ChartError> {
    tree_order(accounts)
        .into_iter()
        .filter(|a| !a.is_root())
        .try_for_each(|account| validate_account(account, accounts, ValidationMode::Full))
}

/// Runs the submission gates that only depend on the account tree.
///
/// # Errors
///
/// Returns the first failing gate's error.
pub fn validate_chart(accounts: &[Account]) -> Result<(), ChartError> {
    validate_roots(accounts)?;
    validate_account_types(accounts)?;
    validate_accounts(accounts)
}

/// Validates one account against the rest of its company's chart.
///
/// `others` may include `account` itself (by name); it is ignored where a
/// rule compares against siblings.
///
/// # Errors
///
/// Structural failures (self parent, missing parent, loops, a ledger with
/// children) are reported in every mode. `Full` also checks that the parent
/// is a group, root types agree, roots are groups with a known root type,
/// and the account number is unique in the company.
pub fn validate_account(
    account: &Account,
    others: &[Account],
    mode: ValidationMode,
) -> Result<(), ChartError> {
    let parent = match account.parent() {
        Some(parent_name) => {
            if parent_name == account.name {
                return Err(ChartError::invalid(
                    &account.name,
                    "You cannot assign itself as parent account",
                ));
            }
            let parent = others
                .iter()
                .find(|a| a.name == parent_name && a.company == account.company)
                .ok_or_else(|| {
                    ChartError::invalid(
                        &account.name,
                        format!("Parent account {parent_name} does not exist"),
                    )
                })?;
            if creates_loop(others, &account.name, parent_name) {
                return Err(ChartError::TreeLoop(account.name.clone()));
            }
            Some(parent)
        }
        None => None,
    };

    if !account.is_group && has_children(others, &account.name) {
        return Err(ChartError::invalid(
            &account.name,
            "Account with child nodes cannot be set as ledger",
        ));
    }

    if mode == ValidationMode::Unverified {
        return Ok(());
    }

    match parent {
        Some(parent) => {
            if !parent.is_group {
                return Err(ChartError::invalid(
                    &account.name,
                    format!("Parent account {} can not be a ledger", parent.name),
                ));
            }
            if let (Some(own), Some(inherited)) = (
                account.root_type.as_deref().filter(|r| !r.is_empty()),
                parent.root_type.as_deref().filter(|r| !r.is_empty()),
            ) && own != inherited
            {
                return Err(ChartError::invalid(
                    &account.name,
                    format!("Root Type must be {inherited}, same as parent account"),
                ));
            }
        }
        None => {
            if !account.is_group {
                return Err(ChartError::invalid(&account.name, "Root Account must be a group"));
            }
            match account.root_type.as_deref().filter(|r| !r.is_empty()) {
                None => return Err(ChartError::MissingRootType(account.account_name.clone())),
                Some(root_type) if RootType::from_str(root_type).is_err() => {
                    return Err(ChartError::InvalidRootType {
                        account: account.account_name.clone(),
                        root_type: root_type.to_string(),
                    });
                }
                Some(_) => {}
            }
        }
    }

    validate_account_number(account, others)
}

/// Rejects an account number already used by another account in the company.
///
/// # Errors
///
/// Returns `DuplicateAccountNumber` naming the account already holding it.
pub fn validate_account_number(account: &Account, others: &[Account]) -> Result<(), ChartError> {
    let Some(number) = account.account_number.as_deref().filter(|n| !n.is_empty()) else {
        return Ok(());
    };

    match others.iter().find(|a| {
        a.name != account.name
            && a.company == account.company
            && a.account_number.as_deref() == Some(number)
    }) {
        Some(existing) => Err(ChartError::DuplicateAccountNumber {
            number: number.to_string(),
            account: existing.name.clone(),
        }),
        None => Ok(()),
    }
}
