//! Property-based tests for chart submission gates.

use proptest::prelude::*;

use super::demo::demo_accounts;
use super::error::ChartError;
use super::types::{Account, REQUIRED_GROUP_TYPES, REQUIRED_LEDGER_TYPES, RootType};
use super::validation::{validate_account_types, validate_chart, validate_roots};

fn root(index: usize, root_type: Option<String>) -> Account {
    Account {
        name: format!("Root {index} - AC"),
        account_name: format!("Root {index}"),
        account_number: None,
        company: "Acme".to_string(),
        parent_account: None,
        root_type,
        account_type: None,
        is_group: true,
        lft: 0,
        rgt: 0,
        account_currency: None,
    }
}

fn known_root_type() -> impl Strategy<Value = String> {
    prop::sample::select(RootType::ALL.to_vec()).prop_map(|t| t.as_str().to_string())
}

fn unknown_root_type() -> impl Strategy<Value = String> {
    "[A-Za-z ]{1,12}".prop_filter("must not be a known root type", |s| {
        s.parse::<RootType>().is_err() && !s.is_empty()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Fewer than four roots always fails, whatever their root types.
    #[test]
    fn prop_too_few_roots_rejected(types in prop::collection::vec(known_root_type(), 0..4)) {
        let accounts: Vec<Account> = types
            .into_iter()
            .enumerate()
            .map(|(i, t)| root(i, Some(t)))
            .collect();

        let is_too_few = matches!(validate_roots(&accounts), Err(ChartError::TooFewRoots { .. }));
        prop_assert!(is_too_few);
    }

    /// Four or more roots with known types pass the root gate.
    #[test]
    fn prop_known_root_types_accepted(types in prop::collection::vec(known_root_type(), 4..10)) {
        let accounts: Vec<Account> = types
            .into_iter()
            .enumerate()
            .map(|(i, t)| root(i, Some(t)))
            .collect();

        prop_assert!(validate_roots(&accounts).is_ok());
    }

    /// Any root with a type outside the five known values fails.
    #[test]
    fn prop_unknown_root_type_rejected(
        types in prop::collection::vec(known_root_type(), 4..8),
        bad in unknown_root_type(),
        position in any::<prop::sample::Index>(),
    ) {
        let mut accounts: Vec<Account> = types
            .into_iter()
            .enumerate()
            .map(|(i, t)| root(i, Some(t)))
            .collect();
        let target = position.index(accounts.len());
        accounts[target].root_type = Some(bad.clone());

        match validate_roots(&accounts) {
            Err(ChartError::InvalidRootType { account, root_type }) => {
                prop_assert_eq!(account, format!("Root {target}"));
                prop_assert_eq!(root_type, bad);
            }
            other => prop_assert!(false, "expected InvalidRootType, got {:?}", other),
        }
    }

    /// Removing every ledger of one required type fails; restoring it passes.
    #[test]
    fn prop_each_required_ledger_type_is_needed(index in 0..REQUIRED_LEDGER_TYPES.len()) {
        let missing = REQUIRED_LEDGER_TYPES[index];
        let full = demo_accounts("Acme", "AC");
        let mut accounts = full.clone();
        for account in accounts.iter_mut().filter(|a| a.account_type == Some(missing) && !a.is_group) {
            account.account_type = None;
        }

        let is_missing = matches!(
            validate_account_types(&accounts),
            Err(ChartError::MissingLedgerAccount(t)) if t == missing
        );
        prop_assert!(is_missing);
        prop_assert!(validate_chart(&full).is_ok());
    }

    /// A required group type present only on ledgers does not count.
    #[test]
    fn prop_each_required_group_type_is_needed(index in 0..REQUIRED_GROUP_TYPES.len()) {
        let missing = REQUIRED_GROUP_TYPES[index];
        let mut accounts = demo_accounts("Acme", "AC");
        for account in accounts.iter_mut().filter(|a| a.account_type == Some(missing) && a.is_group) {
            account.account_type = None;
        }

        let is_missing = matches!(
            validate_account_types(&accounts),
            Err(ChartError::MissingGroupAccount(t)) if t == missing
        );
        prop_assert!(is_missing);
    }
}
