//! A small but complete chart that passes submission validation.
//!
//! Used by the seeder for demo data and by tests as a known-good baseline.

use super::naming::account_document_name;
use super::tree::reindex;
use super::types::{Account, AccountType};

struct Node {
    account_name: &'static str,
    number: Option<&'static str>,
    account_type: Option<AccountType>,
    is_group: bool,
    children: Vec<Node>,
}

const fn ledger(account_name: &'static str, number: &'static str, account_type: Option<AccountType>) -> Node {
    Node {
        account_name,
        number: Some(number),
        account_type,
        is_group: false,
        children: Vec::new(),
    }
}

fn group(account_name: &'static str, account_type: Option<AccountType>, children: Vec<Node>) -> Node {
    Node {
        account_name,
        number: None,
        account_type,
        is_group: true,
        children,
    }
}

fn roots() -> Vec<(&'static str, Node)> {
    use AccountType as T;

    vec![
        (
            "Asset",
            group(
                "Application of Funds (Assets)",
                None,
                vec![
                    group(
                        "Current Assets",
                        None,
                        vec![
                            group("Bank Accounts", Some(T::Bank), vec![]),
                            group("Cash In Hand", Some(T::Cash), vec![ledger("Cash", "1110", Some(T::Cash))]),
                            group("Stock Assets", Some(T::Stock), vec![ledger("Stores", "1410", Some(T::Stock))]),
                            group(
                                "Accounts Receivable",
                                None,
                                vec![ledger("Debtors", "1310", Some(T::Receivable))],
                            ),
                        ],
                    ),
                    group(
                        "Fixed Assets",
                        None,
                        vec![
                            ledger("Furniture and Fixtures", "1710", Some(T::FixedAsset)),
                            ledger("Accumulated Depreciation", "1790", Some(T::AccumulatedDepreciation)),
                        ],
                    ),
                ],
            ),
        ),
        (
            "Liability",
            group(
                "Source of Funds (Liabilities)",
                None,
                vec![group(
                    "Current Liabilities",
                    None,
                    vec![ledger("Creditors", "2110", Some(T::Payable))],
                )],
            ),
        ),
        (
            "Equity",
            group("Equity", None, vec![ledger("Capital Stock", "3100", Some(T::Equity))]),
        ),
        (
            "Income",
            group(
                "Income",
                None,
                vec![ledger("Sales", "4110", Some(T::IncomeAccount))],
            ),
        ),
        (
            "Expense",
            group(
                "Expenses",
                None,
                vec![
                    group(
                        "Direct Expenses",
                        None,
                        vec![
                            ledger("Cost of Goods Sold", "5111", Some(T::CostOfGoodsSold)),
                            ledger("Stock Adjustment", "5118", Some(T::StockAdjustment)),
                        ],
                    ),
                    group(
                        "Indirect Expenses",
                        None,
                        vec![
                            ledger("Depreciation", "5210", Some(T::Depreciation)),
                            ledger("Round Off", "5290", Some(T::RoundOff)),
                        ],
                    ),
                ],
            ),
        ),
    ]
}

fn flatten(node: &Node, parent: Option<&str>, root_type: &str, company: &str, abbr: &str, out: &mut Vec<Account>) {
    let name = account_document_name(node.number, node.account_name, abbr);
    out.push(Account {
        name: name.clone(),
        account_name: node.account_name.to_string(),
        account_number: node.number.map(str::to_string),
        company: company.to_string(),
        parent_account: parent.map(str::to_string),
        root_type: Some(root_type.to_string()),
        account_type: node.account_type,
        is_group: node.is_group,
        lft: 0,
        rgt: 0,
        account_currency: None,
    });
    for child in &node.children {
        flatten(child, Some(&name), root_type, company, abbr, out);
    }
}

/// Builds the demo chart for `company`, with nested-set indexes filled in.
#[must_use]
pub fn demo_accounts(company: &str, abbr: &str) -> Vec<Account> {
    let mut accounts = Vec::new();
    for (root_type, root) in roots() {
        flatten(&root, None, root_type, company, abbr, &mut accounts);
    }
    reindex(&mut accounts);
    accounts
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_accounts_have_unique_names_and_indexes() {
        let accounts = demo_accounts("Acme", "AC");
        let mut names: Vec<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), accounts.len());
        assert!(accounts.iter().all(|a| a.lft > 0 && a.lft < a.rgt));
        assert_eq!(accounts.iter().filter(|a| a.is_root()).count(), 5);
    }
}
