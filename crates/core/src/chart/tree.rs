//! Account hierarchy helpers: nested-set indexing, loop detection and the
//! exported tree representation.

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::types::{Account, TreeIndex};

/// Groups account names by parent. Roots (and orphans) sit under `None`.
/// Children are sorted by name.
fn children_by_parent(accounts: &[Account]) -> HashMap<Option<&str>, Vec<&Account>> {
    let known: HashSet<&str> = accounts.iter().map(|a| a.name.as_str()).collect();
    let mut map: HashMap<Option<&str>, Vec<&Account>> = HashMap::new();

    for account in accounts {
        let parent = account.parent().filter(|p| known.contains(p));
        map.entry(parent).or_default().push(account);
    }
    for children in map.values_mut() {
        children.sort_by(|a, b| a.name.cmp(&b.name));
    }
    map
}

/// Computes nested-set indexes for a company's accounts.
///
/// Roots and siblings are visited in name order; `lft` is assigned on entry
/// and `rgt` on exit, starting at 1. Accounts caught in a parent loop are
/// unreachable from any root and get no index.
#[must_use]
pub fn nested_set_indexes(accounts: &[Account]) -> Vec<TreeIndex<'_>> {
    let children = children_by_parent(accounts);
    let mut out = Vec::with_capacity(accounts.len());
    let mut counter = 0;

    // Iterative DFS: (account, entered?)
    let mut stack: Vec<(&Account, Option<i32>)> = children
        .get(&None)
        .map(|roots| roots.iter().rev().map(|a| (*a, None)).collect())
        .unwrap_or_default();

    while let Some((account, lft)) = stack.pop() {
        counter += 1;
        match lft {
            Some(lft) => out.push(TreeIndex {
                name: &account.name,
                lft,
                rgt: counter,
            }),
            None => {
                stack.push((account, Some(counter)));
                if let Some(kids) = children.get(&Some(account.name.as_str())) {
                    stack.extend(kids.iter().rev().map(|a| (*a, None)));
                }
            }
        }
    }

    out
}

/// Applies freshly computed indexes and returns the ones that changed.
pub fn reindex(accounts: &mut [Account]) -> Vec<(String, i32, i32)> {
    let indexes: HashMap<String, (i32, i32)> = nested_set_indexes(accounts)
        .into_iter()
        .map(|idx| (idx.name.to_string(), (idx.lft, idx.rgt)))
        .collect();

    let mut changed = Vec::new();
    for account in accounts.iter_mut() {
        if let Some(&(lft, rgt)) = indexes.get(&account.name)
            && (account.lft, account.rgt) != (lft, rgt)
        {
            account.lft = lft;
            account.rgt = rgt;
            changed.push((account.name.clone(), lft, rgt));
        }
    }
    changed
}

/// Returns accounts ordered by `lft` then `rgt`.
#[must_use]
pub fn tree_order(accounts: &[Account]) -> Vec<&Account> {
    let mut ordered: Vec<&Account> = accounts.iter().collect();
    ordered.sort_by_key(|a| (a.lft, a.rgt));
    ordered
}

/// Returns true when `account` has at least one child in `accounts`.
#[must_use]
pub fn has_children(accounts: &[Account], account: &str) -> bool {
    accounts.iter().any(|a| a.parent() == Some(account))
}

/// Returns true if making `parent` the parent of `account` would close a loop.
#[must_use]
pub fn creates_loop(accounts: &[Account], account: &str, parent: &str) -> bool {
    let by_name: HashMap<&str, &Account> =
        accounts.iter().map(|a| (a.name.as_str(), a)).collect();

    let mut seen = HashSet::new();
    let mut current = Some(parent);
    while let Some(name) = current {
        if name == account || !seen.insert(name) {
            return true;
        }
        current = by_name.get(name).and_then(|a| a.parent());
    }
    false
}

/// Builds the nested tree used in exported charts.
///
/// Nodes are keyed by `account_name` and carry `account_number`,
/// `account_type`, `account_currency` when set, `root_type` on roots, and
/// `is_group: 1` on groups without children.
#[must_use]
pub fn build_account_tree(accounts: &[Account]) -> Value {
    let children = children_by_parent(accounts);
    let mut tree = Map::new();
    build_level(&mut tree, None, &children);
    Value::Object(tree)
}

fn build_level(
    node: &mut Map<String, Value>,
    parent: Option<&Account>,
    children: &HashMap<Option<&str>, Vec<&Account>>,
) {
    let kids = children
        .get(&parent.map(|p| p.name.as_str()))
        .map(Vec::as_slice)
        .unwrap_or_default();

    if kids.is_empty() && parent.is_some_and(|p| p.is_group) {
        node.insert("is_group".to_string(), Value::from(1));
    }

    for child in kids {
        let mut entry = Map::new();
        if let Some(number) = child.account_number.as_deref().filter(|n| !n.is_empty()) {
            entry.insert("account_number".to_string(), Value::from(number));
        }
        if let Some(account_type) = child.account_type {
            entry.insert("account_type".to_string(), Value::from(account_type.as_str()));
        }
        if parent.is_none()
            && let Some(root_type) = child.root_type.as_deref().filter(|r| !r.is_empty())
        {
            entry.insert("root_type".to_string(), Value::from(root_type));
        }
        if let Some(currency) = child.account_currency.as_deref().filter(|c| !c.is_empty()) {
            entry.insert("account_currency".to_string(), Value::from(currency));
        }
        build_level(&mut entry, Some(child), children);
        node.insert(child.account_name.clone(), Value::Object(entry));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::AccountType;
    use proptest::prelude::*;

    fn account(name: &str, parent: Option<&str>, is_group: bool) -> Account {
        Account {
            name: name.to_string(),
            account_name: name.to_string(),
            account_number: None,
            company: "Acme".to_string(),
            parent_account: parent.map(str::to_string),
            root_type: None,
            account_type: None,
            is_group,
            lft: 0,
            rgt: 0,
            account_currency: None,
        }
    }

    #[test]
    fn test_nested_set_orders_siblings_by_name() {
        let accounts = vec![
            account("B", None, true),
            account("A", None, true),
            account("A2", Some("A"), false),
            account("A1", Some("A"), false),
        ];
        let idx: HashMap<&str, (i32, i32)> = nested_set_indexes(&accounts)
            .into_iter()
            .map(|i| (i.name, (i.lft, i.rgt)))
            .collect();

        assert_eq!(idx["A"], (1, 6));
        assert_eq!(idx["A1"], (2, 3));
        assert_eq!(idx["A2"], (4, 5));
        assert_eq!(idx["B"], (7, 8));
    }

    #[test]
    fn test_reindex_reports_only_changes() {
        let mut accounts = vec![account("A", None, true), account("A1", Some("A"), false)];
        assert_eq!(reindex(&mut accounts).len(), 2);
        assert!(reindex(&mut accounts).is_empty());
        assert_eq!((accounts[0].lft, accounts[0].rgt), (1, 4));
    }

    #[test]
    fn test_creates_loop() {
        let accounts = vec![
            account("A", None, true),
            account("B", Some("A"), true),
            account("C", Some("B"), true),
        ];
        assert!(creates_loop(&accounts, "A", "C"));
        assert!(creates_loop(&accounts, "B", "B"));
        assert!(!creates_loop(&accounts, "C", "A"));
    }

    #[test]
    fn test_build_account_tree_shape() {
        let mut assets = account("Assets - AC", None, true);
        assets.account_name = "Assets".into();
        assets.root_type = Some("Asset".into());
        let mut bank = account("Bank - AC", Some("Assets - AC"), true);
        bank.account_name = "Bank".into();
        bank.account_type = Some(AccountType::Bank);
        let mut cash = account("1100 - Cash - AC", Some("Assets - AC"), false);
        cash.account_name = "Cash".into();
        cash.account_number = Some("1100".into());
        cash.root_type = Some("Asset".into());

        let tree = build_account_tree(&[assets, bank, cash]);

        assert_eq!(tree["Assets"]["root_type"], "Asset");
        assert_eq!(tree["Assets"]["Bank"]["account_type"], "Bank");
        assert_eq!(tree["Assets"]["Bank"]["is_group"], 1);
        assert_eq!(tree["Assets"]["Cash"]["account_number"], "1100");
        assert!(tree["Assets"]["Cash"].get("root_type").is_none());
        assert!(tree["Assets"]["Cash"].get("is_group").is_none());
        assert!(tree["Assets"].get("is_group").is_none());
    }

    fn arb_forest() -> impl Strategy<Value = Vec<Account>> {
        // Each account i picks a parent among 0..i or none.
        prop::collection::vec(prop::option::of(any::<prop::sample::Index>()), 1..40).prop_map(
            |parents| {
                parents
                    .iter()
                    .enumerate()
                    .map(|(i, p)| {
                        let parent = match p {
                            Some(idx) if i > 0 => Some(format!("acc-{:03}", idx.index(i))),
                            _ => None,
                        };
                        account(&format!("acc-{i:03}"), parent.as_deref(), true)
                    })
                    .collect()
            },
        )
    }

    proptest! {
        #[test]
        fn prop_children_nest_inside_parents(accounts in arb_forest()) {
            let idx: HashMap<&str, (i32, i32)> = nested_set_indexes(&accounts)
                .into_iter()
                .map(|i| (i.name, (i.lft, i.rgt)))
                .collect();

            prop_assert_eq!(idx.len(), accounts.len());
            for account in &accounts {
                let (lft, rgt) = idx[account.name.as_str()];
                prop_assert!(lft < rgt);
                if let Some(parent) = account.parent() {
                    let (plft, prgt) = idx[parent];
                    prop_assert!(plft < lft && rgt < prgt);
                }
            }
            let max = idx.values().map(|(_, r)| *r).max().unwrap_or(0);
            prop_assert_eq!(usize::try_from(max).unwrap_or(0), accounts.len() * 2);
        }
    }
}
