//! Service tests against the in-memory backend.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use coa_shared::UserId;

use super::demo::demo_accounts;
use super::error::ChartError;
use super::export::ChartExporter;
use super::memory::MemoryBackend;
use super::service::ChartService;
use super::session::{ChartSession, MokaStateStore};
use super::store::{AccountStore, CompanyStore};
use super::types::{
    Account, AccountType, AddAccountInput, Company, CompanyFilter, UpdateAccountInput,
};

struct Fixture {
    service: ChartService<MemoryBackend>,
    backend: MemoryBackend,
    site: tempfile::TempDir,
}

fn company(name: &str, abbr: &str) -> Company {
    Company {
        name: name.to_string(),
        company_name: name.to_string(),
        abbr: abbr.to_string(),
        country: "India".to_string(),
        default_currency: "INR".to_string(),
        chart_of_accounts: None,
        chart_of_accounts_name: None,
        submitted: false,
        forked: true,
        forked_from: None,
        stars: 0,
        stars_given_by: Vec::new(),
        domain: None,
        included_in_erpnext: false,
    }
}

async fn fixture() -> Fixture {
    let backend = MemoryBackend::new();
    backend.add_country("India", "in");
    backend.add_country("Germany", "de");
    backend.add_domain("Retail");
    backend.add_domain("Manufacturing");

    CompanyStore::insert(&backend, &company("Acme", "AC"))
        .await
        .expect("insert company");
    AccountStore::insert_many(&backend, &demo_accounts("Acme", "AC"))
        .await
        .expect("insert accounts");

    let site = tempfile::tempdir().expect("tempdir");
    let service = ChartService::new(
        backend.clone(),
        ChartSession::new(Arc::new(MokaStateStore::new())),
        ChartExporter::new(site.path()),
    );
    Fixture {
        service,
        backend,
        site,
    }
}

fn user() -> UserId {
    UserId::new("ana@example.com")
}

async fn accounts(backend: &MemoryBackend, company: &str) -> Vec<Account> {
    AccountStore::list_by_company(backend, company)
        .await
        .expect("list accounts")
}

async fn load_company(backend: &MemoryBackend, name: &str) -> Company {
    CompanyStore::find(backend, name)
        .await
        .expect("find company")
        .expect("company exists")
}

async fn account_named(backend: &MemoryBackend, company: &str, account_name: &str) -> Account {
    accounts(backend, company)
        .await
        .into_iter()
        .find(|a| a.account_name == account_name)
        .expect("account exists")
}

// ========== Submission ==========

#[tokio::test]
async fn test_submit_valid_chart() {
    let f = fixture().await;

    let submitted = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", Some("Retail".into()))
        .await
        .expect("submit succeeds");

    assert!(submitted.submitted);
    let stored = load_company(&f.backend, "Acme").await;
    assert!(stored.submitted);
    assert_eq!(stored.chart_of_accounts_name.as_deref(), Some("Acme Standard"));
    assert_eq!(stored.domain.as_deref(), Some("Retail"));
}

#[tokio::test]
async fn test_submit_with_three_roots_fails_without_writing() {
    let f = fixture().await;
    for account in accounts(&f.backend, "Acme").await {
        if matches!(account.root_type.as_deref(), Some("Income" | "Equity")) {
            AccountStore::delete(&f.backend, &account.name)
                .await
                .expect("delete");
        }
    }

    let err = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect_err("too few roots");

    assert!(err.to_string().contains("root accounts"));
    let stored = load_company(&f.backend, "Acme").await;
    assert!(!stored.submitted);
    assert_eq!(stored.chart_of_accounts_name, None);
}

async fn assert_not_submitted(backend: &MemoryBackend) {
    let stored = load_company(backend, "Acme").await;
    assert!(!stored.submitted);
    assert_eq!(stored.chart_of_accounts_name, None);
}

#[tokio::test]
async fn test_submit_rejects_ledger_used_as_parent() {
    let f = fixture().await;
    let depreciation = account_named(&f.backend, "Acme", "Depreciation").await;
    let mut round_off = account_named(&f.backend, "Acme", "Round Off").await;
    round_off.parent_account = Some(depreciation.name.clone());
    AccountStore::save(&f.backend, &round_off).await.expect("save");

    let err = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect_err("ledger parent");

    assert!(matches!(err, ChartError::InvalidAccount { .. }), "{err:?}");
    assert_not_submitted(&f.backend).await;
}

#[tokio::test]
async fn test_submit_rejects_root_type_mismatch_below_root() {
    let f = fixture().await;
    let mut round_off = account_named(&f.backend, "Acme", "Round Off").await;
    round_off.root_type = Some("Income".to_string());
    AccountStore::save(&f.backend, &round_off).await.expect("save");

    let err = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect_err("root type mismatch");

    match err {
        ChartError::InvalidAccount { account, .. } => assert_eq!(account, round_off.name),
        other => panic!("expected InvalidAccount, got {other:?}"),
    }
    assert_not_submitted(&f.backend).await;
}

#[tokio::test]
async fn test_submit_rejects_unusable_chart_names() {
    let f = fixture().await;

    for name in ["../../../escaped", "India/Basic", "   "] {
        let err = f
            .service
            .submit_chart(&user(), "Acme", name, None)
            .await
            .expect_err("bad name");
        assert!(matches!(err, ChartError::InvalidChartName(_)), "{name:?}: {err:?}");
    }
    assert_not_submitted(&f.backend).await;

    let submitted = f
        .service
        .submit_chart(&user(), "Acme", "  Acme Standard ", None)
        .await
        .expect("trimmed name accepted");
    assert_eq!(submitted.chart_of_accounts_name.as_deref(), Some("Acme Standard"));
}

#[tokio::test]
async fn test_missing_ledger_type_then_fixed() {
    let f = fixture().await;
    let depreciation = account_named(&f.backend, "Acme", "Depreciation").await;
    AccountStore::delete(&f.backend, &depreciation.name)
        .await
        .expect("delete");

    let err = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect_err("missing depreciation");
    assert!(matches!(
        err,
        ChartError::MissingLedgerAccount(AccountType::Depreciation)
    ));

    let parent = account_named(&f.backend, "Acme", "Indirect Expenses").await;
    f.service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Depreciation".into(),
                parent_account: Some(parent.name),
                account_type: Some("Depreciation".into()),
                ..AddAccountInput::default()
            },
        )
        .await
        .expect("add depreciation");

    f.service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect("submit after fix");
}

#[tokio::test]
async fn test_missing_group_type_fails() {
    let f = fixture().await;
    let bank = account_named(&f.backend, "Acme", "Bank Accounts").await;
    f.service
        .update_account(
            &user(),
            UpdateAccountInput {
                name: bank.name,
                company: "Acme".into(),
                account_type: None,
                is_group: true,
                ..UpdateAccountInput::default()
            },
        )
        .await
        .expect("clear account type");

    let err = f
        .service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect_err("missing bank group");
    assert_eq!(err.to_string(), "Please identify / create Bank Account (Group)");
}

#[tokio::test]
async fn test_duplicate_chart_name_rejected_for_second_company() {
    let f = fixture().await;
    let fork = f.service.fork("Acme").await.expect("fork");

    f.service
        .submit_chart(&user(), "Acme", "Shared Name", None)
        .await
        .expect("first submit");
    let err = f
        .service
        .submit_chart(&user(), &fork, "Shared Name", None)
        .await
        .expect_err("duplicate name");

    assert!(matches!(err, ChartError::DuplicateChartName(_)));
    assert!(!load_company(&f.backend, &fork).await.submitted);

    // Resubmitting the same company under its own name is fine.
    f.service
        .submit_chart(&user(), "Acme", "Shared Name", None)
        .await
        .expect("resubmit");
}

// ========== Editing state ==========

#[tokio::test]
async fn test_disable_submitted_only_when_editing() {
    let f = fixture().await;
    let ana = user();
    f.service
        .submit_chart(&ana, "Acme", "Acme Standard", None)
        .await
        .expect("submit");
    let sales = account_named(&f.backend, "Acme", "Sales").await;

    f.service
        .rename_account(&ana, "Acme", &sales.name, "Sales Revenue", Some("4110".into()))
        .await
        .expect("rename without edit flag");
    assert!(load_company(&f.backend, "Acme").await.submitted);

    f.service.edit_chart(&ana, "Acme");
    let renamed = f
        .service
        .rename_account(&ana, "Acme", "4110 - Sales Revenue - AC", "Sales", Some("4110".into()))
        .await
        .expect("rename while editing");
    assert_eq!(renamed, "4110 - Sales - AC");
    assert!(!load_company(&f.backend, "Acme").await.submitted);

    // The flag was consumed by the first edit.
    f.service
        .submit_chart(&ana, "Acme", "Acme Standard", None)
        .await
        .expect("resubmit");
    let sales = account_named(&f.backend, "Acme", "Sales").await;
    f.service
        .delete_account(&ana, "Acme", &sales.name)
        .await
        .expect("delete");
    assert!(load_company(&f.backend, "Acme").await.submitted);
}

// ========== Accounts ==========

#[tokio::test]
async fn test_add_account_inherits_root_type_and_reindexes() {
    let f = fixture().await;
    let parent = account_named(&f.backend, "Acme", "Bank Accounts").await;

    let name = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "HDFC".into(),
                account_number: Some("1201".into()),
                parent_account: Some(parent.name.clone()),
                account_type: Some("Bank".into()),
                ..AddAccountInput::default()
            },
        )
        .await
        .expect("add account");

    assert_eq!(name, "1201 - HDFC - AC");
    let added = account_named(&f.backend, "Acme", "HDFC").await;
    let parent = account_named(&f.backend, "Acme", "Bank Accounts").await;
    assert_eq!(added.root_type.as_deref(), Some("Asset"));
    assert_eq!(added.account_type, Some(AccountType::Bank));
    assert!(parent.lft < added.lft && added.rgt < parent.rgt);
}

#[tokio::test]
async fn test_add_account_rejections() {
    let f = fixture().await;
    let cash = account_named(&f.backend, "Acme", "Cash").await;

    let under_ledger = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Petty".into(),
                parent_account: Some(cash.name.clone()),
                ..AddAccountInput::default()
            },
        )
        .await;
    assert!(matches!(under_ledger, Err(ChartError::InvalidAccount { .. })));

    let no_parent = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Loose".into(),
                ..AddAccountInput::default()
            },
        )
        .await;
    assert!(matches!(no_parent, Err(ChartError::ParentRequired(_))));

    let root_without_type = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Suspense".into(),
                is_root: true,
                is_group: true,
                ..AddAccountInput::default()
            },
        )
        .await;
    assert!(matches!(root_without_type, Err(ChartError::MissingRootType(_))));

    let parent = account_named(&f.backend, "Acme", "Cash In Hand").await;
    let duplicate_number = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Till".into(),
                account_number: cash.account_number.clone(),
                parent_account: Some(parent.name),
                ..AddAccountInput::default()
            },
        )
        .await;
    assert!(matches!(
        duplicate_number,
        Err(ChartError::DuplicateAccountNumber { .. })
    ));

    let bad_type = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Till".into(),
                is_root: true,
                is_group: true,
                root_type: Some("Asset".into()),
                account_type: Some("Piggy Bank".into()),
                ..AddAccountInput::default()
            },
        )
        .await;
    assert!(matches!(bad_type, Err(ChartError::InvalidAccountType(_))));
}

#[tokio::test]
async fn test_add_root_account() {
    let f = fixture().await;
    let name = f
        .service
        .add_account(
            &user(),
            AddAccountInput {
                company: "Acme".into(),
                account_name: "Suspense".into(),
                is_root: true,
                is_group: true,
                root_type: Some("Liability".into()),
                ..AddAccountInput::default()
            },
        )
        .await
        .expect("add root");

    let root = account_named(&f.backend, "Acme", "Suspense").await;
    assert_eq!(root.name, name);
    assert!(root.is_root());
    assert_eq!(root.root_type.as_deref(), Some("Liability"));
}

#[tokio::test]
async fn test_update_account_rules() {
    let f = fixture().await;
    let cash_group = account_named(&f.backend, "Acme", "Cash In Hand").await;

    let to_ledger = f
        .service
        .update_account(
            &user(),
            UpdateAccountInput {
                name: cash_group.name.clone(),
                company: "Acme".into(),
                account_type: Some("Cash".into()),
                is_group: false,
                ..UpdateAccountInput::default()
            },
        )
        .await;
    assert!(to_ledger.is_err());

    let detach = f
        .service
        .update_account(
            &user(),
            UpdateAccountInput {
                name: cash_group.name.clone(),
                company: "Acme".into(),
                parent_account: Some(String::new()),
                account_type: Some("Cash".into()),
                is_group: true,
                ..UpdateAccountInput::default()
            },
        )
        .await;
    assert!(matches!(detach, Err(ChartError::ParentRequired(_))));

    let updated = f
        .service
        .update_account(
            &user(),
            UpdateAccountInput {
                name: cash_group.name.clone(),
                company: "Acme".into(),
                account_name: Some("Cash Boxes".into()),
                account_type: Some(String::new()),
                is_group: true,
                ..UpdateAccountInput::default()
            },
        )
        .await
        .expect("update");
    assert_eq!(updated.account_name, "Cash Boxes");
    assert_eq!(updated.account_type, None);
    assert_eq!(updated.name, cash_group.name);
}

#[tokio::test]
async fn test_rename_moves_children() {
    let f = fixture().await;
    let group = account_named(&f.backend, "Acme", "Current Liabilities").await;

    let new_name = f
        .service
        .rename_account(&user(), "Acme", &group.name, "Short Term Liabilities", Some("2100".into()))
        .await
        .expect("rename");

    assert_eq!(new_name, "2100 - Short Term Liabilities - AC");
    let creditors = account_named(&f.backend, "Acme", "Creditors").await;
    assert_eq!(creditors.parent_account.as_deref(), Some(new_name.as_str()));
    let renamed = account_named(&f.backend, "Acme", "Short Term Liabilities").await;
    assert!(renamed.lft < creditors.lft && creditors.rgt < renamed.rgt);
}

#[tokio::test]
async fn test_rename_rejects_taken_number() {
    let f = fixture().await;
    let sales = account_named(&f.backend, "Acme", "Sales").await;
    let cash = account_named(&f.backend, "Acme", "Cash").await;

    let err = f
        .service
        .rename_account(&user(), "Acme", &sales.name, "Sales", cash.account_number.clone())
        .await
        .expect_err("number taken");
    assert!(matches!(err, ChartError::DuplicateAccountNumber { .. }));
    assert_eq!(account_named(&f.backend, "Acme", "Sales").await.name, sales.name);
}

#[tokio::test]
async fn test_delete_account_with_children_rejected() {
    let f = fixture().await;
    let group = account_named(&f.backend, "Acme", "Direct Expenses").await;

    let err = f
        .service
        .delete_account(&user(), "Acme", &group.name)
        .await
        .expect_err("has children");
    assert_eq!(
        err.to_string(),
        "Child account exists for this account. You can not delete this account."
    );

    let bank = account_named(&f.backend, "Acme", "Bank Accounts").await;
    f.service
        .delete_account(&user(), "Acme", &bank.name)
        .await
        .expect("empty group deletes");
    assert!(
        accounts(&f.backend, "Acme")
            .await
            .iter()
            .all(|a| a.name != bank.name)
    );
}

// ========== Lifecycle ==========

#[tokio::test]
async fn test_fork_copies_tree_and_leaves_source() {
    let f = fixture().await;
    let before = accounts(&f.backend, "Acme").await;

    let fork = f.service.fork("Acme").await.expect("fork");
    assert_eq!(fork, "Acme-1");

    let forked = load_company(&f.backend, &fork).await;
    assert!(forked.forked);
    assert_eq!(forked.forked_from.as_deref(), Some("Acme"));
    assert_eq!(forked.abbr.len(), 3);

    let copies = accounts(&f.backend, &fork).await;
    assert_eq!(copies.len(), before.len());
    assert!(copies.iter().all(|a| a.name.ends_with(&format!(" - {}", forked.abbr))));
    assert!(copies.iter().all(|a| {
        a.parent()
            .is_none_or(|p| copies.iter().any(|c| c.name == p))
    }));
    assert_eq!(accounts(&f.backend, "Acme").await, before);

    // A fork of the fork is named after the original chart.
    let again = f.service.fork(&fork).await.expect("fork again");
    assert_eq!(again, "Acme-2");
}

#[tokio::test]
async fn test_fork_skips_abbreviations_that_clash() {
    let f = fixture().await;
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let service = f.service.with_abbr_source(Arc::new(move || {
        if counter.fetch_add(1, Ordering::SeqCst) == 0 {
            "AC".to_string()
        } else {
            "ZZ".to_string()
        }
    }));

    let fork = service.fork("Acme").await.expect("fork");

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert_eq!(load_company(&f.backend, &fork).await.abbr, "ZZ");
    assert_eq!(
        accounts(&f.backend, &fork).await.len(),
        accounts(&f.backend, "Acme").await.len()
    );
}

#[tokio::test]
async fn test_fork_leaves_nothing_when_no_abbreviation_is_free() {
    let f = fixture().await;
    let before = accounts(&f.backend, "Acme").await;
    let service = f.service.with_abbr_source(Arc::new(|| "AC".to_string()));

    let err = service.fork("Acme").await.expect_err("every abbreviation clashes");

    assert!(matches!(err, ChartError::NoFreeAbbreviation(_)), "{err:?}");
    assert!(
        CompanyStore::find(&f.backend, "Acme-1")
            .await
            .expect("find")
            .is_none()
    );
    assert_eq!(accounts(&f.backend, "Acme").await, before);
}

#[tokio::test]
async fn test_create_new_chart() {
    let f = fixture().await;

    let first = f.service.create_new_chart("Germany").await.expect("create");
    let second = f.service.create_new_chart("Germany").await.expect("create");
    assert_eq!(first, "Germany - Chart of Accounts");
    assert_eq!(second, "Germany - Chart of Accounts-1");

    let company = load_company(&f.backend, &first).await;
    assert_eq!(company.default_currency, "INR");
    assert!(company.forked);
    assert_eq!(company.chart_of_accounts, None);

    assert!(matches!(
        f.service.create_new_chart("Atlantis").await,
        Err(ChartError::CountryNotFound(_))
    ));
}

#[tokio::test]
async fn test_delete_chart_removes_accounts() {
    let f = fixture().await;
    f.service.delete_chart(&user(), "Acme").await.expect("delete");

    assert!(CompanyStore::find(&f.backend, "Acme").await.expect("find").is_none());
    assert!(accounts(&f.backend, "Acme").await.is_empty());
    assert!(matches!(
        f.service.delete_chart(&user(), "Acme").await,
        Err(ChartError::CompanyNotFound(_))
    ));
}

#[tokio::test]
async fn test_add_star_is_idempotent_per_user() {
    let f = fixture().await;

    assert_eq!(f.service.add_star(&user(), "Acme").await.expect("star"), 1);
    assert_eq!(f.service.add_star(&user(), "Acme").await.expect("star"), 1);
    assert_eq!(
        f.service
            .add_star(&UserId::new("bo@example.com"), "Acme")
            .await
            .expect("star"),
        2
    );
    assert_eq!(load_company(&f.backend, "Acme").await.stars, 2);
}

#[tokio::test]
async fn test_list_charts_orders_by_stars() {
    let f = fixture().await;
    let fork = f.service.fork("Acme").await.expect("fork");
    f.service.add_star(&user(), &fork).await.expect("star");

    let charts = f
        .service
        .list_charts(&CompanyFilter::default())
        .await
        .expect("list");
    assert_eq!(charts[0].name, fork);
    assert_eq!(charts[1].name, "Acme");

    let submitted = f
        .service
        .list_charts(&CompanyFilter {
            submitted: Some(true),
            ..CompanyFilter::default()
        })
        .await
        .expect("list");
    assert!(submitted.is_empty());
}

#[tokio::test]
async fn test_get_countries() {
    let f = fixture().await;
    assert_eq!(
        f.service.get_countries().await.expect("countries"),
        vec!["Germany".to_string(), "India".to_string()]
    );
}

#[tokio::test]
async fn test_init_details_cached_per_company() {
    let f = fixture().await;
    let ana = user();

    let details = f.service.init_details(&ana, "Acme").await.expect("details");
    assert_eq!(details.company.name, "Acme");
    assert_eq!(details.domains, vec!["Manufacturing", "Retail"]);

    // Cached copy is served even after the company changes underneath.
    CompanyStore::set_submitted(&f.backend, "Acme", true)
        .await
        .expect("set");
    assert!(!f.service.init_details(&ana, "Acme").await.expect("cached").company.submitted);

    // Another company invalidates the cache.
    let fork = f.service.fork("Acme").await.expect("fork");
    assert_eq!(
        f.service.init_details(&ana, &fork).await.expect("details").company.name,
        fork
    );
    assert!(f.service.init_details(&ana, "Acme").await.expect("reloaded").company.submitted);
}

#[tokio::test]
async fn test_submit_resets_init_details() {
    let f = fixture().await;
    let ana = user();
    f.service.init_details(&ana, "Acme").await.expect("details");

    f.service
        .submit_chart(&ana, "Acme", "Acme Standard", None)
        .await
        .expect("submit");

    let details = f.service.init_details(&ana, "Acme").await.expect("details");
    assert!(details.company.submitted);
    assert_eq!(details.company.chart_of_accounts_name.as_deref(), Some("Acme Standard"));
}

// ========== Export ==========

#[tokio::test]
async fn test_export_requires_submitted_chart() {
    let f = fixture().await;
    assert!(matches!(
        f.service.export_submitted_coa(None, None).await,
        Err(ChartError::NoSubmittedCharts)
    ));
}

#[tokio::test]
async fn test_export_writes_once_and_archives() {
    let f = fixture().await;
    f.service
        .submit_chart(&user(), "Acme", "Acme Standard", Some("Retail".into()))
        .await
        .expect("submit");

    let report = f
        .service
        .export_submitted_coa(Some("India".into()), Some("Acme".into()))
        .await
        .expect("export");
    assert_eq!(report.written, vec!["Acme Standard".to_string()]);
    assert_eq!(report.archive, report.directory.join("Acme Standard.tar.gz"));

    let path = report.directory.join("Acme Standard.json");
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
    assert_eq!(json["name"], "Acme Standard");
    assert_eq!(json["country_code"], "in");
    assert_eq!(json["domain"], "Retail");
    assert_eq!(json["tree"]["Income"]["root_type"], "Income");

    let again = f
        .service
        .export_submitted_coa(None, None)
        .await
        .expect("export all");
    assert!(again.written.is_empty());
    assert_eq!(again.skipped, vec!["Acme Standard".to_string()]);
    assert_eq!(again.archive, again.directory.join("charts.tar.gz"));

    assert!(matches!(
        f.service.export_submitted_coa(Some("Germany".into()), None).await,
        Err(ChartError::NoSubmittedCharts)
    ));
}

#[tokio::test]
async fn test_export_refuses_chart_names_outside_export_dir() {
    let f = fixture().await;
    f.service
        .submit_chart(&user(), "Acme", "Acme Standard", None)
        .await
        .expect("submit");
    // A name stored before names were checked.
    let mut stored = load_company(&f.backend, "Acme").await;
    stored.chart_of_accounts_name = Some("../../../escaped".to_string());
    CompanyStore::save(&f.backend, &stored).await.expect("save");

    let err = f
        .service
        .export_submitted_coa(None, Some("Acme".into()))
        .await
        .expect_err("unsafe name");

    assert!(matches!(err, ChartError::InvalidChartName(_)), "{err:?}");
    assert!(!f.site.path().join("escaped.json").exists());
    assert!(!ChartExporter::new(f.site.path()).dir().exists());
}
