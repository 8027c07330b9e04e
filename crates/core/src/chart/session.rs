//! Per-user ephemeral editor state.
//!
//! Two namespaces live here: the "editing" flag set by `edit_chart`, and the
//! cached editor bootstrap bundle. Neither is persisted.

use std::sync::Arc;
use std::time::Duration;

use coa_shared::UserId;
use moka::sync::Cache;
use serde_json::Value;
use tracing::warn;

use super::types::InitDetails;

/// Default cache capacity (number of entries).
const DEFAULT_CAPACITY: u64 = 10_000;

/// Default idle time before a user's state is dropped (1 day).
const DEFAULT_IDLE_SECS: u64 = 86_400;

/// State namespace.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Namespace {
    /// Whether the user entered edit mode for a chart.
    EditChart,
    /// Cached editor bootstrap bundle.
    InitDetails,
}

impl Namespace {
    /// Returns the namespace key.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::EditChart => "edit_chart",
            Self::InitDetails => "init_details",
        }
    }
}

/// Key-value store for per-user state, keyed by (namespace, user).
pub trait UserStateStore: Send + Sync {
    /// Reads a value.
    fn get(&self, namespace: Namespace, user: &UserId) -> Option<Value>;

    /// Writes a value.
    fn set(&self, namespace: Namespace, user: &UserId, value: Value);

    /// Removes a value.
    fn remove(&self, namespace: Namespace, user: &UserId);
}

/// [`UserStateStore`] backed by a moka cache with idle expiry.
#[derive(Clone)]
pub struct MokaStateStore {
    cache: Cache<(Namespace, UserId), Value>,
}

impl MokaStateStore {
    /// Creates a store with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(DEFAULT_CAPACITY, DEFAULT_IDLE_SECS)
    }

    /// Creates a store with custom capacity and idle expiry.
    #[must_use]
    pub fn with_config(max_capacity: u64, time_to_idle_secs: u64) -> Self {
        let cache = Cache::builder()
            .max_capacity(max_capacity)
            .time_to_idle(Duration::from_secs(time_to_idle_secs))
            .build();
        Self { cache }
    }
}

impl Default for MokaStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl UserStateStore for MokaStateStore {
    fn get(&self, namespace: Namespace, user: &UserId) -> Option<Value> {
        self.cache.get(&(namespace, user.clone()))
    }

    fn set(&self, namespace: Namespace, user: &UserId, value: Value) {
        self.cache.insert((namespace, user.clone()), value);
    }

    fn remove(&self, namespace: Namespace, user: &UserId) {
        self.cache.invalidate(&(namespace, user.clone()));
    }
}

/// Typed access to the chart editor's per-user state.
#[derive(Clone)]
pub struct ChartSession {
    store: Arc<dyn UserStateStore>,
}

impl ChartSession {
    /// Wraps a state store.
    #[must_use]
    pub fn new(store: Arc<dyn UserStateStore>) -> Self {
        Self { store }
    }

    /// Sets or clears the user's editing flag.
    pub fn set_editing(&self, user: &UserId, editing: bool) {
        self.store
            .set(Namespace::EditChart, user, Value::Bool(editing));
    }

    /// Returns the user's editing flag.
    #[must_use]
    pub fn is_editing(&self, user: &UserId) -> bool {
        self.store
            .get(Namespace::EditChart, user)
            .and_then(|v| v.as_bool())
            .unwrap_or(false)
    }

    /// Returns the cached bundle if it was cached for `company`.
    #[must_use]
    pub fn init_details_for(&self, user: &UserId, company: &str) -> Option<InitDetails> {
        let value = self.store.get(Namespace::InitDetails, user)?;
        match serde_json::from_value::<InitDetails>(value) {
            Ok(details) if details.company.name == company => Some(details),
            Ok(_) => None,
            Err(e) => {
                warn!(user = %user, error = %e, "discarding unreadable cached init details");
                None
            }
        }
    }

    /// Caches the bundle for the user.
    pub fn store_init_details(&self, user: &UserId, details: &InitDetails) {
        match serde_json::to_value(details) {
            Ok(value) => self.store.set(Namespace::InitDetails, user, value),
            Err(e) => warn!(user = %user, error = %e, "failed to cache init details"),
        }
    }

    /// Drops the user's cached bundle.
    pub fn reset_init_details(&self, user: &UserId) {
        self.store.remove(Namespace::InitDetails, user);
    }
}

impl std::fmt::Debug for ChartSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChartSession").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::types::{CompanyDetails, accounts_meta};

    fn session() -> ChartSession {
        ChartSession::new(Arc::new(MokaStateStore::new()))
    }

    fn details(company: &str) -> InitDetails {
        InitDetails {
            accounts_meta: accounts_meta(),
            company: CompanyDetails {
                name: company.to_string(),
                chart_of_accounts_name: None,
                submitted: false,
                forked: true,
                included_in_erpnext: false,
                domain: None,
            },
            domains: vec!["Retail".into()],
        }
    }

    #[test]
    fn test_editing_flag_is_per_user() {
        let session = session();
        let ana = UserId::new("ana");
        let bo = UserId::new("bo");

        assert!(!session.is_editing(&ana));
        session.set_editing(&ana, true);
        assert!(session.is_editing(&ana));
        assert!(!session.is_editing(&bo));
        session.set_editing(&ana, false);
        assert!(!session.is_editing(&ana));
    }

    #[test]
    fn test_init_details_keyed_by_company() {
        let session = session();
        let ana = UserId::new("ana");

        session.store_init_details(&ana, &details("Acme"));
        assert_eq!(session.init_details_for(&ana, "Acme"), Some(details("Acme")));
        assert_eq!(session.init_details_for(&ana, "Other"), None);

        session.reset_init_details(&ana);
        assert_eq!(session.init_details_for(&ana, "Acme"), None);
    }

    #[test]
    fn test_namespaces_do_not_collide() {
        let store = MokaStateStore::new();
        let ana = UserId::new("ana");
        store.set(Namespace::EditChart, &ana, Value::Bool(true));
        assert!(store.get(Namespace::InitDetails, &ana).is_none());
        assert_eq!(Namespace::InitDetails.as_str(), "init_details");
    }
}
