//! Account repository for chart of accounts database operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, warn};

use coa_core::chart::{Account, AccountStore, AccountType, ChartError};

use super::repo_err;
use crate::entities::accounts;

/// Account repository implementation.
#[derive(Debug, Clone)]
pub struct AccountRepository {
    db: DatabaseConnection,
}

impl AccountRepository {
    /// Creates a new account repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: accounts::Model) -> Account {
    let account_type = model.account_type.as_deref().and_then(|t| {
        t.parse::<AccountType>()
            .inspect_err(|_| warn!(account = %model.name, account_type = t, "unknown account type"))
            .ok()
    });

    Account {
        name: model.name,
        account_name: model.account_name,
        account_number: model.account_number,
        company: model.company,
        parent_account: model.parent_account,
        root_type: model.root_type,
        account_type,
        is_group: model.is_group,
        lft: model.lft,
        rgt: model.rgt,
        account_currency: model.account_currency,
    }
}

fn to_active(account: &Account) -> accounts::ActiveModel {
    accounts::ActiveModel {
        name: Set(account.name.clone()),
        account_name: Set(account.account_name.clone()),
        account_number: Set(account.account_number.clone()),
        company: Set(account.company.clone()),
        parent_account: Set(account.parent().map(str::to_string)),
        root_type: Set(account.root_type.clone()),
        account_type: Set(account.account_type.map(|t| t.as_str().to_string())),
        is_group: Set(account.is_group),
        lft: Set(account.lft),
        rgt: Set(account.rgt),
        account_currency: Set(account.account_currency.clone()),
        ..Default::default()
    }
}

impl AccountStore for AccountRepository {
    async fn find(&self, name: &str) -> Result<Option<Account>, ChartError> {
        let model = accounts::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    async fn list_by_company(&self, company: &str) -> Result<Vec<Account>, ChartError> {
        let models = accounts::Entity::find()
            .filter(accounts::Column::Company.eq(company))
            .order_by_asc(accounts::Column::Lft)
            .order_by_asc(accounts::Column::Rgt)
            .order_by_asc(accounts::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn insert_many(&self, accounts: &[Account]) -> Result<(), ChartError> {
        if accounts.is_empty() {
            return Ok(());
        }

        let now = Utc::now();
        let models = accounts.iter().map(|account| {
            let mut active = to_active(account);
            active.created_at = Set(now.into());
            active.updated_at = Set(now.into());
            active
        });

        // Single statement: parent_account is checked after the whole batch.
        accounts::Entity::insert_many(models)
            .exec_without_returning(&self.db)
            .await
            .map_err(repo_err)?;
        debug!(count = accounts.len(), "accounts inserted");
        Ok(())
    }

    async fn save(&self, account: &Account) -> Result<(), ChartError> {
        match to_active(account).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ChartError::AccountNotFound(account.name.clone())),
            Err(e) => Err(repo_err(e)),
        }
    }

    async fn rename(&self, old_name: &str, new_name: &str) -> Result<(), ChartError> {
        // Children follow through ON UPDATE CASCADE on parent_account.
        let result = accounts::Entity::update_many()
            .col_expr(accounts::Column::Name, Expr::value(new_name))
            .filter(accounts::Column::Name.eq(old_name))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(ChartError::AccountNotFound(old_name.to_string()));
        }
        debug!(old = old_name, new = new_name, "account renamed");
        Ok(())
    }

    async fn delete(&self, name: &str) -> Result<bool, ChartError> {
        let result = accounts::Entity::delete_by_id(name.to_string())
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }

    async fn delete_by_company(&self, company: &str) -> Result<u64, ChartError> {
        let result = accounts::Entity::delete_many()
            .filter(accounts::Column::Company.eq(company))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected)
    }

    async fn save_tree_indexes(&self, indexes: &[(String, i32, i32)]) -> Result<(), ChartError> {
        let txn = self.db.begin().await.map_err(repo_err)?;

        for (name, lft, rgt) in indexes {
            accounts::Entity::update_many()
                .col_expr(accounts::Column::Lft, Expr::value(*lft))
                .col_expr(accounts::Column::Rgt, Expr::value(*rgt))
                .filter(accounts::Column::Name.eq(name.as_str()))
                .exec(&txn)
                .await
                .map_err(repo_err)?;
        }

        txn.commit().await.map_err(repo_err)?;
        Ok(())
    }
}
