//! Company repository for database operations.

use chrono::Utc;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use tracing::{debug, warn};

use coa_core::chart::{ChartError, Company, CompanyFilter, CompanyStore};

use super::repo_err;
use crate::entities::companies;

/// Company repository implementation.
#[derive(Debug, Clone)]
pub struct CompanyRepository {
    db: DatabaseConnection,
}

impl CompanyRepository {
    /// Creates a new company repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn to_domain(model: companies::Model) -> Company {
    let stars_given_by = serde_json::from_value::<Vec<String>>(model.stars_given_by)
        .unwrap_or_else(|e| {
            warn!(company = %model.name, error = %e, "unreadable stars_given_by, treating as empty");
            Vec::new()
        });

    Company {
        name: model.name,
        company_name: model.company_name,
        abbr: model.abbr,
        country: model.country,
        default_currency: model.default_currency,
        chart_of_accounts: model.chart_of_accounts,
        chart_of_accounts_name: model.chart_of_accounts_name,
        submitted: model.submitted,
        forked: model.forked,
        forked_from: model.forked_from,
        stars: model.stars,
        stars_given_by,
        domain: model.domain,
        included_in_erpnext: model.included_in_erpnext,
    }
}

fn to_active(company: &Company) -> companies::ActiveModel {
    companies::ActiveModel {
        name: Set(company.name.clone()),
        company_name: Set(company.company_name.clone()),
        abbr: Set(company.abbr.clone()),
        country: Set(company.country.clone()),
        default_currency: Set(company.default_currency.clone()),
        chart_of_accounts: Set(company.chart_of_accounts.clone()),
        chart_of_accounts_name: Set(company.chart_of_accounts_name.clone()),
        submitted: Set(company.submitted),
        forked: Set(company.forked),
        forked_from: Set(company.forked_from.clone()),
        stars: Set(company.stars),
        stars_given_by: Set(serde_json::json!(company.stars_given_by)),
        domain: Set(company.domain.clone()),
        included_in_erpnext: Set(company.included_in_erpnext),
        ..Default::default()
    }
}

impl CompanyStore for CompanyRepository {
    async fn find(&self, name: &str) -> Result<Option<Company>, ChartError> {
        let model = companies::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(to_domain))
    }

    async fn names_like(&self, base: &str) -> Result<Vec<String>, ChartError> {
        let models = companies::Entity::find()
            .filter(
                Condition::any()
                    .add(companies::Column::Name.eq(base))
                    .add(companies::Column::Name.starts_with(format!("{base}-"))),
            )
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }

    async fn insert(&self, company: &Company) -> Result<(), ChartError> {
        let now = Utc::now().into();
        let mut active = to_active(company);
        active.created_at = Set(now);
        active.updated_at = Set(now);
        active.insert(&self.db).await.map_err(repo_err)?;
        debug!(company = %company.name, "company inserted");
        Ok(())
    }

    async fn save(&self, company: &Company) -> Result<(), ChartError> {
        match to_active(company).update(&self.db).await {
            Ok(_) => Ok(()),
            Err(DbErr::RecordNotUpdated) => Err(ChartError::CompanyNotFound(company.name.clone())),
            Err(e) => Err(repo_err(e)),
        }
    }

    async fn set_submitted(&self, name: &str, submitted: bool) -> Result<(), ChartError> {
        let result = companies::Entity::update_many()
            .col_expr(companies::Column::Submitted, Expr::value(submitted))
            .filter(companies::Column::Name.eq(name))
            .exec(&self.db)
            .await
            .map_err(repo_err)?;

        if result.rows_affected == 0 {
            return Err(ChartError::CompanyNotFound(name.to_string()));
        }
        Ok(())
    }

    async fn find_by_chart_name(
        &self,
        chart_name: &str,
        exclude: &str,
    ) -> Result<Option<String>, ChartError> {
        let model = companies::Entity::find()
            .filter(companies::Column::ChartOfAccountsName.eq(chart_name))
            .filter(companies::Column::Name.ne(exclude))
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(|m| m.name))
    }

    async fn list(&self, filter: &CompanyFilter) -> Result<Vec<Company>, ChartError> {
        let mut query = companies::Entity::find().order_by_asc(companies::Column::Name);

        if let Some(submitted) = filter.submitted {
            query = query.filter(companies::Column::Submitted.eq(submitted));
        }
        if let Some(country) = &filter.country {
            query = query.filter(companies::Column::Country.eq(country.as_str()));
        }
        if let Some(name) = &filter.name {
            query = query.filter(companies::Column::Name.eq(name.as_str()));
        }

        let models = query.all(&self.db).await.map_err(repo_err)?;
        Ok(models.into_iter().map(to_domain).collect())
    }

    async fn delete(&self, name: &str) -> Result<bool, ChartError> {
        let result = companies::Entity::delete_by_id(name.to_string())
            .exec(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(result.rows_affected > 0)
    }
}
