//! Reference data repository: countries and business domains.

use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, QueryOrder, Set};

use coa_core::chart::{ChartError, Country, ReferenceStore};

use super::repo_err;
use crate::entities::{countries, domains};

/// Reference data repository implementation.
#[derive(Debug, Clone)]
pub struct ReferenceRepository {
    db: DatabaseConnection,
}

impl ReferenceRepository {
    /// Creates a new reference repository.
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Inserts a country unless one with the same name exists.
    ///
    /// Returns true if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ensure_country(&self, name: &str, code: &str) -> Result<bool, ChartError> {
        let inserted = countries::Entity::insert(countries::ActiveModel {
            name: Set(name.to_string()),
            code: Set(code.to_string()),
        })
        .on_conflict(
            OnConflict::column(countries::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .map_err(repo_err)?;
        Ok(inserted > 0)
    }

    /// Inserts a domain unless it exists.
    ///
    /// Returns true if a row was inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn ensure_domain(&self, name: &str) -> Result<bool, ChartError> {
        let inserted = domains::Entity::insert(domains::ActiveModel {
            name: Set(name.to_string()),
        })
        .on_conflict(
            OnConflict::column(domains::Column::Name)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&self.db)
        .await
        .map_err(repo_err)?;
        Ok(inserted > 0)
    }
}

impl ReferenceStore for ReferenceRepository {
    async fn countries(&self) -> Result<Vec<Country>, ChartError> {
        let models = countries::Entity::find()
            .order_by_asc(countries::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models
            .into_iter()
            .map(|m| Country {
                name: m.name,
                code: m.code,
            })
            .collect())
    }

    async fn find_country(&self, name: &str) -> Result<Option<Country>, ChartError> {
        let model = countries::Entity::find_by_id(name.to_string())
            .one(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(model.map(|m| Country {
            name: m.name,
            code: m.code,
        }))
    }

    async fn domains(&self) -> Result<Vec<String>, ChartError> {
        let models = domains::Entity::find()
            .order_by_asc(domains::Column::Name)
            .all(&self.db)
            .await
            .map_err(repo_err)?;
        Ok(models.into_iter().map(|m| m.name).collect())
    }
}
