//! Reference data migration.
//!
//! Creates the countries and domains lookup tables and the shared
//! `updated_at` trigger function.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(FUNCTIONS_SQL).await?;
        db.execute_unprepared(REFERENCE_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS domains CASCADE;
             DROP TABLE IF EXISTS countries CASCADE;
             DROP FUNCTION IF EXISTS set_updated_at();",
        )
        .await?;
        Ok(())
    }
}

const FUNCTIONS_SQL: &str = r"
CREATE OR REPLACE FUNCTION set_updated_at() RETURNS TRIGGER AS $$
BEGIN
    NEW.updated_at = now();
    RETURN NEW;
END;
$$ LANGUAGE plpgsql;
";

const REFERENCE_SQL: &str = r"
CREATE TABLE countries (
    name VARCHAR(140) PRIMARY KEY,
    code VARCHAR(10) NOT NULL
);

CREATE TABLE domains (
    name VARCHAR(140) PRIMARY KEY
);
";
