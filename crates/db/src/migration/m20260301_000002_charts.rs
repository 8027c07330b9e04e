//! Chart tables migration.
//!
//! Companies own accounts; accounts form a forest through `parent_account`
//! and carry nested-set indexes maintained by the application.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(COMPANIES_SQL).await?;
        db.execute_unprepared(ACCOUNTS_SQL).await?;
        db.execute_unprepared(TRIGGERS_SQL).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(
            "DROP TABLE IF EXISTS accounts CASCADE;
             DROP TABLE IF EXISTS companies CASCADE;",
        )
        .await?;
        Ok(())
    }
}

const COMPANIES_SQL: &str = r"
CREATE TABLE companies (
    name VARCHAR(140) PRIMARY KEY,
    company_name VARCHAR(140) NOT NULL,
    abbr VARCHAR(10) NOT NULL,
    country VARCHAR(140) NOT NULL REFERENCES countries(name),
    default_currency VARCHAR(3) NOT NULL,
    chart_of_accounts VARCHAR(140),
    chart_of_accounts_name VARCHAR(140),
    submitted BOOLEAN NOT NULL DEFAULT false,
    forked BOOLEAN NOT NULL DEFAULT false,
    forked_from VARCHAR(140),
    stars INTEGER NOT NULL DEFAULT 0,
    stars_given_by JSONB NOT NULL DEFAULT '[]'::jsonb,
    domain VARCHAR(140),
    included_in_erpnext BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    CONSTRAINT chk_stars_non_negative CHECK (stars >= 0)
);

-- Chart listing (home page) filters on submission and country
CREATE INDEX idx_companies_submitted ON companies(submitted, country);

-- Submission looks up other companies by chart name
CREATE INDEX idx_companies_chart_name ON companies(chart_of_accounts_name)
    WHERE chart_of_accounts_name IS NOT NULL;
";

const ACCOUNTS_SQL: &str = r"
CREATE TABLE accounts (
    name VARCHAR(255) PRIMARY KEY,
    account_name VARCHAR(140) NOT NULL,
    account_number VARCHAR(40),
    company VARCHAR(140) NOT NULL REFERENCES companies(name) ON DELETE CASCADE,
    -- Renaming an account carries its children along
    parent_account VARCHAR(255) REFERENCES accounts(name) ON UPDATE CASCADE,
    root_type VARCHAR(40),
    account_type VARCHAR(60),
    is_group BOOLEAN NOT NULL DEFAULT false,
    lft INTEGER NOT NULL DEFAULT 0,
    rgt INTEGER NOT NULL DEFAULT 0,
    account_currency VARCHAR(3),
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

-- Tree walks
CREATE INDEX idx_accounts_company_tree ON accounts(company, lft, rgt);

-- Children lookup
CREATE INDEX idx_accounts_parent ON accounts(parent_account);

-- Account numbers are unique within a company
CREATE UNIQUE INDEX idx_accounts_company_number ON accounts(company, account_number)
    WHERE account_number IS NOT NULL;
";

const TRIGGERS_SQL: &str = r"
CREATE TRIGGER trg_companies_updated_at BEFORE UPDATE ON companies
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();

CREATE TRIGGER trg_accounts_updated_at BEFORE UPDATE ON accounts
    FOR EACH ROW EXECUTE FUNCTION set_updated_at();
";
