//! `SeaORM` Entity for companies table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "companies")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub company_name: String,
    pub abbr: String,
    pub country: String,
    pub default_currency: String,
    pub chart_of_accounts: Option<String>,
    pub chart_of_accounts_name: Option<String>,
    pub submitted: bool,
    pub forked: bool,
    pub forked_from: Option<String>,
    pub stars: i32,
    #[sea_orm(column_type = "JsonBinary")]
    pub stars_given_by: Json,
    pub domain: Option<String>,
    pub included_in_erpnext: bool,
    pub created_at: DateTimeWithTimeZone,
    pub updated_at: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::accounts::Entity")]
    Accounts,
    #[sea_orm(
        belongs_to = "super::countries::Entity",
        from = "Column::Country",
        to = "super::countries::Column::Name"
    )]
    Countries,
}

impl Related<super::accounts::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Accounts.def()
    }
}

impl Related<super::countries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Countries.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
