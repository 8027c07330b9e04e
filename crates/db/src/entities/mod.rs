//! `SeaORM` entity definitions.

pub mod accounts;
pub mod companies;
pub mod countries;
pub mod domains;

pub mod prelude {
    //! Entity re-exports.

    pub use super::accounts::Entity as Accounts;
    pub use super::companies::Entity as Companies;
    pub use super::countries::Entity as Countries;
    pub use super::domains::Entity as Domains;
}
