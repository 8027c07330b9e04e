//! Account editing routes.

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post, put},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{AppState, error::ApiResult, middleware::AuthUser};
use coa_core::chart::{Account, AddAccountInput, ChartBackend, UpdateAccountInput};

/// Creates the account routes (requires auth middleware to be applied externally).
pub fn routes<B: ChartBackend>() -> Router<AppState<B>> {
    Router::new()
        .route(
            "/companies/{company}/accounts",
            get(list_accounts::<B>).post(add_account::<B>),
        )
        .route(
            "/companies/{company}/accounts/{account}",
            put(update_account::<B>).delete(delete_account::<B>),
        )
        .route(
            "/companies/{company}/accounts/{account}/rename",
            post(rename_account::<B>),
        )
}

/// Request body for adding an account.
#[derive(Debug, Default, Deserialize)]
pub struct AddAccountRequest {
    /// Account name.
    pub account_name: String,
    /// Account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Parent account document name.
    #[serde(default, alias = "parent")]
    pub parent_account: Option<String>,
    /// Create a root account.
    #[serde(default)]
    pub is_root: bool,
    /// Root type for root accounts.
    #[serde(default)]
    pub root_type: Option<String>,
    /// Account type.
    #[serde(default)]
    pub account_type: Option<String>,
    /// Whether the account is a group.
    #[serde(default)]
    pub is_group: bool,
    /// Account currency.
    #[serde(default)]
    pub account_currency: Option<String>,
}

/// Request body for updating an account.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateAccountRequest {
    /// Account name.
    #[serde(default)]
    pub account_name: Option<String>,
    /// Account number.
    #[serde(default)]
    pub account_number: Option<String>,
    /// Parent account; empty detaches a root.
    #[serde(default)]
    pub parent_account: Option<String>,
    /// Root type.
    #[serde(default)]
    pub root_type: Option<String>,
    /// Account type; absent clears it.
    #[serde(default)]
    pub account_type: Option<String>,
    /// Whether the account is a group.
    #[serde(default)]
    pub is_group: bool,
    /// Saving a root account.
    #[serde(default)]
    pub is_root: bool,
    /// Account currency.
    #[serde(default)]
    pub account_currency: Option<String>,
}

/// Request body for renaming an account.
#[derive(Debug, Deserialize)]
pub struct RenameAccountRequest {
    /// New account name.
    pub account_name: String,
    /// New account number; absent clears it.
    #[serde(default)]
    pub account_number: Option<String>,
}

/// Response carrying an account document name.
#[derive(Debug, Serialize)]
pub struct AccountNameResponse {
    /// Account document name.
    pub name: String,
}

/// Response for account listings.
#[derive(Debug, Serialize)]
pub struct AccountListResponse {
    /// Accounts in tree order.
    pub accounts: Vec<Account>,
}

/// GET `/companies/{company}/accounts` - List a company's accounts.
async fn list_accounts<B: ChartBackend>(
    State(state): State<AppState<B>>,
    _auth: AuthUser,
    Path(company): Path<String>,
) -> ApiResult<Json<AccountListResponse>> {
    let accounts = state.charts.list_accounts(&company).await?;
    Ok(Json(AccountListResponse { accounts }))
}

/// POST `/companies/{company}/accounts` - Add an account.
async fn add_account<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
    Json(payload): Json<AddAccountRequest>,
) -> ApiResult<(StatusCode, Json<AccountNameResponse>)> {
    let input = AddAccountInput {
        company,
        account_name: payload.account_name,
        account_number: payload.account_number,
        parent_account: payload.parent_account,
        is_root: payload.is_root,
        root_type: payload.root_type,
        account_type: payload.account_type,
        is_group: payload.is_group,
        account_currency: payload.account_currency,
    };
    let name = state.charts.add_account(&auth.user_id(), input).await?;
    Ok((StatusCode::CREATED, Json(AccountNameResponse { name })))
}

/// PUT `/companies/{company}/accounts/{account}` - Update an account.
async fn update_account<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path((company, account)): Path<(String, String)>,
    Json(payload): Json<UpdateAccountRequest>,
) -> ApiResult<Json<Account>> {
    let input = UpdateAccountInput {
        name: account,
        company,
        account_name: payload.account_name,
        account_number: payload.account_number,
        parent_account: payload.parent_account,
        root_type: payload.root_type,
        account_type: payload.account_type,
        is_group: payload.is_group,
        is_root: payload.is_root,
        account_currency: payload.account_currency,
    };
    let account = state.charts.update_account(&auth.user_id(), input).await?;
    Ok(Json(account))
}

/// POST `/companies/{company}/accounts/{account}/rename` - Rename an account.
async fn rename_account<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path((company, account)): Path<(String, String)>,
    Json(payload): Json<RenameAccountRequest>,
) -> ApiResult<Json<AccountNameResponse>> {
    let name = state
        .charts
        .rename_account(
            &auth.user_id(),
            &company,
            &account,
            &payload.account_name,
            payload.account_number,
        )
        .await?;
    Ok(Json(AccountNameResponse { name }))
}

/// DELETE `/companies/{company}/accounts/{account}` - Delete a childless account.
async fn delete_account<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path((company, account)): Path<(String, String)>,
) -> ApiResult<StatusCode> {
    state
        .charts
        .delete_account(&auth.user_id(), &company, &account)
        .await?;
    info!(company = %company, account = %account, user = %auth.user_id(), "account removed via api");
    Ok(StatusCode::NO_CONTENT)
}
