//! Chart lifecycle, listing and export routes.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::{
    AppState,
    error::ApiResult,
    middleware::{AuthUser, CurrentUser},
};
use coa_core::chart::{ChartBackend, ChartSummary, CompanyFilter, ExportReport, InitDetails};

/// Creates the chart routes that need an authenticated user.
pub fn routes<B: ChartBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/companies/{company}", delete(delete_chart::<B>))
        .route("/companies/{company}/fork", post(fork::<B>))
        .route("/companies/{company}/submit", post(submit_chart::<B>))
        .route("/companies/{company}/star", post(add_star::<B>))
        .route("/companies/{company}/edit", post(edit_chart::<B>))
        .route("/charts", get(list_charts::<B>).post(create_new_chart::<B>))
        .route("/charts/export", post(export_submitted_coa::<B>))
}

/// Creates the routes open to guests.
pub fn guest_routes<B: ChartBackend>() -> Router<AppState<B>> {
    Router::new()
        .route("/countries", get(get_countries::<B>))
        .route("/companies/{company}/init", get(init_details::<B>))
}

/// Request body for submitting a chart.
#[derive(Debug, Deserialize)]
pub struct SubmitChartRequest {
    /// Public name of the chart.
    pub chart_of_accounts_name: String,
    /// Business domain.
    #[serde(default)]
    pub domain: Option<String>,
}

/// Request body for creating a chart.
#[derive(Debug, Deserialize)]
pub struct CreateChartRequest {
    /// Country the chart is for.
    pub country: String,
}

/// Request body for exporting submitted charts.
#[derive(Debug, Default, Deserialize)]
pub struct ExportRequest {
    /// Only export charts of this country.
    #[serde(default)]
    pub country: Option<String>,
    /// Only export this company's chart.
    #[serde(default)]
    pub chart: Option<String>,
}

/// Query parameters for listing charts.
#[derive(Debug, Default, Deserialize)]
pub struct ListChartsQuery {
    /// Filter by submitted flag.
    pub submitted: Option<bool>,
    /// Filter by country.
    pub country: Option<String>,
}

/// Response carrying a company name.
#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    /// Company name.
    pub company: String,
}

/// Response for a star.
#[derive(Debug, Serialize)]
pub struct StarResponse {
    /// Current star count.
    pub stars: i32,
}

/// Response for chart listings.
#[derive(Debug, Serialize)]
pub struct ChartListResponse {
    /// Charts, most starred first.
    pub charts: Vec<ChartSummary>,
}

/// Response for country listings.
#[derive(Debug, Serialize)]
pub struct CountryListResponse {
    /// Country names.
    pub countries: Vec<String>,
}

/// POST `/companies/{company}/fork` - Copy a chart into a new draft.
async fn fork<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let forked = state.charts.fork(&company).await?;
    info!(source = %company, fork = %forked, user = %auth.user_id(), "fork requested");
    Ok((StatusCode::CREATED, Json(CompanyResponse { company: forked })))
}

/// POST `/companies/{company}/submit` - Validate and submit a chart.
async fn submit_chart<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
    Json(payload): Json<SubmitChartRequest>,
) -> ApiResult<Json<ChartSummary>> {
    let company = state
        .charts
        .submit_chart(
            &auth.user_id(),
            &company,
            &payload.chart_of_accounts_name,
            payload.domain,
        )
        .await?;
    Ok(Json(ChartSummary::from(&company)))
}

/// DELETE `/companies/{company}` - Delete a chart and its accounts.
async fn delete_chart<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
) -> ApiResult<StatusCode> {
    state.charts.delete_chart(&auth.user_id(), &company).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST `/companies/{company}/star` - Star a chart.
async fn add_star<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
) -> ApiResult<Json<StarResponse>> {
    let stars = state.charts.add_star(&auth.user_id(), &company).await?;
    Ok(Json(StarResponse { stars }))
}

/// POST `/companies/{company}/edit` - Enter edit mode for a chart.
async fn edit_chart<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Path(company): Path<String>,
) -> StatusCode {
    state.charts.edit_chart(&auth.user_id(), &company);
    StatusCode::NO_CONTENT
}

/// GET `/companies/{company}/init` - Editor bootstrap bundle.
async fn init_details<B: ChartBackend>(
    State(state): State<AppState<B>>,
    CurrentUser(user): CurrentUser,
    Path(company): Path<String>,
) -> ApiResult<Json<InitDetails>> {
    Ok(Json(state.charts.init_details(&user, &company).await?))
}

/// POST `/charts` - Create an empty chart for a country.
async fn create_new_chart<B: ChartBackend>(
    State(state): State<AppState<B>>,
    _auth: AuthUser,
    Json(payload): Json<CreateChartRequest>,
) -> ApiResult<(StatusCode, Json<CompanyResponse>)> {
    let company = state.charts.create_new_chart(&payload.country).await?;
    Ok((StatusCode::CREATED, Json(CompanyResponse { company })))
}

/// GET `/charts` - List charts.
async fn list_charts<B: ChartBackend>(
    State(state): State<AppState<B>>,
    _auth: AuthUser,
    Query(query): Query<ListChartsQuery>,
) -> ApiResult<Json<ChartListResponse>> {
    let filter = CompanyFilter {
        submitted: query.submitted,
        country: query.country,
        name: None,
    };
    let charts = state.charts.list_charts(&filter).await?;
    Ok(Json(ChartListResponse { charts }))
}

/// POST `/charts/export` - Write submitted charts to disk and archive them.
async fn export_submitted_coa<B: ChartBackend>(
    State(state): State<AppState<B>>,
    auth: AuthUser,
    Json(payload): Json<ExportRequest>,
) -> ApiResult<Json<ExportReport>> {
    let report = state
        .charts
        .export_submitted_coa(payload.country, payload.chart)
        .await?;
    info!(
        user = %auth.user_id(),
        written = report.written.len(),
        archive = %report.archive.display(),
        "charts exported"
    );
    Ok(Json(report))
}

/// GET `/countries` - Country names.
async fn get_countries<B: ChartBackend>(
    State(state): State<AppState<B>>,
) -> ApiResult<Json<CountryListResponse>> {
    let countries = state.charts.get_countries().await?;
    Ok(Json(CountryListResponse { countries }))
}
