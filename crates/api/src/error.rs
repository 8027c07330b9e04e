//! JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use tracing::{error, warn};

use coa_core::chart::ChartError;
use coa_shared::AppError;

/// Error returned by handlers, rendered as `{ "error": code, "message": text }`.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl From<ChartError> for ApiError {
    fn from(err: ChartError) -> Self {
        Self(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.0.is_client_error() {
            warn!(code = self.0.error_code(), message = self.0.message(), "request rejected");
        } else {
            error!(code = self.0.error_code(), error = %self.0, "request failed");
        }

        (
            status,
            Json(json!({
                "error": self.0.error_code(),
                "message": self.0.message(),
            })),
        )
            .into_response()
    }
}

/// Result type for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ChartError::TooFewRoots { count: 3 }, StatusCode::BAD_REQUEST)]
    #[case(ChartError::DuplicateChartName("Acme".into()), StatusCode::CONFLICT)]
    #[case(ChartError::CompanyNotFound("Acme".into()), StatusCode::NOT_FOUND)]
    #[case(ChartError::NoSubmittedCharts, StatusCode::NOT_FOUND)]
    #[case(ChartError::Repository("down".into()), StatusCode::INTERNAL_SERVER_ERROR)]
    fn test_chart_error_status(#[case] err: ChartError, #[case] status: StatusCode) {
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), status);
    }
}
