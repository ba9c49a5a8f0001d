//! Report routes: section catalog, document generation, and export.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::{StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use serde::Deserialize;
use serde_json::json;
use tokio_util::sync::CancellationToken;
use tracing::error;

use crate::{AppState, middleware::AuthUser};
use kendra_core::document::ReportDocument;
use kendra_core::registry::{Registry, SectionConfig};
use kendra_core::render::{self, OutputFormat};
use kendra_core::report::{GenerateRequest, ReportError};

use super::scope::scope_error_response;

/// Creates the report routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/reports/config", get(get_report_config))
        .route("/reports/generate", post(generate_report))
        .route("/reports/export", post(export_report))
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

fn report_error_response(err: ReportError) -> ErrorResponse {
    match err {
        ReportError::Config(config_err) => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": "invalid_sections",
                "message": config_err.to_string()
            })),
        ),
        ReportError::Scope(scope_err) => scope_error_response(&scope_err),
        ReportError::Cancelled => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({
                "error": "cancelled",
                "message": "report generation was cancelled"
            })),
        ),
    }
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for report export.
#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    /// Output format (html or csv).
    pub format: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// Returns the static section catalog.
async fn get_report_config() -> Json<Vec<SectionConfig>> {
    Json(Registry::all().iter().map(|s| s.config()).collect())
}

/// Generates a report document for the requested scope and sections.
async fn generate_report(
    State(state): State<AppState>,
    user: AuthUser,
    Json(request): Json<GenerateRequest>,
) -> Result<Json<ReportDocument>, ErrorResponse> {
    let caller = user.caller()?;
    let cancel = CancellationToken::new();

    let document = state
        .reports
        .generate(&caller, request, &cancel)
        .await
        .map_err(report_error_response)?;

    if document.metadata.scope.failed_kvk_count > 0 {
        error!(
            failed = document.metadata.scope.failed_kvk_count,
            total = document.metadata.scope.kvk_count,
            "report generated with partial failures"
        );
    }

    Ok(Json(document))
}

/// Generates and renders a report in the requested output format.
async fn export_report(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ExportQuery>,
    Json(request): Json<GenerateRequest>,
) -> Result<Response, ErrorResponse> {
    let caller = user.caller()?;
    let format: OutputFormat = query.format.parse().map_err(|message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_format", "message": message })),
        )
    })?;

    let cancel = CancellationToken::new();
    let document = state
        .reports
        .generate(&caller, request, &cancel)
        .await
        .map_err(report_error_response)?;

    let bytes = render::render(&document, format);
    let filename = format!(
        "kvk-report-{}.{}",
        document.metadata.generated_at.format("%Y%m%d-%H%M%S"),
        format.extension()
    );

    Ok((
        [
            (header::CONTENT_TYPE, format.content_type().to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
        ],
        bytes,
    )
        .into_response())
}
