//! Scope selection routes: authorized options, cascading children, and
//! the filtered KVK picker.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    routing::get,
};
use serde::Deserialize;
use serde_json::json;
use tracing::error;
use uuid::Uuid;

use crate::{AppState, middleware::AuthUser};
use kendra_core::scope::{NamedNode, ScopeError, ScopeLevel, ScopeRequest};
use kendra_shared::types::{DistrictId, KvkId, OrgId, PageRequest, PageResponse, StateId, ZoneId};

/// Creates the scope routes (requires auth middleware to be applied externally).
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/scope/options", get(get_scope_options))
        .route("/scope/children", get(get_children))
        .route("/scope/kvks", get(get_filtered_kvks))
}

type ErrorResponse = (StatusCode, Json<serde_json::Value>);

pub(crate) fn scope_error_response(err: &ScopeError) -> ErrorResponse {
    match err {
        ScopeError::OutOfScope { .. } | ScopeError::IncompleteContext { .. } => (
            StatusCode::FORBIDDEN,
            Json(json!({ "error": "out_of_scope", "message": err.to_string() })),
        ),
        ScopeError::LeafLevel(_) => (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_level", "message": err.to_string() })),
        ),
        ScopeError::Store(store_err) => {
            error!(error = %store_err, "hierarchy store failure");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "store_error", "message": "hierarchy lookup failed" })),
            )
        }
    }
}

/// Parses a comma-separated uuid list query value.
fn parse_ids(raw: &str) -> Result<Vec<Uuid>, ErrorResponse> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<Uuid>().map_err(|_| {
                (
                    StatusCode::BAD_REQUEST,
                    Json(json!({
                        "error": "invalid_id",
                        "message": format!("'{part}' is not a valid id")
                    })),
                )
            })
        })
        .collect()
}

// ============================================================================
// Query Parameters
// ============================================================================

/// Query parameters for the cascading-children endpoint.
#[derive(Debug, Deserialize)]
pub struct ChildrenQuery {
    /// Parent hierarchy level (zone, state, district, organization).
    pub level: String,
    /// Comma-separated parent ids.
    pub ids: String,
}

/// Query parameters for the filtered KVK picker.
#[derive(Debug, Deserialize)]
pub struct KvkOptionsQuery {
    /// Comma-separated zone ids.
    pub zone_ids: Option<String>,
    /// Comma-separated state ids.
    pub state_ids: Option<String>,
    /// Comma-separated district ids.
    pub district_ids: Option<String>,
    /// Comma-separated host-organization ids.
    pub org_ids: Option<String>,
    /// Page number (1-indexed).
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

// ============================================================================
// Handlers
// ============================================================================

/// Returns the caller's authorized scope with selectable hierarchy options.
async fn get_scope_options(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<serde_json::Value>, ErrorResponse> {
    let caller = user.caller()?;
    let authorized = state
        .reports
        .resolver()
        .authorized_scope(&caller)
        .await
        .map_err(|e| scope_error_response(&e))?;

    Ok(Json(json!({
        "role": caller.role,
        "authorized_scope": authorized,
    })))
}

/// Returns the children of the given nodes, one hierarchy level down.
async fn get_children(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<ChildrenQuery>,
) -> Result<Json<Vec<NamedNode<Uuid>>>, ErrorResponse> {
    let caller = user.caller()?;
    let level: ScopeLevel = query.level.parse().map_err(|message: String| {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "error": "invalid_level", "message": message })),
        )
    })?;
    let parent_ids = parse_ids(&query.ids)?;

    let resolver = state.reports.resolver();
    let authorized = resolver
        .authorized_scope(&caller)
        .await
        .map_err(|e| scope_error_response(&e))?;
    let children = resolver
        .children(level, &parent_ids, &authorized)
        .await
        .map_err(|e| scope_error_response(&e))?;

    Ok(Json(children))
}

/// Returns the KVKs reachable from a partial scope selection, paginated.
async fn get_filtered_kvks(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<KvkOptionsQuery>,
) -> Result<Json<PageResponse<NamedNode<KvkId>>>, ErrorResponse> {
    let caller = user.caller()?;

    let request = ScopeRequest {
        zone_ids: opt_ids(query.zone_ids.as_deref())?
            .into_iter()
            .map(ZoneId::from_uuid)
            .collect(),
        state_ids: opt_ids(query.state_ids.as_deref())?
            .into_iter()
            .map(StateId::from_uuid)
            .collect(),
        district_ids: opt_ids(query.district_ids.as_deref())?
            .into_iter()
            .map(DistrictId::from_uuid)
            .collect(),
        org_ids: opt_ids(query.org_ids.as_deref())?
            .into_iter()
            .map(OrgId::from_uuid)
            .collect(),
        kvk_ids: Vec::new(),
    };

    let resolver = state.reports.resolver();
    let authorized = resolver
        .authorized_scope(&caller)
        .await
        .map_err(|e| scope_error_response(&e))?;

    let kvks = match resolver.expand(&request, &authorized).await {
        Ok(resolved) => resolved.kvks,
        // A picker over an unreachable selection shows nothing rather
        // than erroring.
        Err(ScopeError::OutOfScope { .. }) => Vec::new(),
        Err(e) => return Err(scope_error_response(&e)),
    };

    let page = PageRequest {
        page: query.page.unwrap_or(1),
        per_page: query.per_page.unwrap_or(20),
    };
    let total = kvks.len() as u64;
    let page_items: Vec<NamedNode<KvkId>> = kvks
        .into_iter()
        .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
        .take(usize::try_from(page.limit()).unwrap_or(usize::MAX))
        .collect();

    Ok(Json(PageResponse::new(
        page_items,
        page.page,
        page.per_page,
        total,
    )))
}

fn opt_ids(raw: Option<&str>) -> Result<Vec<Uuid>, ErrorResponse> {
    raw.map_or_else(|| Ok(Vec::new()), parse_ids)
}
