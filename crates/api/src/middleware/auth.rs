//! Authentication middleware for protected routes.

use axum::{
    Json,
    extract::{FromRequestParts, Request, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::AppState;
use kendra_core::scope::{CallerContext, Role};
use kendra_shared::Claims;
use kendra_shared::types::{DistrictId, KvkId, OrgId, StateId, UserId, ZoneId};

/// Extracts the bearer token from the Authorization header.
fn extract_bearer_token(header: &str) -> Option<&str> {
    header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))
}

/// Authentication middleware that validates JWT tokens.
///
/// This middleware:
/// 1. Extracts the Bearer token from the Authorization header
/// 2. Validates the token using the JWT service
/// 3. Stores the claims in request extensions for handlers to access
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let auth_header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(token) = auth_header.and_then(extract_bearer_token) else {
        return (
            StatusCode::UNAUTHORIZED,
            Json(json!({
                "error": "missing_token",
                "message": "Authorization header with Bearer token is required"
            })),
        )
            .into_response();
    };

    match state.jwt_service.validate_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => {
            let (status, error, message) = match e {
                kendra_shared::JwtError::Expired => (
                    StatusCode::UNAUTHORIZED,
                    "token_expired",
                    "Token has expired",
                ),
                _ => (
                    StatusCode::UNAUTHORIZED,
                    "invalid_token",
                    "Invalid or malformed token",
                ),
            };

            (status, Json(json!({ "error": error, "message": message }))).into_response()
        }
    }
}

/// Extractor for authenticated user claims.
///
/// Use this in handlers to get the authenticated caller's context:
///
/// ```ignore
/// async fn handler(user: AuthUser) -> impl IntoResponse {
///     let caller = user.caller()?;
///     // ...
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser(pub Claims);

impl AuthUser {
    /// Builds the caller context consumed by the report engine.
    ///
    /// # Errors
    ///
    /// Returns a 403 response when the token carries an unknown role.
    pub fn caller(&self) -> Result<CallerContext, (StatusCode, Json<serde_json::Value>)> {
        let role: Role = self.0.role.parse().map_err(|_| {
            (
                StatusCode::FORBIDDEN,
                Json(json!({
                    "error": "unknown_role",
                    "message": format!("role '{}' is not recognized", self.0.role)
                })),
            )
        })?;

        Ok(CallerContext {
            user_id: UserId::from_uuid(self.0.sub),
            name: self.0.name.clone(),
            role,
            home_zone: self.0.zone.map(ZoneId::from_uuid),
            home_state: self.0.state.map(StateId::from_uuid),
            home_district: self.0.district.map(DistrictId::from_uuid),
            home_org: self.0.org.map(OrgId::from_uuid),
            home_kvk: self.0.kvk.map(KvkId::from_uuid),
        })
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, Json<serde_json::Value>);

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| {
                (
                    StatusCode::UNAUTHORIZED,
                    Json(json!({
                        "error": "unauthorized",
                        "message": "Authentication required"
                    })),
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("bearer abc"), Some("abc"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
    }

    #[test]
    fn test_caller_context_from_claims() {
        let kvk = uuid::Uuid::new_v4();
        let claims = Claims::new(
            uuid::Uuid::new_v4(),
            "A. Sharma",
            "kvk_staff",
            chrono::Utc::now() + chrono::Duration::minutes(15),
        )
        .with_home(None, None, None, None, Some(kvk));

        let caller = AuthUser(claims).caller().expect("valid role");
        assert_eq!(caller.role, Role::KvkStaff);
        assert_eq!(caller.home_kvk, Some(KvkId::from_uuid(kvk)));
        assert_eq!(caller.home_zone, None);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let claims = Claims::new(
            uuid::Uuid::new_v4(),
            "A. Sharma",
            "gardener",
            chrono::Utc::now() + chrono::Duration::minutes(15),
        );
        assert!(AuthUser(claims).caller().is_err());
    }
}
