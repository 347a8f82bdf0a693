//! Authentication middleware for token validation
//!
//! Protected routes accept a bearer token from the `Authorization` header
//! or, because HTML media elements cannot set custom headers, from a
//! `?token=` query parameter. The header wins when both are present.

use axum::{
    body::Body,
    extract::{Query, State},
    http::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::Deserialize;

use crate::{error::ApiError, models::AuthUser, state::AppState};

/// Query parameters recognized on protected routes
#[derive(Debug, Deserialize)]
pub struct TokenQuery {
    pub token: Option<String>,
}

/// Pick the token candidate: Authorization header first, then query param
pub fn select_token(bearer: Option<&str>, query: Option<&str>) -> Option<String> {
    bearer.or(query).map(str::to_string)
}

/// Authentication middleware
///
/// Rejects the request with a uniform 401 when no valid token is
/// presented; otherwise attaches the decoded [`AuthUser`] to the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TokenQuery>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, ApiError> {
    let token = select_token(
        bearer.as_ref().map(|header| header.token()),
        query.token.as_deref(),
    )
    .ok_or_else(ApiError::unauthorized)?;

    let claims = state
        .jwt_service
        .verify(&token)
        .ok_or_else(ApiError::unauthorized)?;

    req.extensions_mut().insert(AuthUser {
        id: claims.sub,
        username: claims.username,
    });

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_wins_over_query() {
        let token = select_token(Some("header-token"), Some("query-token"));
        assert_eq!(token.as_deref(), Some("header-token"));
    }

    #[test]
    fn test_query_used_when_header_absent() {
        let token = select_token(None, Some("query-token"));
        assert_eq!(token.as_deref(), Some("query-token"));
    }

    #[test]
    fn test_no_candidate() {
        assert!(select_token(None, None).is_none());
    }
}
