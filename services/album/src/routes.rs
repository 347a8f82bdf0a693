//! HTTP routes for the album service

use axum::{
    Extension, Json, Router,
    extract::{Path, Query, State},
    http::{HeaderMap, StatusCode, header},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{error, info};

use crate::{
    catalog::photo_catalog,
    error::{ApiError, ApiResult},
    media,
    middleware::{TokenQuery, auth_middleware, select_token},
    models::{AuthUser, UserInfo},
    repositories::UserRepository,
    state::AppState,
};

/// Request for user login
#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Response for user login
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
    pub password_changed: bool,
}

/// Request for a password change
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: Option<String>,
    pub new_password: Option<String>,
}

/// Response for a password change
#[derive(Serialize)]
pub struct ChangePasswordResponse {
    pub message: String,
    pub token: String,
}

/// Create the router for the album service
pub fn create_router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/auth/change-password", post(change_password))
        .route("/media/photos", get(list_photos))
        .route("/media/birthday-photo", get(birthday_photo))
        .route("/media/music/:filename", get(music))
        .route("/media/photos/:folder/:filename", get(photo))
        .route("/media/videos/:filename", get(video))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .route("/auth/login", post(login))
        .route("/auth/verify", get(verify))
        .merge(protected)
        .with_state(state)
}

/// Health check endpoint
pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

/// User login endpoint
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let (username, password) = match (payload.username, payload.password) {
        (Some(u), Some(p)) if !u.is_empty() && !p.is_empty() => (u, p),
        _ => {
            return Err(ApiError::BadRequest(
                "Username and password are required".to_string(),
            ));
        }
    };

    info!("Login attempt for user: {}", username);

    let user = state
        .user_repository
        .find_by_username(&username)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let is_valid =
        UserRepository::verify_password(&user, &password).map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !is_valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let token = state
        .jwt_service
        .issue(user.id, &user.username)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&user),
        password_changed: user.password_changed,
    }))
}

/// Password change endpoint; issues a fresh token on success
pub async fn change_password(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    Json(payload): Json<ChangePasswordRequest>,
) -> ApiResult<Json<ChangePasswordResponse>> {
    let (current_password, new_password) = match (payload.current_password, payload.new_password) {
        (Some(c), Some(n)) if !c.is_empty() && !n.is_empty() => (c, n),
        _ => {
            return Err(ApiError::BadRequest(
                "Current password and new password are required".to_string(),
            ));
        }
    };

    if new_password.len() < 4 {
        return Err(ApiError::BadRequest(
            "New password must be at least 4 characters".to_string(),
        ));
    }

    let user = state
        .user_repository
        .find_by_id(auth_user.id)
        .await
        .map_err(|e| {
            error!("Failed to look up user: {}", e);
            ApiError::InternalServerError
        })?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let is_valid = UserRepository::verify_password(&user, &current_password)
        .map_err(|e| {
            error!("Failed to verify password: {}", e);
            ApiError::InternalServerError
        })?;

    if !is_valid {
        return Err(ApiError::Unauthorized(
            "Current password is incorrect".to_string(),
        ));
    }

    let new_hash =
        UserRepository::hash_password(&new_password).map_err(|e| {
            error!("Failed to hash password: {}", e);
            ApiError::InternalServerError
        })?;

    state
        .user_repository
        .update_password(user.id, &new_hash)
        .await
        .map_err(|e| {
            error!("Failed to update password: {}", e);
            ApiError::InternalServerError
        })?;

    info!("Password changed for user: {}", user.username);

    let token = state
        .jwt_service
        .issue(user.id, &user.username)
        .map_err(|e| {
            error!("Failed to issue token: {}", e);
            ApiError::InternalServerError
        })?;

    Ok(Json(ChangePasswordResponse {
        message: "Password changed successfully".to_string(),
        token,
    }))
}

/// Token verification endpoint
///
/// Lives outside the auth middleware so it can answer with the
/// `{"valid": false}` body instead of the uniform gateway 401.
pub async fn verify(
    State(state): State<AppState>,
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    Query(query): Query<TokenQuery>,
) -> Response {
    let claims = select_token(
        bearer.as_ref().map(|header| header.token()),
        query.token.as_deref(),
    )
    .and_then(|token| state.jwt_service.verify(&token));

    match claims {
        Some(claims) => Json(json!({
            "valid": true,
            "user": { "id": claims.sub, "username": claims.username },
        }))
        .into_response(),
        None => (StatusCode::UNAUTHORIZED, Json(json!({"valid": false}))).into_response(),
    }
}

/// Photo catalog endpoint
pub async fn list_photos() -> impl IntoResponse {
    Json(photo_catalog())
}

/// The fixed singleton birthday photo
pub async fn birthday_photo(State(state): State<AppState>) -> ApiResult<Response> {
    let path = state.media_store.birthday_photo();
    media::serve_full(&path, "image/jpeg").await
}

/// Background music delivery
pub async fn music(
    State(state): State<AppState>,
    Path(filename): Path<String>,
) -> ApiResult<Response> {
    let path = state
        .media_store
        .resolve_music(&filename)
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;
    media::serve_full(&path, media::audio_content_type(&filename)).await
}

/// Photo delivery by folder and file name
pub async fn photo(
    State(state): State<AppState>,
    Path((folder, filename)): Path<(String, String)>,
) -> ApiResult<Response> {
    let path = state
        .media_store
        .resolve_photo(&folder, &filename)
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;
    media::serve_full(&path, media::image_content_type(&filename)).await
}

/// Video delivery with range support for seeking
pub async fn video(
    State(state): State<AppState>,
    Path(filename): Path<String>,
    headers: HeaderMap,
) -> ApiResult<Response> {
    let path = state
        .media_store
        .resolve_video(&filename)
        .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;
    media::serve_ranged(&path, "video/mp4", headers.get(header::RANGE)).await
}
