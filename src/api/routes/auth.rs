//! Registration, login and profile endpoints.

use crate::{
    api::{
        AppState,
        extract::{ApiJson, AuthUser},
        response::ApiResponse,
    },
    core::auth::{self, NewUser},
    entities::UserModel,
    errors::{Error, Result},
};
use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};

/// Body of `POST /api/register`.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    /// Unique login name
    pub username: String,
    /// Plain password, at least six characters
    pub password: String,
    /// Display name
    pub real_name: Option<String>,
    /// Contact email
    pub email: Option<String>,
    /// Contact phone
    pub phone: Option<String>,
}

/// Body of `POST /api/login`.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    /// Login name
    pub username: String,
    /// Plain password
    pub password: String,
}

/// Successful login: a bearer token and the logged-in user.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    /// Value for the `Authorization: Bearer` header
    pub token: String,
    /// The authenticated account
    pub user: UserModel,
}

/// `POST /api/register`
pub async fn register(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<Json<ApiResponse<UserModel>>> {
    let user = auth::register_user(
        &state.db,
        NewUser {
            username: request.username,
            password: request.password,
            real_name: request.real_name,
            email: request.email,
            phone: request.phone,
        },
    )
    .await?;
    Ok(ApiResponse::success(user))
}

/// `POST /api/login`
pub async fn login(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    let user = auth::authenticate(&state.db, &request.username, &request.password).await?;
    let token = auth::issue_token(&user, &state.config.auth)?;
    Ok(ApiResponse::success(LoginResponse { token, user }))
}

/// `GET /api/profile`
pub async fn profile(
    State(state): State<AppState>,
    AuthUser(claims): AuthUser,
) -> Result<Json<ApiResponse<UserModel>>> {
    let user = auth::get_user_by_id(&state.db, claims.user_id)
        .await?
        .ok_or_else(|| Error::not_found("User", claims.user_id))?;
    Ok(ApiResponse::success(user))
}
