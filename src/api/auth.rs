//! Authentication endpoints: login, registration, current user

use axum::{extract::State, http::StatusCode, Json};

use crate::{
    auth::CurrentUser,
    error::AppResult,
    models::user::{LoginRequest, LoginResponse, RegisterRequest, User},
};

use super::validated;

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/api/users/login",
    tag = "auth",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Authenticated", body = LoginResponse),
        (status = 400, description = "Missing email or password"),
        (status = 401, description = "Invalid email or password")
    )
)]
pub async fn login(
    State(state): State<crate::AppState>,
    Json(request): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let request = validated(request)?;

    let (user, token) = state
        .services
        .auth
        .login(&request.email, &request.password)
        .await?;

    Ok(Json(LoginResponse::new(user, token)))
}

/// Register a new account and receive a token
#[utoipa::path(
    post,
    path = "/api/users/register",
    tag = "auth",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = LoginResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already exists")
    )
)]
pub async fn register(
    State(state): State<crate::AppState>,
    Json(request): Json<RegisterRequest>,
) -> AppResult<(StatusCode, Json<LoginResponse>)> {
    let request = validated(request)?;

    let (user, token) = state.services.auth.register(request).await?;

    Ok((StatusCode::CREATED, Json(LoginResponse::new(user, token))))
}

/// Get the authenticated user's own record
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "auth",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn me(
    State(state): State<crate::AppState>,
    CurrentUser(principal): CurrentUser,
) -> AppResult<Json<User>> {
    let user = state.services.auth.current_user(principal.user_id).await?;
    Ok(Json(user))
}
