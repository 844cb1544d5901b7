//! Axum route handlers for recruiter signup, login and sessions.

use axum::{
    extract::State,
    http::{header, HeaderName, StatusCode},
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::auth::password::{
    hash_password_blocking, verify_dummy_blocking, verify_password_blocking,
};
use crate::auth::session::{
    clear_session_cookie, create_session, lookup_session, revoke_session, session_cookie,
    token_from_jar,
};
use crate::auth::store::{get_user_by_email, get_user_by_id, insert_user, NewUser};
use crate::errors::{conflict_on_unique, AppError};
use crate::extractors::AppJson;
use crate::models::user::User;
use crate::resume::ingest::is_valid_email;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: User,
}

#[derive(Debug, Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

fn invalid_credentials() -> AppError {
    AppError::Unauthorized("Invalid credentials".to_string())
}

fn not_authenticated() -> AppError {
    AppError::Unauthorized("Not authenticated".to_string())
}

/// POST /api/user/signup
pub async fn handle_signup(
    State(state): State<AppState>,
    AppJson(request): AppJson<SignupRequest>,
) -> Result<(StatusCode, Json<UserResponse>), AppError> {
    let (Some(first_name), Some(last_name), Some(email), Some(phone), Some(password)) = (
        present(&request.first_name),
        present(&request.last_name),
        present(&request.email),
        present(&request.phone),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation("All fields are required".to_string()));
    };

    let email = email.to_lowercase();
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email address".to_string()));
    }

    let password_hash = hash_password_blocking(password.to_string()).await?;
    let row = insert_user(
        &state.db,
        &NewUser {
            first_name,
            last_name,
            email: &email,
            phone,
            password_hash: &password_hash,
        },
    )
    .await
    .map_err(|e| conflict_on_unique(e, "Email already in use"))?;

    info!("Registered user {}", row.id);
    Ok((
        StatusCode::CREATED,
        Json(UserResponse { user: row.into() }),
    ))
}

/// POST /api/user/login
///
/// Unknown email and wrong password get the same 401 after the same amount of
/// hashing work.
pub async fn handle_login(
    State(state): State<AppState>,
    AppJson(request): AppJson<LoginRequest>,
) -> Result<([(HeaderName, String); 1], Json<LoginResponse>), AppError> {
    let (Some(email), Some(password)) = (
        present(&request.email),
        request.password.as_deref().filter(|p| !p.is_empty()),
    ) else {
        return Err(AppError::Validation(
            "Email and password are required".to_string(),
        ));
    };

    let Some(row) = get_user_by_email(&state.db, &email.to_lowercase()).await? else {
        verify_dummy_blocking(password.to_string()).await;
        return Err(invalid_credentials());
    };
    if !verify_password_blocking(password.to_string(), row.password_hash.clone()).await? {
        warn!("Failed login for user {}", row.id);
        return Err(invalid_credentials());
    }

    let ttl = state.config.session_ttl_secs;
    let token = create_session(&state.redis, row.id, ttl).await?;
    info!("User {} logged in", row.id);

    Ok((
        [(header::SET_COOKIE, session_cookie(&token, ttl))],
        Json(LoginResponse {
            token,
            user: row.into(),
        }),
    ))
}

/// GET /api/user/me
pub async fn handle_me(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<UserResponse>, AppError> {
    let token = token_from_jar(&jar).ok_or_else(not_authenticated)?;
    let user_id = lookup_session(&state.redis, &token)
        .await?
        .ok_or_else(not_authenticated)?;
    let row = get_user_by_id(&state.db, user_id)
        .await?
        .ok_or_else(not_authenticated)?;
    Ok(Json(UserResponse { user: row.into() }))
}

/// POST /api/user/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<([(HeaderName, String); 1], Json<LogoutResponse>), AppError> {
    if let Some(token) = token_from_jar(&jar) {
        revoke_session(&state.redis, &token).await?;
    }
    Ok((
        [(header::SET_COOKIE, clear_session_cookie())],
        Json(LogoutResponse { success: true }),
    ))
}
