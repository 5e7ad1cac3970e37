// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, login, and current-user routes.

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Extension, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::{create_jwt, AuthUser};
use crate::models::{Account, NewAccount, Role};
use crate::routes::chefs::ChefResponse;
use crate::routes::clients::ClientResponse;
use crate::services::password;
use crate::AppState;

/// Public auth routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/auth/register", post(register))
        .route("/api/auth/login", post(login))
}

/// Auth routes behind the bearer-token middleware.
pub fn protected_routes() -> Router<Arc<AppState>> {
    Router::new().route("/api/auth/me", get(get_me))
}

// ─── Request / Response Types ────────────────────────────────

#[derive(Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(length(min = 1, max = 255, message = "name must not be empty"))]
    pub name: String,
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub role: Role,
}

#[derive(Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "invalid email address"))]
    pub email: String,
    pub password: String,
}

/// Public account view. Never carries the password hash.
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

impl From<&Account> for UserResponse {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            name: account.name.clone(),
            role: account.role,
        }
    }
}

/// Registration response: flattened account fields plus a session token
/// and the freshly created role profile.
#[derive(Serialize)]
pub struct RegisterResponse {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
    pub token: String,
    pub token_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chef_profile: Option<ChefResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_profile: Option<ClientResponse>,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub user: UserResponse,
}

// ─── Handlers ────────────────────────────────────────────────

/// Register a new account. Creates the account and its role-matching
/// profile in one transaction and returns a token for immediate login.
async fn register(
    State(state): State<Arc<AppState>>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<RegisterResponse>)> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if state.db.account_by_email(&body.email).await?.is_some() {
        return Err(AppError::BadRequest("Email already registered".to_string()));
    }

    let password_hash = password::hash(&body.password)?;

    let account = state
        .db
        .create_account_with_profile(&NewAccount {
            email: body.email,
            password_hash,
            name: body.name,
            role: body.role,
        })
        .await?;

    let token = create_jwt(
        account.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_minutes,
    )?;

    let (chef_profile, client_profile) = match account.role {
        Role::Chef => (
            state
                .db
                .chef_by_account(account.id)
                .await?
                .map(ChefResponse::from),
            None,
        ),
        Role::Client => (
            None,
            state
                .db
                .client_by_account(account.id)
                .await?
                .map(ClientResponse::from),
        ),
    };

    tracing::info!(account_id = account.id, role = account.role.as_str(), "Account registered");

    Ok((
        StatusCode::CREATED,
        Json(RegisterResponse {
            id: account.id,
            email: account.email,
            name: account.name,
            role: account.role,
            token,
            token_type: "bearer".to_string(),
            chef_profile,
            client_profile,
        }),
    ))
}

/// Login with email and password.
///
/// Unknown email and non-matching password are indistinguishable to the
/// caller; password verification fails closed.
async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<LoginResponse>> {
    body.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let account = state
        .db
        .account_by_email(&body.email)
        .await?
        .ok_or(AppError::Unauthorized)?;

    if !password::verify(&body.password, &account.password_hash) {
        return Err(AppError::Unauthorized);
    }

    let token = create_jwt(
        account.id,
        &state.config.jwt_signing_key,
        state.config.token_ttl_minutes,
    )?;

    Ok(Json(LoginResponse {
        token,
        token_type: "bearer".to_string(),
        user: UserResponse::from(&account),
    }))
}

/// Get the authenticated account.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let account = state
        .db
        .account_by_id(user.account_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user.account_id)))?;

    Ok(Json(UserResponse::from(&account)))
}
