//! Account lifecycle handlers.
//!
//! Passwords are hashed here, so the service only ever sees hashes. A
//! password that does not match its confirmation becomes an empty hash and is
//! rejected by the service as missing.

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{delete, patch, post},
    Extension, Router,
};
use chrono::Utc;
use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::api::extractors::ValidatedJson;
use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use crate::service::AccountOutcome;
use common::{AppError, AppResult};
use domain::{
    Account, DeleteAccountData, GrantRoleData, LoginData, RoleState, UpdateAccountData,
};

/// Account registration request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[serde(default)]
    #[validate(length(max = 64, message = "Login must be at most 64 characters"))]
    #[schema(example = "bob")]
    pub login: String,
    #[serde(default)]
    #[schema(example = "Bob Smith")]
    pub user_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    #[schema(example = "bob@example.com")]
    pub email: String,
    #[serde(default)]
    #[schema(example = "p1")]
    pub password: String,
    #[serde(default)]
    #[schema(example = "p1")]
    pub repeat_password: String,
    pub nick: Option<String>,
    pub phone: Option<String>,
    /// Role to ask for; it stays pending until a granter approves it
    #[schema(example = "editor")]
    pub requested_role: Option<String>,
}

/// Login request
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[serde(default)]
    #[schema(example = "bob")]
    pub login: String,
    #[serde(default)]
    #[schema(example = "p1")]
    pub password: String,
    /// Token lifetime in minutes, 60 when omitted, at most one year
    #[validate(range(
        min = 1,
        max = 525_600,
        message = "Timeout must be between one minute and one year"
    ))]
    #[schema(example = 60)]
    pub timeout_minutes: Option<i64>,
}

/// Role grant request, authorized by the granter's own credentials
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrantRoleRequest {
    pub id: i64,
    #[serde(default)]
    pub login: String,
    pub granter_id: i64,
    #[serde(default)]
    pub granter_login: String,
    #[serde(default)]
    pub granter_password: String,
    /// Role to approve; empty revokes the current one
    #[serde(default)]
    #[schema(example = "editor")]
    pub role: String,
}

/// Account update request, authorized by the current password
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub id: i64,
    #[serde(default)]
    #[validate(length(max = 64, message = "Login must be at most 64 characters"))]
    pub login: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub repeat_password: String,
    pub new_password: Option<String>,
    pub repeat_new_password: Option<String>,
    pub nick: Option<String>,
    pub phone: Option<String>,
    pub requested_role: Option<String>,
}

/// Account deletion request.
///
/// Without a granter the password is the account's own; with one it is the
/// granter's.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteAccountRequest {
    pub id: i64,
    #[serde(default)]
    pub login: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub repeat_password: String,
    pub granter_id: Option<i64>,
    pub granter_login: Option<String>,
}

/// Create public account routes
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/Register", post(register))
        .route("/Login", post(login))
        .route("/UpdateAccount", patch(update_account))
        .route("/DeleteAccount", delete(delete_account))
}

/// Create routes that need a bearer token
pub fn granter_routes() -> Router<AppState> {
    Router::new().route("/GrantRole", patch(grant_role))
}

fn hash_pair(state: &AppState, password: &str, confirmation: &str) -> AppResult<String> {
    Ok(state.hasher.hash(password, confirmation)?.unwrap_or_default())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Register a new account
#[utoipa::path(
    post,
    path = "/Register",
    tag = "Accounts",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account registered, or identical registration repeated", body = AccountOutcome),
        (status = 400, description = "Missing field or password mismatch"),
        (status = 409, description = "Login taken by a different account")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<RegisterRequest>,
) -> AppResult<(StatusCode, Json<AccountOutcome>)> {
    let password_hash = hash_pair(&state, &payload.password, &payload.repeat_password)?;

    let account = Account {
        id: 0,
        login: payload.login,
        name: payload.user_name,
        email: payload.email,
        password_hash,
        nick: non_blank(payload.nick),
        phone: non_blank(payload.phone),
        role: RoleState::requested(payload.requested_role),
        granter_id: None,
        created_at: Utc::now(),
        updated_at: None,
    };

    let outcome = state.accounts.register(account).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Log in and get a session token
#[utoipa::path(
    post,
    path = "/Login",
    tag = "Accounts",
    request_body = LoginRequest,
    responses(
        (status = 201, description = "Logged in", body = AccountOutcome),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Wrong password"),
        (status = 404, description = "Unknown login")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<LoginRequest>,
) -> AppResult<(StatusCode, Json<AccountOutcome>)> {
    let data = LoginData {
        password_hash: state
            .hasher
            .hash_single(&payload.password)?
            .unwrap_or_default(),
        login: payload.login,
        timeout_minutes: payload.timeout_minutes,
    };

    let outcome = state.accounts.login(data).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

/// Approve a role for an account (admin only)
#[utoipa::path(
    patch,
    path = "/GrantRole",
    tag = "Accounts",
    request_body = GrantRoleRequest,
    responses(
        (status = 200, description = "Role granted", body = AccountOutcome),
        (status = 400, description = "Missing field"),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Caller is not admin, or credentials do not match"),
        (status = 404, description = "Target or granter not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn grant_role(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    ValidatedJson(payload): ValidatedJson<GrantRoleRequest>,
) -> AppResult<Json<AccountOutcome>> {
    require_admin(&current_user)?;

    let data = GrantRoleData {
        id: payload.id,
        login: payload.login,
        granter_id: payload.granter_id,
        granter_login: payload.granter_login,
        granter_password_hash: state
            .hasher
            .hash_single(&payload.granter_password)?
            .unwrap_or_default(),
        role: payload.role,
    };

    let outcome = state.accounts.grant_role(data).await?;
    Ok(Json(outcome))
}

/// Update account fields
#[utoipa::path(
    patch,
    path = "/UpdateAccount",
    tag = "Accounts",
    request_body = UpdateAccountRequest,
    responses(
        (status = 200, description = "Account updated, or already actual", body = AccountOutcome),
        (status = 400, description = "Missing field or password mismatch"),
        (status = 403, description = "Wrong current password"),
        (status = 404, description = "Account not found"),
        (status = 409, description = "New login already taken")
    )
)]
pub async fn update_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<UpdateAccountRequest>,
) -> AppResult<Json<AccountOutcome>> {
    let password_hash = hash_pair(&state, &payload.password, &payload.repeat_password)?;

    let new_password_hash = match non_blank(payload.new_password) {
        Some(new_password) => {
            let confirmation = payload.repeat_new_password.unwrap_or_default();
            let hash = state
                .hasher
                .hash(&new_password, &confirmation)?
                .ok_or_else(|| {
                    AppError::bad_request("New password and its confirmation do not match")
                })?;
            Some(hash)
        }
        None => None,
    };

    let data = UpdateAccountData {
        id: payload.id,
        login: payload.login,
        name: payload.user_name,
        email: payload.email,
        password_hash,
        new_password_hash,
        nick: non_blank(payload.nick),
        phone: non_blank(payload.phone),
        requested_role: payload.requested_role,
    };

    let outcome = state.accounts.update_account(data).await?;
    Ok(Json(outcome))
}

/// Delete an account
#[utoipa::path(
    delete,
    path = "/DeleteAccount",
    tag = "Accounts",
    request_body = DeleteAccountRequest,
    responses(
        (status = 200, description = "Account deleted", body = AccountOutcome),
        (status = 400, description = "Missing field, or granter id without login"),
        (status = 403, description = "Credentials do not match"),
        (status = 404, description = "Account or granter not found")
    )
)]
pub async fn delete_account(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<DeleteAccountRequest>,
) -> AppResult<Json<AccountOutcome>> {
    let data = DeleteAccountData {
        id: payload.id,
        login: payload.login,
        password_hash: hash_pair(&state, &payload.password, &payload.repeat_password)?,
        granter_id: payload.granter_id,
        granter_login: payload.granter_login,
    };

    let outcome = state.accounts.delete_account(data).await?;
    Ok(Json(outcome))
}
