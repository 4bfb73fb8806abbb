//! Admin account lookups.

use axum::{
    extract::{Query, State},
    response::Json,
    routing::get,
    Extension, Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::api::middleware::{require_admin, CurrentUser};
use crate::api::AppState;
use common::{AppResult, OptionExt};
use domain::AccountInfo;

#[derive(Debug, Deserialize, IntoParams)]
pub struct IdQuery {
    /// Account id
    pub id: i64,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoginQuery {
    /// Account login
    #[serde(default)]
    pub login: String,
}

/// Create admin routes (require bearer token)
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/GetUserInfoById", get(get_user_info_by_id))
        .route("/GetUserInfoByLogin", get(get_user_info_by_login))
}

/// Get account by id (admin only)
#[utoipa::path(
    get,
    path = "/Admin/GetUserInfoById",
    tag = "Admin",
    params(IdQuery),
    responses(
        (status = 200, description = "Account found", body = AccountInfo),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_info_by_id(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<IdQuery>,
) -> AppResult<Json<AccountInfo>> {
    require_admin(&current_user)?;

    let info = state
        .accounts
        .get_user_info_by_id(query.id)
        .await?
        .ok_or_not_found()?;
    Ok(Json(info))
}

/// Get account by login (admin only)
#[utoipa::path(
    get,
    path = "/Admin/GetUserInfoByLogin",
    tag = "Admin",
    params(LoginQuery),
    responses(
        (status = 200, description = "Account found", body = AccountInfo),
        (status = 401, description = "Missing or invalid token"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Account not found")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_user_info_by_login(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Query(query): Query<LoginQuery>,
) -> AppResult<Json<AccountInfo>> {
    require_admin(&current_user)?;

    let info = state
        .accounts
        .get_user_info_by_login(&query.login)
        .await?
        .ok_or_not_found()?;
    Ok(Json(info))
}
