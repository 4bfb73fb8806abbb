//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use common::AppError;
use domain::{BEARER_TOKEN_PREFIX, ROLE_ADMIN};

/// Caller identity taken from a verified session token
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub role: Option<String>,
}

impl CurrentUser {
    pub fn is_admin(&self) -> bool {
        self.role.as_deref() == Some(ROLE_ADMIN)
    }
}

/// Verify the `Authorization: Bearer` token and store the caller in the
/// request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .ok_or(AppError::Unauthorized)?;

    let claims = state.accounts.verify_token(token)?;

    request
        .extensions_mut()
        .insert(CurrentUser { role: claims.role });

    Ok(next.run(request).await)
}

/// Require admin role, returns Forbidden error if not admin.
pub fn require_admin(user: &CurrentUser) -> Result<(), AppError> {
    if user.is_admin() {
        Ok(())
    } else {
        tracing::warn!("Non-admin caller rejected (role {:?})", user.role);
        Err(AppError::Forbidden)
    }
}
