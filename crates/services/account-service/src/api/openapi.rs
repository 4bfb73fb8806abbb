//! OpenAPI documentation configuration.

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::handlers::{account_handler, admin_handler};
use crate::service::AccountOutcome;
use domain::AccountInfo;

/// OpenAPI documentation for the account service
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Account Service",
        version = "0.1.0",
        description = "Account registration, login and role granting",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    ),
    servers(
        (url = "http://localhost:3000", description = "Local development server")
    ),
    paths(
        account_handler::register,
        account_handler::login,
        account_handler::grant_role,
        account_handler::update_account,
        account_handler::delete_account,
        admin_handler::get_user_info_by_id,
        admin_handler::get_user_info_by_login,
    ),
    components(
        schemas(
            AccountInfo,
            AccountOutcome,
            account_handler::RegisterRequest,
            account_handler::LoginRequest,
            account_handler::GrantRoleRequest,
            account_handler::UpdateAccountRequest,
            account_handler::DeleteAccountRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Accounts", description = "Account lifecycle"),
        (name = "Admin", description = "Account lookups for administrators")
    )
)]
pub struct ApiDoc;

/// Security scheme modifier for JWT Bearer authentication
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Session token returned by /Login"))
                        .build(),
                ),
            );
        }
    }
}
