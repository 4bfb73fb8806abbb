//! Serve command - Starts the HTTP server.

use crate::api::create_router;
use crate::cli::args::ServeArgs;
use crate::config::AccountServiceConfig;
use crate::{build_repository, build_state};
use common::{AppError, AppResult};

/// Execute the serve command
pub async fn execute(args: ServeArgs, mut config: AccountServiceConfig) -> AppResult<()> {
    tracing::info!("Starting {}...", config.service.service_name);

    if let Some(host) = args.host {
        config.service.host = host;
    }
    if let Some(port) = args.port {
        config.service.port = port;
    }

    let repo = build_repository(&config).await?;
    let app = create_router(build_state(repo, &config)?);

    let addr = config.server_addr();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind to {}: {}", addr, e)))?;

    tracing::info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::internal(format!("Server error: {}", e)))?;

    Ok(())
}
