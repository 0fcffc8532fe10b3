use anyhow::Result;
use budgetcents::{
    api::{routes, AppState},
    config::Config,
    sheets::GoogleSheetsFetcher,
};
use reqwest::Client;
use std::{env, sync::Arc};
use tracing::{info, Level};
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(log_level.parse().unwrap_or(Level::INFO.into())),
        )
        .init();
    info!("startup");

    // ─── 2) config ───────────────────────────────────────────────────
    let config = Config::from_env()?;

    // ─── 3) sheets fetcher + routes ──────────────────────────────────
    let fetcher = GoogleSheetsFetcher::new(
        Client::new(),
        config.sheets_api_base.clone(),
        config.service_account.clone(),
    );
    let state = Arc::new(AppState::new(config.spreadsheet_id.clone(), fetcher));

    info!("Server starting on port {}", config.port);
    info!("Health check: http://localhost:{}/health", config.port);
    info!(
        "Budget: GET http://localhost:{}/api/google-sheets/budget",
        config.port
    );
    info!(
        "Membership: GET http://localhost:{}/api/google-sheets/membershipStructure",
        config.port
    );

    warp::serve(routes(state))
        .run(([0, 0, 0, 0], config.port))
        .await;

    Ok(())
}
