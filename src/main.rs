mod app;
mod config;
mod db;
mod error;
mod schema;
mod state;
mod users;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "users_service=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    let app_state = AppState::init()?;

    // Table provisioning runs alongside the listener; requests are not held back.
    let store = app_state.store.clone();
    let policy = app_state.config.schema_retry;
    tokio::spawn(async move {
        schema::ensure_users_table(store.as_ref(), &policy).await;
    });

    let config = app_state.config.clone();
    let store = app_state.store.clone();
    let result = app::serve(app::build_app(app_state), &config).await;

    store.close().await;
    tracing::info!("server stopped");
    result
}
