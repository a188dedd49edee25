use std::sync::Arc;

mod app;
mod config;
mod contacts;
mod db;
mod error;
mod health;
mod state;

use crate::{config::AppConfig, contacts::SqlContactRepository, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "contact_inbox=debug,axum=info,tower_http=info".to_string());
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

    let config = Arc::new(AppConfig::from_env()?);
    let db = db::connect(&config.database).await?;

    let state = AppState::from_parts(
        config,
        Arc::new(SqlContactRepository::new(db.clone())),
    );
    let addr = state.config.listen_addr()?;

    app::serve(app::build_app(state), addr).await?;

    db.close().await;
    tracing::info!("database closed");
    Ok(())
}
