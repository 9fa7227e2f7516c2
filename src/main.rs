use anyhow::Context;

mod config;
mod menu;
mod nutrition;
mod sheets;
mod state;
mod tracker;

use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter =
        std::env::var("RUST_LOG").unwrap_or_else(|_| "macrolog=info".to_string());
    // Logs go to stderr so they never interleave with the menu.
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let state = AppState::init().await.context("start up gateways")?;
    tracing::info!(
        "connected to spreadsheet {}",
        state.config.sheets.spreadsheet_id
    );

    menu::run(&state).await
}
