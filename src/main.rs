mod airtable;
mod app;
mod chat;
mod config;
mod error;
mod planning;
mod recipes;
mod shopping;
mod state;
mod timestamp;
mod webhook;

#[cfg(test)]
mod testing;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    app::init_tracing();

    let config = AppConfig::from_env()?;
    let app_state = AppState::init(config)?;
    let config = app_state.config.clone();

    let app = app::build_app(app_state);
    app::serve(app, &config).await
}
