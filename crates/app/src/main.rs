//! Parichat - private chat for two
//!
//! Terminal client for a simulated two-person chat room. Partner presence and
//! replies are generated locally; nothing leaves the process.

use std::path::PathBuf;
use std::sync::Arc;

use parichat_core::ChatConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod console;
mod state;
mod viewmodel;

fn main() {
    // Logs go to stderr so they do not interleave with the chat on stdout
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    tracing::info!("Starting Parichat");

    let config_path = std::env::args_os()
        .nth(1)
        .or_else(|| std::env::var_os("PARICHAT_CONFIG"))
        .map(PathBuf::from);

    let config = match ChatConfig::load_or_default(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load config: {}", e);
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Runtime::new().expect("Failed to create tokio runtime");
    let app_state = Arc::new(state::AppState::new(config));

    if let Err(e) = runtime.block_on(console::run(app_state)) {
        tracing::error!("Terminal error: {}", e);
        std::process::exit(1);
    }
}
