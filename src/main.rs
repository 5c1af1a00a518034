use app::{App, Command, HELP};
use connect_four_core::engine::config::EngineConfig;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

mod app;
mod ui;

const CONFIG_ENV: &str = "CONNECT_FOUR_CONFIG";

fn load_config() -> EngineConfig {
    let Ok(path) = std::env::var(CONFIG_ENV) else {
        return EngineConfig::default();
    };
    let text = match std::fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) => {
            tracing::warn!("cannot read {path}: {err}, using defaults");
            return EngineConfig::default();
        }
    };
    match EngineConfig::load_from_json(&text) {
        Ok(config) => {
            tracing::info!("loaded engine config from {path}");
            config
        }
        Err(err) => {
            tracing::warn!("invalid config {path}: {err}, using defaults");
            EngineConfig::default()
        }
    }
}

fn main() {
    // initialize tracing; the engine's `log` records are forwarded
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let config = load_config();
    match serde_json::to_string(&config) {
        Ok(json) => tracing::debug!("engine config: {json}"),
        Err(err) => tracing::debug!("engine config not printable: {err}"),
    }

    let demo = std::env::args().skip(1).any(|arg| arg == "--demo");
    println!("{HELP}");
    let mut app = App::new(Arc::new(config), std::io::stdout().lock(), true);
    if demo {
        app.handle(Command::Demo);
    }

    let stdin = std::io::stdin();
    if let Err(err) = app.run(stdin.lock()) {
        tracing::error!("input error: {err}");
        std::process::exit(1);
    }
    let board = app.game().state();
    tracing::info!(moves = app.game().moves(), result = %board.winner(), "bye");
}
