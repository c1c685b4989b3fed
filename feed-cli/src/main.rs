mod app;

use std::path::PathBuf;
use std::sync::Arc;

use feed_core::{spawn_driver, Command, EngineConfig, FeedSession};
use tokio::runtime::Runtime;
use tokio::sync::mpsc;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::app::{AppInit, TerminalApp};

fn main() -> std::io::Result<()> {
    init_tracing();

    let runtime = Arc::new(Runtime::new()?);
    let config = load_config();
    let session = match FeedSession::new(&config) {
        Ok(session) => session,
        Err(err) => {
            error!(error = %err, "cannot start feed session");
            return Err(std::io::Error::other(err));
        }
    };
    let suggestions = session.suggested_topics().to_vec();

    let (event_tx, event_rx) = mpsc::channel(64);
    let driver = {
        let guard = runtime.enter();
        let handle = spawn_driver(session, event_tx);
        drop(guard);
        handle
    };
    if let Err(err) = runtime.block_on(driver.send(Command::LoadProfile)) {
        error!(error = %err, "driver rejected the profile load");
    }

    let init = AppInit {
        runtime,
        driver,
        events: event_rx,
        suggestions,
    };
    TerminalApp::new(init).run()
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

/// `GOVFEED_CONFIG` wins over `~/.config/govfeed/config.json`.
fn load_config() -> EngineConfig {
    match std::env::var_os("GOVFEED_CONFIG") {
        Some(path) => EngineConfig::load_from(PathBuf::from(path)),
        None => EngineConfig::load(),
    }
}
