//! Headless meteor shooter
//!
//! Usage:
//! - `meteor_shooter [config.toml|config.ron]` runs the game
//! - `meteor_shooter --write-config [path]` writes the default configuration

use meteor_engine::config::Config;
use meteor_engine::foundation::logging;
use meteor_engine::Engine;
use meteor_shooter::{Autopilot, GameApp, GameConfig};
use std::path::PathBuf;

const DEFAULT_CONFIG_PATH: &str = "meteor_shooter.toml";
const WRITE_CONFIG_FLAG: &str = "--write-config";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1).peekable();
    let write_config = args.next_if(|arg| arg == WRITE_CONFIG_FLAG).is_some();
    let path = args
        .next()
        .map_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from);

    if write_config {
        GameConfig::default().save_to_file(&path)?;
        log::info!("Default configuration written to {}", path.display());
        return Ok(());
    }

    let config = if path.exists() {
        GameConfig::load_or_default(&path)
    } else {
        log::info!("No configuration at {}, using defaults", path.display());
        GameConfig::default()
    };

    let mut app = GameApp::new(config.clone()).with_autopilot(Autopilot::default());
    Engine::run(config.engine, &mut app)?;

    Ok(())
}
