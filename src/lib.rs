pub mod classifier;
mod cli;
pub mod coordinator;
pub mod events;
pub mod export;
pub mod gesture;
pub mod layout;
pub mod metrics;
pub mod models;
pub mod scoring;
pub mod scroll;
pub mod sensing;
pub mod session;
pub mod settings;
pub mod text;
mod utils;

use clap::Parser;

pub use models::{DisplayMode, GazeMode};
pub use session::{ReaderEvent, SessionController, SessionSnapshot};
pub use settings::{ReaderSettings, SettingsStore};

pub fn run() -> anyhow::Result<()> {
    // Initialize logging (reads RUST_LOG env var)
    let level = if settings::debug_mode() {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    env_logger::Builder::from_default_env()
        .filter_level(level)
        .init();

    log::info!("skimreader starting up...");

    let cli = cli::Cli::parse();
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    runtime.block_on(cli::execute(cli))
}
