pub mod api;
pub mod catalog;
pub mod config;
pub mod error;
pub mod list;
pub mod models;
pub mod screens;
pub mod state;
pub mod ui;
pub mod validation;

pub use config::AdminConfig;
pub use error::{AppError, AppResult};
pub use state::AppState;

/// Install the global logger: Debug when `debug` is set, Info otherwise.
/// `RUST_LOG` still wins when present. Safe to call more than once.
pub fn init_logging(debug: bool) {
    let level = if debug {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Info
    };
    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    if builder.try_init().is_err() {
        log::debug!("[Logging] Logger already installed");
    }
}
