//! Logger setup
//!
//! A stderr console logger is installed before anything else runs, so
//! configuration loading is logged too. Once the configuration is known the
//! logger is switched to the log4rs file it names.

use std::path::Path;

use log::{info, warn, LevelFilter};
use log4rs::append::console::{ConsoleAppender, Target};
use log4rs::config::{Appender, Config, Deserializers, Root};
use log4rs::encode::pattern::PatternEncoder;
use log4rs::Handle;

const CONSOLE_PATTERN: &str = "{d(%Y-%m-%d %H:%M:%S%.3f)} {h({l})} [{X(op)(-)}:{X(key)(-)}] {t} - {m}{n}";

/// Console-only configuration used until the log config file is loaded
pub fn bootstrap_config() -> Result<Config, log4rs::config::runtime::ConfigErrors> {
    let stderr = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(CONSOLE_PATTERN)))
        .build();

    Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(stderr)))
        .build(Root::builder().appender("stderr").build(LevelFilter::Info))
}

/// Install the bootstrap logger
pub fn init() -> Result<Handle, String> {
    let config = bootstrap_config().map_err(|e| e.to_string())?;
    log4rs::init_config(config).map_err(|e| e.to_string())
}

/// Read a log4rs YAML file; `None` when it is absent or invalid
pub fn load_file_config(config_file: &str) -> Option<Config> {
    if !Path::new(config_file).exists() {
        warn!("Log config {} not found, logging to stderr", config_file);
        return None;
    }
    match log4rs::config::load_config_file(config_file, Deserializers::default()) {
        Ok(config) => Some(config),
        Err(e) => {
            warn!("Failed to load log config {}: {}. Logging to stderr", config_file, e);
            None
        }
    }
}

/// Switch the running logger to `config_file` when it can be loaded
pub fn apply_file_config(handle: &Handle, config_file: &str) {
    if let Some(config) = load_file_config(config_file) {
        handle.set_config(config);
        info!("Logging configured from {}", config_file);
    }
}
