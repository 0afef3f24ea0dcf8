//! driftfield window
//!
//! Runs the particle field in its own window.
//!
//! Usage: `driftfield [config.json]`

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use driftfield::{AmbientField, FieldConfig};

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = match env::args().nth(1).map(PathBuf::from) {
        Some(path) => match FieldConfig::load(&path) {
            Ok(config) => config,
            Err(e) => {
                log::error!("failed to load config from {}: {e}", path.display());
                return ExitCode::FAILURE;
            }
        },
        None => FieldConfig::default(),
    };

    match AmbientField::new().with_config(config).run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
