//! Logger setup for the terminal binary.
//!
//! The terminal is owned by the UI while the game runs, so log output goes
//! to a file in the data directory. `RUST_LOG` overrides the `warn` default.

use env_logger::{Builder, Env, Target};
use log::LevelFilter;
use std::fs::OpenOptions;
use std::path::Path;

/// Route logs to `path`, or disable logging if it cannot be opened.
pub fn init(path: Option<&Path>) {
    let mut builder = Builder::from_env(Env::default().default_filter_or("warn"));
    builder.format_timestamp_millis();

    let file = path.and_then(|p| OpenOptions::new().create(true).append(true).open(p).ok());
    match file {
        Some(file) => {
            builder.target(Target::Pipe(Box::new(file)));
        }
        None => {
            builder.filter_level(LevelFilter::Off);
        }
    }

    // A logger may already be installed (tests, embedding); keep it.
    let _ = builder.try_init();
}
