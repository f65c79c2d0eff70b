//! Utility modules: build info, on-disk persistence, logging.

pub mod build_info;
pub mod logging;
pub mod persistence;

pub use build_info::*;
pub use persistence::JsonFileStore;
