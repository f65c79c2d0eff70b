//! Compile-time build information.

include!(concat!(env!("OUT_DIR"), "/build_info.rs"));

/// `flapattack <date> (<commit>)`, as printed by `--version`.
pub fn version_line() -> String {
    format!("flapattack {} ({})", BUILD_DATE, BUILD_COMMIT)
}
