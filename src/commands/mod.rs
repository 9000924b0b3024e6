//! Top-level command orchestration.
pub mod install;

/// Version string shown in the banner and the log header.
#[must_use]
pub fn version() -> &'static str {
    option_env!("VIMFILES_VERSION").unwrap_or(env!("CARGO_PKG_VERSION"))
}
