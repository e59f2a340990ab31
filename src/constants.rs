//! App-wide constants.
//!
//! Centralises the tool name, config file locations and environment
//! variable naming so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "iniq";

/// Crate version, baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Compilation target triple (exported by `build.rs`).
pub const TARGET: &str = env!("TARGET");

/// Config file name without extension, looked up in the home directory.
pub const CONFIG_STEM: &str = ".iniq";

/// Extensions tried, in order, when discovering the config file.
pub const CONFIG_EXTENSIONS: &[&str] = &["yaml", "yml"];

/// Extension used when saving to the default location.
pub const DEFAULT_CONFIG_EXTENSION: &str = "yaml";

// ── Environment variable names ──────────────────────────────────────

/// Prefix for environment overrides: `ssh-no-root` ↔ `INIQ_SSH_NO_ROOT`.
pub const ENV_PREFIX: &str = "INIQ";
