//!
//! Current environment related stuff.
//!

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Parent dir where Cargo.toml is stored
pub const CARGO_MANIFEST_DIR: &str = "CARGO_MANIFEST_DIR";
/// Env variable that sets Development/Production env
pub const RUN_ENV: &str = "RUN_ENV";

///
/// Current environment.
///
#[derive(
    Debug, Default, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Display, EnumString,
)]
pub enum Env {
    /// Development environment.
    #[default]
    Development,
    /// Sandbox environment.
    Sandbox,
    /// Production environment.
    Production,
}

impl Env {
    /// Name of the config file for this environment, without extension.
    pub fn config_file_stem(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Sandbox => "sandbox",
            Self::Production => "production",
        }
    }

    /// Whether the environment serves real card holders.
    pub fn is_production(self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Name of current environment. Either "Development", "Sandbox" or "Production".
///
/// Release builds default to `Production` when `RUN_ENV` is unset or unparsable.
pub fn which() -> Env {
    #[cfg(debug_assertions)]
    let default_env = Env::Development;
    #[cfg(not(debug_assertions))]
    let default_env = Env::Production;

    std::env::var(RUN_ENV).map_or_else(|_| default_env, |v| v.parse().unwrap_or(default_env))
}

///
/// Base path to look for config and logs directories.
///
/// The workspace keeps `./config/` and `./logs/` at its root, while `cargo` may be
/// invoked from the root or from a crate directory. When `CARGO_MANIFEST_DIR` is
/// set it points at `crates/<name>`, so two levels up is the workspace root.
///
pub fn workspace_path() -> PathBuf {
    if let Ok(manifest_dir) = std::env::var(CARGO_MANIFEST_DIR) {
        let mut path = PathBuf::from(manifest_dir);
        path.pop();
        path.pop();
        path
    } else {
        PathBuf::from(".")
    }
}
