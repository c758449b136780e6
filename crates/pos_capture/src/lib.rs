#![forbid(unsafe_code)]
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR" ), "/", "README.md"))]

pub mod configs;
pub mod consts;
pub mod core;
pub mod services;
pub mod types;

pub mod env {
    pub use router_env::*;
}
pub(crate) use self::env::logger;

use common_utils::errors::CustomResult;

/// Install the global tracing subscriber described by `conf.log`.
///
/// Keep the returned guard alive for as long as logs should be flushed.
pub fn setup_logging(
    conf: &configs::settings::Settings,
) -> CustomResult<env::TelemetryGuard, env::LoggerError> {
    env::setup(
        &conf.log,
        consts::SERVICE_NAME,
        [consts::SERVICE_NAME, "api_models", "common_utils"],
    )
}
