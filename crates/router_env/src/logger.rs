//!
//! Logger of the system.
//!

pub use tracing::{debug, error, event as log, info, trace, warn};

pub mod config;
mod setup;
pub mod types;

pub use self::{
    config::{Config, Log, LogFormat},
    setup::{setup, LoggerError, TelemetryGuard},
    types::{Flow, Level, Tag},
};
