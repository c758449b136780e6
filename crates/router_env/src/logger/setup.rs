//!
//! Setup logging subsystem.
//!

use error_stack::ResultExt;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{
    filter, fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer,
};

use crate::{config, Level};

/// Keeps the non-blocking log writers alive; logs are flushed when it is dropped.
#[derive(Debug)]
pub struct TelemetryGuard {
    _log_guards: Vec<WorkerGuard>,
}

/// Failure while installing the global subscriber.
#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// A global subscriber was already installed, or the registry refused the layers.
    #[error("Failed to install the global tracing subscriber")]
    SubscriberInit,
}

///
/// Setup logging sub-system specifying.
/// Expects config and list of names of crates to watch.
///
/// `RUST_LOG` overrides the configured levels.
///
pub fn setup<Str: AsRef<str>>(
    conf: &config::Log,
    service_name: &str,
    crates_to_watch: impl IntoIterator<Item = Str>,
) -> error_stack::Result<TelemetryGuard, LoggerError> {
    let mut guards = Vec::new();

    let file_layer = if conf.file.enabled {
        let mut path = crate::env::workspace_path();
        path.push(&conf.file.path);
        let file_appender = tracing_appender::rolling::hourly(&path, &conf.file.file_name);
        let (file_writer, guard) = tracing_appender::non_blocking(file_appender);
        guards.push(guard);

        let file_filter = filter::Targets::new().with_default(conf.file.level.into_level());
        Some(
            fmt::layer()
                .json()
                .with_current_span(true)
                .with_writer(file_writer)
                .with_filter(file_filter),
        )
    } else {
        None
    };

    let console_layer = if conf.console.enabled {
        let (console_writer, guard) = tracing_appender::non_blocking(std::io::stdout());
        guards.push(guard);

        let level = conf.console.level.into_level();
        let mut console_filter = filter::Targets::new().with_default(Level::WARN);
        for acrate in crates_to_watch {
            console_filter = console_filter.with_target(acrate.as_ref().to_owned(), level);
        }

        let layer = match conf.console.log_format {
            config::LogFormat::Default => fmt::layer()
                .with_timer(fmt::time::uptime())
                .with_span_events(fmt::format::FmtSpan::CLOSE)
                .pretty()
                .with_writer(console_writer)
                .with_filter(console_filter)
                .boxed(),
            config::LogFormat::Json => fmt::layer()
                .json()
                .with_current_span(true)
                .with_span_list(false)
                .with_writer(console_writer)
                .with_filter(console_filter)
                .boxed(),
        };
        Some(layer)
    } else {
        None
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::TRACE.into())
                .from_env_lossy(),
        )
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .change_context(LoggerError::SubscriberInit)
        .attach_printable_lazy(|| format!("Logger setup failed for service {service_name}"))?;

    Ok(TelemetryGuard {
        _log_guards: guards,
    })
}
