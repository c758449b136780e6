use std::{collections::HashSet, path::PathBuf, time::Duration};

use common_enums::Currency;
use error_stack::ResultExt;
use router_env::{config as router_config, env, logger};
use serde::Deserialize;

use crate::core::errors::{ApplicationError, ApplicationResult};

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Settings {
    pub backend: Backend,
    pub payments: Payments,
    pub polling: Polling,
    pub capability: Capability,
    pub log: router_config::Log,
}

/// Payments backend the point of sale talks to.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Backend {
    /// Base URL the `/payments/...` paths are appended to.
    pub base_url: String,
    /// Per-request timeout in seconds.
    pub request_timeout: u64,
}

impl Backend {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Payments {
    pub currency: Currency,
    /// ISO 3166-1 alpha-2 country of the merchant, used for wallet availability.
    pub country: String,
    /// Label shown on the wallet sheet.
    pub merchant_label: String,
}

/// Status polling while the processor finishes a confirmation.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct Polling {
    pub interval_ms: u64,
    pub timeout_secs: u64,
}

impl Polling {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct Capability {
    /// Lets trusted local origins bypass the device capability warnings.
    /// Never honoured in production.
    pub allow_local_override: bool,
    pub trusted_local_hosts: HashSet<String>,
}

impl Settings {
    pub fn new() -> ApplicationResult<Self> {
        Self::with_config_path(None)
    }

    pub fn with_config_path(config_path: Option<PathBuf>) -> ApplicationResult<Self> {
        let environment = env::which();
        let config_path = router_config::Config::config_path(environment, config_path);

        let config = config::Config::builder()
            .add_source(config::File::from(config_path).required(false))
            .add_source(
                config::Environment::with_prefix("POS_CAPTURE")
                    .try_parsing(true)
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("capability.trusted_local_hosts"),
            )
            .build()
            .change_context(ApplicationError::ConfigurationError)?;

        config
            .try_deserialize::<Self>()
            .map_err(|error| {
                logger::error!(?error, "unable to deserialize application configuration");
                error
            })
            .change_context(ApplicationError::ConfigurationError)
    }

    pub fn validate(&self) -> ApplicationResult<()> {
        self.backend.validate()?;
        self.payments.validate()?;
        self.polling.validate()?;
        self.capability.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn defaults_are_valid() {
        let settings = Settings::default();
        settings.validate().unwrap();
        assert_eq!(settings.payments.currency, Currency::Gbp);
        assert!(!settings.capability.allow_local_override);
    }

    #[test]
    fn missing_config_file_falls_back_to_defaults() {
        let settings =
            Settings::with_config_path(Some(PathBuf::from("/nonexistent/pos_capture.toml")))
                .unwrap();
        assert_eq!(settings.polling.interval(), crate::consts::DEFAULT_POLL_INTERVAL);
    }
}
