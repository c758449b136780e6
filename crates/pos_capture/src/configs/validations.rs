use common_utils::fp_utils::when;

use crate::core::errors::{ApplicationError, ApplicationResult};

impl super::settings::Backend {
    pub fn validate(&self) -> ApplicationResult<()> {
        when(self.base_url.trim().is_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "backend base URL must not be empty".into(),
            ))
        })?;

        when(reqwest::Url::parse(&self.base_url).is_err(), || {
            Err(ApplicationError::InvalidConfigurationValueError(format!(
                "backend base URL {:?} is not a valid URL",
                self.base_url
            )))
        })?;

        when(self.request_timeout == 0, || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "backend request timeout must be greater than 0".into(),
            ))
        })
        .map_err(Into::into)
    }
}

impl super::settings::Payments {
    pub fn validate(&self) -> ApplicationResult<()> {
        when(
            self.country.len() != 2 || !self.country.chars().all(|c| c.is_ascii_uppercase()),
            || {
                Err(ApplicationError::InvalidConfigurationValueError(format!(
                    "payments country {:?} must be a two letter upper-case country code",
                    self.country
                )))
            },
        )?;

        when(self.merchant_label.trim().is_empty(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "merchant label must not be empty".into(),
            ))
        })
        .map_err(Into::into)
    }
}

impl super::settings::Polling {
    pub fn validate(&self) -> ApplicationResult<()> {
        when(self.interval_ms == 0, || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "polling interval must be greater than 0".into(),
            ))
        })?;

        when(self.interval() >= self.timeout(), || {
            Err(ApplicationError::InvalidConfigurationValueError(
                "polling timeout must be longer than the polling interval".into(),
            ))
        })
        .map_err(Into::into)
    }
}

impl super::settings::Capability {
    pub fn validate(&self) -> ApplicationResult<()> {
        when(
            self.allow_local_override && self.trusted_local_hosts.is_empty(),
            || {
                Err(ApplicationError::InvalidConfigurationValueError(
                    "local capability override needs at least one trusted local host".into(),
                ))
            },
        )
        .map_err(Into::into)
    }
}
