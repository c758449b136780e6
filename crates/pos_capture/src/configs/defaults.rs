use common_enums::Currency;

use crate::consts;

impl Default for super::settings::Backend {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080/api".into(),
            request_timeout: consts::DEFAULT_BACKEND_TIMEOUT.as_secs(),
        }
    }
}

impl Default for super::settings::Payments {
    fn default() -> Self {
        Self {
            currency: Currency::Gbp,
            country: "GB".into(),
            merchant_label: "Appointment payment".into(),
        }
    }
}

impl Default for super::settings::Polling {
    fn default() -> Self {
        Self {
            interval_ms: u64::try_from(consts::DEFAULT_POLL_INTERVAL.as_millis())
                .unwrap_or(1_500),
            timeout_secs: consts::DEFAULT_POLL_TIMEOUT.as_secs(),
        }
    }
}
