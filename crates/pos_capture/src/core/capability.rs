use common_enums::DeviceType;
use once_cell::sync::Lazy;
use regex::Regex;
use router_env::{env::Env, instrument, tracing, Flow};
use serde::Serialize;

use crate::{configs::settings::Capability, logger};

static MOBILE_USER_AGENT_REGEX: Lazy<Option<Regex>> = Lazy::new(|| {
    match Regex::new(r"(?i)\b(android|iphone|ipad|ipod|mobile|windows phone|silk|kindle)\b") {
        Ok(regex) => Some(regex),
        Err(error) => {
            logger::error!(?error, "invalid mobile user agent regex");
            None
        }
    }
});

/// Signals read from the runtime hosting the point of sale.
#[derive(Debug, Clone, Default)]
pub struct RuntimeSignals {
    pub secure_context: bool,
    pub user_agent: String,
    /// Host of the page origin, with or without a port.
    pub origin_host: String,
    pub wallet_api_present: bool,
    pub contactless_api_present: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WarningSeverity {
    /// Capture cannot succeed.
    Hard,
    /// Capture may work but the experience is degraded.
    Soft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CapabilityWarning {
    InsecureContext,
    WalletApiMissing,
    NotMobileFormFactor,
    ContactlessApiMissing,
}

impl CapabilityWarning {
    pub fn severity(self) -> WarningSeverity {
        match self {
            Self::InsecureContext | Self::WalletApiMissing => WarningSeverity::Hard,
            Self::NotMobileFormFactor | Self::ContactlessApiMissing => WarningSeverity::Soft,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Self::InsecureContext => "This page is not served over a secure connection.",
            Self::WalletApiMissing => "This browser cannot show Apple Pay or Google Pay.",
            Self::NotMobileFormFactor => "Wallet payments work best on a phone or tablet.",
            Self::ContactlessApiMissing => "Tap to pay is not available on this device.",
        }
    }
}

/// Result of a capability probe. Computed once per session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CapabilityReport {
    pub secure_context: bool,
    pub is_mobile_form_factor: bool,
    pub wallet_api_present: bool,
    pub contactless_api_present: bool,
    pub warnings: Vec<CapabilityWarning>,
    pub override_active: bool,
}

impl CapabilityReport {
    pub fn has_hard_warning(&self) -> bool {
        self.warnings
            .iter()
            .any(|warning| warning.severity() == WarningSeverity::Hard)
    }

    /// Whether a wallet sheet can be presented at all.
    pub fn allows_wallet_capture(&self) -> bool {
        self.wallet_api_present || self.override_active
    }

    pub fn device_type(&self) -> DeviceType {
        if self.is_mobile_form_factor {
            DeviceType::Mobile
        } else {
            DeviceType::Desktop
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeviceCapabilityProbe {
    settings: Capability,
    environment: Env,
}

impl DeviceCapabilityProbe {
    pub fn new(settings: Capability, environment: Env) -> Self {
        Self {
            settings,
            environment,
        }
    }

    #[instrument(skip_all, fields(flow = %Flow::CapabilityProbe))]
    pub fn probe(&self, signals: &RuntimeSignals) -> CapabilityReport {
        let is_mobile_form_factor = is_mobile_user_agent(&signals.user_agent);
        let override_active = self.override_active(&signals.origin_host);

        let mut warnings = Vec::new();
        if !override_active {
            if !signals.secure_context {
                warnings.push(CapabilityWarning::InsecureContext);
            }
            if !signals.wallet_api_present {
                warnings.push(CapabilityWarning::WalletApiMissing);
            }
            if !is_mobile_form_factor {
                warnings.push(CapabilityWarning::NotMobileFormFactor);
            }
            if !signals.contactless_api_present {
                warnings.push(CapabilityWarning::ContactlessApiMissing);
            }
        }

        logger::info!(
            secure_context = signals.secure_context,
            is_mobile_form_factor,
            wallet_api_present = signals.wallet_api_present,
            override_active,
            warnings = ?warnings
        );

        CapabilityReport {
            secure_context: signals.secure_context,
            is_mobile_form_factor,
            wallet_api_present: signals.wallet_api_present,
            contactless_api_present: signals.contactless_api_present,
            warnings,
            override_active,
        }
    }

    fn override_active(&self, origin_host: &str) -> bool {
        if !self.settings.allow_local_override {
            return false;
        }
        if self.environment.is_production() {
            logger::warn!("local capability override requested in production, ignoring");
            return false;
        }

        let host = strip_port(origin_host);
        self.settings
            .trusted_local_hosts
            .iter()
            .any(|trusted| trusted.eq_ignore_ascii_case(host))
    }
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals keep their colons.
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.rsplit_once(':')
        .filter(|(_, port)| port.chars().all(|c| c.is_ascii_digit()))
        .map_or(host, |(name, _)| name)
}

pub fn is_mobile_user_agent(user_agent: &str) -> bool {
    MOBILE_USER_AGENT_REGEX
        .as_ref()
        .is_some_and(|regex| regex.is_match(user_agent))
}
