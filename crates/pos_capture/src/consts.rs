use std::time::Duration;

pub const SERVICE_NAME: &str = "pos_capture";

/// Prefix of the per-attempt id attached to authorization metadata and spans.
pub const ATTEMPT_ID_PREFIX: &str = "att";

pub(crate) const METADATA_DEVICE_TYPE: &str = "deviceType";
pub(crate) const METADATA_ATTEMPT_ID: &str = "attemptId";
pub(crate) const METADATA_SERVICE_NAME: &str = "serviceName";

pub const DEFAULT_BACKEND_TIMEOUT: Duration = Duration::from_secs(15);
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1_500);
pub const DEFAULT_POLL_TIMEOUT: Duration = Duration::from_secs(90);

// User-facing reasons
pub const PROVIDER_SETUP_FAILED: &str =
    "Payments could not be set up on this device. Refresh the page and try again.";
pub const WALLET_API_MISSING: &str =
    "This device cannot show a digital wallet. Use a phone or browser with Apple Pay or Google Pay.";
pub const WALLET_UNAVAILABLE: &str =
    "No digital wallet is available on this device. Add a card to the wallet and try again.";
pub const WALLET_CHECK_FAILED: &str = "Could not check which wallets this device supports.";
pub const AUTHORIZATION_FAILED: &str = "The payment could not be started. Please try again.";
pub const SHEET_FAILED: &str = "The wallet sheet could not be shown.";
pub const SHEET_DISMISSED: &str = "Payment was canceled or no payment method was provided.";
pub const CONFIRMATION_FAILED: &str = "The payment method could not be confirmed.";
pub const PAYMENT_DECLINED: &str = "The payment method was declined.";
pub const STEP_UP_FAILED: &str = "Additional authentication was not completed.";
pub const CAPTURE_CONFIRMATION_FAILED: &str =
    "Captured client-side, but capture confirmation failed server-side.";
pub const PROCESSOR_TIMEOUT: &str = "Timed out waiting for the processor.";
pub const PAYMENT_CANCELED: &str = "Payment canceled.";
