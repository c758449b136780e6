use api_models::errors::BackendErrorResponse;
use common_enums::FailureKind;
pub use common_utils::errors::CustomResult;
use common_utils::ext_traits::BytesExt;

pub type ApplicationResult<T> = CustomResult<T, ApplicationError>;

#[derive(Debug, thiserror::Error)]
pub enum ApplicationError {
    #[error("Invalid configuration")]
    ConfigurationError,

    #[error("Invalid configuration value provided: {0}")]
    InvalidConfigurationValueError(String),
}

/// Local guard violations. Returned before any network call is made.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("Enter an amount greater than zero")]
    InvalidAmount,
    #[error("Payments are not ready on this device")]
    ProviderNotReady,
    /// Provider initialization failed for good; carries the staff-facing message.
    #[error("{0}")]
    ProviderSetupFailed(String),
    #[error("{operation} is not allowed while {state}")]
    InvalidState {
        operation: &'static str,
        state: &'static str,
    },
    #[error("A payment is already in progress")]
    AttemptInProgress,
}

/// Why a capture attempt ended without a payment.
///
/// Carried as the context of the report that ends an attempt; `reason` is
/// already phrased for staff.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {reason}")]
pub struct AttemptError {
    pub kind: FailureKind,
    pub reason: String,
}

impl AttemptError {
    pub fn new(kind: FailureKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }

    pub fn canceled() -> Self {
        Self::new(FailureKind::Canceled, crate::consts::PAYMENT_CANCELED)
    }
}

/// Errors raised by the wallet SDK or while building it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("Publishable key could not be fetched")]
    ConfigurationFetchFailed,
    #[error("Wallet SDK could not be constructed")]
    SdkConstructionFailed,
    #[error("Wallet SDK is not initialized")]
    NotInitialized,
    #[error("Payment sheet could not be presented")]
    SheetPresentationFailed,
    /// The processor rejected the request; `message` is safe to show.
    #[error("{message}")]
    Declined { message: String },
}

impl ProviderError {
    pub fn user_message(&self) -> Option<&str> {
        match self {
            Self::Declined { message } if !message.trim().is_empty() => Some(message.trim()),
            _ => None,
        }
    }
}

/// Errors talking to the payments backend.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ApiClientError {
    #[error("Client construction failed")]
    ClientConstructionFailed,
    #[error("URL encoding of request failed")]
    UrlEncodingFailed,
    #[error("Failed to send request to the payments backend: {0}")]
    RequestNotSent(String),
    #[error("Server responded with Request Timeout")]
    RequestTimeoutReceived,
    #[error("Failed to decode response")]
    ResponseDecodingFailed,
    #[error("Server responded with Bad Request")]
    BadRequestReceived(bytes::Bytes),
    #[error("Server responded with Internal Server Error")]
    InternalServerErrorReceived(bytes::Bytes),
    #[error("Unexpected state reached/Invariants conflicted")]
    UnexpectedServerResponse,
}

impl ApiClientError {
    /// Reason from the backend's `{error}` or `{message}` body, when it sent one.
    pub fn backend_reason(&self) -> Option<String> {
        match self {
            Self::BadRequestReceived(body) | Self::InternalServerErrorReceived(body) => {
                let response: BackendErrorResponse =
                    body.parse_struct("BackendErrorResponse").ok()?;
                response.reason().map(ToOwned::to_owned)
            }
            _ => None,
        }
    }
}

/// Receipt delivery failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ReceiptError {
    #[error("Receipts can only be sent for successful payments")]
    NoSuccessfulPayment,
    #[error("No {channel} contact on file for this client")]
    MissingContact { channel: &'static str },
    #[error("Receipt could not be sent")]
    DeliveryFailed,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn backend_reason_reads_error_or_message() {
        let error = ApiClientError::BadRequestReceived(bytes::Bytes::from_static(
            br#"{"error":"Appointment already paid"}"#,
        ));
        assert_eq!(
            error.backend_reason().as_deref(),
            Some("Appointment already paid")
        );

        let error = ApiClientError::InternalServerErrorReceived(bytes::Bytes::from_static(
            br#"{"message":"Processor unavailable"}"#,
        ));
        assert_eq!(
            error.backend_reason().as_deref(),
            Some("Processor unavailable")
        );

        let error =
            ApiClientError::InternalServerErrorReceived(bytes::Bytes::from_static(b"<html>"));
        assert_eq!(error.backend_reason(), None);
    }
}
