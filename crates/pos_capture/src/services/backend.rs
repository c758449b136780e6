use api_models::{
    appointments::ScheduledServiceRecord,
    payments::{
        AuthorizationStatusResponse, CaptureConfirmRequest, CaptureConfirmResponse,
        CreateAuthorizationRequest, CreateAuthorizationResponse, PaymentsConfigResponse,
    },
};
use async_trait::async_trait;

use crate::core::errors::{ApiClientError, CustomResult};

/// Calls the point of sale makes against the payments backend.
///
/// Nothing here is retried. Authorization creation and capture confirmation
/// are not idempotent; the status read is, and only the polling loop repeats it.
#[async_trait]
pub trait PaymentsBackend: Send + Sync {
    /// `GET /payments/config`
    async fn payments_config(&self) -> CustomResult<PaymentsConfigResponse, ApiClientError>;

    /// `GET /payments/appointments/today`
    async fn todays_appointments(
        &self,
    ) -> CustomResult<Vec<ScheduledServiceRecord>, ApiClientError>;

    /// `POST /payments/intents`
    async fn create_authorization(
        &self,
        request: &CreateAuthorizationRequest,
    ) -> CustomResult<CreateAuthorizationResponse, ApiClientError>;

    /// `POST /payments/confirm`
    async fn confirm_capture(
        &self,
        request: &CaptureConfirmRequest,
    ) -> CustomResult<CaptureConfirmResponse, ApiClientError>;

    /// `GET /payments/status/{authorizationId}`
    async fn authorization_status(
        &self,
        authorization_id: &str,
    ) -> CustomResult<AuthorizationStatusResponse, ApiClientError>;
}
