use api_models::payments::CaptureConfirmRequest;
use common_enums::FailureKind;
use router_env::{instrument, tracing, Flow};

use crate::{
    consts,
    core::errors::{AttemptError, CustomResult},
    logger,
    services::PaymentsBackend,
    types::CaptureSnapshot,
};

/// Capture a confirmed authorization on the backend.
///
/// The customer has already authenticated on the device, so a failure here
/// leaves funds held without a receipt and needs reconciling.
#[instrument(skip_all, fields(flow = %Flow::ManualCapture))]
pub(in crate::core::orchestrator) async fn capture_authorization(
    backend: &dyn PaymentsBackend,
    authorization_id: &str,
) -> CustomResult<CaptureSnapshot, AttemptError> {
    let request = CaptureConfirmRequest {
        authorization_id: authorization_id.to_owned(),
    };

    let response = backend.confirm_capture(&request).await.map_err(|report| {
        let reason = match report.current_context().backend_reason() {
            Some(detail) => format!("{} {detail}", consts::CAPTURE_CONFIRMATION_FAILED),
            None => consts::CAPTURE_CONFIRMATION_FAILED.to_string(),
        };
        report.change_context(AttemptError::new(FailureKind::CaptureConfirmation, reason))
    })?;

    logger::info!(receipt_number = %response.receipt_number, "payment captured");
    Ok(CaptureSnapshot::from(response))
}
