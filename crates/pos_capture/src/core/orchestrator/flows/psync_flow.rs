use std::time::Duration;

use common_enums::{AuthorizationStatus, FailureKind};
use error_stack::{report, ResultExt};
use router_env::{instrument, tracing, Flow};
use tokio::time::Instant;

use super::ensure_not_cancelled;
use crate::{
    configs::settings::Polling,
    consts,
    core::{
        errors::{AttemptError, CustomResult},
        orchestrator::CancellationToken,
    },
    logger,
    services::PaymentsBackend,
    types::CaptureSnapshot,
};

#[derive(Debug)]
pub(in crate::core::orchestrator) enum PollOutcome {
    /// Authorized and waiting for the manual capture.
    CaptureRequired,
    /// The backend already finished the payment.
    Settled(CaptureSnapshot),
}

/// Poll the authorization status until the processor settles it.
///
/// Request errors are logged and polled through; only the timeout or a
/// terminal status ends the loop.
#[instrument(skip_all, fields(flow = %Flow::StatusPoll))]
pub(in crate::core::orchestrator) async fn poll_until_settled(
    backend: &dyn PaymentsBackend,
    authorization_id: &str,
    polling: &Polling,
    token: &CancellationToken,
) -> CustomResult<PollOutcome, AttemptError> {
    let interval = polling.interval().max(Duration::from_millis(1));
    let deadline = Instant::now() + polling.timeout();
    let mut polls = 0_u32;

    loop {
        tokio::select! {
            biased;
            () = token.cancelled() => return Err(report!(AttemptError::canceled())),
            () = tokio::time::sleep(interval) => {}
        }
        ensure_not_cancelled(token)?;
        polls = polls.saturating_add(1);

        match backend.authorization_status(authorization_id).await {
            Ok(response) => match response.status {
                AuthorizationStatus::RequiresCapture => {
                    logger::info!(polls, "authorization ready for capture");
                    return Ok(PollOutcome::CaptureRequired);
                }
                AuthorizationStatus::Succeeded => {
                    logger::info!(polls, "authorization settled by the backend");
                    return Ok(PollOutcome::Settled(CaptureSnapshot::from(response)));
                }
                AuthorizationStatus::Failed | AuthorizationStatus::Canceled => {
                    let reason = response
                        .error
                        .filter(|error| !error.trim().is_empty())
                        .unwrap_or_else(|| consts::PAYMENT_DECLINED.to_string());
                    return Err(report!(AttemptError::new(FailureKind::Confirmation, reason)))
                        .attach_printable_lazy(|| {
                            format!("Processor reported {}", response.status)
                        });
                }
                status => logger::debug!(%status, polls, "authorization still pending"),
            },
            Err(error) => logger::warn!(?error, polls, "status poll failed"),
        }

        if Instant::now() >= deadline {
            return Err(report!(AttemptError::new(
                FailureKind::Confirmation,
                consts::PROCESSOR_TIMEOUT
            )))
            .attach_printable_lazy(|| format!("Gave up after {polls} polls"));
        }
    }
}
