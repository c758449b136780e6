use common_enums::{AuthorizationStatus, FailureKind};
use error_stack::{report, ResultExt};
use masking::{ClientSecret, Secret};
use router_env::{instrument, tracing, Flow, Tag};

use crate::{
    consts,
    core::{
        errors::{AttemptError, CustomResult, ProviderError},
        provider::WalletSdk,
    },
    logger,
    types::{
        Authorization, ConfirmAuthorizationRequest, PaymentMethodEvent, SheetCompletion,
    },
};

/// Confirm the authorization with the payment method from the sheet, running
/// step-up when asked, then close the sheet with the outcome.
///
/// Always runs to completion; cancellation is examined by the caller afterwards.
#[instrument(skip_all, fields(flow = %Flow::AuthorizationConfirm))]
pub(in crate::core::orchestrator) async fn confirm_payment_method(
    sdk: &dyn WalletSdk,
    authorization: &Authorization,
    event: PaymentMethodEvent,
) -> CustomResult<AuthorizationStatus, AttemptError> {
    let request = ConfirmAuthorizationRequest {
        payment_method_id: event.payment_method.id.clone(),
        allow_redirect: false,
    };

    let confirmation = confirm_with_step_up(sdk, &authorization.client_secret, &request).await;

    match confirmation {
        Ok(status) if is_accepted(status) => {
            event.complete(SheetCompletion::Success);
            logger::info!(%status, "payment method accepted");
            Ok(status)
        }
        Ok(status) => {
            event.complete(SheetCompletion::Fail);
            Err(report!(AttemptError::new(
                FailureKind::Confirmation,
                consts::PAYMENT_DECLINED
            )))
            .attach_printable_lazy(|| format!("Confirmation ended in status {status}"))
        }
        Err(error) => {
            event.complete(SheetCompletion::Fail);
            Err(error)
        }
    }
}

async fn confirm_with_step_up(
    sdk: &dyn WalletSdk,
    client_secret: &Secret<String, ClientSecret>,
    request: &ConfirmAuthorizationRequest,
) -> CustomResult<AuthorizationStatus, AttemptError> {
    logger::info!(tag = ?Tag::InitiatedToProvider, "confirming authorization");
    let status = sdk
        .confirm_authorization(client_secret, request)
        .await
        .map_err(|report| {
            let reason = reason_from(report.current_context(), consts::CONFIRMATION_FAILED);
            report.change_context(AttemptError::new(FailureKind::Confirmation, reason))
        })?;

    if status != AuthorizationStatus::RequiresAction {
        return Ok(status);
    }
    step_up(sdk, client_secret).await
}

#[instrument(skip_all, fields(flow = %Flow::StepUpAuthentication))]
async fn step_up(
    sdk: &dyn WalletSdk,
    client_secret: &Secret<String, ClientSecret>,
) -> CustomResult<AuthorizationStatus, AttemptError> {
    logger::info!("processor requested additional authentication");
    let status = sdk.handle_next_action(client_secret).await.map_err(|report| {
        let reason = reason_from(report.current_context(), consts::STEP_UP_FAILED);
        report.change_context(AttemptError::new(FailureKind::Confirmation, reason))
    })?;

    if is_accepted(status) {
        Ok(status)
    } else {
        Err(report!(AttemptError::new(
            FailureKind::Confirmation,
            consts::STEP_UP_FAILED
        )))
        .attach_printable_lazy(|| format!("Step-up ended in status {status}"))
    }
}

/// Statuses in which the processor holds the payment method.
fn is_accepted(status: AuthorizationStatus) -> bool {
    status.is_authorized() || status == AuthorizationStatus::Processing
}

fn reason_from(error: &ProviderError, fallback: &str) -> String {
    error.user_message().unwrap_or(fallback).to_owned()
}
