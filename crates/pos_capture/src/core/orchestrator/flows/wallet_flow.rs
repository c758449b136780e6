use common_enums::FailureKind;
use error_stack::{report, ResultExt};
use router_env::{instrument, tracing, Flow, Tag};

use super::Attempt;
use crate::{
    consts,
    core::{
        errors::{AttemptError, CustomResult},
        orchestrator::{CancellationToken, CaptureConfig},
        provider::{PaymentProviderClient, WalletSdk},
    },
    logger,
    types::{PaymentMethodEvent, PaymentSheetRequest, SheetOutcome, WalletAvailabilityQuery},
};

/// Fail the attempt when no wallet can be presented. There is no other way
/// to collect a payment method.
pub(in crate::core::orchestrator) async fn ensure_wallet_available(
    provider: &PaymentProviderClient,
    attempt: &Attempt,
    config: &CaptureConfig,
) -> CustomResult<(), AttemptError> {
    let query = WalletAvailabilityQuery {
        country: config.country.clone(),
        currency: config.currency,
        amount: attempt.total,
        label: config.merchant_label.clone(),
    };

    let availability = provider
        .wallet_availability(&query)
        .await
        .change_context(AttemptError::new(
            FailureKind::Capability,
            consts::WALLET_CHECK_FAILED,
        ))?;

    match availability {
        Some(availability) => {
            logger::debug!(wallets = ?availability.wallets);
            Ok(())
        }
        None => Err(report!(AttemptError::new(
            FailureKind::Capability,
            consts::WALLET_UNAVAILABLE
        ))),
    }
}

/// Show the wallet sheet and wait for the customer, or for staff to cancel.
#[instrument(skip_all, fields(flow = %Flow::WalletSheet))]
pub(in crate::core::orchestrator) async fn collect_payment_method(
    sdk: &dyn WalletSdk,
    attempt: &Attempt,
    config: &CaptureConfig,
    token: &CancellationToken,
) -> CustomResult<PaymentMethodEvent, AttemptError> {
    let request = PaymentSheetRequest {
        country: config.country.clone(),
        currency: config.currency,
        total: attempt.total,
        label: config.merchant_label.clone(),
    };

    logger::info!(tag = ?Tag::InitiatedToProvider, "presenting wallet sheet");
    // The sheet is polled first: a payment method already handed over must be
    // confirmed even when a cancel lands in the same wake-up.
    let outcome = tokio::select! {
        biased;
        outcome = sdk.present_payment_sheet(&request) => outcome,
        () = token.cancelled() => {
            logger::info!("canceled while the wallet sheet was open");
            return Err(report!(AttemptError::canceled()));
        }
    };

    match outcome.change_context(AttemptError::new(
        FailureKind::Confirmation,
        consts::SHEET_FAILED,
    ))? {
        SheetOutcome::PaymentMethod(event) => Ok(event),
        SheetOutcome::Dismissed if token.is_cancelled() => {
            Err(report!(AttemptError::canceled()))
        }
        SheetOutcome::Dismissed => Err(report!(AttemptError::new(
            FailureKind::Confirmation,
            consts::SHEET_DISMISSED
        ))),
    }
}
