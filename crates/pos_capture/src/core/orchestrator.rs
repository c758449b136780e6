mod cancellation;
mod flows;

use std::{fmt, sync::Arc};

use api_models::appointments::ScheduledServiceRecord;
use common_enums::{AuthorizationStatus, Currency, FailureKind};
use common_utils::{
    fp_utils::when,
    generate_id_with_default_len,
    types::{MinorUnit, Percentage},
};
use error_stack::report;
use router_env::{instrument, tracing, Flow, Tag};
use serde::Serialize;

pub use self::cancellation::CancellationToken;
use self::flows::{
    authorize_flow, capture_flow, confirm_flow, ensure_not_cancelled,
    psync_flow::{self, PollOutcome},
    wallet_flow, Attempt,
};
use crate::{
    configs::settings::{Polling, Settings},
    consts,
    core::{
        amount::AmountCalculator,
        capability::CapabilityReport,
        charge::{ChargeContext, ChargeSelector},
        errors::{AttemptError, CaptureError, CustomResult},
        provider::PaymentProviderClient,
    },
    logger,
    services::PaymentsBackend,
    types::{Authorization, CaptureResult, CaptureSnapshot},
};

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, strum::Display, strum::IntoStaticStr,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CaptureState {
    #[default]
    Selecting,
    AmountEntry,
    Capturing,
    Succeeded,
    Failed,
}

/// Merchant-level values every attempt needs.
#[derive(Debug, Clone, Default)]
pub struct CaptureConfig {
    pub currency: Currency,
    pub country: String,
    pub merchant_label: String,
    pub polling: Polling,
}

impl From<&Settings> for CaptureConfig {
    fn from(settings: &Settings) -> Self {
        Self {
            currency: settings.payments.currency,
            country: settings.payments.country.clone(),
            merchant_label: settings.payments.merchant_label.clone(),
            polling: settings.polling.clone(),
        }
    }
}

/// The capture state machine.
///
/// `Selecting -> AmountEntry -> Capturing -> Succeeded | Failed`. A canceled
/// attempt goes back to `AmountEntry`; `retry` takes `Failed` back to
/// `AmountEntry` and `reset` starts over from `Selecting`.
pub struct CaptureOrchestrator {
    backend: Arc<dyn PaymentsBackend>,
    provider: Arc<PaymentProviderClient>,
    capability: CapabilityReport,
    config: CaptureConfig,
    state: CaptureState,
    charge: Option<ChargeContext>,
    amount: AmountCalculator,
    authorization: Option<Authorization>,
    result: Option<CaptureResult>,
}

impl fmt::Debug for CaptureOrchestrator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CaptureOrchestrator")
            .field("state", &self.state)
            .field("charge", &self.charge)
            .field("amount", &self.amount)
            .field("authorization", &self.authorization)
            .field("result", &self.result)
            .finish_non_exhaustive()
    }
}

impl CaptureOrchestrator {
    pub fn new(
        backend: Arc<dyn PaymentsBackend>,
        provider: Arc<PaymentProviderClient>,
        capability: CapabilityReport,
        config: CaptureConfig,
    ) -> Self {
        Self {
            backend,
            provider,
            capability,
            config,
            state: CaptureState::Selecting,
            charge: None,
            amount: AmountCalculator::default(),
            authorization: None,
            result: None,
        }
    }

    pub fn state(&self) -> CaptureState {
        self.state
    }

    pub fn charge(&self) -> Option<&ChargeContext> {
        self.charge.as_ref()
    }

    pub fn amount(&self) -> &AmountCalculator {
        &self.amount
    }

    pub fn total(&self) -> MinorUnit {
        self.amount.total()
    }

    pub fn authorization(&self) -> Option<&Authorization> {
        self.authorization.as_ref()
    }

    pub fn result(&self) -> Option<&CaptureResult> {
        self.result.as_ref()
    }

    pub fn capability(&self) -> &CapabilityReport {
        &self.capability
    }

    pub fn currency(&self) -> Currency {
        self.config.currency
    }

    /// Choose what to charge. Allowed while selecting or still entering the
    /// amount; the tip is cleared either way.
    pub fn select_charge(&mut self, charge: ChargeContext) -> CustomResult<(), CaptureError> {
        self.ensure_state(
            "selecting a charge",
            &[CaptureState::Selecting, CaptureState::AmountEntry],
        )?;

        self.amount = AmountCalculator::new(charge.base_amount);
        self.charge = Some(charge);
        self.authorization = None;
        self.result = None;
        self.state = CaptureState::AmountEntry;
        Ok(())
    }

    pub fn select_from_schedule(
        &mut self,
        record: &ScheduledServiceRecord,
    ) -> CustomResult<(), CaptureError> {
        self.select_charge(ChargeSelector::select_from_schedule(record))
    }

    pub fn select_custom(&mut self) -> CustomResult<(), CaptureError> {
        self.select_charge(ChargeSelector::select_custom())
    }

    pub fn set_base(&mut self, amount: MinorUnit) -> CustomResult<(), CaptureError> {
        self.ensure_state("changing the amount", &[CaptureState::AmountEntry])?;
        self.amount.set_base(amount);
        if let Some(charge) = self.charge.as_mut() {
            charge.base_amount = self.amount.base();
        }
        Ok(())
    }

    pub fn set_tip_percentage(&mut self, percentage: Percentage) -> CustomResult<(), CaptureError> {
        self.ensure_state("changing the tip", &[CaptureState::AmountEntry])?;
        self.amount.set_tip_percentage(percentage);
        Ok(())
    }

    pub fn set_tip_fixed(&mut self, amount: MinorUnit) -> CustomResult<(), CaptureError> {
        self.ensure_state("changing the tip", &[CaptureState::AmountEntry])?;
        self.amount.set_tip_fixed(amount);
        Ok(())
    }

    pub fn clear_tip(&mut self) -> CustomResult<(), CaptureError> {
        self.ensure_state("changing the tip", &[CaptureState::AmountEntry])?;
        self.amount.clear_tip();
        Ok(())
    }

    /// "Try again": back to amount entry with the same charge and tip.
    ///
    /// A canceled attempt is already in amount entry; retrying it only clears
    /// the previous outcome.
    pub fn retry(&mut self) -> CustomResult<(), CaptureError> {
        self.ensure_state(
            "trying again",
            &[CaptureState::Failed, CaptureState::AmountEntry],
        )?;
        self.authorization = None;
        self.result = None;
        self.state = CaptureState::AmountEntry;
        Ok(())
    }

    /// "Take another payment": clear everything and go back to selection.
    ///
    /// Also recovers an orchestrator whose capture future was dropped mid-flight.
    pub fn reset(&mut self) {
        logger::debug!(from = %self.state, "resetting capture");
        self.state = CaptureState::Selecting;
        self.charge = None;
        self.amount = AmountCalculator::default();
        self.authorization = None;
        self.result = None;
    }

    /// Run one capture attempt for the current total.
    ///
    /// Guard violations are returned as errors without touching the network.
    /// Everything after the guards ends in a [`CaptureResult`], which is also
    /// kept on the orchestrator.
    #[instrument(skip_all, fields(flow = %Flow::CaptureAttempt, attempt_id))]
    pub async fn capture(
        &mut self,
        token: &CancellationToken,
    ) -> CustomResult<CaptureResult, CaptureError> {
        when(self.state == CaptureState::Capturing, || {
            Err(report!(CaptureError::AttemptInProgress))
        })?;
        self.ensure_state("starting a payment", &[CaptureState::AmountEntry])?;
        when(!self.amount.total().is_positive(), || {
            Err(report!(CaptureError::InvalidAmount))
        })?;
        let sdk = self.provider.sdk()?;

        let attempt = Attempt {
            id: generate_id_with_default_len(consts::ATTEMPT_ID_PREFIX),
            charge: self.charge.clone().unwrap_or_default(),
            total: self.amount.total(),
            tip: self.amount.tip(),
        };
        tracing::Span::current().record("attempt_id", attempt.id.as_str());

        self.state = CaptureState::Capturing;
        self.authorization = None;
        self.result = None;

        let result = match self.run_attempt(&attempt, sdk.as_ref(), token).await {
            Ok(snapshot) => CaptureResult::Success(snapshot),
            Err(report) => {
                logger::warn!(error = ?report, "capture attempt failed");
                CaptureResult::Failure(report.current_context().into())
            }
        };

        self.state = match result.failure_kind() {
            None => CaptureState::Succeeded,
            Some(FailureKind::Canceled) => CaptureState::AmountEntry,
            Some(_) => CaptureState::Failed,
        };
        logger::info!(
            tag = ?Tag::AttemptOutcome,
            state = %self.state,
            total = %attempt.total,
            failure = ?result.failure_kind()
        );

        self.result = Some(result.clone());
        Ok(result)
    }

    async fn run_attempt(
        &mut self,
        attempt: &Attempt,
        sdk: &dyn crate::core::provider::WalletSdk,
        token: &CancellationToken,
    ) -> CustomResult<CaptureSnapshot, AttemptError> {
        when(!self.capability.allows_wallet_capture(), || {
            Err(report!(AttemptError::new(
                FailureKind::Capability,
                consts::WALLET_API_MISSING
            )))
        })?;

        let authorization = authorize_flow::create_authorization(
            self.backend.as_ref(),
            attempt,
            &self.config,
            self.capability.device_type(),
        )
        .await?;
        self.authorization = Some(authorization.clone());
        ensure_not_cancelled(token)?;

        wallet_flow::ensure_wallet_available(&self.provider, attempt, &self.config).await?;
        ensure_not_cancelled(token)?;

        let event =
            wallet_flow::collect_payment_method(sdk, attempt, &self.config, token).await?;
        let status = confirm_flow::confirm_payment_method(sdk, &authorization, event).await?;
        self.set_authorization_status(status);
        ensure_not_cancelled(token)?;

        if status == AuthorizationStatus::Processing {
            let outcome = psync_flow::poll_until_settled(
                self.backend.as_ref(),
                &authorization.id,
                &self.config.polling,
                token,
            )
            .await?;

            match outcome {
                PollOutcome::CaptureRequired => {
                    self.set_authorization_status(AuthorizationStatus::RequiresCapture);
                }
                PollOutcome::Settled(snapshot) => {
                    self.set_authorization_status(AuthorizationStatus::Succeeded);
                    return Ok(snapshot);
                }
            }
            ensure_not_cancelled(token)?;
        }

        let snapshot =
            capture_flow::capture_authorization(self.backend.as_ref(), &authorization.id).await?;
        self.set_authorization_status(AuthorizationStatus::Succeeded);
        Ok(snapshot)
    }

    fn set_authorization_status(&mut self, status: AuthorizationStatus) {
        if let Some(authorization) = self.authorization.as_mut() {
            authorization.status = status;
        }
    }

    fn ensure_state(
        &self,
        operation: &'static str,
        allowed: &[CaptureState],
    ) -> CustomResult<(), CaptureError> {
        when(!allowed.contains(&self.state), || {
            Err(report!(CaptureError::InvalidState {
                operation,
                state: self.state.into(),
            }))
        })
    }
}
