use std::sync::Arc;

use async_trait::async_trait;
use common_enums::{Currency, FailureKind};
use common_utils::types::MinorUnit;
use error_stack::{report, ResultExt};
use router_env::{instrument, tracing, Flow};
use serde::Serialize;

use crate::{
    core::{
        charge::ChargeContext,
        errors::{CustomResult, ReceiptError},
        orchestrator::CaptureOrchestrator,
    },
    logger,
    types::{CaptureFailure, CaptureResult, CaptureSnapshot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, strum::Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReceiptChannel {
    Email,
    Sms,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "action", content = "channel", rename_all = "snake_case")]
pub enum ResultAction {
    SendReceipt(ReceiptChannel),
    TakeAnotherPayment,
    TryAgain,
}

/// What the result screen shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultView {
    pub headline: String,
    pub detail: Option<String>,
    pub advice: Option<String>,
    pub actions: Vec<ResultAction>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceiptRequest {
    pub receipt_number: String,
    pub channel: ReceiptChannel,
    pub destination: String,
    pub client_name: String,
    pub amount: MinorUnit,
    pub currency: Currency,
}

/// Sends receipts. Called at most once per staff action, never retried.
#[async_trait]
pub trait ReceiptDelivery: Send + Sync {
    async fn deliver(&self, request: &ReceiptRequest) -> CustomResult<(), ReceiptError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ActionError {
    #[error("Receipt could not be sent")]
    Receipt,
    #[error("Nothing to act on in the current payment state")]
    InvalidState,
}

pub struct ResultReporter {
    delivery: Arc<dyn ReceiptDelivery>,
}

impl std::fmt::Debug for ResultReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResultReporter").finish_non_exhaustive()
    }
}

impl ResultReporter {
    pub fn new(delivery: Arc<dyn ReceiptDelivery>) -> Self {
        Self { delivery }
    }

    /// View of the orchestrator's last outcome, if an attempt has finished.
    pub fn render_current(&self, orchestrator: &CaptureOrchestrator) -> Option<ResultView> {
        orchestrator.result().map(|result| {
            self.render(
                result,
                orchestrator.charge(),
                orchestrator.total(),
                orchestrator.currency(),
            )
        })
    }

    pub fn render(
        &self,
        result: &CaptureResult,
        charge: Option<&ChargeContext>,
        total: MinorUnit,
        currency: Currency,
    ) -> ResultView {
        match result {
            CaptureResult::Success(snapshot) => render_success(snapshot, charge, total, currency),
            CaptureResult::Failure(failure) => render_failure(failure),
        }
    }

    /// Carry out an action picked on the result screen.
    pub async fn perform(
        &self,
        action: ResultAction,
        orchestrator: &mut CaptureOrchestrator,
    ) -> CustomResult<(), ActionError> {
        match action {
            ResultAction::SendReceipt(channel) => {
                let result = orchestrator
                    .result()
                    .ok_or_else(|| report!(ActionError::InvalidState))?;
                self.send_receipt(
                    result,
                    orchestrator.charge(),
                    orchestrator.total(),
                    orchestrator.currency(),
                    channel,
                )
                .await
                .change_context(ActionError::Receipt)
            }
            ResultAction::TakeAnotherPayment => {
                orchestrator.reset();
                Ok(())
            }
            ResultAction::TryAgain => orchestrator
                .retry()
                .change_context(ActionError::InvalidState),
        }
    }

    #[instrument(skip_all, fields(flow = %Flow::ReceiptSend, %channel))]
    pub async fn send_receipt(
        &self,
        result: &CaptureResult,
        charge: Option<&ChargeContext>,
        total: MinorUnit,
        currency: Currency,
        channel: ReceiptChannel,
    ) -> CustomResult<(), ReceiptError> {
        let CaptureResult::Success(snapshot) = result else {
            return Err(report!(ReceiptError::NoSuccessfulPayment));
        };
        let client = charge.and_then(|charge| charge.client.as_ref());
        let destination = client
            .and_then(|client| match channel {
                ReceiptChannel::Email => client.email.clone(),
                ReceiptChannel::Sms => client.phone.clone(),
            })
            .ok_or_else(|| {
                report!(ReceiptError::MissingContact {
                    channel: channel.contact_label(),
                })
            })?;

        let request = ReceiptRequest {
            receipt_number: snapshot.receipt_number.clone(),
            channel,
            destination,
            client_name: client.map(|client| client.name.clone()).unwrap_or_default(),
            amount: total,
            currency,
        };

        self.delivery
            .deliver(&request)
            .await
            .attach_printable_lazy(|| format!("Receipt {} not delivered", request.receipt_number))?;
        logger::info!(receipt_number = %request.receipt_number, "receipt sent");
        Ok(())
    }
}

impl ReceiptChannel {
    fn contact_label(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Sms => "phone",
        }
    }
}

fn render_success(
    snapshot: &CaptureSnapshot,
    charge: Option<&ChargeContext>,
    total: MinorUnit,
    currency: Currency,
) -> ResultView {
    let mut detail = format!("{} ending {}", snapshot.card_brand, snapshot.card_last4);
    if !snapshot.receipt_number.is_empty() {
        detail.push_str(&format!(", receipt {}", snapshot.receipt_number));
    }

    let mut actions = Vec::new();
    if let Some(client) = charge.and_then(|charge| charge.client.as_ref()) {
        if client.email.is_some() {
            actions.push(ResultAction::SendReceipt(ReceiptChannel::Email));
        }
        if client.phone.is_some() {
            actions.push(ResultAction::SendReceipt(ReceiptChannel::Sms));
        }
    }
    actions.push(ResultAction::TakeAnotherPayment);

    ResultView {
        headline: format!("{} paid", format_money(total, currency)),
        detail: Some(detail),
        advice: None,
        actions,
    }
}

fn render_failure(failure: &CaptureFailure) -> ResultView {
    let (headline, advice) = match failure.kind {
        FailureKind::Setup => (
            "Payments are unavailable",
            "Refresh the page and try again.",
        ),
        FailureKind::Capability => (
            "This device can't take wallet payments",
            "Open the point of sale on a phone with Apple Pay or Google Pay set up.",
        ),
        FailureKind::Authorization => (
            "The payment could not be started",
            "Check the amount and try again.",
        ),
        FailureKind::Confirmation => (
            "Payment not completed",
            "Nothing was charged. Ask the client to try again or use another card.",
        ),
        FailureKind::CaptureConfirmation => (
            "Payment needs attention",
            "Do not charge again. Check the payment in the dashboard or contact support to reconcile it.",
        ),
        FailureKind::Canceled => ("Payment canceled", "No payment was taken."),
    };

    let mut actions = Vec::new();
    if failure.kind.is_retryable() {
        actions.push(ResultAction::TryAgain);
    }
    actions.push(ResultAction::TakeAnotherPayment);

    ResultView {
        headline: headline.to_string(),
        detail: Some(failure.reason.clone()),
        advice: Some(advice.to_string()),
        actions,
    }
}

fn format_money(amount: MinorUnit, currency: Currency) -> String {
    let symbol = currency.symbol();
    let separator = if symbol.chars().all(char::is_alphabetic) {
        " "
    } else {
        ""
    };
    format!(
        "{symbol}{separator}{}",
        amount.to_major_unit_string(currency)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::charge::ClientContact;

    fn charge(email: Option<&str>, phone: Option<&str>) -> ChargeContext {
        ChargeContext {
            appointment_reference_id: Some("apt_1".into()),
            client: Some(ClientContact {
                client_id: "cl_1".into(),
                name: "Sam Carter".into(),
                email: email.map(Into::into),
                phone: phone.map(Into::into),
            }),
            base_amount: MinorUnit::new(4200),
            description: None,
        }
    }

    fn snapshot() -> CaptureSnapshot {
        CaptureSnapshot {
            receipt_number: "R-1001".into(),
            card_brand: "visa".into(),
            card_last4: "4242".into(),
            client_ref: Some("cl_1".into()),
        }
    }

    #[test]
    fn success_offers_receipts_only_for_known_contacts() {
        let view = render_success(
            &snapshot(),
            Some(&charge(Some("sam@example.com"), None)),
            MinorUnit::new(4620),
            Currency::Gbp,
        );

        assert_eq!(view.headline, "£46.20 paid");
        assert_eq!(view.detail.as_deref(), Some("visa ending 4242, receipt R-1001"));
        assert_eq!(
            view.actions,
            vec![
                ResultAction::SendReceipt(ReceiptChannel::Email),
                ResultAction::TakeAnotherPayment
            ]
        );
    }

    #[test]
    fn capture_confirmation_failure_is_not_retryable() {
        let view = render_failure(&CaptureFailure {
            kind: FailureKind::CaptureConfirmation,
            reason: crate::consts::CAPTURE_CONFIRMATION_FAILED.into(),
        });
        assert_eq!(view.actions, vec![ResultAction::TakeAnotherPayment]);
        assert!(view.advice.unwrap().contains("reconcile"));

        let view = render_failure(&CaptureFailure {
            kind: FailureKind::Confirmation,
            reason: crate::consts::PAYMENT_DECLINED.into(),
        });
        assert_eq!(
            view.actions,
            vec![ResultAction::TryAgain, ResultAction::TakeAnotherPayment]
        );
    }

    #[test]
    fn money_formatting_uses_currency_exponent() {
        assert_eq!(format_money(MinorUnit::new(4620), Currency::Gbp), "£46.20");
        assert_eq!(format_money(MinorUnit::new(500), Currency::Jpy), "¥500");
        assert_eq!(format_money(MinorUnit::new(1250), Currency::Chf), "CHF 12.50");
    }
}
