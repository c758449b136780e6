use api_models::payments::{
    AuthorizationStatusResponse, CaptureConfirmResponse, ClientSummary,
};
use common_enums::{AuthorizationStatus, Currency, FailureKind, WalletKind};
use common_utils::types::MinorUnit;
use masking::{ClientSecret, Secret};
use serde::Serialize;
use tokio::sync::oneshot;

use crate::core::errors::AttemptError;

/// Processor-side authorization created for one capture attempt.
#[derive(Debug, Clone)]
pub struct Authorization {
    pub id: String,
    pub payment_id: String,
    pub client_secret: Secret<String, ClientSecret>,
    pub status: AuthorizationStatus,
}

/// Payment details of a captured payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureSnapshot {
    pub receipt_number: String,
    pub card_brand: String,
    pub card_last4: String,
    pub client_ref: Option<String>,
}

impl From<CaptureConfirmResponse> for CaptureSnapshot {
    fn from(response: CaptureConfirmResponse) -> Self {
        Self {
            receipt_number: response.receipt_number,
            card_brand: response.card_brand,
            card_last4: response.card_last4,
            client_ref: response.client.map(|ClientSummary { id, .. }| id),
        }
    }
}

impl From<AuthorizationStatusResponse> for CaptureSnapshot {
    fn from(response: AuthorizationStatusResponse) -> Self {
        Self {
            receipt_number: response.receipt_number.unwrap_or_default(),
            card_brand: response.card_brand.unwrap_or_default(),
            card_last4: response.card_last4.unwrap_or_default(),
            client_ref: response.client.map(|ClientSummary { id, .. }| id),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CaptureFailure {
    pub kind: FailureKind,
    pub reason: String,
}

impl From<&AttemptError> for CaptureFailure {
    fn from(error: &AttemptError) -> Self {
        Self {
            kind: error.kind,
            reason: error.reason.clone(),
        }
    }
}

/// Outcome of one capture attempt. Produced once and never modified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CaptureResult {
    Success(CaptureSnapshot),
    Failure(CaptureFailure),
}

impl CaptureResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn failure_kind(&self) -> Option<FailureKind> {
        match self {
            Self::Success(_) => None,
            Self::Failure(failure) => Some(failure.kind),
        }
    }
}

/// Payment method token produced by the wallet sheet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentMethod {
    pub id: String,
    pub wallet: Option<WalletKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAvailabilityQuery {
    pub country: String,
    pub currency: Currency,
    pub amount: MinorUnit,
    pub label: String,
}

/// Wallets the SDK can present on this device. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletAvailability {
    pub wallets: Vec<WalletKind>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentSheetRequest {
    pub country: String,
    pub currency: Currency,
    pub total: MinorUnit,
    pub label: String,
}

/// What the wallet sheet is told once the payment method has been processed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetCompletion {
    Success,
    Fail,
}

/// The customer picked a payment method on the wallet sheet.
///
/// The sheet stays open until [`PaymentMethodEvent::complete`] is called, which
/// consumes the event.
#[derive(Debug)]
pub struct PaymentMethodEvent {
    pub payment_method: PaymentMethod,
    completion: oneshot::Sender<SheetCompletion>,
}

impl PaymentMethodEvent {
    /// Returns the event and the receiver the SDK waits on to close the sheet.
    pub fn new(payment_method: PaymentMethod) -> (Self, oneshot::Receiver<SheetCompletion>) {
        let (completion, receiver) = oneshot::channel();
        (
            Self {
                payment_method,
                completion,
            },
            receiver,
        )
    }

    pub fn complete(self, outcome: SheetCompletion) -> PaymentMethod {
        // The SDK may already have torn the sheet down.
        let _ = self.completion.send(outcome);
        self.payment_method
    }
}

/// Single resolution of a presented wallet sheet.
#[derive(Debug)]
pub enum SheetOutcome {
    PaymentMethod(PaymentMethodEvent),
    Dismissed,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmAuthorizationRequest {
    pub payment_method_id: String,
    /// Whether the SDK may leave the page for a redirect-based challenge.
    pub allow_redirect: bool,
}
