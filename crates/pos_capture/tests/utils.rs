#![allow(dead_code, clippy::unwrap_used, clippy::expect_used)]

use std::{
    collections::VecDeque,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
};

use api_models::{
    appointments::ScheduledServiceRecord,
    payments::{
        AuthorizationStatusResponse, CaptureConfirmRequest, CaptureConfirmResponse,
        CreateAuthorizationRequest, CreateAuthorizationResponse, PaymentsConfigResponse,
    },
};
use async_trait::async_trait;
use common_enums::{AuthorizationStatus, Currency, WalletKind};
use common_utils::{errors::CustomResult, types::MinorUnit};
use error_stack::report;
use masking::{ClientSecret, PeekInterface, Secret};
use pos_capture::{
    configs::settings::Polling,
    core::{
        capability::CapabilityReport,
        errors::{ApiClientError, ProviderError, ReceiptError},
        orchestrator::{CancellationToken, CaptureConfig, CaptureOrchestrator},
        provider::{PaymentProviderClient, WalletSdk, WalletSdkFactory},
        reporter::{ReceiptDelivery, ReceiptRequest},
    },
    services::PaymentsBackend,
    types::{
        ConfirmAuthorizationRequest, PaymentMethod, PaymentMethodEvent, PaymentSheetRequest,
        SheetCompletion, SheetOutcome, WalletAvailability, WalletAvailabilityQuery,
    },
};
use tokio::sync::oneshot;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    PaymentsConfig,
    TodaysAppointments,
    CreateAuthorization,
    ConfirmCapture(String),
    AuthorizationStatus(String),
    WalletAvailability,
    PresentSheet,
    ConfirmAuthorization(String),
    HandleNextAction,
    DeliverReceipt(String),
}

/// Calls made on every stub, in order, shared between backend and SDK.
#[derive(Debug, Clone, Default)]
pub struct CallLog(Arc<Mutex<Vec<Call>>>);

impl CallLog {
    pub fn push(&self, call: Call) {
        self.0.lock().unwrap().push(call);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.0.lock().unwrap().clone()
    }

    pub fn clear(&self) {
        self.0.lock().unwrap().clear();
    }

    pub fn count(&self, call: &Call) -> usize {
        self.0.lock().unwrap().iter().filter(|c| *c == call).count()
    }
}

pub fn server_error(body: &'static str) -> ApiClientError {
    ApiClientError::InternalServerErrorReceived(bytes::Bytes::from_static(body.as_bytes()))
}

pub fn bad_request(body: &'static str) -> ApiClientError {
    ApiClientError::BadRequestReceived(bytes::Bytes::from_static(body.as_bytes()))
}

pub fn authorization_response() -> CreateAuthorizationResponse {
    serde_json::from_value(serde_json::json!({
        "clientSecret": "pi_test_secret_abc",
        "authorizationId": "pi_test",
        "paymentId": "pay_test"
    }))
    .unwrap()
}

pub fn capture_response() -> CaptureConfirmResponse {
    serde_json::from_value(serde_json::json!({
        "receiptNumber": "R-1001",
        "cardBrand": "visa",
        "cardLast4": "4242",
        "client": { "id": "cl_1", "name": "Sam Carter" }
    }))
    .unwrap()
}

pub fn status_response(json: serde_json::Value) -> AuthorizationStatusResponse {
    serde_json::from_value(json).unwrap()
}

pub fn appointment(json: serde_json::Value) -> ScheduledServiceRecord {
    serde_json::from_value(json).unwrap()
}

pub fn sam_carter_appointment() -> ScheduledServiceRecord {
    appointment(serde_json::json!({
        "id": "apt_1",
        "clientId": "cl_1",
        "clientName": "Sam Carter",
        "clientEmail": "sam@example.com",
        "serviceName": "Trim",
        "startsAt": "2026-10-16T09:30:00Z",
        "price": 4200
    }))
}

pub struct StubBackend {
    log: CallLog,
    pub publishable_key: Result<String, ApiClientError>,
    pub appointments: Vec<ScheduledServiceRecord>,
    pub authorization: Result<CreateAuthorizationResponse, ApiClientError>,
    pub capture: Result<CaptureConfirmResponse, ApiClientError>,
    /// Returned in order; once drained every poll answers `processing`.
    pub statuses: Mutex<VecDeque<Result<AuthorizationStatusResponse, ApiClientError>>>,
    /// Cancelled during the first status poll.
    pub cancel_on_status: Option<CancellationToken>,
    pub authorization_requests: Mutex<Vec<serde_json::Value>>,
}

impl StubBackend {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            publishable_key: Ok("pk_test_123".into()),
            appointments: Vec::new(),
            authorization: Ok(authorization_response()),
            capture: Ok(capture_response()),
            statuses: Mutex::new(VecDeque::new()),
            cancel_on_status: None,
            authorization_requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_statuses(
        self,
        statuses: impl IntoIterator<Item = Result<AuthorizationStatusResponse, ApiClientError>>,
    ) -> Self {
        *self.statuses.lock().unwrap() = statuses.into_iter().collect();
        self
    }

    pub fn last_authorization_request(&self) -> serde_json::Value {
        self.authorization_requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no authorization request was sent")
    }
}

#[async_trait]
impl PaymentsBackend for StubBackend {
    async fn payments_config(&self) -> CustomResult<PaymentsConfigResponse, ApiClientError> {
        self.log.push(Call::PaymentsConfig);
        match &self.publishable_key {
            Ok(key) => Ok(serde_json::from_value(serde_json::json!({ "publishableKey": key })).unwrap()),
            Err(error) => Err(report!(error.clone())),
        }
    }

    async fn todays_appointments(
        &self,
    ) -> CustomResult<Vec<ScheduledServiceRecord>, ApiClientError> {
        self.log.push(Call::TodaysAppointments);
        Ok(self.appointments.clone())
    }

    async fn create_authorization(
        &self,
        request: &CreateAuthorizationRequest,
    ) -> CustomResult<CreateAuthorizationResponse, ApiClientError> {
        self.log.push(Call::CreateAuthorization);
        self.authorization_requests
            .lock()
            .unwrap()
            .push(serde_json::to_value(request).unwrap());
        self.authorization.clone().map_err(|error| report!(error))
    }

    async fn confirm_capture(
        &self,
        request: &CaptureConfirmRequest,
    ) -> CustomResult<CaptureConfirmResponse, ApiClientError> {
        self.log
            .push(Call::ConfirmCapture(request.authorization_id.clone()));
        self.capture.clone().map_err(|error| report!(error))
    }

    async fn authorization_status(
        &self,
        authorization_id: &str,
    ) -> CustomResult<AuthorizationStatusResponse, ApiClientError> {
        self.log
            .push(Call::AuthorizationStatus(authorization_id.to_owned()));
        if let Some(token) = &self.cancel_on_status {
            token.cancel();
        }
        self.statuses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(status_response(serde_json::json!({ "status": "processing" }))))
            .map_err(|error| report!(error))
    }
}

#[derive(Debug, Clone)]
pub enum SheetBehavior {
    PaymentMethod(String),
    Dismiss,
    Fail,
    /// Never resolves, like a customer who walked away.
    Pending,
}

pub struct StubSdk {
    log: CallLog,
    pub availability: Result<Option<Vec<WalletKind>>, ProviderError>,
    pub sheet: SheetBehavior,
    pub confirm: Result<AuthorizationStatus, ProviderError>,
    pub next_action: Result<AuthorizationStatus, ProviderError>,
    /// Cancelled when the sheet opens.
    pub cancel_on_sheet: Option<CancellationToken>,
    /// Cancelled while the confirmation is in flight.
    pub cancel_on_confirm: Option<CancellationToken>,
    /// When set, the sheet hands over its payment method only once this fires.
    pub sheet_gate: Mutex<Option<oneshot::Receiver<()>>>,
    completions: Mutex<Vec<oneshot::Receiver<SheetCompletion>>>,
    client_secrets: Mutex<Vec<String>>,
}

impl StubSdk {
    pub fn new(log: &CallLog) -> Self {
        Self {
            log: log.clone(),
            availability: Ok(Some(vec![WalletKind::ApplePay])),
            sheet: SheetBehavior::PaymentMethod("pm_card_visa".into()),
            confirm: Ok(AuthorizationStatus::RequiresCapture),
            next_action: Ok(AuthorizationStatus::RequiresCapture),
            cancel_on_sheet: None,
            cancel_on_confirm: None,
            sheet_gate: Mutex::new(None),
            completions: Mutex::new(Vec::new()),
            client_secrets: Mutex::new(Vec::new()),
        }
    }

    /// How the last sheet was closed, `None` if it was never completed.
    pub fn last_sheet_completion(&self) -> Option<SheetCompletion> {
        self.completions
            .lock()
            .unwrap()
            .last_mut()
            .and_then(|receiver| receiver.try_recv().ok())
    }

    pub fn client_secrets(&self) -> Vec<String> {
        self.client_secrets.lock().unwrap().clone()
    }
}

#[async_trait]
impl WalletSdk for StubSdk {
    async fn wallet_availability(
        &self,
        _query: &WalletAvailabilityQuery,
    ) -> CustomResult<Option<WalletAvailability>, ProviderError> {
        self.log.push(Call::WalletAvailability);
        self.availability
            .clone()
            .map(|wallets| wallets.map(|wallets| WalletAvailability { wallets }))
            .map_err(|error| report!(error))
    }

    async fn present_payment_sheet(
        &self,
        _request: &PaymentSheetRequest,
    ) -> CustomResult<SheetOutcome, ProviderError> {
        self.log.push(Call::PresentSheet);
        if let Some(token) = &self.cancel_on_sheet {
            token.cancel();
        }
        let gate = self.sheet_gate.lock().unwrap().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        match &self.sheet {
            SheetBehavior::PaymentMethod(id) => {
                let (event, receiver) = PaymentMethodEvent::new(PaymentMethod {
                    id: id.clone(),
                    wallet: Some(WalletKind::ApplePay),
                });
                self.completions.lock().unwrap().push(receiver);
                Ok(SheetOutcome::PaymentMethod(event))
            }
            SheetBehavior::Dismiss => Ok(SheetOutcome::Dismissed),
            SheetBehavior::Fail => Err(report!(ProviderError::SheetPresentationFailed)),
            SheetBehavior::Pending => std::future::pending().await,
        }
    }

    async fn confirm_authorization(
        &self,
        client_secret: &Secret<String, ClientSecret>,
        request: &ConfirmAuthorizationRequest,
    ) -> CustomResult<AuthorizationStatus, ProviderError> {
        self.log
            .push(Call::ConfirmAuthorization(request.payment_method_id.clone()));
        self.client_secrets
            .lock()
            .unwrap()
            .push(client_secret.peek().clone());
        if let Some(token) = &self.cancel_on_confirm {
            token.cancel();
        }
        self.confirm.clone().map_err(|error| report!(error))
    }

    async fn handle_next_action(
        &self,
        _client_secret: &Secret<String, ClientSecret>,
    ) -> CustomResult<AuthorizationStatus, ProviderError> {
        self.log.push(Call::HandleNextAction);
        self.next_action.clone().map_err(|error| report!(error))
    }
}

pub struct StubFactory {
    pub sdk: Arc<StubSdk>,
    pub fail: bool,
    pub builds: AtomicUsize,
}

impl StubFactory {
    pub fn new(sdk: Arc<StubSdk>) -> Self {
        Self {
            sdk,
            fail: false,
            builds: AtomicUsize::new(0),
        }
    }

    pub fn builds(&self) -> usize {
        self.builds.load(Ordering::SeqCst)
    }
}

impl WalletSdkFactory for StubFactory {
    fn build(
        &self,
        publishable_key: &Secret<String>,
    ) -> CustomResult<Arc<dyn WalletSdk>, ProviderError> {
        self.builds.fetch_add(1, Ordering::SeqCst);
        if self.fail || !publishable_key.peek().starts_with("pk_") {
            return Err(report!(ProviderError::SdkConstructionFailed));
        }
        let sdk: Arc<dyn WalletSdk> = self.sdk.clone();
        Ok(sdk)
    }
}

#[derive(Default)]
pub struct StubDelivery {
    pub log: CallLog,
    pub fail: bool,
    pub requests: Mutex<Vec<ReceiptRequest>>,
}

#[async_trait]
impl ReceiptDelivery for StubDelivery {
    async fn deliver(&self, request: &ReceiptRequest) -> CustomResult<(), ReceiptError> {
        self.log.push(Call::DeliverReceipt(request.destination.clone()));
        self.requests.lock().unwrap().push(request.clone());
        if self.fail {
            return Err(report!(ReceiptError::DeliveryFailed));
        }
        Ok(())
    }
}

pub fn capable_device() -> CapabilityReport {
    CapabilityReport {
        secure_context: true,
        is_mobile_form_factor: true,
        wallet_api_present: true,
        contactless_api_present: true,
        warnings: Vec::new(),
        override_active: false,
    }
}

pub fn capture_config() -> CaptureConfig {
    CaptureConfig {
        currency: Currency::Gbp,
        country: "GB".into(),
        merchant_label: "Test salon".into(),
        polling: Polling {
            interval_ms: 1_000,
            timeout_secs: 5,
        },
    }
}

/// Orchestrator wired to stubs, with the provider already initialized and
/// the call log cleared.
pub struct Harness {
    pub log: CallLog,
    pub backend: Arc<StubBackend>,
    pub sdk: Arc<StubSdk>,
    pub provider: Arc<PaymentProviderClient>,
    pub orchestrator: CaptureOrchestrator,
}

impl Harness {
    pub async fn new(log: CallLog, backend: StubBackend, sdk: StubSdk) -> Self {
        Self::with_capability(log, backend, sdk, capable_device()).await
    }

    pub async fn with_capability(
        log: CallLog,
        backend: StubBackend,
        sdk: StubSdk,
        capability: CapabilityReport,
    ) -> Self {
        let backend = Arc::new(backend);
        let sdk = Arc::new(sdk);
        let provider = Arc::new(PaymentProviderClient::new(Arc::new(StubFactory::new(
            sdk.clone(),
        ))));
        provider.initialize(backend.as_ref()).await;
        log.clear();

        let backend_handle: Arc<dyn PaymentsBackend> = backend.clone();
        let orchestrator = CaptureOrchestrator::new(
            backend_handle,
            provider.clone(),
            capability,
            capture_config(),
        );

        Self {
            log,
            backend,
            sdk,
            provider,
            orchestrator,
        }
    }

    /// Select the 42.00 appointment and leave the orchestrator in amount entry.
    pub fn with_appointment_selected(mut self) -> Self {
        self.orchestrator
            .select_from_schedule(&sam_carter_appointment())
            .unwrap();
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.log.calls()
    }
}

pub fn gbp(amount: i64) -> MinorUnit {
    MinorUnit::new(amount)
}
