use std::{fmt, sync::Arc};

use async_trait::async_trait;
use common_enums::AuthorizationStatus;
use common_utils::fp_utils::when;
use error_stack::{report, ResultExt};
use masking::{ClientSecret, PeekInterface, Secret};
use router_env::{instrument, tracing, Flow, Tag};
use tokio::sync::OnceCell;

use crate::{
    consts,
    core::errors::{CaptureError, CustomResult, ProviderError},
    logger,
    services::PaymentsBackend,
    types::{
        ConfirmAuthorizationRequest, PaymentSheetRequest, SheetOutcome, WalletAvailability,
        WalletAvailabilityQuery,
    },
};

/// Handle to the payment provider's client SDK.
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// `None` when no wallet can be presented for this query.
    async fn wallet_availability(
        &self,
        query: &WalletAvailabilityQuery,
    ) -> CustomResult<Option<WalletAvailability>, ProviderError>;

    /// Resolves once, with the payment method the customer picked or with a
    /// dismissal.
    async fn present_payment_sheet(
        &self,
        request: &PaymentSheetRequest,
    ) -> CustomResult<SheetOutcome, ProviderError>;

    async fn confirm_authorization(
        &self,
        client_secret: &Secret<String, ClientSecret>,
        request: &ConfirmAuthorizationRequest,
    ) -> CustomResult<AuthorizationStatus, ProviderError>;

    /// Run the step-up the processor asked for and return the resulting status.
    async fn handle_next_action(
        &self,
        client_secret: &Secret<String, ClientSecret>,
    ) -> CustomResult<AuthorizationStatus, ProviderError>;
}

pub trait WalletSdkFactory: Send + Sync {
    fn build(
        &self,
        publishable_key: &Secret<String>,
    ) -> CustomResult<Arc<dyn WalletSdk>, ProviderError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProviderState {
    Uninitialized,
    Ready,
    /// Initialization failed; the message asks staff to refresh and retry.
    Error(String),
}

/// Owns the SDK handle for the lifetime of the process.
///
/// The first `initialize` call decides the outcome for good: a failure is kept
/// and never retried, staff has to restart the point of sale.
pub struct PaymentProviderClient {
    factory: Arc<dyn WalletSdkFactory>,
    handle: OnceCell<Result<Arc<dyn WalletSdk>, String>>,
}

impl fmt::Debug for PaymentProviderClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PaymentProviderClient")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl PaymentProviderClient {
    pub fn new(factory: Arc<dyn WalletSdkFactory>) -> Self {
        Self {
            factory,
            handle: OnceCell::new(),
        }
    }

    #[instrument(skip_all, fields(flow = %Flow::ProviderInitialize))]
    pub async fn initialize(&self, backend: &dyn PaymentsBackend) -> ProviderState {
        self.handle
            .get_or_init(|| async {
                self.build_handle(backend).await.map_err(|error| {
                    logger::error!(?error, "payment provider initialization failed");
                    consts::PROVIDER_SETUP_FAILED.to_string()
                })
            })
            .await;
        self.state()
    }

    async fn build_handle(
        &self,
        backend: &dyn PaymentsBackend,
    ) -> CustomResult<Arc<dyn WalletSdk>, ProviderError> {
        let config = backend
            .payments_config()
            .await
            .change_context(ProviderError::ConfigurationFetchFailed)?;

        when(config.publishable_key.peek().trim().is_empty(), || {
            Err(report!(ProviderError::ConfigurationFetchFailed))
                .attach_printable("Backend returned an empty publishable key")
        })?;

        logger::info!(tag = ?Tag::InitiatedToProvider, "constructing wallet sdk");
        self.factory
            .build(&config.publishable_key)
            .attach_printable("Wallet SDK factory rejected the publishable key")
    }

    pub fn state(&self) -> ProviderState {
        match self.handle.get() {
            None => ProviderState::Uninitialized,
            Some(Ok(_)) => ProviderState::Ready,
            Some(Err(message)) => ProviderState::Error(message.clone()),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.handle.get(), Some(Ok(_)))
    }

    pub fn sdk(&self) -> CustomResult<Arc<dyn WalletSdk>, CaptureError> {
        match self.handle.get() {
            Some(Ok(sdk)) => Ok(Arc::clone(sdk)),
            Some(Err(message)) => Err(report!(CaptureError::ProviderSetupFailed(
                message.clone()
            ))),
            None => Err(report!(CaptureError::ProviderNotReady)),
        }
    }

    #[instrument(skip_all, fields(flow = %Flow::WalletAvailability))]
    pub async fn wallet_availability(
        &self,
        query: &WalletAvailabilityQuery,
    ) -> CustomResult<Option<WalletAvailability>, ProviderError> {
        let sdk = self
            .sdk()
            .change_context(ProviderError::NotInitialized)?;
        let availability = sdk.wallet_availability(query).await?;
        Ok(availability.filter(|availability| !availability.wallets.is_empty()))
    }
}
