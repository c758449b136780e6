//! Types.

use serde::Deserialize;
use strum::{Display, EnumString};
pub use tracing::Level;

/// Category and tag of log event.
///
/// Don't hesitate to add your variant if it is missing here.
#[derive(Debug, Default, Deserialize, Clone, Copy, Display, EnumString)]
pub enum Tag {
    /// General.
    #[default]
    General,
    /// API: outgoing request to the payments backend.
    ApiOutgoingRequest,
    /// API: response received from the payments backend.
    ApiIncomingResponse,
    /// Call handed to the payment provider SDK.
    InitiatedToProvider,
    /// Terminal outcome of a capture attempt.
    AttemptOutcome,
}

/// Capture flows, recorded on spans so every log line can be tied to a stage.
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Reading the device capability signals.
    CapabilityProbe,
    /// Publishable key fetch and SDK construction.
    ProviderInitialize,
    /// Listing today's appointments.
    AppointmentsList,
    /// Whole capture attempt.
    CaptureAttempt,
    /// Processor-side authorization creation.
    AuthorizationCreate,
    /// On-device wallet availability query.
    WalletAvailability,
    /// Presenting the wallet payment sheet.
    WalletSheet,
    /// Confirming the authorization with the collected payment method.
    AuthorizationConfirm,
    /// Additional authentication requested by the processor.
    StepUpAuthentication,
    /// Server-side capture of a confirmed authorization.
    ManualCapture,
    /// Status polling while the processor finishes confirmation.
    StatusPoll,
    /// Receipt delivery.
    ReceiptSend,
}
