use std::collections::HashMap;

use common_enums::{AuthorizationStatus, Currency, FlowType};
use common_utils::types::MinorUnit;
use masking::{ClientSecret, Secret};
use serde::{Deserialize, Serialize};

/// `GET /payments/config`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentsConfigResponse {
    pub publishable_key: Secret<String>,
}

/// `POST /payments/intents`
///
/// `amount` is the full amount to authorize; `tip` is the share of it that is
/// gratuity, sent for reporting.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorizationRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub appointment_reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
    pub amount: MinorUnit,
    pub tip: MinorUnit,
    pub currency: Currency,
    pub flow_type: FlowType,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAuthorizationResponse {
    pub client_secret: Secret<String, ClientSecret>,
    pub authorization_id: String,
    pub payment_id: String,
}

/// `POST /payments/confirm`
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfirmRequest {
    pub authorization_id: String,
}

/// Client the payment was attributed to.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientSummary {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CaptureConfirmResponse {
    pub receipt_number: String,
    pub card_brand: String,
    pub card_last4: String,
    #[serde(default)]
    pub client: Option<ClientSummary>,
}

/// `GET /payments/status/{authorizationId}`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizationStatusResponse {
    pub status: AuthorizationStatus,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
    #[serde(default)]
    pub card_brand: Option<String>,
    #[serde(default)]
    pub card_last4: Option<String>,
    #[serde(default)]
    pub client: Option<ClientSummary>,
}
