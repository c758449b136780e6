use std::collections::HashMap;

use api_models::payments::CreateAuthorizationRequest;
use common_enums::{AuthorizationStatus, DeviceType, FailureKind, FlowType};
use router_env::{instrument, tracing, Flow};

use super::Attempt;
use crate::{
    consts,
    core::{
        errors::{AttemptError, CustomResult},
        orchestrator::CaptureConfig,
    },
    logger,
    services::PaymentsBackend,
    types::Authorization,
};

/// Create the processor-side authorization for the attempt's total.
///
/// Sent exactly once; a failure ends the attempt.
#[instrument(skip_all, fields(flow = %Flow::AuthorizationCreate))]
pub(in crate::core::orchestrator) async fn create_authorization(
    backend: &dyn PaymentsBackend,
    attempt: &Attempt,
    config: &CaptureConfig,
    device_type: DeviceType,
) -> CustomResult<Authorization, AttemptError> {
    let request = build_request(attempt, config, device_type);

    let response = backend.create_authorization(&request).await.map_err(|report| {
        let reason = report
            .current_context()
            .backend_reason()
            .unwrap_or_else(|| consts::AUTHORIZATION_FAILED.to_string());
        report.change_context(AttemptError::new(FailureKind::Authorization, reason))
    })?;

    logger::info!(
        authorization_id = %response.authorization_id,
        payment_id = %response.payment_id,
        "authorization created"
    );

    Ok(Authorization {
        id: response.authorization_id,
        payment_id: response.payment_id,
        client_secret: response.client_secret,
        status: AuthorizationStatus::RequiresPaymentMethod,
    })
}

fn build_request(
    attempt: &Attempt,
    config: &CaptureConfig,
    device_type: DeviceType,
) -> CreateAuthorizationRequest {
    let mut metadata = HashMap::from([
        (consts::METADATA_DEVICE_TYPE.to_string(), device_type.to_string()),
        (consts::METADATA_ATTEMPT_ID.to_string(), attempt.id.clone()),
    ]);
    if let Some(description) = &attempt.charge.description {
        metadata.insert(consts::METADATA_SERVICE_NAME.to_string(), description.clone());
    }

    CreateAuthorizationRequest {
        appointment_reference_id: attempt.charge.appointment_reference_id.clone(),
        client_id: attempt
            .charge
            .client
            .as_ref()
            .map(|client| client.client_id.clone()),
        amount: attempt.total,
        tip: attempt.tip,
        currency: config.currency,
        flow_type: FlowType::InPersonWallet,
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use common_utils::types::MinorUnit;

    use super::*;
    use crate::core::charge::{ChargeContext, ClientContact};

    #[test]
    fn request_carries_total_tip_and_reference() {
        let attempt = Attempt {
            id: "att_1".into(),
            charge: ChargeContext {
                appointment_reference_id: Some("apt_1".into()),
                client: Some(ClientContact {
                    client_id: "cl_1".into(),
                    name: "Sam Carter".into(),
                    email: None,
                    phone: None,
                }),
                base_amount: MinorUnit::new(4200),
                description: Some("Trim".into()),
            },
            total: MinorUnit::new(4620),
            tip: MinorUnit::new(420),
        };

        let request = build_request(&attempt, &CaptureConfig::default(), DeviceType::Mobile);
        assert_eq!(request.amount, MinorUnit::new(4620));
        assert_eq!(request.tip, MinorUnit::new(420));
        assert_eq!(request.client_id.as_deref(), Some("cl_1"));
        assert_eq!(request.appointment_reference_id.as_deref(), Some("apt_1"));
        assert_eq!(
            request.metadata.get("deviceType").map(String::as_str),
            Some("mobile")
        );
        assert_eq!(
            request.metadata.get("serviceName").map(String::as_str),
            Some("Trim")
        );
    }
}
