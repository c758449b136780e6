use api_models::appointments::ScheduledServiceRecord;
use common_utils::types::MinorUnit;
use error_stack::ResultExt;
use router_env::{instrument, tracing, Flow};
use serde::Serialize;

use crate::{
    core::errors::{ApiClientError, CustomResult},
    logger,
    services::PaymentsBackend,
};

/// Contact details used to offer receipts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientContact {
    pub client_id: String,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
}

/// What is being charged. Snapshotted by the orchestrator when capture begins.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ChargeContext {
    pub appointment_reference_id: Option<String>,
    pub client: Option<ClientContact>,
    pub base_amount: MinorUnit,
    pub description: Option<String>,
}

impl ChargeContext {
    pub fn is_custom(&self) -> bool {
        self.appointment_reference_id.is_none()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ChargeSelector;

impl ChargeSelector {
    /// Pre-fill from an appointment, charging what is still owed on it.
    pub fn select_from_schedule(record: &ScheduledServiceRecord) -> ChargeContext {
        ChargeContext {
            appointment_reference_id: Some(record.id.clone()),
            client: Some(ClientContact {
                client_id: record.client_id.clone(),
                name: record.client_name.clone(),
                email: non_blank(record.client_email.as_deref()),
                phone: non_blank(record.client_phone.as_deref()),
            }),
            base_amount: record.amount_due(),
            description: Some(record.service_name.clone()),
        }
    }

    /// A walk-in charge with no appointment; staff types the amount.
    pub fn select_custom() -> ChargeContext {
        ChargeContext::default()
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(ToOwned::to_owned)
}

/// Today's appointments that still have something to pay, earliest first.
#[instrument(skip_all, fields(flow = %Flow::AppointmentsList))]
pub async fn todays_appointments(
    backend: &dyn PaymentsBackend,
) -> CustomResult<Vec<ScheduledServiceRecord>, ApiClientError> {
    let mut records = backend
        .todays_appointments()
        .await
        .attach_printable("Failed to list today's appointments")?;

    let listed = records.len();
    records.retain(|record| record.amount_due().is_positive());
    records.sort_by_key(|record| record.starts_at);

    logger::debug!(listed, payable = records.len());
    Ok(records)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn service_record(json: serde_json::Value) -> ScheduledServiceRecord {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn schedule_selection_uses_outstanding_balance() {
        let record = service_record(serde_json::json!({
            "id": "apt_1",
            "clientId": "cl_1",
            "clientName": "Sam Carter",
            "clientEmail": "sam@example.com",
            "clientPhone": "  ",
            "serviceName": "Full colour",
            "startsAt": "2026-10-16T09:30:00Z",
            "price": 9000,
            "amountPaid": 2000,
            "outstandingBalance": 7000
        }));

        let charge = ChargeSelector::select_from_schedule(&record);
        assert_eq!(charge.appointment_reference_id.as_deref(), Some("apt_1"));
        assert_eq!(charge.base_amount, MinorUnit::new(7000));

        let client = charge.client.unwrap();
        assert_eq!(client.email.as_deref(), Some("sam@example.com"));
        assert_eq!(client.phone, None);
    }

    #[test]
    fn custom_selection_has_no_reference_and_zero_base() {
        let charge = ChargeSelector::select_custom();
        assert!(charge.is_custom());
        assert!(charge.client.is_none());
        assert!(charge.base_amount.is_zero());
    }
}
