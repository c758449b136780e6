use common_utils::types::MinorUnit;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// A scheduled service as listed by `GET /payments/appointments/today`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledServiceRecord {
    pub id: String,
    pub client_id: String,
    pub client_name: String,
    #[serde(default)]
    pub client_email: Option<String>,
    #[serde(default)]
    pub client_phone: Option<String>,
    pub service_name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub starts_at: OffsetDateTime,
    /// Full price of the service.
    pub price: MinorUnit,
    /// Sum of earlier partial payments, absent when nothing was paid.
    #[serde(default)]
    pub amount_paid: Option<MinorUnit>,
    /// What is still owed. Absent when no partial payment exists.
    #[serde(default)]
    pub outstanding_balance: Option<MinorUnit>,
}

impl ScheduledServiceRecord {
    /// Amount still to collect: the outstanding balance when a partial payment
    /// exists, the full price otherwise. Never negative.
    pub fn amount_due(&self) -> MinorUnit {
        let due = match (self.outstanding_balance, self.amount_paid) {
            (Some(balance), _) => balance,
            (None, Some(paid)) if paid.is_positive() => self.price.saturating_sub(paid),
            (None, _) => self.price,
        };
        MinorUnit::new_non_negative(due.get_amount_as_i64())
    }
}
