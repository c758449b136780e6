pub(super) mod authorize_flow;
pub(super) mod capture_flow;
pub(super) mod confirm_flow;
pub(super) mod psync_flow;
pub(super) mod wallet_flow;

use common_utils::types::MinorUnit;
use error_stack::report;

use super::CancellationToken;
use crate::core::{charge::ChargeContext, errors::{AttemptError, CustomResult}};

/// Snapshot of what one attempt charges, taken when capture starts.
#[derive(Debug, Clone)]
pub(super) struct Attempt {
    pub(super) id: String,
    pub(super) charge: ChargeContext,
    pub(super) total: MinorUnit,
    pub(super) tip: MinorUnit,
}

pub(super) fn ensure_not_cancelled(token: &CancellationToken) -> CustomResult<(), AttemptError> {
    if token.is_cancelled() {
        return Err(report!(AttemptError::canceled()));
    }
    Ok(())
}
