use serde::Deserialize;

/// Error body returned by the backend on non-2xx responses.
///
/// Different handlers use `error` or `message`; both are accepted.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorResponse {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

impl BackendErrorResponse {
    /// The human-readable reason, if the backend sent one.
    pub fn reason(&self) -> Option<&str> {
        [self.error.as_deref(), self.message.as_deref()]
            .into_iter()
            .flatten()
            .map(str::trim)
            .find(|reason| !reason.is_empty())
    }
}
