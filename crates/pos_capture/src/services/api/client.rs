use std::time::Duration;

use api_models::{
    appointments::ScheduledServiceRecord,
    payments::{
        AuthorizationStatusResponse, CaptureConfirmRequest, CaptureConfirmResponse,
        CreateAuthorizationRequest, CreateAuthorizationResponse, PaymentsConfigResponse,
    },
};
use async_trait::async_trait;
use common_utils::ext_traits::BytesExt;
use error_stack::{report, ResultExt};
use once_cell::sync::OnceCell;
use router_env::{instrument, tracing, Flow, Tag};
use serde::de::DeserializeOwned;

use crate::{
    configs::settings::Backend,
    core::errors::{ApiClientError, CustomResult},
    logger,
    services::backend::PaymentsBackend,
};

static BACKEND_CLIENT: OnceCell<reqwest::Client> = OnceCell::new();

fn get_base_client() -> CustomResult<reqwest::Client, ApiClientError> {
    Ok(BACKEND_CLIENT
        .get_or_try_init(|| {
            reqwest::Client::builder()
                .redirect(reqwest::redirect::Policy::none())
                .build()
                .change_context(ApiClientError::ClientConstructionFailed)
                .attach_printable("Failed to construct base client")
        })?
        .clone())
}

/// [`PaymentsBackend`] over HTTP, sharing one connection pool per process.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: reqwest::Url,
    request_timeout: Duration,
}

impl HttpBackend {
    pub fn new(conf: &Backend) -> CustomResult<Self, ApiClientError> {
        let mut base_url = reqwest::Url::parse(&conf.base_url)
            .change_context(ApiClientError::UrlEncodingFailed)
            .attach_printable_lazy(|| format!("Invalid backend base URL {}", conf.base_url))?;

        if base_url.cannot_be_a_base() {
            return Err(report!(ApiClientError::UrlEncodingFailed))
                .attach_printable("Backend base URL cannot carry a path");
        }
        // Joined segments must land below the configured path, not replace its last segment.
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            base_url,
            request_timeout: conf.request_timeout(),
        })
    }

    fn endpoint(&self, segments: &[&str]) -> CustomResult<reqwest::Url, ApiClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| report!(ApiClientError::UrlEncodingFailed))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        type_name: &'static str,
    ) -> CustomResult<T, ApiClientError> {
        let request = request
            .timeout(self.request_timeout)
            .build()
            .change_context(ApiClientError::UrlEncodingFailed)?;
        let method = request.method().clone();
        let url = request.url().clone();

        logger::info!(tag = ?Tag::ApiOutgoingRequest, %method, path = url.path());

        let response = get_base_client()?
            .execute(request)
            .await
            .map_err(|error| {
                if error.is_timeout() {
                    report!(ApiClientError::RequestTimeoutReceived)
                } else {
                    report!(ApiClientError::RequestNotSent(error.to_string()))
                }
            })
            .attach_printable_lazy(|| format!("{method} {url} was not completed"))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .change_context(ApiClientError::ResponseDecodingFailed)
            .attach_printable("Error reading response body")?;

        logger::info!(
            tag = ?Tag::ApiIncomingResponse,
            status_code = status.as_u16(),
            path = url.path()
        );

        match status.as_u16() {
            200..=299 => body
                .parse_struct(type_name)
                .change_context(ApiClientError::ResponseDecodingFailed),
            408 => Err(report!(ApiClientError::RequestTimeoutReceived)),
            400..=499 => Err(report!(ApiClientError::BadRequestReceived(body)))
                .attach_printable_lazy(|| format!("{method} {url} returned {status}")),
            500..=599 => Err(report!(ApiClientError::InternalServerErrorReceived(body)))
                .attach_printable_lazy(|| format!("{method} {url} returned {status}")),
            _ => Err(report!(ApiClientError::UnexpectedServerResponse))
                .attach_printable_lazy(|| format!("{method} {url} returned {status}")),
        }
    }

    fn get(&self, segments: &[&str]) -> CustomResult<reqwest::RequestBuilder, ApiClientError> {
        Ok(get_base_client()?.get(self.endpoint(segments)?))
    }

    fn post(&self, segments: &[&str]) -> CustomResult<reqwest::RequestBuilder, ApiClientError> {
        Ok(get_base_client()?.post(self.endpoint(segments)?))
    }
}

#[async_trait]
impl PaymentsBackend for HttpBackend {
    #[instrument(skip_all, fields(flow = %Flow::ProviderInitialize))]
    async fn payments_config(&self) -> CustomResult<PaymentsConfigResponse, ApiClientError> {
        self.send(self.get(&["payments", "config"])?, "PaymentsConfigResponse")
            .await
    }

    #[instrument(skip_all, fields(flow = %Flow::AppointmentsList))]
    async fn todays_appointments(
        &self,
    ) -> CustomResult<Vec<ScheduledServiceRecord>, ApiClientError> {
        self.send(
            self.get(&["payments", "appointments", "today"])?,
            "Vec<ScheduledServiceRecord>",
        )
        .await
    }

    #[instrument(skip_all, fields(flow = %Flow::AuthorizationCreate))]
    async fn create_authorization(
        &self,
        request: &CreateAuthorizationRequest,
    ) -> CustomResult<CreateAuthorizationResponse, ApiClientError> {
        self.send(
            self.post(&["payments", "intents"])?.json(request),
            "CreateAuthorizationResponse",
        )
        .await
    }

    #[instrument(skip_all, fields(flow = %Flow::ManualCapture))]
    async fn confirm_capture(
        &self,
        request: &CaptureConfirmRequest,
    ) -> CustomResult<CaptureConfirmResponse, ApiClientError> {
        self.send(
            self.post(&["payments", "confirm"])?.json(request),
            "CaptureConfirmResponse",
        )
        .await
    }

    #[instrument(skip_all, fields(flow = %Flow::StatusPoll))]
    async fn authorization_status(
        &self,
        authorization_id: &str,
    ) -> CustomResult<AuthorizationStatusResponse, ApiClientError> {
        self.send(
            self.get(&["payments", "status", authorization_id])?,
            "AuthorizationStatusResponse",
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    fn http_backend(base_url: &str) -> HttpBackend {
        HttpBackend::new(&Backend {
            base_url: base_url.into(),
            request_timeout: 5,
        })
        .unwrap()
    }

    #[test]
    fn endpoints_keep_the_base_path() {
        let backend = http_backend("https://pay.example.com/api");
        assert_eq!(
            backend.endpoint(&["payments", "config"]).unwrap().as_str(),
            "https://pay.example.com/api/payments/config"
        );

        let backend = http_backend("https://pay.example.com/api/");
        assert_eq!(
            backend
                .endpoint(&["payments", "status", "pi_1"])
                .unwrap()
                .as_str(),
            "https://pay.example.com/api/payments/status/pi_1"
        );
    }

    #[test]
    fn authorization_id_is_encoded_as_one_segment() {
        let backend = http_backend("https://pay.example.com");
        assert_eq!(
            backend
                .endpoint(&["payments", "status", "pi/../1"])
                .unwrap()
                .as_str(),
            "https://pay.example.com/payments/status/pi%2F..%2F1"
        );
    }

    #[test]
    fn rejects_invalid_base_url() {
        let result = HttpBackend::new(&Backend {
            base_url: "not a url".into(),
            request_timeout: 5,
        });
        assert!(result.is_err());
    }
}
