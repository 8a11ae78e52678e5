//! Request plumbing shared by the ArcGIS backends.

use std::time::Duration;

use campus_search_core::TransportError;
use log::debug;
use reqwest::Client;
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::wire::Envelope;

/// Failure to construct an ArcGIS backend.
#[derive(Debug, Error)]
pub enum ProviderBuildError {
    /// The HTTP client could not be built.
    #[error("failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}

/// Default user agent for ArcGIS requests.
pub const DEFAULT_USER_AGENT: &str = "campus-search/0.1";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// HTTP settings shared by the ArcGIS backends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpClientConfig {
    /// Connect and request timeout.
    pub timeout: Duration,
    /// User agent sent with every request.
    pub user_agent: String,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            user_agent: DEFAULT_USER_AGENT.to_owned(),
        }
    }
}

impl HttpClientConfig {
    /// Set the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the user agent string.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}

/// A configured HTTP client issuing `f=json` GET requests.
#[derive(Debug, Clone)]
pub(crate) struct ArcGisClient {
    client: Client,
    config: HttpClientConfig,
}

impl ArcGisClient {
    pub(crate) fn new(config: HttpClientConfig) -> Result<Self, ProviderBuildError> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .connect_timeout(config.timeout)
            .timeout(config.timeout)
            .build()
            .map_err(ProviderBuildError::HttpClient)?;
        Ok(Self { client, config })
    }

    /// GET `url` with `params` and decode the JSON body as `T`.
    pub(crate) async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        params: &[(&'static str, String)],
    ) -> Result<T, TransportError> {
        debug!("GET {url} with {} parameters", params.len());
        let body = self
            .client
            .get(url)
            .query(params)
            .query(&[("f", "json")])
            .send()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .error_for_status()
            .map_err(|err| self.convert_reqwest_error(&err, url))?
            .text()
            .await
            .map_err(|err| self.convert_reqwest_error(&err, url))?;
        decode(url, &body)
    }

    fn convert_reqwest_error(&self, error: &reqwest::Error, url: &str) -> TransportError {
        if error.is_timeout() {
            return TransportError::Timeout {
                url: url.to_owned(),
                timeout_secs: self.config.timeout.as_secs(),
            };
        }
        if let Some(status) = error.status() {
            return TransportError::Http {
                url: url.to_owned(),
                status: status.as_u16(),
                message: error.to_string(),
            };
        }
        TransportError::Network {
            url: url.to_owned(),
            message: error.to_string(),
        }
    }
}

/// Decode an ArcGIS JSON body, surfacing the in-band error envelope.
pub(crate) fn decode<T: DeserializeOwned>(url: &str, body: &str) -> Result<T, TransportError> {
    let envelope: Envelope<T> =
        serde_json::from_str(body).map_err(|err| TransportError::Parse {
            url: url.to_owned(),
            message: err.to_string(),
        })?;
    match envelope {
        Envelope::Failure { error } => Err(TransportError::Service {
            url: url.to_owned(),
            code: error.code,
            message: error.describe(),
        }),
        Envelope::Success(value) => Ok(value),
    }
}

/// Join `path` onto a service URL.
pub(crate) fn endpoint(base: &str, path: &str) -> String {
    format!("{}/{path}", base.trim_end_matches('/'))
}
