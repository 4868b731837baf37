//! HTTP client for the record API.

use std::fmt::Debug;
use std::time::Duration;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, trace};
use url::Url;

use recsync_core::Result;
use recsync_core::error::{DomainError, Error, TransportError};
use recsync_core::types::{ApiUrl, RecordId};

use crate::endpoints::ErrorResponse;

/// JSON-over-HTTP client bound to one API base URL.
#[derive(Debug, Clone)]
pub(crate) struct RestClient {
    client: reqwest::Client,
    base: ApiUrl,
    timeout: Option<Duration>,
}

impl RestClient {
    /// Create a client for the given API.
    pub fn new(base: ApiUrl, timeout: Option<Duration>, user_agent: &str) -> Result<Self> {
        let mut builder = reqwest::Client::builder().user_agent(user_agent);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(|e| TransportError::Http {
            message: format!("failed to build HTTP client: {}", e),
        })?;

        Ok(Self {
            client,
            base,
            timeout,
        })
    }

    /// Returns the API base URL.
    pub fn base(&self) -> &ApiUrl {
        &self.base
    }

    /// URL of an endpoint below the base.
    pub fn url(&self, segments: &[&str]) -> Url {
        self.base.endpoint(segments)
    }

    /// GET a JSON resource.
    ///
    /// `subject` names the record an id-addressed endpoint refers to, so a
    /// 404 can be reported as that record missing.
    #[instrument(skip(self, query), fields(api = %self.base))]
    pub async fn get<Q, R>(&self, url: Url, query: &Q, subject: Option<&RecordId>) -> Result<R>
    where
        Q: Serialize + Debug + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "GET");
        trace!(?query, "query parameters");

        let request = self.client.get(url).query(query);
        self.send(request, subject).await
    }

    /// POST a JSON body.
    #[instrument(skip(self, body), fields(api = %self.base))]
    pub async fn post<B, R>(&self, url: Url, body: &B) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "POST");

        let request = self.client.post(url).json(body);
        self.send(request, None).await
    }

    /// PUT a JSON body to an id-addressed resource.
    #[instrument(skip(self, body), fields(api = %self.base))]
    pub async fn put<B, R>(&self, url: Url, body: &B, subject: &RecordId) -> Result<R>
    where
        B: Serialize + ?Sized,
        R: DeserializeOwned,
    {
        debug!(%url, "PUT");

        let request = self.client.put(url).json(body);
        self.send(request, Some(subject)).await
    }

    /// DELETE an id-addressed resource. Any success body is ignored.
    #[instrument(skip(self), fields(api = %self.base))]
    pub async fn delete(&self, url: Url, subject: &RecordId) -> Result<()> {
        debug!(%url, "DELETE");

        self.execute(self.client.delete(url), Some(subject))
            .await
            .map(|_| ())
    }

    /// Send a request and decode a JSON success body.
    async fn send<R: DeserializeOwned>(
        &self,
        request: RequestBuilder,
        subject: Option<&RecordId>,
    ) -> Result<R> {
        let response = self.execute(request, subject).await?;
        let bytes = response.bytes().await.map_err(|e| self.map_error(e))?;

        serde_json::from_slice(&bytes).map_err(|e| {
            TransportError::Decode {
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Send a request, turning non-success statuses into errors.
    async fn execute(
        &self,
        request: RequestBuilder,
        subject: Option<&RecordId>,
    ) -> Result<Response> {
        let response = request.send().await.map_err(|e| self.map_error(e))?;

        let status = response.status();
        trace!(status = %status, "API response");

        if status.is_success() {
            Ok(response)
        } else {
            Err(self.parse_error_response(response, subject).await)
        }
    }

    /// Map an error response onto the error taxonomy.
    async fn parse_error_response(&self, response: Response, subject: Option<&RecordId>) -> Error {
        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            if let Some(id) = subject {
                return Error::not_found(id);
            }
        }

        // Bodies that are not `{error}` JSON count as empty.
        let message = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| serde_json::from_slice::<ErrorResponse>(&bytes).ok())
            .unwrap_or_default()
            .into_message();

        let code = status.as_u16();
        if status.is_server_error() {
            TransportError::Server {
                status: code,
                message,
            }
            .into()
        } else {
            let domain = match message {
                Some(message) => DomainError::new(code, message),
                None => DomainError::generic(code),
            };
            domain.into()
        }
    }

    fn map_error(&self, err: reqwest::Error) -> Error {
        if err.is_timeout() {
            Error::Timeout {
                duration_ms: self
                    .timeout
                    .map(|t| u64::try_from(t.as_millis()).unwrap_or(u64::MAX))
                    .unwrap_or(0),
            }
        } else if err.is_connect() {
            TransportError::Connection {
                message: err.to_string(),
            }
            .into()
        } else if err.is_decode() || err.is_body() {
            TransportError::Decode {
                message: err.to_string(),
            }
            .into()
        } else {
            TransportError::Http {
                message: err.to_string(),
            }
            .into()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_creation() {
        let base = ApiUrl::new("https://records.example.com/api").unwrap();
        let client = RestClient::new(base.clone(), None, "recsync-test").unwrap();
        assert_eq!(client.base().as_str(), base.as_str());
        assert_eq!(
            client.url(&["records", "R 1"]).as_str(),
            "https://records.example.com/api/records/R%201"
        );
    }
}
