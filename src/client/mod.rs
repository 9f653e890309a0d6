//! Thin HTTP client for the users collection service. Keeps endpoint paths
//! centralized and assumes the service enforces its own validation; empty
//! draft fields are submitted as-is.

pub mod types;

use reqwest::{Client, Response};
use tracing::{debug, info_span, Instrument};
use url::Url;

use self::types::{CreateAck, MessageEnvelope, NewUser, User, UserEnvelope, UsersEnvelope};

/// Maximum number of error body characters carried in a `TransportError`.
const MAX_ERROR_CHARS: usize = 200;

/// Single error kind for the client: network failures, non-success
/// statuses, and undecodable payloads are not distinguished.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct TransportError {
    message: String,
}

impl TransportError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(format!("transport error: {err}"))
    }
}

/// Trims error bodies and caps their length before they reach the operator.
fn sanitize_body(body: String) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        "Request failed.".to_string()
    } else {
        trimmed.chars().take(MAX_ERROR_CHARS).collect()
    }
}

async fn check_status(url: &str, response: Response) -> Result<Response, TransportError> {
    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    Err(TransportError::new(format!(
        "{url} - {status}, {}",
        sanitize_body(body)
    )))
}

/// Client for a single users collection endpoint. The base URL is injected
/// once at startup and never re-read.
#[derive(Clone, Debug)]
pub struct UsersClient {
    http: Client,
    base_url: String,
}

impl UsersClient {
    /// # Errors
    /// Returns an error if `base_url` is not an absolute URL or the
    /// underlying HTTP client cannot be built.
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        let base_url = base_url.trim().trim_end_matches('/').to_string();

        Url::parse(&base_url)
            .map_err(|err| TransportError::new(format!("invalid base URL {base_url:?}: {err}")))?;

        let http = Client::builder().user_agent(crate::APP_USER_AGENT).build()?;

        Ok(Self { http, base_url })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Fetch the full collection. The result is the `users` field of the
    /// payload's `data` object, in service order.
    ///
    /// # Errors
    /// Returns a `TransportError` on network failure, non-success status, or
    /// an undecodable payload.
    pub async fn list(&self) -> Result<Vec<User>, TransportError> {
        let url = self.endpoint("/users");

        debug!("listing users from {}", url);

        let span = info_span!(
            "users.list",
            http.method = "GET",
            url = %url
        );
        let response = self.http.get(&url).send().instrument(span).await?;
        let response = check_status(&url, response).await?;

        let envelope: UsersEnvelope = response.json().await?;

        Ok(envelope.data.users)
    }

    /// Fetch a single record by id after basic presence validation.
    ///
    /// # Errors
    /// Returns a `TransportError` if `id` is blank, on network failure,
    /// non-success status (the service answers 404 for unknown ids), or an
    /// undecodable payload.
    pub async fn get(&self, id: &str) -> Result<User, TransportError> {
        let id = id.trim();
        if id.is_empty() {
            return Err(TransportError::new("user id is required"));
        }

        let url = self.endpoint(&format!("/users/{id}"));

        debug!("fetching user from {}", url);

        let span = info_span!(
            "users.get",
            http.method = "GET",
            url = %url
        );
        let response = self.http.get(&url).send().instrument(span).await?;
        let response = check_status(&url, response).await?;

        let envelope: UserEnvelope = response.json().await?;

        Ok(envelope.data)
    }

    /// Submit a new record. Fields are sent exactly as drafted, empty
    /// strings included.
    ///
    /// # Errors
    /// Returns a `TransportError` on network failure, non-success status, or
    /// an undecodable payload.
    pub async fn create(&self, record: &NewUser) -> Result<CreateAck, TransportError> {
        let url = self.endpoint("/users");

        debug!("creating user {} at {}", record.username, url);

        let span = info_span!(
            "users.create",
            http.method = "POST",
            url = %url
        );
        let response = self
            .http
            .post(&url)
            .json(record)
            .send()
            .instrument(span)
            .await?;
        let response = check_status(&url, response).await?;

        Ok(response.json().await?)
    }

    /// Health probe against the service's ping route.
    ///
    /// # Errors
    /// Returns a `TransportError` on network failure, non-success status, or
    /// an undecodable payload.
    pub async fn ping(&self) -> Result<String, TransportError> {
        let url = self.endpoint("/users/ping");

        let span = info_span!(
            "users.ping",
            http.method = "GET",
            url = %url
        );
        let response = self.http.get(&url).send().instrument(span).await?;
        let response = check_status(&url, response).await?;

        let envelope: MessageEnvelope = response.json().await?;

        Ok(envelope.message)
    }
}
