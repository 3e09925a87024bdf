mod queries;
mod types;
pub use crate::queries::*;
pub use crate::types::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;
use ureq::{
    Agent, SendBody,
    http::{
        Request,
        header::{HeaderValue, InvalidHeaderValue},
    },
    middleware::MiddlewareNext,
};

pub const GRAPHQL_API_URL: &str = "https://api.github.com/graphql";

static USER_AGENT: &str = concat!(
    env!("CARGO_PKG_NAME"),
    "/",
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("CARGO_PKG_REPOSITORY"),
    ")",
);

/// Something that can deliver a GraphQL request to a server and hand back
/// the server's raw reply
pub trait Transport {
    /// POST `payload` as JSON and return the response status & body.
    ///
    /// Non-2xx statuses are returned as `Ok` values; only failures to talk
    /// to the server at all (including timeouts) are errors.
    fn send(&self, payload: &QueryPayload) -> Result<RawResponse, TransportError>;

    /// Send `payload` and extract the `"data"` field of a successful
    /// response
    fn query(&self, payload: &QueryPayload) -> Result<JsonMap, QueryError> {
        self.send(payload)?.into_data()
    }
}

impl<T: Transport + ?Sized> Transport for &T {
    fn send(&self, payload: &QueryPayload) -> Result<RawResponse, TransportError> {
        (**self).send(payload)
    }
}

#[derive(Clone, Debug)]
pub struct Client {
    inner: Agent,
    endpoint: String,
    authenticated: bool,
}

impl Client {
    /// Create a client that authenticates with `token` and abandons any
    /// request that has not completed within `timeout`
    pub fn new(token: &str, timeout: Duration) -> Result<Client, BuildClientError> {
        let auth = HeaderValue::from_str(&format!("Bearer {token}"))?;
        Ok(Client::build(Some(auth), timeout))
    }

    /// Create a client that sends no `Authorization` header.  GitHub answers
    /// every request from such a client with HTTP 401.
    pub fn anonymous(timeout: Duration) -> Client {
        Client::build(None, timeout)
    }

    fn build(auth: Option<HeaderValue>, timeout: Duration) -> Client {
        let authenticated = auth.is_some();
        let inner = Agent::config_builder()
            .https_only(true)
            .user_agent(USER_AGENT)
            .http_status_as_error(false)
            .timeout_global(Some(timeout))
            .middleware(
                move |mut req: Request<SendBody<'_>>, next: MiddlewareNext<'_>| {
                    if let Some(ref auth) = auth {
                        let _ = req.headers_mut().insert("Authorization", auth.clone());
                    }
                    next.handle(req)
                },
            )
            .build()
            .into();
        Client {
            inner,
            endpoint: String::from(GRAPHQL_API_URL),
            authenticated,
        }
    }

    /// Create a client using the token from `GH_TOKEN`, `GITHUB_TOKEN`, or
    /// the local `gh` configuration
    pub fn new_with_local_token(timeout: Duration) -> Result<Client, BuildClientError> {
        let token = gh_token::get()?;
        Client::new(&token, timeout)
    }

    pub fn with_endpoint(mut self, endpoint: String) -> Client {
        self.endpoint = endpoint;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Returns true if requests carry an `Authorization` header
    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}

impl Transport for Client {
    fn send(&self, payload: &QueryPayload) -> Result<RawResponse, TransportError> {
        let response = self
            .inner
            .post(self.endpoint.as_str())
            .send_json(payload)
            .map_err(|e| TransportError::Send(Box::new(e)))?;
        let status = response.status().as_u16();
        let body = response
            .into_body()
            .read_to_vec()
            .map_err(|e| TransportError::Read(Box::new(e)))?;
        Ok(RawResponse { status, body })
    }
}

/// The status code and undecoded body of a GraphQL server's reply
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RawResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Validate the response and return the contents of its `"data"` field.
    ///
    /// Checks are made in this order: HTTP status, JSON decoding, then the
    /// presence of a top-level `"errors"` field.  A response with neither
    /// `"data"` nor `"errors"` yields an empty map.
    pub fn into_data(self) -> Result<JsonMap, QueryError> {
        if !self.is_success() {
            let body = serde_json::from_slice::<serde_json::Value>(&self.body).ok();
            return Err(QueryError::Status {
                status: self.status,
                body,
            });
        }
        serde_json::from_slice::<Response>(&self.body)?
            .into_data()
            .map_err(Into::into)
    }
}

#[derive(Debug, Error)]
pub enum BuildClientError {
    #[error("invalid authorization token")]
    Auth(#[from] InvalidHeaderValue),
    #[error("failed to fetch GitHub access token")]
    GetToken(#[from] gh_token::Error),
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("failed to perform GraphQL request")]
    Send(#[source] Box<ureq::Error>),
    #[error("failed to read GraphQL response")]
    Read(#[source] Box<ureq::Error>),
}

impl TransportError {
    pub fn is_timeout(&self) -> bool {
        let (TransportError::Send(e) | TransportError::Read(e)) = self;
        matches!(**e, ureq::Error::Timeout(_))
    }
}

#[derive(Debug, Error)]
pub enum QueryError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error("GraphQL server responded with HTTP status {status}")]
    Status {
        status: u16,
        /// The response body, if it was valid JSON
        body: Option<serde_json::Value>,
    },
    #[error("failed to deserialize GraphQL response")]
    Json(#[from] serde_json::Error),
    #[error("GraphQL server returned error response")]
    GraphQL(#[from] GqlError),
}

#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct QueryPayload {
    pub query: String,
    pub variables: JsonMap,
}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct Response {
    // GitHub sends `"data": null` alongside some errors
    #[serde(default)]
    data: Option<JsonMap>,
    #[serde(default)]
    errors: Option<GqlError>,
}

impl Response {
    fn into_data(self) -> Result<JsonMap, GqlError> {
        match self.errors {
            Some(errors) => Err(errors),
            None => Ok(self.data.unwrap_or_default()),
        }
    }
}

#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct GqlError(Vec<GqlInnerError>);

impl GqlError {
    pub fn messages(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|e| e.message.as_str())
    }
}

impl fmt::Display for GqlError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Query errored:")?;
        let mut first = true;
        for e in &self.0 {
            if !std::mem::take(&mut first) {
                writeln!(f, "---")?;
            }
            if let Some(ref t) = e.err_type {
                writeln!(f, "    Type: {t}")?;
            }
            writeln!(f, "    Message: {}", e.message)?;
            if let Some(ref p) = e.path {
                writeln!(f, "    Path: {p:?}")?;
            }
        }
        Ok(())
    }
}

impl std::error::Error for GqlError {}

#[derive(Clone, Debug, Deserialize, Eq, PartialEq)]
struct GqlInnerError {
    #[serde(default, rename = "type")]
    err_type: Option<String>,
    message: String,
    // Path elements are field names or list indices
    #[serde(default)]
    path: Option<Vec<serde_json::Value>>,
}
