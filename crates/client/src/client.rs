//! GraphQL-over-HTTP client.
//!
//! Posts `{query, variables}` to a single endpoint and decodes the
//! standard `{data, errors}` envelope.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, trace};

use portal_core::error::{FetchError, FetchResult};

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Longest response excerpt kept in an HTTP error message.
const MAX_ERROR_BODY: usize = 256;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub endpoint: String,
    /// Per-request timeout.
    pub timeout: Duration,
    /// Bearer token sent as `Authorization`.
    pub bearer_token: Option<String>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:4000/graphql".to_string(),
            timeout: DEFAULT_TIMEOUT,
            bearer_token: None,
        }
    }
}

impl ClientConfig {
    pub fn for_endpoint(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            ..Default::default()
        }
    }
}

#[derive(Serialize)]
struct GraphQlRequest<'a, V: Serialize> {
    query: &'a str,
    variables: V,
}

#[derive(Deserialize)]
struct GraphQlResponse {
    data: Option<Value>,
    #[serde(default)]
    errors: Vec<GraphQlErrorEntry>,
}

#[derive(Deserialize)]
struct GraphQlErrorEntry {
    message: String,
}

/// Thin GraphQL client shared by all resource fetchers.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    http: reqwest::Client,
    endpoint: String,
}

impl GraphQlClient {
    pub fn new(config: ClientConfig) -> FetchResult<Self> {
        let mut headers = HeaderMap::new();
        if let Some(token) = &config.bearer_token {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| FetchError::InvalidRequest(format!("bearer token: {e}")))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .default_headers(headers)
            .build()
            .map_err(|e| FetchError::InvalidRequest(e.to_string()))?;

        Ok(Self {
            http,
            endpoint: config.endpoint,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Execute a query and decode `data.<field>`.
    pub async fn query<V, T>(&self, document: &str, field: &str, variables: V) -> FetchResult<T>
    where
        V: Serialize,
        T: DeserializeOwned,
    {
        trace!(field, "Sending GraphQL request");
        let response = self
            .http
            .post(&self.endpoint)
            .json(&GraphQlRequest {
                query: document,
                variables,
            })
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            debug!(status = status.as_u16(), "GraphQL endpoint returned an error status");
            return Err(FetchError::Http {
                status: status.as_u16(),
                message: excerpt(&body),
            });
        }

        decode_field(&body, field)
    }
}

fn transport_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        FetchError::Timeout
    } else {
        FetchError::Transport(err.to_string())
    }
}

fn excerpt(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}…", &body[..idx]),
        None => body.to_string(),
    }
}

/// Decode a response envelope and extract one root field.
///
/// Any GraphQL error fails the whole page, even alongside partial data.
pub(crate) fn decode_field<T: DeserializeOwned>(body: &str, field: &str) -> FetchResult<T> {
    let envelope: GraphQlResponse =
        serde_json::from_str(body).map_err(|e| FetchError::Decode(e.to_string()))?;

    if !envelope.errors.is_empty() {
        let messages: Vec<String> = envelope.errors.into_iter().map(|e| e.message).collect();
        return Err(FetchError::GraphQl(messages.join("; ")));
    }

    let mut data = match envelope.data {
        Some(Value::Object(map)) => map,
        _ => return Err(FetchError::Decode("response has no data".to_string())),
    };

    match data.remove(field) {
        Some(Value::Null) | None => Err(FetchError::Decode(format!("missing field `{field}`"))),
        Some(value) => {
            serde_json::from_value(value).map_err(|e| FetchError::Decode(format!("{field}: {e}")))
        }
    }
}
