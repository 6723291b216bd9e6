//!
//! Request/response plumbing shared by all endpoints.
//!
//! A [`Transport`] performs one described HTTP request and hands back the raw
//! response. [`execute_json`] layers status checking and JSON decoding on top,
//! so any transport, including test doubles, gets the same error
//! normalization as the real [`crate::Client`].
use crate::{Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

/// HTTP method of a [`Request`]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Method {
    /// GET
    Get,
}

impl From<Method> for reqwest::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
        }
    }
}

/// Description of a request relative to the API base URL
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Request {
    /// HTTP method
    pub method: Method,
    /// Path relative to the base URL, without a leading slash
    pub path: String,
    /// Already encoded query string, `None` when there are no parameters
    pub query: Option<String>,
    /// Extra headers for this request only
    pub headers: HeaderMap,
}

impl Request {
    /// Create a GET request for a path with no query parameters
    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            query: None,
            headers: HeaderMap::new(),
        }
    }

    /// Add a header to this request
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| Error::InvalidHeader(name.to_string()))?;
        let value = HeaderValue::from_str(value)
            .map_err(|_| Error::InvalidHeader(name.as_str().to_string()))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Perform the request as another user, needs an admin token.
    /// See <https://docs.gitlab.com/ee/api/rest/#sudo>
    pub fn sudo(self, user: &str) -> Result<Self> {
        self.header("sudo", user)
    }

    /// Attach query parameters, any serializable struct or list of pairs.
    /// An empty encoding leaves the request without a query string.
    pub fn query<Q: serde::Serialize + ?Sized>(self, params: &Q) -> Result<Self> {
        let query = serde_urlencoded::to_string(params)?;
        Ok(Self {
            query: if query.is_empty() { None } else { Some(query) },
            ..self
        })
    }
}

/// Undecoded response as received from the server
#[derive(Clone, Debug)]
pub struct RawResponse {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: bytes::Bytes,
}

impl RawResponse {
    /// Returns true for 2xx responses
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decoded response together with its transport metadata
#[derive(Clone, Debug)]
pub struct Response<T> {
    /// HTTP status code
    pub status: u16,
    /// Response headers
    pub headers: HeaderMap,
    /// Pagination details reported by the server
    pub pagination: Pagination,
    /// Decoded body
    pub data: T,
}

impl<T> Response<T> {
    /// Consume the response and return the decoded body
    pub fn into_inner(self) -> T {
        self.data
    }
}

/// Pagination headers, see
/// <https://docs.gitlab.com/ee/api/rest/#pagination-link-header>
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Pagination {
    /// `X-Total`
    pub total: Option<u64>,
    /// `X-Total-Pages`
    pub total_pages: Option<u64>,
    /// `X-Per-Page`
    pub per_page: Option<u64>,
    /// `X-Page`
    pub page: Option<u64>,
    /// `X-Next-Page`
    pub next_page: Option<u64>,
    /// `X-Prev-Page`
    pub prev_page: Option<u64>,
}

impl Pagination {
    /// Parse the pagination headers, ignoring any that are missing or malformed
    #[must_use]
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let num = |name: &str| {
            headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok())
        };
        Self {
            total: num("x-total"),
            total_pages: num("x-total-pages"),
            per_page: num("x-per-page"),
            page: num("x-page"),
            next_page: num("x-next-page"),
            prev_page: num("x-prev-page"),
        }
    }
}

/// Anything that can perform a [`Request`] against the API.
#[async_trait::async_trait]
pub trait Transport: Send + Sync {
    /// Send the request and return the response as-is.
    /// Non-success statuses are not errors at this level.
    async fn execute(&self, request: Request) -> Result<RawResponse>;
}

// GitLab reports errors as {"message": ...} or {"error": ...}, where message
// can also be an object of field errors.
#[derive(serde::Deserialize)]
struct ErrorPayload {
    message: Option<serde_json::Value>,
    error: Option<serde_json::Value>,
}

fn error_message(body: &[u8]) -> Option<String> {
    let payload: ErrorPayload = serde_json::from_slice(body).ok()?;
    match payload.message.or(payload.error)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Perform a request and decode a successful JSON body into `T`.
pub async fn execute_json<T, C>(transport: &C, request: Request) -> Result<Response<T>>
where
    T: serde::de::DeserializeOwned,
    C: Transport + ?Sized,
{
    let resp = transport.execute(request).await?;

    if !resp.is_success() {
        tracing::error!("GET call failed with status {}", resp.status);
        return Err(Error::HttpStatus {
            status: resp.status,
            message: error_message(&resp.body),
        });
    }

    let data = serde_json::from_slice(&resp.body)?;
    Ok(Response {
        status: resp.status,
        pagination: Pagination::from_headers(&resp.headers),
        headers: resp.headers,
        data,
    })
}
