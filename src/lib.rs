//!
//! Library for listing the deployments of a GitLab project.
//!
//! ## Client
//! Create a client for the API base URL, optionally with a private token
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), gitlab_deployments::Error> {
//!     use gitlab_deployments::ClientBuilder;
//!
//!     let client = ClientBuilder::new()
//!         .base_url("https://gitlab.example.com/api/v4")
//!         .private_token("glpat-secret")
//!         .build()?;
//!
//!     // Or from GITLAB_URL and GITLAB_TOKEN
//!     let client = gitlab_deployments::config::from_env()?;
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Deployments
//! ```no_run
//! #[tokio::main]
//! async fn main() -> Result<(), gitlab_deployments::Error> {
//!     use gitlab_deployments::deployments::{ListDeploymentsOptions, Sort};
//!
//!     let client = gitlab_deployments::config::from_env()?;
//!
//!     let resp = client
//!         .list_deployments(
//!             "gitlab-org/gitlab",
//!             &ListDeploymentsOptions::new().search("production").sort(Sort::Desc),
//!         )
//!         .await?;
//!
//!     for deployment in &resp.data {
//!         println!("{} {}", deployment.environment.name, deployment.sha);
//!     }
//!     println!("next page: {:?}", resp.pagination.next_page);
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::missing_errors_doc)]

pub mod config;
pub mod deployments;
pub mod project;
pub mod transport;

pub use project::ProjectId;
pub use transport::{Pagination, RawResponse, Request, Response, Transport};

/// Error returned by client functions
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The project identifier does not resolve to a usable value
    #[error("Invalid project identifier: {0}")]
    InvalidIdentifier(String),

    /// The builder was not given a base URL
    #[error("No API base URL configured")]
    MissingBaseUrl,

    /// Configuration failed because an environment variable is missing
    #[error("Missing environment variable '{0}'")]
    MissingEnv(String),

    /// Non success status returned by the HTTP server, with the server's
    /// error message if it sent one
    #[error("HTTP failed {status}, {}", .message.as_deref().unwrap_or("no error message"))]
    HttpStatus { status: u16, message: Option<String> },

    /// Network level failure
    #[error("Transport: {0}")]
    Transport(#[from] reqwest::Error),

    /// The response body did not match the expected JSON shape
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Query parameters could not be encoded
    #[error("Query encoding: {0}")]
    Query(#[from] serde_urlencoded::ser::Error),

    /// URL parsing error
    #[error("URL: {0}")]
    URL(#[from] url::ParseError),

    /// IO Errors
    #[error("IO error {0}")]
    IO(#[from] std::io::Error),

    /// A header value could not be constructed
    #[error("Invalid header value for {0}")]
    InvalidHeader(String),
}

impl Error {
    /// HTTP status for [`Error::HttpStatus`], or the status of a transport error
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

const PRIVATE_TOKEN: &str = "private-token";

/// Builder for a [`Client`]
#[derive(Clone)]
pub struct ClientBuilder {
    base_url: Option<String>,
    private_token: Option<String>,
    timeout: Option<std::time::Duration>,
    reqwest_ca: Vec<reqwest::Certificate>,
    disable_cert_verification: bool,
}

impl std::fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("base_url", &self.base_url)
            .field("private_token", &self.private_token.as_ref().map(|_| "***"))
            .field("timeout", &self.timeout)
            .field("disable_cert_verification", &self.disable_cert_verification)
            .finish_non_exhaustive()
    }
}

impl ClientBuilder {
    /// Create a new builder instance
    #[must_use]
    pub const fn new() -> Self {
        Self {
            base_url: None,
            private_token: None,
            timeout: None,
            reqwest_ca: Vec::new(),
            disable_cert_verification: false,
        }
    }

    /// API base URL, e.g. `https://gitlab.com/api/v4`
    #[must_use]
    pub fn base_url(self, base_url: &str) -> Self {
        Self {
            base_url: Some(base_url.to_string()),
            ..self
        }
    }

    /// Personal, project or group access token sent with every request
    #[must_use]
    pub fn private_token(self, token: &str) -> Self {
        Self {
            private_token: Some(token.to_string()),
            ..self
        }
    }

    /// Timeout for a complete request
    #[must_use]
    pub fn timeout(self, timeout: std::time::Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..self
        }
    }

    /// Add a root certificate (PEM) for API certificate verification
    pub fn add_root_certificate(mut self, cert: &[u8]) -> Result<Self> {
        let ca = reqwest::Certificate::from_pem(cert)?;
        self.reqwest_ca.push(ca);
        Ok(self)
    }

    /// Disable certificate verification
    #[must_use]
    pub fn danger_accept_invalid_certs(self) -> Self {
        Self {
            disable_cert_verification: true,
            ..self
        }
    }

    /// Create the client
    pub fn build(self) -> Result<Client> {
        let base_url = self.base_url.as_deref().ok_or(Error::MissingBaseUrl)?;
        let base_url = normalize_base_url(base_url)?;

        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static("application/json"),
        );
        if let Some(token) = &self.private_token {
            let mut value = reqwest::header::HeaderValue::from_str(token)
                .map_err(|_| Error::InvalidHeader(PRIVATE_TOKEN.to_string()))?;
            value.set_sensitive(true);
            headers.insert(PRIVATE_TOKEN, value);
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .default_headers(headers);

        let client = self
            .reqwest_ca
            .iter()
            .fold(client, |client, ca| client.add_root_certificate(ca.clone()));

        let client = client.danger_accept_invalid_certs(self.disable_cert_verification);

        let client = match self.timeout {
            Some(timeout) => client.timeout(timeout),
            None => client,
        };

        Ok(Client {
            base_url,
            client: client.build()?,
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

// Url::join replaces the last path segment unless the base ends with a slash.
fn normalize_base_url(base_url: &str) -> Result<url::Url> {
    let mut url = url::Url::parse(base_url)?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}

/// The `Client` performs requests against a GitLab API instance.
/// Use a [`ClientBuilder`] to create one; clones share the connection pool.
#[derive(Clone, Debug)]
pub struct Client {
    base_url: url::Url,
    client: reqwest::Client,
}

impl Client {
    /// Create a Client builder
    #[must_use]
    pub const fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// The normalized API base URL
    #[must_use]
    pub fn base_url(&self) -> &url::Url {
        &self.base_url
    }

    /// Resolve a request against the base URL
    pub fn url_for(&self, request: &Request) -> Result<url::Url> {
        let mut url = self.base_url.join(request.path.trim_start_matches('/'))?;
        url.set_query(request.query.as_deref());
        Ok(url)
    }

    /// GET a json payload from the REST API.
    pub async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        request: Request,
    ) -> Result<Response<T>> {
        transport::execute_json(self, request).await
    }

    /// List the deployments of a project
    pub async fn list_deployments(
        &self,
        project: impl Into<ProjectId>,
        options: &deployments::ListDeploymentsOptions,
    ) -> Result<Response<Vec<deployments::Deployment>>> {
        deployments::list_deployments(self, &project.into(), options).await
    }

    /// List the deployments of a project, adjusting the request before it is
    /// sent, e.g. with [`Request::sudo`]
    pub async fn list_deployments_with<F>(
        &self,
        project: impl Into<ProjectId>,
        options: &deployments::ListDeploymentsOptions,
        modify: F,
    ) -> Result<Response<Vec<deployments::Deployment>>>
    where
        F: FnOnce(Request) -> Result<Request> + Send,
    {
        deployments::list_deployments_with(self, &project.into(), options, modify).await
    }
}

#[async_trait::async_trait]
impl Transport for Client {
    async fn execute(&self, request: Request) -> Result<RawResponse> {
        let url = self.url_for(&request)?;
        tracing::debug!("{:?} {}", request.method, url);

        let result = self
            .client
            .request(request.method.into(), url)
            .headers(request.headers)
            .send()
            .await?;

        let status = result.status().as_u16();
        let headers = result.headers().clone();
        let body = result.bytes().await?;

        Ok(RawResponse {
            status,
            headers,
            body,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn base_url_normalization() {
        let url = normalize_base_url("https://gitlab.example.com/api/v4").unwrap();
        assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/");

        let url = normalize_base_url("https://gitlab.example.com/api/v4/").unwrap();
        assert_eq!(url.as_str(), "https://gitlab.example.com/api/v4/");

        let url = normalize_base_url("https://gitlab.example.com").unwrap();
        assert_eq!(url.as_str(), "https://gitlab.example.com/");

        assert!(normalize_base_url("not a url").is_err());
    }

    #[test]
    fn request_urls() {
        let client = ClientBuilder::new()
            .base_url("https://gitlab.example.com/api/v4")
            .build()
            .unwrap();

        let req = deployments::list_deployments_request(
            &ProjectId::from("group/app"),
            &deployments::ListDeploymentsOptions::new().per_page(5),
        )
        .unwrap();
        let url = client.url_for(&req).unwrap();
        assert_eq!(
            url.as_str(),
            "https://gitlab.example.com/api/v4/projects/group%2Fapp/deployments?per_page=5"
        );

        // Dot segments must not resolve to another resource
        for path in [".", ".."] {
            let res = deployments::list_deployments_request(
                &ProjectId::from(path),
                &deployments::ListDeploymentsOptions::new(),
            );
            assert!(matches!(res, Err(Error::InvalidIdentifier(_))));
        }

        let req = deployments::list_deployments_request(
            &ProjectId::from("ns/.."),
            &deployments::ListDeploymentsOptions::new(),
        )
        .unwrap();
        assert_eq!(
            client.url_for(&req).unwrap().as_str(),
            "https://gitlab.example.com/api/v4/projects/ns%2F../deployments"
        );
    }

    #[test]
    fn missing_base_url() {
        assert!(matches!(
            ClientBuilder::new().build(),
            Err(Error::MissingBaseUrl)
        ));
    }

    #[test]
    fn token_with_newline() {
        let res = ClientBuilder::new()
            .base_url("https://gitlab.example.com/api/v4")
            .private_token("abc\ndef")
            .build();
        assert!(matches!(res, Err(Error::InvalidHeader(_))));
    }

    #[test]
    fn builder_debug_hides_token() {
        let builder = ClientBuilder::new().private_token("glpat-secret");
        let dbg = format!("{builder:?}");
        assert!(!dbg.contains("glpat-secret"));
    }

    #[test]
    fn status_error_display() {
        let err = Error::HttpStatus {
            status: 404,
            message: Some("404 Project Not Found".into()),
        };
        assert_eq!(err.to_string(), "HTTP failed 404, 404 Project Not Found");
        assert_eq!(err.status(), Some(404));
    }
}
