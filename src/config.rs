//!
//! Client configuration from the environment

/// Variable holding the API base URL, e.g. `https://gitlab.com/api/v4`
pub const GITLAB_URL: &str = "GITLAB_URL";
/// Variable holding an optional access token
pub const GITLAB_TOKEN: &str = "GITLAB_TOKEN";
/// Variable holding an optional PEM CA certificate path
pub const GITLAB_CA: &str = "GITLAB_CA";

/// Build a client from environment variables
/// * `GITLAB_URL` - API base URL, required
/// * `GITLAB_TOKEN` - access token, optional
/// * `GITLAB_CA` - path to a PEM file with an extra root certificate, optional
pub fn from_env() -> crate::Result<crate::Client> {
    from_lookup(|name| std::env::var(name).ok())
}

/// Same as [`from_env`] with a custom variable lookup
pub fn from_lookup<F>(lookup: F) -> crate::Result<crate::Client>
where
    F: Fn(&str) -> Option<String>,
{
    let url = lookup(GITLAB_URL).ok_or_else(|| crate::Error::MissingEnv(GITLAB_URL.into()))?;
    tracing::info!("Connecting to api at address {}", url);

    let builder = crate::ClientBuilder::new().base_url(&url);

    let builder = match lookup(GITLAB_TOKEN).filter(|t| !t.is_empty()) {
        Some(token) => builder.private_token(&token),
        None => {
            tracing::info!("No {} set, using unauthenticated requests", GITLAB_TOKEN);
            builder
        }
    };

    let builder = match lookup(GITLAB_CA) {
        Some(path) => {
            let ca = std::fs::read(&path)?;
            builder.add_root_certificate(&ca)?
        }
        None => builder,
    };

    builder.build()
}
