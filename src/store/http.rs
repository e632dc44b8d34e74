//! HTTP credential source.

use std::time::Duration;

use reqwest::Method;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue};
use url::Url;

use super::{CredentialSource, Credentials, Mapper, SourceFuture};
use crate::{Error, ErrorKind};

/// Header carrying a Vault client token.
const VAULT_TOKEN_HEADER: &str = "x-vault-token";

/// A source that fetches credentials from an HTTP endpoint.
///
/// The response body goes through the source's [`Mapper`]. By default it
/// must be a JSON document with `username` and `password` string fields (see
/// [`Credentials::from_json`]); [`HttpSource::vault`] reads Vault's
/// `data`-wrapped responses instead. Any non-2xx status is reported as an
/// [`ErrorKind::Credentials`] error carrying the status and response body.
///
/// ## Example
///
/// ```rust,ignore
/// use db_credential_refresh::store::{CachingStore, HttpSource};
///
/// // Dynamic credentials from the database secrets engine
/// let source = HttpSource::vault(
///     "https://vault.internal:8200/v1/database/creds/app",
///     "s.abc123",
/// )?;
/// let store = CachingStore::new(source);
/// ```
#[derive(Debug, Clone)]
pub struct HttpSource {
    client: reqwest::Client,
    url: Url,
    method: Method,
    headers: HeaderMap,
    mapper: Mapper,
}

impl HttpSource {
    /// Creates a source issuing `GET` requests to `url`.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`] if the URL does not parse.
    pub fn new(url: impl AsRef<str>) -> Result<Self, Error> {
        let url = Url::parse(url.as_ref())?;
        Ok(Self {
            client: reqwest::Client::new(),
            url,
            method: Method::GET,
            headers: HeaderMap::new(),
            mapper: Credentials::from_json,
        })
    }

    /// Creates a source reading a Vault secrets API path with a client token.
    ///
    /// `url` is the full read URL, e.g. `{addr}/v1/database/creds/{role}` for
    /// the database secrets engine or `{addr}/v1/secret/data/{path}` for a KV
    /// version 2 mount. The token is sent as `X-Vault-Token` and the response
    /// is mapped with [`Credentials::from_vault_json`]. Token renewal is the
    /// caller's concern.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`] if the URL does not parse or the
    /// token is not a valid header value.
    pub fn vault(url: impl AsRef<str>, token: impl AsRef<str>) -> Result<Self, Error> {
        let mut token = HeaderValue::from_str(token.as_ref())
            .map_err(|e| Error::configuration("invalid vault token").with_source(e))?;
        token.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(VAULT_TOKEN_HEADER, token);

        Ok(Self::new(url)?
            .with_headers(headers)
            .with_mapper(Credentials::from_vault_json))
    }

    /// Sets the HTTP method.
    #[must_use]
    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets headers sent with every request (auth tokens, namespaces).
    #[must_use]
    pub fn with_headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Sets the function that maps the response body to credentials.
    #[must_use]
    pub fn with_mapper(mut self, mapper: Mapper) -> Self {
        self.mapper = mapper;
        self
    }

    /// Uses a preconfigured HTTP client (proxies, custom CAs).
    #[must_use]
    pub fn with_client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    /// Sets a per-request timeout by rebuilding the HTTP client.
    ///
    /// # Errors
    ///
    /// Returns [`ErrorKind::Configuration`] if the client cannot be built.
    pub fn with_timeout(mut self, timeout: Duration) -> Result<Self, Error> {
        self.client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::configuration(format!("failed to build HTTP client: {}", e)).with_source(e)
            })?;
        Ok(self)
    }

    /// Returns the endpoint URL.
    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl CredentialSource for HttpSource {
    fn fetch(&self) -> SourceFuture<'_> {
        Box::pin(async move {
            let response = self
                .client
                .request(self.method.clone(), self.url.clone())
                .headers(self.headers.clone())
                .header(ACCEPT, HeaderValue::from_static("application/json"))
                .send()
                .await
                .map_err(map_reqwest_error)?;

            let status = response.status();
            let body = response.text().await.map_err(map_reqwest_error)?;

            if !status.is_success() {
                tracing::debug!(status = status.as_u16(), url = %self.url, "credential endpoint rejected request");
                return Err(map_status_error(status.as_u16(), &body));
            }

            (self.mapper)(&body)
        })
    }
}

/// Maps reqwest errors to crate errors.
fn map_reqwest_error(e: reqwest::Error) -> Error {
    let err = if e.is_timeout() {
        Error::timeout(format!("credential request timed out: {}", e))
    } else if e.is_connect() {
        Error::connection(format!("credential endpoint unreachable: {}", e))
    } else {
        Error::new(ErrorKind::Transport, format!("HTTP error: {}", e))
    };
    err.with_source(e)
}

/// Maps a non-success HTTP status to a credentials error.
fn map_status_error(status: u16, body: &str) -> Error {
    let detail = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("errors")
                .and_then(|e| e.get(0))
                .or_else(|| v.get("error"))
                .and_then(|e| e.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string());

    if detail.is_empty() {
        Error::credentials(format!("credential endpoint returned HTTP {}", status))
    } else {
        Error::credentials(format!(
            "credential endpoint returned HTTP {}: {}",
            status, detail
        ))
    }
}
