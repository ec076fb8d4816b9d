// RouterOS REST HTTP client
//
// Wraps `reqwest::Client` with RouterOS URL construction, basic auth and
// error-object unwrapping. Table endpoints (DHCP, WiFi) are implemented
// as inherent methods in sibling files to keep this module focused on
// transport mechanics.

use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;
use tracing::{debug, trace};
use url::Url;

use crate::error::Error;
use crate::transport::TransportConfig;

/// RouterOS reports failures as `{"error": 400, "message": "...", "detail": "..."}`.
#[derive(serde::Deserialize)]
struct RouterOsError {
    message: Option<String>,
    detail: Option<String>,
}

impl RouterOsError {
    fn describe(self) -> Option<String> {
        match (self.message, self.detail) {
            (Some(message), Some(detail)) => Some(format!("{message}: {detail}")),
            (Some(text), None) | (None, Some(text)) => Some(text),
            (None, None) => None,
        }
    }
}

/// HTTP client for the RouterOS REST API (`/rest/...`, RouterOS v7+).
///
/// Every request carries HTTP basic auth. All list endpoints return a bare
/// JSON array, which is deserialized straight into typed rows.
#[derive(Clone)]
pub struct RouterOsClient {
    http: reqwest::Client,
    base_url: Url,
    username: String,
    password: SecretString,
}

impl std::fmt::Debug for RouterOsClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouterOsClient")
            .field("base_url", &self.base_url.as_str())
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

impl RouterOsClient {
    /// Create a new client from a `TransportConfig`.
    ///
    /// `base_url` is the router root, e.g. `http://192.168.88.1`.
    pub fn new(
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url, username, password))
    }

    /// Create a client with a pre-built `reqwest::Client`.
    pub fn with_client(
        http: reqwest::Client,
        base_url: Url,
        username: impl Into<String>,
        password: SecretString,
    ) -> Self {
        Self {
            http,
            base_url,
            username: username.into(),
            password,
        }
    }

    /// The router base URL.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The user every request authenticates as.
    pub fn username(&self) -> &str {
        &self.username
    }

    // ── URL builders ─────────────────────────────────────────────────

    /// Build `{base}/rest/{path}`. Leading slashes on `path` are ignored.
    pub(crate) fn rest_url(&self, path: &str) -> Result<Url, Error> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let path = path.trim_start_matches('/');
        Ok(Url::parse(&format!("{base}/rest/{path}"))?)
    }

    // ── Request helpers ──────────────────────────────────────────────

    /// Send an authenticated GET and decode the JSON array body.
    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<T>, Error> {
        let url = self.rest_url(path)?;
        debug!("GET {}", url);

        let resp = self
            .http
            .get(url)
            .query(query)
            .basic_auth(&self.username, Some(self.password.expose_secret()))
            .send()
            .await?;

        Self::parse_rows(resp).await
    }

    /// Map the status code, then decode the row array.
    async fn parse_rows<T: DeserializeOwned>(resp: reqwest::Response) -> Result<Vec<T>, Error> {
        let status = resp.status();
        let body = resp.text().await?;

        if !status.is_success() {
            let described = serde_json::from_str::<RouterOsError>(&body)
                .ok()
                .and_then(RouterOsError::describe);
            let message = described.unwrap_or_else(|| preview(&body).to_owned());

            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(Error::Authentication { message });
            }
            return Err(Error::Api {
                status: status.as_u16(),
                message,
            });
        }

        trace!(bytes = body.len(), "decoding RouterOS rows");
        serde_json::from_str::<Vec<T>>(&body).map_err(|e| {
            let message = format!("{e} (body preview: {:?})", preview(&body));
            Error::Deserialization { message, body }
        })
    }
}

/// First 200 bytes of a body, cut on a char boundary.
fn preview(body: &str) -> &str {
    let mut end = body.len().min(200);
    while !body.is_char_boundary(end) {
        end -= 1;
    }
    &body[..end]
}
