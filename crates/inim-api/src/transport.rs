// HTTP transport for the INIM Cloud API.
//
// One GET per call: the compact request JSON is percent-encoded into the
// `req` query parameter, the reply body is parsed into an `Envelope`.
// Classification of the envelope is left to the caller.

use std::time::Duration;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, HeaderMap, HeaderValue};
use tracing::debug;
use url::Url;

use crate::error::Error;
use crate::protocol::{Envelope, WireRequest};

/// Production endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.inimcloud.com/";

/// Client identification string the cloud expects from the mobile app.
pub const DEFAULT_USER_AGENT: &str = "Inim Home/5 CFNetwork/1329 Darwin/21.3.0";

/// Connection settings for the cloud client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Endpoint root; every call is a GET on this URL.
    pub base_url: Url,
    pub timeout: Duration,
    /// Name this client registers under (shown in the vendor app).
    pub client_name: String,
    pub user_agent: String,
    pub accept_language: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).unwrap_or_else(|_| unreachable!()),
            timeout: Duration::from_secs(30),
            client_name: "inimctl".into(),
            user_agent: DEFAULT_USER_AGENT.into(),
            accept_language: "it-it".into(),
        }
    }
}

impl ClientConfig {
    /// Config pointing at a different endpoint (tests, proxies).
    pub fn with_base_url(base_url: Url) -> Self {
        Self {
            base_url,
            ..Self::default()
        }
    }

    /// Build a `reqwest::Client` with the fixed header set.
    pub fn build_client(&self) -> Result<reqwest::Client, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("*/*"));
        headers.insert(ACCEPT_ENCODING, HeaderValue::from_static("identity"));
        if let Ok(lang) = HeaderValue::from_str(&self.accept_language) {
            headers.insert(ACCEPT_LANGUAGE, lang);
        }

        reqwest::Client::builder()
            .timeout(self.timeout)
            .user_agent(self.user_agent.clone())
            .default_headers(headers)
            .build()
            .map_err(Error::Transport)
    }
}

/// Issues single requests against the cloud endpoint.
#[derive(Debug, Clone)]
pub struct Transport {
    http: reqwest::Client,
    base_url: Url,
}

impl Transport {
    pub fn new(config: &ClientConfig) -> Result<Self, Error> {
        Ok(Self {
            http: config.build_client()?,
            base_url: config.base_url.clone(),
        })
    }

    /// Create a transport with a pre-built `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: Url) -> Self {
        Self { http, base_url }
    }

    /// Build the full request URL: `{base}?req={percent-encoded json}`.
    pub(crate) fn request_url(&self, request: &WireRequest<'_>) -> Result<Url, Error> {
        let json = serde_json::to_string(request).map_err(|e| Error::Deserialization {
            message: format!("failed to encode request: {e}"),
            body: String::new(),
        })?;
        let base = self.base_url.as_str();
        let full = format!("{base}?req={}", quote(&json));
        Url::parse(&full).map_err(Error::InvalidUrl)
    }

    /// Send one request and parse the envelope.
    ///
    /// Only the method name and the envelope status are logged.
    pub async fn send(&self, request: &WireRequest<'_>) -> Result<Envelope, Error> {
        let url = self.request_url(request)?;
        debug!(method = %request.method, "api request");

        let resp = self.http.get(url).send().await.map_err(Error::Transport)?;

        let status = resp.status();
        if !status.is_success() {
            return Err(Error::HttpStatus {
                status: status.as_u16(),
            });
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        // Bodies may carry tokens, so the message never embeds them.
        let envelope: Envelope =
            serde_json::from_str(&body).map_err(|e| Error::Deserialization {
                message: format!("malformed {} reply: {e}", request.method),
                body: body.clone(),
            })?;

        debug!(status = envelope.status, "api response");
        Ok(envelope)
    }
}

/// Everything except unreserved characters and `/` gets escaped.
const REQ_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'/');

fn quote(raw: &str) -> String {
    utf8_percent_encode(raw, REQ_ENCODE_SET).to_string()
}
