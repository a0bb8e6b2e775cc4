// Authenticated session
//
// Owns the credentials, a per-session client id and the current token.
// Every vendor operation goes through `Session::call`, which applies the
// re-authentication policy once: ensure a token, send, and on a token
// rejection log in again and resend exactly once.

use secrecy::{ExposeSecret, SecretString};
use serde_json::{Value, json};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::Error;
use crate::models::RawDevice;
use crate::protocol::{Context, Envelope, Method, Request};
use crate::transport::{ClientConfig, Transport};

/// Prefix of the generated client id (`inimctl-<uuid>`).
pub const CLIENT_ID_PREFIX: &str = "inimctl";

/// TTL assumed when the login reply carries none.
const DEFAULT_TOKEN_TTL: u64 = 86_400;

/// Login credentials, fixed for the lifetime of a session.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub username: String,
    pub password: SecretString,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: SecretString) -> Self {
        Self {
            username: username.into(),
            password,
        }
    }
}

#[derive(Debug)]
struct TokenState {
    token: SecretString,
    ttl: u64,
}

/// A logged-in (or not yet logged-in) connection to the INIM Cloud.
///
/// The token is never validated locally: its TTL is informational and
/// expiry is only discovered when the cloud rejects a call.
#[derive(Debug)]
pub struct Session {
    transport: Transport,
    credentials: Credentials,
    client_id: String,
    client_name: String,
    token: RwLock<Option<TokenState>>,
    devices: RwLock<Vec<RawDevice>>,
}

impl Session {
    pub fn new(config: &ClientConfig, credentials: Credentials) -> Result<Self, Error> {
        let transport = Transport::new(config)?;
        Ok(Self::with_transport(
            transport,
            config.client_name.clone(),
            credentials,
        ))
    }

    /// Build a session around an existing transport.
    pub fn with_transport(
        transport: Transport,
        client_name: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            transport,
            credentials,
            client_id: format!("{CLIENT_ID_PREFIX}-{}", Uuid::new_v4()),
            client_name: client_name.into(),
            token: RwLock::new(None),
            devices: RwLock::new(Vec::new()),
        }
    }

    pub(crate) fn client_name(&self) -> &str {
        &self.client_name
    }

    /// Whether a token is held. Says nothing about server-side validity.
    pub async fn is_authenticated(&self) -> bool {
        self.token.read().await.is_some()
    }

    /// TTL reported by the last successful login, in seconds.
    pub async fn token_ttl(&self) -> Option<u64> {
        self.token.read().await.as_ref().map(|t| t.ttl)
    }

    /// Raw device list from the most recent successful `get_devices`.
    pub async fn cached_devices(&self) -> Vec<RawDevice> {
        self.devices.read().await.clone()
    }

    pub(crate) async fn cache_devices(&self, devices: Vec<RawDevice>) {
        *self.devices.write().await = devices;
    }

    // ── Authentication ───────────────────────────────────────────────

    /// Register this client and obtain a fresh token.
    ///
    /// Connectivity failures surface as transport errors; everything else
    /// (rejected credentials, malformed reply, missing token) is an
    /// `Error::Authentication`. On failure the session is left without a
    /// token.
    pub async fn authenticate(&self) -> Result<(), Error> {
        let result = self.register().await;
        let mut guard = self.token.write().await;
        match result {
            Ok(state) => {
                info!(ttl = state.ttl, "authenticated with INIM Cloud");
                *guard = Some(state);
                Ok(())
            }
            Err(e) => {
                *guard = None;
                warn!(error = %e, "authentication failed");
                Err(e)
            }
        }
    }

    /// Log in unless a token is already held.
    pub async fn ensure_authenticated(&self) -> Result<(), Error> {
        if self.is_authenticated().await {
            return Ok(());
        }
        self.authenticate().await
    }

    async fn register(&self) -> Result<TokenState, Error> {
        let client_info = json!({
            "name": self.client_name,
            "version": env!("CARGO_PKG_VERSION"),
            "device": self.client_name,
            "brand": self.client_name,
            "platform": std::env::consts::OS,
        })
        .to_string();

        let request = Request {
            node: "",
            name: String::new(),
            method: Method::RegisterClient,
            context: Context::Omitted,
            params: json!({
                "Username": self.credentials.username,
                "Password": self.credentials.password.expose_secret(),
                "ClientId": self.client_id,
                "ClientName": self.client_name,
                "ClientInfo": client_info,
                "Role": "1",
                "Brand": "0",
            }),
        };

        let data = self
            .transport
            .send(&request.to_wire("", ""))
            .await
            .and_then(Envelope::into_result)
            .map_err(|e| match e {
                Error::Api { message, code } => Error::Authentication {
                    message,
                    code: Some(code),
                },
                Error::Deserialization { message, .. } => Error::Authentication {
                    message,
                    code: None,
                },
                other => other,
            })?;

        let token = data
            .get("Token")
            .and_then(Value::as_str)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                message: "No token received".into(),
                code: None,
            })?;
        let ttl = data
            .get("TTL")
            .and_then(Value::as_u64)
            .unwrap_or(DEFAULT_TOKEN_TTL);

        Ok(TokenState {
            token: SecretString::from(token.to_owned()),
            ttl,
        })
    }

    // ── Authenticated calls ──────────────────────────────────────────

    /// Send `request` with the current token, re-authenticating and
    /// resending once if the cloud rejects the token.
    ///
    /// A second rejection propagates. API errors are never retried.
    pub(crate) async fn call(&self, request: &Request) -> Result<Value, Error> {
        self.ensure_authenticated().await?;
        match self.send_once(request).await {
            Err(e) if e.is_auth_expired() => {
                debug!(method = %request.method, "token rejected, re-authenticating");
                self.authenticate().await?;
                self.send_once(request).await
            }
            other => other,
        }
    }

    async fn send_once(&self, request: &Request) -> Result<Value, Error> {
        let token = {
            let guard = self.token.read().await;
            guard
                .as_ref()
                .map(|t| t.token.expose_secret().to_owned())
                .unwrap_or_default()
        };
        let wire = request.to_wire(&self.client_id, &token);
        self.transport.send(&wire).await?.into_result()
    }
}
