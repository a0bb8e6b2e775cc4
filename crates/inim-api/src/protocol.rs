// INIM Cloud wire protocol
//
// Every call is a GET carrying one compact JSON object in the `req` query
// parameter. Replies share the `{ Status, ErrMsg?, Data? }` envelope.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::Error;

/// Envelope statuses meaning "token invalid or expired".
pub const TOKEN_INVALID_STATUSES: [i64; 3] = [18, 19, 20];

/// Routing node used by the application-level methods.
pub(crate) const APP_NODE: &str = "inimhome";

/// Routing name used by the application-level methods.
pub(crate) const APP_NAME: &str = "it.inim.inimutenti";

/// Cloud method names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    RegisterClient,
    GetDevicesExtended,
    ActivateScenario,
    RequestPoll,
    InsertZone,
    InsertAreas,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::RegisterClient => "RegisterClient",
            Self::GetDevicesExtended => "GetDevicesExtended",
            Self::ActivateScenario => "ActivateScenario",
            Self::RequestPoll => "RequestPoll",
            Self::InsertZone => "InsertZone",
            Self::InsertAreas => "InsertAreas",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Method {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// The `Context` member of a request.
///
/// Some methods omit the key entirely, some send `null`, `RequestPoll`
/// sends a string. The three shapes are kept distinct on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Context {
    Omitted,
    Null,
    Named(&'static str),
}

impl Context {
    fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }
}

impl Serialize for Context {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Omitted | Self::Null => serializer.serialize_none(),
            Self::Named(name) => serializer.serialize_str(name),
        }
    }
}

/// A method call without the session-owned fields (client id, token).
///
/// The session stamps those in at send time so a request can be resent
/// unchanged after re-authentication.
#[derive(Debug, Clone)]
pub struct Request {
    pub node: &'static str,
    pub name: String,
    pub method: Method,
    pub context: Context,
    pub params: Value,
}

impl Request {
    /// An application-level request routed to `inimhome`.
    pub(crate) fn app(method: Method, context: Context, params: Value) -> Self {
        Self {
            node: APP_NODE,
            name: APP_NAME.to_owned(),
            method,
            context,
            params,
        }
    }

    /// Attach identity fields, producing the serializable wire object.
    pub fn to_wire<'a>(&'a self, client_id: &'a str, token: &'a str) -> WireRequest<'a> {
        WireRequest {
            node: self.node,
            name: &self.name,
            client_ip: "",
            method: self.method,
            client_id,
            token,
            context: self.context,
            params: &self.params,
        }
    }
}

/// Exact JSON shape sent in the `req` query parameter.
#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct WireRequest<'a> {
    pub node: &'a str,
    pub name: &'a str,
    #[serde(rename = "ClientIP")]
    pub client_ip: &'a str,
    pub method: Method,
    pub client_id: &'a str,
    pub token: &'a str,
    #[serde(skip_serializing_if = "Context::is_omitted")]
    pub context: Context,
    pub params: &'a Value,
}

/// Response envelope shared by every method.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope {
    pub status: i64,
    #[serde(default)]
    pub err_msg: Option<String>,
    #[serde(default)]
    pub data: Option<Value>,
}

impl Envelope {
    /// Classify the envelope: `Data` on success, an authentication error
    /// for token-invalid statuses, an API error for everything else.
    pub fn into_result(self) -> Result<Value, Error> {
        if self.status == 0 {
            return Ok(self.data.unwrap_or(Value::Null));
        }
        let message = self.err_msg.unwrap_or_else(|| "Unknown error".into());
        if TOKEN_INVALID_STATUSES.contains(&self.status) {
            Err(Error::Authentication {
                message,
                code: Some(self.status),
            })
        } else {
            Err(Error::Api {
                message,
                code: self.status,
            })
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn wire_request_is_compact_and_ordered() {
        let req = Request::app(
            Method::ActivateScenario,
            Context::Null,
            json!({ "ScenarioId": 2, "DeviceId": 42 }),
        );
        let body = serde_json::to_string(&req.to_wire("cid", "tok")).unwrap();
        assert_eq!(
            body,
            r#"{"Node":"inimhome","Name":"it.inim.inimutenti","ClientIP":"","Method":"ActivateScenario","ClientId":"cid","Token":"tok","Context":null,"Params":{"DeviceId":42,"ScenarioId":2}}"#
        );
    }

    #[test]
    fn omitted_context_drops_the_key() {
        let req = Request::app(Method::InsertZone, Context::Omitted, json!({}));
        let body = serde_json::to_string(&req.to_wire("cid", "tok")).unwrap();
        assert!(!body.contains("Context"));
    }

    #[test]
    fn named_context_is_a_string() {
        let req = Request::app(Method::RequestPoll, Context::Named("intrusion"), json!({}));
        let body = serde_json::to_string(&req.to_wire("cid", "tok")).unwrap();
        assert!(body.contains(r#""Context":"intrusion""#));
    }

    #[test]
    fn envelope_classification() {
        let ok: Envelope = serde_json::from_value(json!({ "Status": 0, "Data": { "x": 1 } })).unwrap();
        assert_eq!(ok.into_result().unwrap(), json!({ "x": 1 }));

        for code in TOKEN_INVALID_STATUSES {
            let env: Envelope =
                serde_json::from_value(json!({ "Status": code, "ErrMsg": "expired" })).unwrap();
            assert!(matches!(
                env.into_result(),
                Err(Error::Authentication { code: Some(c), .. }) if c == code
            ));
        }

        let other: Envelope =
            serde_json::from_value(json!({ "Status": 3, "ErrMsg": "busy" })).unwrap();
        match other.into_result() {
            Err(Error::Api { message, code }) => {
                assert_eq!(message, "busy");
                assert_eq!(code, 3);
            }
            r => panic!("expected Api error, got {r:?}"),
        }
    }

    #[test]
    fn missing_err_msg_has_a_placeholder() {
        let env: Envelope = serde_json::from_value(json!({ "Status": 5 })).unwrap();
        assert!(matches!(
            env.into_result(),
            Err(Error::Api { ref message, .. }) if message == "Unknown error"
        ));
    }
}
