use serde::{Deserialize, Serialize};
use std::fmt;

/// The `jsonrpc` version field. Only `"2.0"` is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonRpcVersion {
    V2_0,
}

impl Serialize for JsonRpcVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str("2.0")
    }
}

impl<'de> Deserialize<'de> for JsonRpcVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        if s == "2.0" {
            Ok(JsonRpcVersion::V2_0)
        } else {
            Err(serde::de::Error::custom(format!(
                "unsupported jsonrpc version: {s}"
            )))
        }
    }
}

/// A JSON-RPC request identifier: either a number or a string.
///
/// Per spec, uniquely identifies a request within a session. Server-allocated
/// IDs for server→client requests are minted from a monotonic counter scoped
/// to the session (see `mcp-session`), kept disjoint from client-allocated IDs
/// by construction (clients mint their own; servers mint a negative-sign-free
/// counter the client never sees reused).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
}

impl RequestId {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            RequestId::String(s) => Some(s),
            RequestId::Number(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            RequestId::Number(n) => Some(*n),
            RequestId::String(_) => None,
        }
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        RequestId::Number(n)
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        RequestId::String(s)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        RequestId::String(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{from_str, json, to_value};

    #[test]
    fn request_id_roundtrips_number_and_string() {
        let n: RequestId = from_str("1").unwrap();
        assert_eq!(n, RequestId::Number(1));
        assert_eq!(to_value(&n).unwrap(), json!(1));

        let s: RequestId = from_str("\"abc\"").unwrap();
        assert_eq!(s, RequestId::String("abc".to_string()));
        assert_eq!(to_value(&s).unwrap(), json!("abc"));
    }

    #[test]
    fn jsonrpc_version_rejects_unknown() {
        let err: Result<JsonRpcVersion, _> = from_str("\"1.0\"");
        assert!(err.is_err());
    }
}
