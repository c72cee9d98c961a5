use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown measurement field '{0}'")]
pub struct UnknownField(pub String);

/// Error body returned by the inference service on a non-success status.
///
/// The service reports either a `message` or a `detail`. `detail` is usually a
/// string, but request validation failures carry a list of `{ "msg": ... }`
/// entries instead.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<Value>,
}

impl ErrorPayload {
    pub fn from_body(body: &str) -> Option<Self> {
        serde_json::from_str(body).ok()
    }

    /// Human-readable diagnosis carried by the payload, `message` first.
    pub fn summary(&self) -> Option<String> {
        if let Some(message) = non_empty(self.message.as_deref()) {
            return Some(message.to_string());
        }

        match self.detail.as_ref()? {
            Value::Null => None,
            Value::String(detail) => non_empty(Some(detail.as_str())).map(str::to_string),
            Value::Array(entries) => {
                let messages: Vec<String> = entries
                    .iter()
                    .filter_map(|entry| match entry {
                        Value::String(text) => Some(text.clone()),
                        Value::Object(map) => map
                            .get("msg")
                            .and_then(Value::as_str)
                            .map(|msg| match location_of(map.get("loc")) {
                                Some(loc) => format!("{loc}: {msg}"),
                                None => msg.to_string(),
                            }),
                        _ => None,
                    })
                    .collect();
                if messages.is_empty() {
                    None
                } else {
                    Some(messages.join("; "))
                }
            }
            other => Some(other.to_string()),
        }
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}

// ["body", "radius_mean"] -> "radius_mean"
fn location_of(loc: Option<&Value>) -> Option<String> {
    let parts = loc?.as_array()?;
    let last = parts.last()?;
    match last {
        Value::String(name) if name != "body" => Some(name.clone()),
        Value::Number(index) => Some(index.to_string()),
        _ => None,
    }
}
