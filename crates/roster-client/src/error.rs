//! Structured error surfaced at the client seam.
//!
//! Every operation returns [`ApiResult`]. The server's error payloads come in
//! three shapes — a field→message(s) map, a plain string, or something else
//! entirely — and all three collapse into one [`ApiError`] that callers can
//! match on by [`ApiErrorKind`].

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// Categories of client errors for consistent handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApiErrorKind {
    /// The server answered 401; the session has already been torn down.
    Unauthorized,
    /// Any other non-success HTTP status.
    Status,
    /// Connection, DNS, or transport failure before a response arrived.
    Network,
    /// The response body did not match the expected shape.
    Parse,
}

impl fmt::Display for ApiErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiErrorKind::Unauthorized => write!(f, "unauthorized"),
            ApiErrorKind::Status => write!(f, "status"),
            ApiErrorKind::Network => write!(f, "network"),
            ApiErrorKind::Parse => write!(f, "parse"),
        }
    }
}

/// Error returned by every client operation.
#[derive(Debug, Clone)]
pub struct ApiError {
    kind: ApiErrorKind,
    status: Option<u16>,
    message: String,
    fields: BTreeMap<String, Vec<String>>,
    /// Whether the error body matched one of the known payload shapes.
    classified: bool,
}

impl ApiError {
    /// Builds an error from a non-success, non-401 response.
    pub(crate) fn from_status(status: u16, body: &str) -> Self {
        match classify_body(body) {
            Some(Classified::Fields(fields)) => Self {
                kind: ApiErrorKind::Status,
                status: Some(status),
                message: flatten_fields(&fields),
                fields,
                classified: true,
            },
            Some(Classified::Message(message)) => Self {
                kind: ApiErrorKind::Status,
                status: Some(status),
                message,
                fields: BTreeMap::new(),
                classified: true,
            },
            None => Self {
                kind: ApiErrorKind::Status,
                status: Some(status),
                message: format!("HTTP {status}"),
                fields: BTreeMap::new(),
                classified: false,
            },
        }
    }

    /// Builds the error surfaced after a 401 teardown.
    pub(crate) fn unauthorized(body: &str) -> Self {
        let message = match classify_body(body) {
            Some(Classified::Message(message)) => message,
            Some(Classified::Fields(fields)) => flatten_fields(&fields),
            None => "Unauthorized".to_string(),
        };
        Self {
            kind: ApiErrorKind::Unauthorized,
            status: Some(401),
            message,
            fields: BTreeMap::new(),
            classified: true,
        }
    }

    /// Builds a transport-level error.
    pub(crate) fn network(err: &reqwest::Error) -> Self {
        Self {
            kind: ApiErrorKind::Network,
            status: None,
            message: format!("Network error: {err}"),
            fields: BTreeMap::new(),
            classified: false,
        }
    }

    /// Builds a response-decoding error.
    pub(crate) fn parse(err: impl fmt::Display) -> Self {
        Self {
            kind: ApiErrorKind::Parse,
            status: None,
            message: format!("Failed to decode response: {err}"),
            fields: BTreeMap::new(),
            classified: false,
        }
    }

    /// Replaces the human-readable message, keeping kind and status.
    pub(crate) fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Whether the server payload matched a known error shape.
    pub(crate) fn is_classified(&self) -> bool {
        self.classified
    }

    pub fn kind(&self) -> ApiErrorKind {
        self.kind
    }

    /// HTTP status, when a response was received.
    pub fn status(&self) -> Option<u16> {
        self.status
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// Per-field validation messages, empty unless the server sent a field map.
    pub fn fields(&self) -> &BTreeMap<String, Vec<String>> {
        &self.fields
    }

    pub fn is_unauthorized(&self) -> bool {
        self.kind == ApiErrorKind::Unauthorized
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}

/// Result type for client operations.
pub type ApiResult<T> = std::result::Result<T, ApiError>;

enum Classified {
    Fields(BTreeMap<String, Vec<String>>),
    Message(String),
}

/// Matches the server's error payload against the shapes the backend emits:
/// a JSON map of field name to message(s), a `{"detail": ...}` envelope, or
/// a bare JSON string. Anything else is left for the generic fallback.
fn classify_body(body: &str) -> Option<Classified> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value {
        Value::String(message) if !message.is_empty() => Some(Classified::Message(message)),
        Value::Object(map) => {
            if let Some(Value::String(detail)) = map.get("detail") {
                return Some(Classified::Message(detail.clone()));
            }
            let mut fields = BTreeMap::new();
            for (name, value) in map {
                match value {
                    Value::String(message) => {
                        fields.insert(name, vec![message]);
                    }
                    Value::Array(items) => {
                        let messages: Vec<String> = items
                            .into_iter()
                            .filter_map(|item| match item {
                                Value::String(message) => Some(message),
                                _ => None,
                            })
                            .collect();
                        if !messages.is_empty() {
                            fields.insert(name, messages);
                        }
                    }
                    _ => {}
                }
            }
            if fields.is_empty() {
                None
            } else {
                Some(Classified::Fields(fields))
            }
        }
        _ => None,
    }
}

/// Renders a field map as `field: message` pairs, one per message.
fn flatten_fields(fields: &BTreeMap<String, Vec<String>>) -> String {
    let mut parts = Vec::new();
    for (name, messages) in fields {
        for message in messages {
            parts.push(format!("{name}: {message}"));
        }
    }
    parts.join("; ")
}
