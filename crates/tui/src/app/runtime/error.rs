use thiserror::Error;

/// Failure of one HTTP round trip. `Display` is the user-visible message.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransportError {
    #[error("{0}")]
    Network(String),

    #[error("{message}")]
    Status { status: u16, message: String },

    #[error("Invalid response from server: {0}")]
    Decode(String),
}

impl TransportError {
    #[cfg(test)]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        Self::Network(error.to_string())
    }
}

/// Error for a non-2xx response: the body's `detail` or `error` field when
/// present, otherwise `HTTP Error {status}`.
pub fn error_from_response(status: u16, body: &[u8]) -> TransportError {
    let parsed = serde_json::from_slice::<serde_json::Value>(body).ok();
    let message = parsed
        .as_ref()
        .and_then(|value| {
            ["detail", "error"].iter().find_map(|key| match value.get(*key) {
                Some(serde_json::Value::String(text)) if !text.is_empty() => Some(text.clone()),
                Some(serde_json::Value::Null) | None => None,
                Some(serde_json::Value::String(_)) => None,
                Some(other) => Some(other.to_string()),
            })
        })
        .unwrap_or_else(|| format!("HTTP Error {status}"));
    TransportError::Status { status, message }
}
