use thiserror::Error;

/// Validation and contract errors exposed by `snapview-core`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter: '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error("invalid range '{value}', expected one of 1d, 5d, 1m, 6m, ytd, 1y, 5y, max")]
    InvalidRange { value: String },
    #[error("invalid mode '{value}', expected price or percent")]
    InvalidMode { value: String },

    #[error("timestamp is not a recognized instant: '{value}'")]
    InvalidTimestamp { value: String },
}

/// Fetch-level errors surfaced to the view as its error state.
///
/// The calculator's "nothing to derive from" case is deliberately not a
/// variant here: it falls back silently instead of erroring (see
/// [`crate::change::period_change`]).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// Transport-level failure: connect, timeout, or body read.
    #[error("network error: {0}")]
    Network(String),
    /// Non-2xx response, with the message the server sent when it sent one.
    #[error("{message}")]
    Server { status: u16, message: String },
    /// The body decoded as neither the snapshot shape nor a known error shape.
    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    /// Build a server error from a non-2xx response, preferring the `detail`
    /// or `error` field of a JSON body over a generic status message.
    pub fn from_failure_body(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<serde_json::Value>(body)
            .ok()
            .and_then(|value| {
                value
                    .get("detail")
                    .or_else(|| value.get("error"))
                    .and_then(|field| field.as_str().map(str::to_owned))
            })
            .unwrap_or_else(|| format!("request failed with status {status}"));

        Self::Server { status, message }
    }

    /// HTTP status carried by server errors.
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_detail_field_from_error_body() {
        let error = FetchError::from_failure_body(404, r#"{"detail": "Data unavailable"}"#);
        assert_eq!(error.to_string(), "Data unavailable");
        assert_eq!(error.status(), Some(404));
    }

    #[test]
    fn falls_back_to_error_field() {
        let error = FetchError::from_failure_body(500, r#"{"error": "Snapshot unavailable"}"#);
        assert_eq!(error.to_string(), "Snapshot unavailable");
    }

    #[test]
    fn generic_message_when_body_is_not_json() {
        let error = FetchError::from_failure_body(502, "<html>Bad Gateway</html>");
        assert_eq!(error.to_string(), "request failed with status 502");
    }
}
