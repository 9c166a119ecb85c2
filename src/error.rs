use thiserror::Error;

/// Failure of a single backend request, classified the way the views react to it.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// The request never produced a response (connection refused, timeout, aborted body).
    #[error("{0}")]
    Network(String),

    #[error("HTTP error! status: {0}")]
    Status(u16),

    /// Non-success answer to a transaction submission, carrying the server's message.
    #[error("{message}")]
    Rejected { status: u16, message: String },

    /// The body was not the JSON shape the endpoint promises.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    #[error("Invalid endpoint: {0}")]
    Endpoint(String),
}

impl ApiError {
    pub fn is_malformed_payload(&self) -> bool {
        matches!(self, ApiError::Parse(_))
    }
}

/// Malformed or empty payloads mean "no data available", not a failed view.
pub fn or_empty<T: Default>(result: Result<T, ApiError>) -> Result<T, ApiError> {
    match result {
        Err(e) if e.is_malformed_payload() => {
            log::warn!("⚠️ Treating malformed payload as empty: {}", e);
            Ok(T::default())
        }
        other => other,
    }
}
