use shared::error::ErrorPayload;
use thiserror::Error;
use url::Url;

use crate::transport::TransportError;

/// Terminal outcome of a failed submission. `Display` is the text shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SubmissionError {
    #[error(
        "Could not connect to the prediction server. Please make sure the server is running at {endpoint}"
    )]
    ConnectionUnavailable { endpoint: String },
    #[error("Server error: {detail}")]
    ServerRejected { detail: String },
    #[error("An error occurred while making the prediction. Please try again.")]
    TransportFailure,
    #[error("An unexpected error occurred. Please try again.")]
    UnexpectedFailure,
}

impl SubmissionError {
    pub fn classify(err: &TransportError, endpoint: &Url) -> Self {
        match err {
            TransportError::Connect(_) => Self::ConnectionUnavailable {
                endpoint: endpoint.to_string(),
            },
            TransportError::Status {
                status,
                reason,
                body,
            } => Self::ServerRejected {
                detail: ErrorPayload::from_body(body)
                    .and_then(|payload| payload.summary())
                    .or_else(|| reason.clone())
                    .unwrap_or_else(|| format!("HTTP {status}")),
            },
            TransportError::NoResponse(_) => Self::TransportFailure,
            TransportError::Other(_) => Self::UnexpectedFailure,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::ConnectionUnavailable { .. } => "connection_unavailable",
            Self::ServerRejected { .. } => "server_rejected",
            Self::TransportFailure => "transport_failure",
            Self::UnexpectedFailure => "unexpected_failure",
        }
    }
}
