use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("API key is required for {provider}")]
    MissingCredential { provider: String },
    #[error("provider rejected the request ({status}): {message}")]
    AuthRejected { status: u16, message: String },
    #[error("provider rejected the model: {message}")]
    InvalidModel { message: String },
    #[error("no findings could be extracted from the provider response: {reason}")]
    UnparseableResponse { reason: String },
    #[error(transparent)]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {status}: {body}")]
    UnexpectedStatus { status: u16, body: String },
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Substrings that mark a provider error body as a credential/config
/// problem. Matching is case-sensitive and the list is intentionally
/// frozen: broadening it would misclassify more unrelated errors (an
/// arbitrary message containing "required" already can).
const CREDENTIAL_MARKERS: [&str; 5] = ["API", "key", "permission", "invalid", "required"];

impl Error {
    /// Whether this error invalidates the rest of a batch. Credential and
    /// model errors will fail identically for every remaining file, so the
    /// batch stops; parse and transport failures stay local to one file.
    pub fn is_batch_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingCredential { .. }
                | Error::AuthRejected { .. }
                | Error::InvalidModel { .. }
        )
    }
}

/// Classifies a non-success provider response. Structured status codes are
/// checked first; the substring heuristic only ever promotes an otherwise
/// unclassified body to the credential/model class, never the reverse.
pub fn classify_status_error(status: u16, body: String) -> Error {
    if matches!(status, 401 | 403 | 431) {
        return Error::AuthRejected {
            status,
            message: body,
        };
    }
    if body.contains("model") {
        return Error::InvalidModel { message: body };
    }
    if CREDENTIAL_MARKERS.iter().any(|m| body.contains(m)) {
        return Error::AuthRejected {
            status,
            message: body,
        };
    }
    Error::UnexpectedStatus { status, body }
}
