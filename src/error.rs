use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    /// Input rejected before any request was sent.
    #[error("{message}")]
    Validation { field: &'static str, message: String },

    /// The backend rejected the bearer token (or none was present).
    #[error("Your session is no longer valid, please log in again")]
    SessionInvalid,

    #[error("{context} failed with HTTP {status}")]
    Http { status: u16, context: &'static str },

    #[error("{context} failed: {message}")]
    Transport {
        context: &'static str,
        message: String,
    },

    #[error("Unexpected response from {context}: {message}")]
    Decode {
        context: &'static str,
        message: String,
    },

    /// An action needed a server id from an earlier call that never arrived.
    #[error("Missing reference: {0}")]
    MissingReference(&'static str),

    #[error("A verdict was already recorded for this comparison")]
    VerdictAlreadyRecorded,

    #[error("Storage error: {0}")]
    Storage(String),
}

impl ClientError {
    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        ClientError::Validation {
            field,
            message: message.into(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ClientError::Validation { .. })
    }

    /// The form field a validation error belongs to, if any.
    pub fn field(&self) -> Option<&'static str> {
        match self {
            ClientError::Validation { field, .. } => Some(*field),
            _ => None,
        }
    }
}

impl From<ClientError> for String {
    fn from(err: ClientError) -> Self {
        err.to_string()
    }
}

pub type ClientResult<T> = Result<T, ClientError>;
