//! Client error types

use serde::Deserialize;
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// The server could not be reached
    #[error("Network error. Please try again.")]
    Transport(#[source] reqwest::Error),

    /// Non-2xx response; `detail` is the server's message, meant for display
    #[error("{detail}")]
    Api {
        status: u16,
        detail: String,
        code: Option<String>,
    },

    /// A 2xx body that did not match the expected shape
    #[error("Invalid response: {0}")]
    Decode(String),

    /// A multipart part could not be built
    #[error("Invalid upload: {0}")]
    Upload(String),
}

impl ClientError {
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn code(&self) -> Option<&str> {
        match self {
            ClientError::Api { code, .. } => code.as_deref(),
            _ => None,
        }
    }

    /// Build the error for a failed response from its status and raw body
    ///
    /// Bodies without a JSON `detail` (e.g. plain-text rejections) are used
    /// verbatim.
    pub(crate) fn from_body(status: u16, body: &str) -> Self {
        #[derive(Deserialize)]
        struct ErrorBody {
            detail: String,
            #[serde(default)]
            code: Option<String>,
        }

        match serde_json::from_str::<ErrorBody>(body) {
            Ok(parsed) => ClientError::Api {
                status,
                detail: parsed.detail,
                code: parsed.code,
            },
            Err(_) => ClientError::Api {
                status,
                detail: body.trim().to_string(),
                code: None,
            },
        }
    }
}

impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ClientError::Decode(e.to_string())
        } else {
            ClientError::Transport(e)
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
