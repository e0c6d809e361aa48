//! Error types shared by the network and storage layers.
//!
//! ERROR HANDLING
//! ==============
//! Every remote failure collapses into one user-facing idea: "the remote
//! operation failed". `ApiError` keeps enough detail for logs, and
//! [`ApiError::user_message`] picks the string a view should show: the
//! server's `message` when it sent one, otherwise the caller's fallback.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

// =============================================================================
// API ERRORS
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connect, TLS, timeout).
    #[error("request failed: {0}")]
    Transport(String),

    /// The server answered with a non-success status.
    #[error("server returned status {status}")]
    Status { status: u16, message: Option<String> },

    /// A success response did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),

    /// The request body could not be serialized.
    #[error("request encode failed: {0}")]
    Encode(String),
}

impl ApiError {
    /// Message to surface in the UI, preferring the server's own wording.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            Self::Status { message: Some(message), .. } if !message.trim().is_empty() => message.clone(),
            _ => fallback.to_owned(),
        }
    }

    /// HTTP status code, if the failure came from a server response.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

// =============================================================================
// STORAGE ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage contents invalid: {0}")]
    Json(#[from] serde_json::Error),

    #[error("storage lock poisoned")]
    Poisoned,
}
