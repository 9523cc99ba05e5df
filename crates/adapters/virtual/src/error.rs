//! Virtual adapter error types.

use blindhub_domain::error::BlindHubError;

/// Errors specific to the virtual adapter.
#[derive(Debug, thiserror::Error)]
pub enum VirtualError {
    /// Reading or writing the mode state file failed.
    #[error("mode state file error")]
    Io(#[source] std::io::Error),

    /// The mode state file does not hold valid JSON.
    #[error("invalid mode state file")]
    Json(#[source] serde_json::Error),

    /// A domain-level error (validation, not-found, etc.).
    #[error("domain error")]
    Domain(#[source] BlindHubError),
}

impl VirtualError {
    /// Convert into a [`BlindHubError::Storage`] for propagation across port
    /// boundaries.
    pub fn into_domain(self) -> BlindHubError {
        match self {
            Self::Domain(err) => err,
            other => BlindHubError::Storage(Box::new(other)),
        }
    }
}

impl From<VirtualError> for BlindHubError {
    fn from(err: VirtualError) -> Self {
        err.into_domain()
    }
}
