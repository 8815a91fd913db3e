use thiserror::Error;

/// Failures of the remote photo listing request.
///
/// The `Display` text of each variant is what gets shown to the user.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Invalid URL")]
    InvalidUrl(#[source] url::ParseError),
    #[error("Invalid response from server")]
    InvalidResponse { status: u16 },
    #[error("Failed to decode data: {0}")]
    Decoding(#[source] serde_json::Error),
    #[error("Network request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

impl FetchError {
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::InvalidResponse { status } => Some(*status),
            _ => None,
        }
    }
}
