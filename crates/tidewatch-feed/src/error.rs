/// Why a retrieval produced no batch. Never surfaces past [`crate::Monitor`].
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("backend returned HTTP {0}")]
    Status(u16),
    #[error("malformed drain response: {0}")]
    Decode(#[from] serde_json::Error),
}
