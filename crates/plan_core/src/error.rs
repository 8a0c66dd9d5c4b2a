use thiserror::Error;

/// Failure modes of a backup restore. An `Invalid` document is rejected
/// before anything is written, so the store keeps its previous state.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("backup document rejected: {0}")]
    Invalid(#[from] serde_json::Error),
    #[error("failed to persist imported backup: {0}")]
    Persist(#[from] anyhow::Error),
}
