use thiserror::Error;

#[derive(Debug, Error)]
pub enum InitializationError {
    #[error("Failed to initialize sim store: {0}")]
    Store(#[source] anyhow::Error),
}
