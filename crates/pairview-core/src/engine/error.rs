use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Invariant violation in the finalized record set: {0}")]
    Internal(String),
}
