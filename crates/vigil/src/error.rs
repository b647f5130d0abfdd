use crate::config::ConfigError;
use crate::store::StoreError;

/// Top-level failure type for pipeline runs.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Store(#[from] StoreError),
}
