/// Error enumeration for attendance store failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("store does not support {0}")]
    Unsupported(&'static str),
    #[error("store query failed: {0}")]
    Query(String),
}

impl StoreError {
    /// True when the store simply lacks an optional capability.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, StoreError::Unsupported(_))
    }
}
