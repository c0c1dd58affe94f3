use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Invalid category: {0}")]
    InvalidCategory(String),

    #[error("Invalid kind: {0} (expected 'income' or 'expense')")]
    InvalidKind(String),

    #[error("Storage initialization failed: {0}")]
    StorageInit(#[source] anyhow::Error),

    #[error("Storage read failed: {0}")]
    StorageRead(#[source] anyhow::Error),

    #[error("Storage write failed: {0}")]
    StorageWrite(#[source] anyhow::Error),
}

impl AppError {
    /// True for user-input validation failures; the caller can correct the
    /// input and retry. Storage failures are infrastructure problems.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            AppError::InvalidAmount(_) | AppError::InvalidCategory(_) | AppError::InvalidKind(_)
        )
    }
}
