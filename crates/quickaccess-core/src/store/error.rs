use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Subscription failed: {0}")]
    Subscription(String),

    #[error("Write failed: {0}")]
    Write(String),

    #[error("Invalid document: {0}")]
    InvalidDocument(#[from] serde_json::Error),

    #[error("Storage I/O error: {0}")]
    Io(#[from] std::io::Error),
}
