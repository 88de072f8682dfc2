use thiserror::Error;

pub type Result<T> = std::result::Result<T, WalletError>;

#[derive(Error, Debug)]
pub enum WalletError {
    #[error("{0}")]
    Validation(String),
    #[error("{0} not found")]
    NotFound(String),
    #[error("insufficient balance")]
    InsufficientBalance,
    #[error("recipient is not registered")]
    RecipientNotFound,
    #[error("cannot send to your own wallet")]
    SelfTransferDenied,
    #[error("transaction already resolved")]
    AlreadyResolved,
    #[error("invalid phone number or PIN")]
    Unauthorized,
    #[error("timed out waiting for the wallet lock")]
    Contended,
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("internal error: {0}")]
    Internal(#[source] Box<dyn std::error::Error + Send + Sync>),
}
