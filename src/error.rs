use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExtractoError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown bank: {0}")]
    UnknownBank(String),

    #[error("No extractable text in {0}")]
    EmptyDocument(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Settings error: {0}")]
    Settings(String),
}

pub type Result<T> = std::result::Result<T, ExtractoError>;
