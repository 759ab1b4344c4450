use thiserror::Error;

/// Application-level errors with context-rich messages.
///
/// All fallible operations in this application return Result<T, AppError>.
/// Per-token and per-transaction lookup failures never surface here; the
/// aggregator degrades to a partial result instead.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Solana client error: {0}")]
    SolanaClient(String),

    #[error("Upstream API error: {0}")]
    Upstream(String),

    #[error("Transaction parsing error: {0}")]
    ParseError(String),

    #[error("Server error: {0}")]
    Server(String),
}

impl From<prometheus::Error> for AppError {
    fn from(err: prometheus::Error) -> Self {
        AppError::Config(format!("metrics: {}", err))
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        AppError::Upstream(err.to_string())
    }
}
