pub mod http;

use crate::error::AppError;
use async_trait::async_trait;

pub use http::HttpTokenLookup;

/// Symbol used when metadata resolves without one.
pub const UNKNOWN_SYMBOL: &str = "Unknown";

/// Name used when metadata resolves without one.
pub const UNKNOWN_TOKEN_NAME: &str = "Unknown Token";

/// Token metadata as reported by the metadata API. Either field may be absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenInfo {
    pub symbol: Option<String>,
    pub name: Option<String>,
}

impl TokenInfo {
    pub fn symbol_or_unknown(&self) -> String {
        self.symbol
            .clone()
            .unwrap_or_else(|| UNKNOWN_SYMBOL.to_string())
    }

    pub fn name_or_unknown(&self) -> String {
        self.name
            .clone()
            .unwrap_or_else(|| UNKNOWN_TOKEN_NAME.to_string())
    }
}

/// Resolves token metadata and USD prices by mint.
///
/// Implementations report failures as errors; callers decide whether a failure
/// drops the token or only its USD value.
#[async_trait]
pub trait TokenLookup: Send + Sync {
    async fn token_info(&self, mint: &str) -> Result<TokenInfo, AppError>;

    /// USD price of one whole unit, `None` when the API has no price.
    async fn token_price(&self, mint: &str) -> Result<Option<f64>, AppError>;

    /// USD value of `amount` units, `None` on any failure or missing price.
    async fn usd_value(&self, mint: &str, amount: f64) -> Option<f64> {
        match self.token_price(mint).await {
            Ok(price) => price.map(|p| p * amount),
            Err(e) => {
                tracing::debug!(mint = %mint, error = %e, "Price lookup failed");
                None
            }
        }
    }
}
