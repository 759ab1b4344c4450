use super::{TokenInfo, TokenLookup};
use crate::error::AppError;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::debug;

/// Token lookup backed by the Solscan metadata API and the Jupiter price API.
pub struct HttpTokenLookup {
    client: Client,
    metadata_base_url: String,
    price_api_url: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct TokenMetaResponse {
    symbol: Option<String>,
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PriceResponse {
    #[serde(default)]
    data: HashMap<String, PriceEntry>,
}

#[derive(Debug, Deserialize)]
struct PriceEntry {
    price: Option<f64>,
}

impl HttpTokenLookup {
    pub fn new(
        client: Client,
        metadata_base_url: String,
        price_api_url: String,
        api_key: String,
    ) -> Self {
        Self {
            client,
            metadata_base_url,
            price_api_url,
            api_key,
        }
    }

    fn metadata_url(&self, mint: &str) -> String {
        format!("{}/token/meta/{}", self.metadata_base_url, mint)
    }
}

#[async_trait]
impl TokenLookup for HttpTokenLookup {
    async fn token_info(&self, mint: &str) -> Result<TokenInfo, AppError> {
        let response = self
            .client
            .get(self.metadata_url(mint))
            .header("Accept", "application/json")
            .header("token", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Token metadata API returned {} for {}",
                response.status().as_u16(),
                mint
            )));
        }

        let body = response.text().await?;
        let info = parse_token_meta(&body)?;

        debug!(mint = %mint, symbol = ?info.symbol, "Resolved token metadata");
        Ok(info)
    }

    async fn token_price(&self, mint: &str) -> Result<Option<f64>, AppError> {
        let response = self
            .client
            .get(&self.price_api_url)
            .query(&[("ids", mint)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Upstream(format!(
                "Price API returned {} for {}",
                response.status().as_u16(),
                mint
            )));
        }

        let body = response.text().await?;
        parse_price(&body, mint)
    }
}

fn parse_token_meta(body: &str) -> Result<TokenInfo, AppError> {
    let meta: TokenMetaResponse = serde_json::from_str(body)
        .map_err(|e| AppError::ParseError(format!("Invalid token metadata: {}", e)))?;

    Ok(TokenInfo {
        symbol: meta.symbol,
        name: meta.name,
    })
}

fn parse_price(body: &str, mint: &str) -> Result<Option<f64>, AppError> {
    let prices: PriceResponse = serde_json::from_str(body)
        .map_err(|e| AppError::ParseError(format!("Invalid price response: {}", e)))?;

    Ok(prices.data.get(mint).and_then(|entry| entry.price))
}
