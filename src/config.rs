use crate::error::AppError;
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const PUBLIC_MAINNET_RPC: &str = "https://api.mainnet-beta.solana.com";
const HELIUS_MAINNET_RPC: &str = "https://mainnet.helius-rpc.com";
const DEFAULT_SOLSCAN_PUBLIC_API: &str = "https://public-api.solscan.io";
const DEFAULT_SOLSCAN_PRO_API: &str = "https://pro-api.solscan.io";
const DEFAULT_TOKEN_PRICE_API: &str = "https://price.jup.ag/v4/price";
const MAX_SIGNATURE_PAGE_SIZE: usize = 1000;

/// Output format for the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Application configuration loaded from environment variables.
///
/// All configuration values are validated during construction to fail fast
/// if the environment is misconfigured. API credentials are only ever read
/// from the environment.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub rpc_http_url: String,
    pub solscan_api_key: String,
    pub solscan_public_api_url: String,
    pub solscan_pro_api_url: String,
    pub token_price_api_url: String,
    pub listen_addr: SocketAddr,
    pub log_level: String,
    pub log_format: LogFormat,
    pub signature_page_size: usize,
    pub solscan_timeout: Duration,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// Optional environment variables:
    /// - HELIUS_API_KEY: builds the Helius RPC URL when RPC_HTTP_URL is unset
    /// - RPC_HTTP_URL: HTTP RPC endpoint (overrides the Helius URL)
    /// - SOLSCAN_API_KEY: token sent to the Solscan APIs (default: empty)
    /// - SOLSCAN_PUBLIC_API_URL / SOLSCAN_PRO_API_URL / TOKEN_PRICE_API_URL
    /// - LISTEN_ADDR: HTTP listen address (default: 0.0.0.0:3000)
    /// - LOG_LEVEL: Logging level (default: "info")
    /// - LOG_FORMAT: "pretty" or "json" (default: "pretty")
    /// - SIGNATURE_PAGE_SIZE: signatures fetched per wallet lookup (default: 50)
    /// - SOLSCAN_TIMEOUT_SECS: single-transaction proxy timeout (default: 10)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        // Explicit RPC URL wins, then Helius with the configured key, then public mainnet
        let rpc_http_url = match (get("RPC_HTTP_URL"), get("HELIUS_API_KEY")) {
            (Some(url), _) => url,
            (None, Some(key)) => format!("{}/?api-key={}", HELIUS_MAINNET_RPC, key),
            (None, None) => PUBLIC_MAINNET_RPC.to_string(),
        };

        let solscan_api_key = get("SOLSCAN_API_KEY").unwrap_or_default();

        let solscan_public_api_url = get("SOLSCAN_PUBLIC_API_URL")
            .unwrap_or_else(|| DEFAULT_SOLSCAN_PUBLIC_API.to_string());
        let solscan_pro_api_url = get("SOLSCAN_PRO_API_URL")
            .unwrap_or_else(|| DEFAULT_SOLSCAN_PRO_API.to_string());
        let token_price_api_url = get("TOKEN_PRICE_API_URL")
            .unwrap_or_else(|| DEFAULT_TOKEN_PRICE_API.to_string());

        let listen_addr = get("LISTEN_ADDR")
            .unwrap_or_else(|| "0.0.0.0:3000".to_string())
            .parse::<SocketAddr>()
            .map_err(|e| AppError::Config(format!("Invalid LISTEN_ADDR: {}", e)))?;

        let log_level = get("LOG_LEVEL").unwrap_or_else(|| "info".to_string());

        let log_format = match get("LOG_FORMAT").as_deref() {
            None | Some("pretty") => LogFormat::Pretty,
            Some("json") => LogFormat::Json,
            Some(other) => {
                return Err(AppError::Config(format!(
                    "LOG_FORMAT must be \"pretty\" or \"json\", got: {}",
                    other
                )))
            }
        };

        let signature_page_size = match get("SIGNATURE_PAGE_SIZE") {
            Some(raw) => raw
                .parse::<usize>()
                .map_err(|e| AppError::Config(format!("Invalid SIGNATURE_PAGE_SIZE: {}", e)))?,
            None => 50,
        };
        if signature_page_size == 0 || signature_page_size > MAX_SIGNATURE_PAGE_SIZE {
            return Err(AppError::Config(format!(
                "SIGNATURE_PAGE_SIZE must be between 1 and {}, got: {}",
                MAX_SIGNATURE_PAGE_SIZE, signature_page_size
            )));
        }

        let timeout_secs = match get("SOLSCAN_TIMEOUT_SECS") {
            Some(raw) => raw
                .parse::<u64>()
                .map_err(|e| AppError::Config(format!("Invalid SOLSCAN_TIMEOUT_SECS: {}", e)))?,
            None => 10,
        };
        if timeout_secs == 0 {
            return Err(AppError::Config(
                "SOLSCAN_TIMEOUT_SECS must be greater than zero".to_string(),
            ));
        }

        Self::validate_http_url("RPC_HTTP_URL", &rpc_http_url)?;
        Self::validate_http_url("SOLSCAN_PUBLIC_API_URL", &solscan_public_api_url)?;
        Self::validate_http_url("SOLSCAN_PRO_API_URL", &solscan_pro_api_url)?;
        Self::validate_http_url("TOKEN_PRICE_API_URL", &token_price_api_url)?;

        Ok(Self {
            rpc_http_url,
            solscan_api_key,
            solscan_public_api_url: trim_trailing_slash(solscan_public_api_url),
            solscan_pro_api_url: trim_trailing_slash(solscan_pro_api_url),
            token_price_api_url,
            listen_addr,
            log_level,
            log_format,
            signature_page_size,
            solscan_timeout: Duration::from_secs(timeout_secs),
        })
    }

    /// Validate that an endpoint URL uses an HTTP or HTTPS scheme.
    ///
    /// This catches configuration errors early rather than failing on the
    /// first outbound request.
    fn validate_http_url(name: &str, url: &str) -> Result<(), AppError> {
        if !url.starts_with("http://") && !url.starts_with("https://") {
            return Err(AppError::Config(format!(
                "{} must be an HTTP/HTTPS URL (http:// or https://), got: {}",
                name, url
            )));
        }
        Ok(())
    }
}

fn trim_trailing_slash(url: String) -> String {
    url.trim_end_matches('/').to_string()
}
