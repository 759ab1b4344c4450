mod api;
mod cli;
mod config;
mod error;
mod lookup;
mod metrics;
mod render;
mod server;
mod solana;
mod solscan;
mod telemetry;
mod wallet;

#[cfg(test)]
mod testing;

use crate::api::{AppState, SolscanEndpoints};
use crate::cli::{Cli, Command};
use crate::config::AppConfig;
use crate::error::AppError;
use crate::lookup::{HttpTokenLookup, TokenLookup};
use crate::metrics::Metrics;
use crate::solana::classifier::TransactionClassifier;
use crate::solana::rpc::{ChainClient, RpcChainClient};
use crate::solscan::HttpSolscanClient;
use crate::wallet::WalletAggregator;
use clap::Parser;
use std::sync::Arc;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    // Load and validate configuration
    let mut config = AppConfig::from_env()?;
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    telemetry::init_telemetry(&config.log_level, config.log_format);

    let metrics = Arc::new(Metrics::new()?);

    // Credentials stay out of the logs; the RPC URL may embed an API key
    info!(
        solscan_public_api = %config.solscan_public_api_url,
        solscan_pro_api = %config.solscan_pro_api_url,
        signature_page_size = config.signature_page_size,
        solscan_key_configured = !config.solscan_api_key.is_empty(),
        "Configuration loaded"
    );

    let http_client = reqwest::Client::builder()
        .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
        .build()?;

    let lookup: Arc<dyn TokenLookup> = Arc::new(HttpTokenLookup::new(
        http_client.clone(),
        config.solscan_public_api_url.clone(),
        config.token_price_api_url.clone(),
        config.solscan_api_key.clone(),
    ));

    let chain: Arc<dyn ChainClient> = Arc::new(RpcChainClient::new(&config.rpc_http_url)?);

    let aggregator = WalletAggregator::new(
        chain,
        TransactionClassifier::new(lookup),
        metrics.clone(),
        config.signature_page_size,
    );

    match cli.command.unwrap_or(Command::Serve { listen: None }) {
        Command::Serve { listen } => {
            let state = AppState {
                upstream: Arc::new(HttpSolscanClient::new(
                    http_client,
                    config.solscan_api_key.clone(),
                )),
                endpoints: Arc::new(SolscanEndpoints {
                    public_base_url: config.solscan_public_api_url.clone(),
                    pro_base_url: config.solscan_pro_api_url.clone(),
                    transaction_timeout: config.solscan_timeout,
                }),
                aggregator: Arc::new(aggregator),
                metrics,
            };

            info!("All systems initialized, starting HTTP service");
            server::start_server(listen.unwrap_or(config.listen_addr), state).await
        }
        Command::Inspect {
            address,
            filter,
            json,
        } => cli::run_inspect(&aggregator, &address, filter, json).await,
    }
}
