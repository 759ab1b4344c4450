use crate::error::AppError;
use crate::render::{self, TransactionFilter};
use crate::wallet::{WalletAggregator, WalletStore};
use clap::{Parser, Subcommand};
use std::net::SocketAddr;
use tracing::info;

#[derive(Debug, Parser)]
#[command(name = "solana-wallet-viewer", version, about = "Solana wallet viewer and Solscan proxy")]
pub struct Cli {
    /// Override LOG_LEVEL
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run the HTTP service (default)
    Serve {
        /// Override LISTEN_ADDR
        #[arg(long)]
        listen: Option<SocketAddr>,
    },

    /// Look up one wallet and print it
    Inspect {
        address: String,

        /// ALL, BUY, SELL, TRANSFER, SWAP or OTHER
        #[arg(long, default_value = "ALL")]
        filter: TransactionFilter,

        /// Print the store as JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

/// Run one wallet lookup through a fresh store and print the result.
pub async fn run_inspect(
    aggregator: &WalletAggregator,
    address: &str,
    filter: TransactionFilter,
    json: bool,
) -> Result<(), AppError> {
    let mut store = WalletStore::new();
    let ticket = store.begin_lookup();

    match aggregator.fetch_wallet_snapshot(address).await {
        Ok(snapshot) => {
            store.complete_lookup(ticket, snapshot);
        }
        Err(e) => {
            store.fail_lookup(ticket);
            return Err(e);
        }
    }

    info!(
        address = %address,
        transactions = store.transactions().len(),
        "Wallet lookup finished"
    );

    if json {
        let output = serde_json::to_string_pretty(&store)
            .map_err(|e| AppError::ParseError(format!("Failed to serialize wallet: {}", e)))?;
        println!("{}", output);
    } else {
        print!("{}", render::render_wallet(&store, filter));
    }

    Ok(())
}
