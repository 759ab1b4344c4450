use crate::error::AppError;
use crate::metrics::Metrics;
use crate::solana::classifier::TransactionClassifier;
use crate::solana::models::{ClassifiedTransaction, TokenBalance, WalletSnapshot};
use crate::solana::rpc::{self, ChainClient, SignatureInfo, TokenAccountBalance};
use solana_sdk::native_token::LAMPORTS_PER_SOL;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Assembles balances and classified history for one wallet.
///
/// The three initial chain lookups run concurrently; everything after that is
/// sequential, one transaction at a time. Individual token or transaction
/// failures shrink the result instead of failing it.
#[derive(Clone)]
pub struct WalletAggregator {
    chain: Arc<dyn ChainClient>,
    classifier: TransactionClassifier,
    metrics: Arc<Metrics>,
    page_size: usize,
}

impl WalletAggregator {
    pub fn new(
        chain: Arc<dyn ChainClient>,
        classifier: TransactionClassifier,
        metrics: Arc<Metrics>,
        page_size: usize,
    ) -> Self {
        Self {
            chain,
            classifier,
            metrics,
            page_size,
        }
    }

    pub async fn fetch_wallet_snapshot(&self, address: &str) -> Result<WalletSnapshot, AppError> {
        let timer = self.metrics.wallet_lookup_duration.start_timer();
        let result = self.assemble(address).await;
        timer.observe_duration();

        let outcome = match &result {
            Ok(_) => "success",
            Err(AppError::InvalidAddress(_)) => "invalid_address",
            Err(_) => "failure",
        };
        self.metrics.wallet_lookups.with_label_values(&[outcome]).inc();

        result
    }

    async fn assemble(&self, address: &str) -> Result<WalletSnapshot, AppError> {
        let owner = rpc::parse_address(address)?;

        info!(address = %owner, page_size = self.page_size, "Fetching wallet snapshot");

        let (lamports, token_accounts, signatures) = tokio::try_join!(
            self.chain.get_balance(&owner),
            self.chain.get_token_accounts(&owner),
            self.chain.get_signatures(&owner, self.page_size),
        )?;

        let token_balances = self.resolve_token_balances(token_accounts).await;
        let transactions = self.classify_history(&signatures).await;

        info!(
            address = %owner,
            token_balances = token_balances.len(),
            transactions = transactions.len(),
            signatures = signatures.len(),
            "Wallet snapshot assembled"
        );

        Ok(WalletSnapshot {
            sol_balance: lamports as f64 / LAMPORTS_PER_SOL as f64,
            token_balances,
            transactions,
        })
    }

    async fn resolve_token_balances(&self, accounts: Vec<TokenAccountBalance>) -> Vec<TokenBalance> {
        let lookup = self.classifier.lookup();
        let mut balances = Vec::new();

        for account in accounts.into_iter().filter(|account| account.ui_amount > 0.0) {
            let info = match lookup.token_info(&account.mint).await {
                Ok(info) => info,
                Err(e) => {
                    self.metrics.token_lookup_failures.inc();
                    warn!(mint = %account.mint, error = %e, "Dropping token balance without metadata");
                    continue;
                }
            };

            let value = lookup.usd_value(&account.mint, account.ui_amount).await;

            balances.push(TokenBalance {
                symbol: info.symbol_or_unknown(),
                name: info.name_or_unknown(),
                amount: account.ui_amount,
                mint: account.mint,
                value,
            });
        }

        balances
    }

    async fn classify_history(&self, signatures: &[SignatureInfo]) -> Vec<ClassifiedTransaction> {
        let mut transactions = Vec::with_capacity(signatures.len());

        for info in signatures {
            let parsed = match self.chain.get_transaction(&info.signature).await {
                Ok(Some(parsed)) => parsed,
                Ok(None) => {
                    self.metrics.transactions_skipped.inc();
                    debug!(signature = %info.signature, "Transaction detail unavailable, skipping");
                    continue;
                }
                Err(e) => {
                    self.metrics.transactions_skipped.inc();
                    warn!(signature = %info.signature, error = %e, "Failed to fetch transaction, skipping");
                    continue;
                }
            };

            let mut classified = self.classifier.classify(&parsed).await;
            classified.signature = info.signature.clone();
            classified.timestamp = info.block_time.or(parsed.block_time).unwrap_or(0);

            self.metrics
                .transactions_classified
                .with_label_values(&[classified.kind.as_str()])
                .inc();

            transactions.push(classified);
        }

        transactions
    }
}
