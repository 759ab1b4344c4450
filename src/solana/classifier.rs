use crate::lookup::TokenLookup;
use crate::solana::models::{
    ClassifiedTransaction, ParsedTransaction, TokenBalanceEntry, TokenDelta, TransactionType,
};
use crate::solana::programs;
use std::sync::Arc;
use tracing::{debug, warn};

/// Assigns a semantic type to parsed transactions and, for swaps, derives the
/// tokens spent and received by comparing pre/post token balances.
#[derive(Clone)]
pub struct TransactionClassifier {
    lookup: Arc<dyn TokenLookup>,
}

impl TransactionClassifier {
    pub fn new(lookup: Arc<dyn TokenLookup>) -> Self {
        Self { lookup }
    }

    pub fn lookup(&self) -> &Arc<dyn TokenLookup> {
        &self.lookup
    }

    /// Classify one transaction. Never fails: lookup errors only leave the
    /// affected token delta unset.
    pub async fn classify(&self, tx: &ParsedTransaction) -> ClassifiedTransaction {
        let program_id = tx.first_program_id();

        let kind = if programs::is_swap_program(program_id) {
            TransactionType::Swap
        } else {
            TransactionType::Other
        };

        let mut input_token = None;
        let mut output_token = None;

        if kind == TransactionType::Swap {
            if let (Some(pre), Some(post)) = (&tx.pre_token_balances, &tx.post_token_balances) {
                // Later qualifying entries overwrite earlier ones on the same side
                for post_entry in post {
                    let delta = post_entry.amount() - pre_amount(pre, post_entry.account_index);

                    if delta > 0.0 {
                        if let Some(token) = self.resolve_delta(&tx.signature, post_entry, delta).await {
                            output_token = Some(token);
                        }
                    } else if delta < 0.0 {
                        if let Some(token) = self.resolve_delta(&tx.signature, post_entry, -delta).await {
                            input_token = Some(token);
                        }
                    }
                }
            }
        }

        debug!(
            signature = %tx.signature,
            kind = %kind,
            program_id = ?program_id,
            "Classified transaction"
        );

        ClassifiedTransaction {
            signature: tx.signature.clone(),
            timestamp: tx.block_time.unwrap_or(0),
            kind,
            input_token,
            output_token,
            program_name: Some(programs::program_name(program_id).to_string()),
        }
    }

    /// Resolve symbol and USD value for `amount` units of the entry's mint.
    ///
    /// Returns None when metadata cannot be resolved. A missing price only
    /// leaves `usd_value` unset.
    async fn resolve_delta(
        &self,
        signature: &str,
        entry: &TokenBalanceEntry,
        amount: f64,
    ) -> Option<TokenDelta> {
        let info = match self.lookup.token_info(&entry.mint).await {
            Ok(info) => info,
            Err(e) => {
                warn!(
                    signature = %signature,
                    mint = %entry.mint,
                    error = %e,
                    "Token metadata lookup failed, omitting delta"
                );
                return None;
            }
        };

        let usd_value = self.lookup.usd_value(&entry.mint, amount).await;

        Some(TokenDelta {
            symbol: info.symbol_or_unknown(),
            amount,
            usd_value,
        })
    }
}

/// Pre-transaction amount for the token account slot, zero when the slot was
/// not present before execution.
fn pre_amount(pre: &[TokenBalanceEntry], account_index: u8) -> f64 {
    pre.iter()
        .find(|entry| entry.account_index == account_index)
        .map(TokenBalanceEntry::amount)
        .unwrap_or(0.0)
}
