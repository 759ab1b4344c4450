//! Plain-text rendering of wallet state.

use crate::solana::models::{ClassifiedTransaction, TokenBalance, TokenDelta, TransactionType};
use crate::solana::programs;
use crate::wallet::WalletStore;
use chrono::DateTime;
use std::fmt::Write;
use std::str::FromStr;

const EXPLORER_TX_URL: &str = "https://solscan.io/tx";

/// Which transactions to show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransactionFilter {
    #[default]
    All,
    Only(TransactionType),
}

impl TransactionFilter {
    pub fn matches(&self, tx: &ClassifiedTransaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Only(kind) => tx.kind == *kind,
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let filter = match s.to_ascii_uppercase().as_str() {
            "ALL" => TransactionFilter::All,
            "BUY" => TransactionFilter::Only(TransactionType::Buy),
            "SELL" => TransactionFilter::Only(TransactionType::Sell),
            "TRANSFER" => TransactionFilter::Only(TransactionType::Transfer),
            "SWAP" => TransactionFilter::Only(TransactionType::Swap),
            "OTHER" => TransactionFilter::Only(TransactionType::Other),
            other => return Err(format!("unknown transaction filter: {}", other)),
        };
        Ok(filter)
    }
}

/// `first8...last8`, or the signature itself when it is too short to shorten.
pub fn short_signature(signature: &str) -> String {
    let chars: Vec<char> = signature.chars().collect();
    if chars.len() <= 16 {
        return signature.to_string();
    }
    let head: String = chars[..8].iter().collect();
    let tail: String = chars[chars.len() - 8..].iter().collect();
    format!("{}...{}", head, tail)
}

pub fn format_timestamp(timestamp: i64) -> String {
    if timestamp == 0 {
        return "unknown time".to_string();
    }
    DateTime::from_timestamp(timestamp, 0)
        .map(|time| time.format("%Y-%m-%d %H:%M:%S UTC").to_string())
        .unwrap_or_else(|| "unknown time".to_string())
}

fn format_delta(delta: &TokenDelta) -> String {
    match delta.usd_value {
        Some(usd) => format!("{} {} (${:.2})", delta.amount, delta.symbol, usd),
        None => format!("{} {}", delta.amount, delta.symbol),
    }
}

/// One line per holding; empty when there is nothing to show.
pub fn render_token_balances(balances: &[TokenBalance]) -> String {
    if balances.is_empty() {
        return String::new();
    }

    let mut out = String::from("Token Balances\n");
    for token in balances {
        let _ = write!(out, "  {:<10} {:<24} {:>18}", token.symbol, token.name, token.amount);
        if let Some(value) = token.value {
            let _ = write!(out, "  ${:.2}", value);
        }
        out.push('\n');
    }
    out
}

fn render_transaction(tx: &ClassifiedTransaction) -> String {
    let headline = match (&tx.kind, &tx.input_token, &tx.output_token) {
        (TransactionType::Swap, Some(input), Some(output)) => {
            let program = tx.program_name.as_deref().unwrap_or(programs::UNKNOWN_PROGRAM_NAME);
            format!(
                "Swap on {}: {} -> {}",
                program,
                format_delta(input),
                format_delta(output)
            )
        }
        (kind, _, _) => format!("[{}]", kind),
    };

    format!(
        "  {}  {}\n    {}  {}/{}\n",
        headline,
        format_timestamp(tx.timestamp),
        short_signature(&tx.signature),
        EXPLORER_TX_URL,
        tx.signature
    )
}

pub fn render_transactions(transactions: &[ClassifiedTransaction], filter: TransactionFilter) -> String {
    let mut out = String::from("Transaction History\n");
    let mut shown = 0;

    for tx in transactions.iter().filter(|tx| filter.matches(tx)) {
        out.push_str(&render_transaction(tx));
        shown += 1;
    }

    if shown == 0 {
        out.push_str("  (no transactions)\n");
    }
    out
}

/// Full view of the store: SOL balance, token balances, filtered history.
pub fn render_wallet(store: &WalletStore, filter: TransactionFilter) -> String {
    let mut out = format!("SOL Balance: {:.4} SOL\n", store.balance());
    if store.is_loading() {
        out.push_str("Loading wallet data...\n");
    }

    let balances = render_token_balances(store.token_balances());
    if !balances.is_empty() {
        out.push('\n');
        out.push_str(&balances);
    }

    out.push('\n');
    out.push_str(&render_transactions(store.transactions(), filter));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solana::models::WalletSnapshot;
    use pretty_assertions::assert_eq;

    const SIGNATURE: &str = "5VERv8NMvzbJMEkV8xnrLkEaWRtSz9CosKDYjCJjBRnbJLgp8uirBgmQpjKhoR4tjF3ZpRzrFmBV6UjKdiSZkQUW";

    fn swap(input: Option<TokenDelta>, output: Option<TokenDelta>) -> ClassifiedTransaction {
        ClassifiedTransaction {
            signature: SIGNATURE.to_string(),
            timestamp: 1_700_000_000,
            kind: TransactionType::Swap,
            input_token: input,
            output_token: output,
            program_name: Some("Jupiter".to_string()),
        }
    }

    fn delta(symbol: &str, amount: f64, usd_value: Option<f64>) -> TokenDelta {
        TokenDelta {
            symbol: symbol.to_string(),
            amount,
            usd_value,
        }
    }

    #[test]
    fn shortens_long_signatures() {
        assert_eq!(short_signature(SIGNATURE), "5VERv8NM...diSZkQUW");
        assert_eq!(short_signature("short"), "short");
    }

    #[test]
    fn formats_timestamps_in_utc() {
        assert_eq!(format_timestamp(1_700_000_000), "2023-11-14 22:13:20 UTC");
        assert_eq!(format_timestamp(0), "unknown time");
    }

    #[test]
    fn complete_swap_renders_both_sides() {
        let tx = swap(
            Some(delta("USDC", 6.0, Some(6.0))),
            Some(delta("BONK", 1000.5, None)),
        );

        let rendered = render_transactions(&[tx], TransactionFilter::All);

        assert!(rendered.contains("Swap on Jupiter: 6 USDC ($6.00) -> 1000.5 BONK"));
        assert!(rendered.contains("https://solscan.io/tx/5VERv8NM"));
    }

    #[test]
    fn partial_swap_falls_back_to_type_badge() {
        let tx = swap(Some(delta("USDC", 6.0, None)), None);

        let rendered = render_transactions(&[tx], TransactionFilter::All);

        assert!(rendered.contains("[SWAP]"));
    }

    #[test]
    fn filter_hides_other_types() {
        let mut other = swap(None, None);
        other.kind = TransactionType::Other;

        let rendered = render_transactions(&[other], TransactionFilter::Only(TransactionType::Swap));

        assert_eq!(rendered, "Transaction History\n  (no transactions)\n");
    }

    #[test]
    fn parses_filters_case_insensitively() {
        assert_eq!("swap".parse::<TransactionFilter>(), Ok(TransactionFilter::Only(TransactionType::Swap)));
        assert_eq!("ALL".parse::<TransactionFilter>(), Ok(TransactionFilter::All));
        assert!("stake".parse::<TransactionFilter>().is_err());
    }

    #[test]
    fn empty_token_balances_render_nothing() {
        assert_eq!(render_token_balances(&[]), "");
    }

    #[test]
    fn wallet_view_includes_balances_and_values() {
        let mut store = WalletStore::new();
        let ticket = store.begin_lookup();
        store.complete_lookup(
            ticket,
            WalletSnapshot {
                sol_balance: 1.25,
                token_balances: vec![TokenBalance {
                    symbol: "BONK".to_string(),
                    name: "Bonk".to_string(),
                    amount: 1000.0,
                    mint: "MintB".to_string(),
                    value: Some(0.02),
                }],
                transactions: vec![],
            },
        );

        let rendered = render_wallet(&store, TransactionFilter::All);

        assert!(rendered.starts_with("SOL Balance: 1.2500 SOL\n"));
        assert!(rendered.contains("Token Balances"));
        assert!(rendered.contains("BONK"));
        assert!(rendered.contains("$0.02"));
    }

    #[test]
    fn pending_lookup_is_flagged() {
        let mut store = WalletStore::new();
        let ticket = store.begin_lookup();

        assert!(render_wallet(&store, TransactionFilter::All).contains("Loading wallet data..."));

        store.fail_lookup(ticket);
        assert!(!render_wallet(&store, TransactionFilter::All).contains("Loading wallet data..."));
    }

    #[test]
    fn swap_without_program_name_uses_placeholder() {
        let mut tx = swap(Some(delta("USDC", 6.0, None)), Some(delta("BONK", 2.0, None)));
        tx.program_name = None;

        let rendered = render_transactions(&[tx], TransactionFilter::All);

        assert!(rendered.contains("Swap on Unknown Program:"));
    }
}
