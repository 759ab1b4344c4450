use serde::{Deserialize, Serialize};

/// A Solana transaction reduced to what classification needs.
///
/// Built from the RPC client's jsonParsed response by the parser. Optional
/// fields mirror what the chain may omit: absent block time, absent token
/// balance snapshots, absent `ui_amount` values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParsedTransaction {
    /// Base58-encoded transaction signature (unique identifier)
    pub signature: String,

    /// Unix timestamp of the block (None when the node did not report one)
    pub block_time: Option<i64>,

    /// Top-level instructions in execution order
    pub instructions: Vec<InstructionRef>,

    /// Token balances before execution (None when the node omitted them)
    pub pre_token_balances: Option<Vec<TokenBalanceEntry>>,

    /// Token balances after execution
    pub post_token_balances: Option<Vec<TokenBalanceEntry>>,
}

impl ParsedTransaction {
    /// Program invoked by the first top-level instruction, if any.
    pub fn first_program_id(&self) -> Option<&str> {
        self.instructions.first().map(|ix| ix.program_id.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructionRef {
    pub program_id: String,
}

/// One entry of a pre/post token balance snapshot.
///
/// `account_index` identifies a token account slot within one transaction
/// only; it is meaningless across transactions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalanceEntry {
    pub account_index: u8,
    pub mint: String,
    pub ui_amount: Option<f64>,
}

impl TokenBalanceEntry {
    /// Decimal amount, with an absent value counted as zero.
    pub fn amount(&self) -> f64 {
        self.ui_amount.unwrap_or(0.0)
    }
}

/// Semantic type assigned to a transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionType {
    Buy,
    Sell,
    Transfer,
    Swap,
    Other,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Buy => "BUY",
            TransactionType::Sell => "SELL",
            TransactionType::Transfer => "TRANSFER",
            TransactionType::Swap => "SWAP",
            TransactionType::Other => "OTHER",
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Net quantity of one token gained or lost by the wallet in a transaction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenDelta {
    pub symbol: String,

    /// Always positive; the side (input/output) carries the direction
    pub amount: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_value: Option<f64>,
}

/// A transaction after classification. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassifiedTransaction {
    pub signature: String,

    /// Unix seconds, 0 when unknown
    pub timestamp: i64,

    #[serde(rename = "type")]
    pub kind: TransactionType,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_token: Option<TokenDelta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub output_token: Option<TokenDelta>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub program_name: Option<String>,
}

/// An SPL token holding of the wallet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub symbol: String,
    pub name: String,
    pub amount: f64,
    pub mint: String,

    /// USD value of the whole holding when a price is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
}

/// Everything shown for one wallet query.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletSnapshot {
    pub sol_balance: f64,
    pub token_balances: Vec<TokenBalance>,
    pub transactions: Vec<ClassifiedTransaction>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn classified_transaction_serializes_with_camel_case_and_omits_absent_fields() {
        let tx = ClassifiedTransaction {
            signature: "sig".to_string(),
            timestamp: 1_700_000_000,
            kind: TransactionType::Swap,
            input_token: Some(TokenDelta {
                symbol: "USDC".to_string(),
                amount: 6.0,
                usd_value: None,
            }),
            output_token: None,
            program_name: Some("Jupiter".to_string()),
        };

        let value = serde_json::to_value(&tx).unwrap();
        assert_eq!(
            value,
            json!({
                "signature": "sig",
                "timestamp": 1_700_000_000,
                "type": "SWAP",
                "inputToken": {"symbol": "USDC", "amount": 6.0},
                "programName": "Jupiter"
            })
        );
    }

    #[test]
    fn absent_ui_amount_counts_as_zero() {
        let entry = TokenBalanceEntry {
            account_index: 3,
            mint: "mint".to_string(),
            ui_amount: None,
        };
        assert_eq!(entry.amount(), 0.0);
    }

    #[test]
    fn first_program_id_is_none_without_instructions() {
        let tx = ParsedTransaction {
            signature: "sig".to_string(),
            block_time: None,
            instructions: vec![],
            pre_token_balances: None,
            post_token_balances: None,
        };
        assert_eq!(tx.first_program_id(), None);
    }
}
