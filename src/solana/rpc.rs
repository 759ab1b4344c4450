use crate::error::AppError;
use crate::solana::models::ParsedTransaction;
use crate::solana::parser::parse_transaction;
use crate::solana::programs::SPL_TOKEN_PROGRAM_ID;
use async_trait::async_trait;
use serde_json::Value;
use solana_account_decoder::UiAccountData;
use solana_client::nonblocking::rpc_client::RpcClient as SolanaRpcClient;
use solana_client::rpc_client::GetConfirmedSignaturesForAddress2Config;
use solana_client::rpc_config::RpcTransactionConfig;
use solana_client::rpc_request::TokenAccountsFilter;
use solana_sdk::commitment_config::CommitmentConfig;
use solana_sdk::pubkey::Pubkey;
use solana_sdk::signature::Signature;
use solana_transaction_status::UiTransactionEncoding;
use std::str::FromStr;
use tracing::{debug, info};

/// One SPL token account owned by the wallet.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenAccountBalance {
    pub mint: String,
    pub ui_amount: f64,
}

/// One entry of the wallet's signature history.
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureInfo {
    pub signature: String,
    pub block_time: Option<i64>,
}

/// Read-only view of the chain needed to assemble a wallet snapshot.
#[async_trait]
pub trait ChainClient: Send + Sync {
    /// Native balance in lamports.
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, AppError>;

    /// SPL token accounts owned by `owner`.
    async fn get_token_accounts(&self, owner: &Pubkey) -> Result<Vec<TokenAccountBalance>, AppError>;

    /// Most recent signatures for `address`, newest first.
    async fn get_signatures(&self, address: &Pubkey, limit: usize) -> Result<Vec<SignatureInfo>, AppError>;

    /// Parsed transaction detail. `Ok(None)` when the node does not have it.
    async fn get_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError>;
}

/// Parse a base58 wallet address.
pub fn parse_address(address: &str) -> Result<Pubkey, AppError> {
    Pubkey::from_str(address.trim()).map_err(|e| AppError::InvalidAddress(format!("{}: {}", address, e)))
}

/// Chain client backed by a Solana JSON-RPC endpoint.
pub struct RpcChainClient {
    client: SolanaRpcClient,
    token_program: Pubkey,
}

impl RpcChainClient {
    pub fn new(http_url: &str) -> Result<Self, AppError> {
        info!("Creating Solana RPC client");

        let token_program = Pubkey::from_str(SPL_TOKEN_PROGRAM_ID)
            .map_err(|e| AppError::Config(format!("Invalid token program id: {}", e)))?;

        Ok(Self {
            client: SolanaRpcClient::new_with_commitment(
                http_url.to_string(),
                CommitmentConfig::confirmed(),
            ),
            token_program,
        })
    }
}

#[async_trait]
impl ChainClient for RpcChainClient {
    async fn get_balance(&self, owner: &Pubkey) -> Result<u64, AppError> {
        self.client
            .get_balance(owner)
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to fetch balance: {}", e)))
    }

    async fn get_token_accounts(&self, owner: &Pubkey) -> Result<Vec<TokenAccountBalance>, AppError> {
        let accounts = self
            .client
            .get_token_accounts_by_owner(owner, TokenAccountsFilter::ProgramId(self.token_program))
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to fetch token accounts: {}", e)))?;

        let balances: Vec<TokenAccountBalance> = accounts
            .iter()
            .filter_map(|keyed| match &keyed.account.data {
                UiAccountData::Json(parsed) => token_account_balance(&parsed.parsed),
                _ => {
                    debug!(account = %keyed.pubkey, "Skipping token account without parsed data");
                    None
                }
            })
            .collect();

        debug!(owner = %owner, token_accounts = balances.len(), "Fetched token accounts");
        Ok(balances)
    }

    async fn get_signatures(&self, address: &Pubkey, limit: usize) -> Result<Vec<SignatureInfo>, AppError> {
        let config = GetConfirmedSignaturesForAddress2Config {
            before: None,
            until: None,
            limit: Some(limit),
            commitment: Some(CommitmentConfig::confirmed()),
        };

        let statuses = self
            .client
            .get_signatures_for_address_with_config(address, config)
            .await
            .map_err(|e| AppError::SolanaClient(format!("Failed to fetch signatures: {}", e)))?;

        Ok(statuses
            .into_iter()
            .map(|status| SignatureInfo {
                signature: status.signature,
                block_time: status.block_time,
            })
            .collect())
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError> {
        let config = RpcTransactionConfig {
            encoding: Some(UiTransactionEncoding::JsonParsed),
            commitment: Some(CommitmentConfig::confirmed()),
            max_supported_transaction_version: Some(0),
        };

        let sig = Signature::from_str(signature)
            .map_err(|e| AppError::ParseError(format!("Invalid signature: {}", e)))?;

        let transaction = match self.client.get_transaction_with_config(&sig, config).await {
            Ok(transaction) => transaction,
            // getTransaction answers null for unknown signatures, which the client reports as a decode error
            Err(e) if is_missing_transaction(&e.to_string()) => return Ok(None),
            Err(e) => {
                return Err(AppError::SolanaClient(format!(
                    "Failed to fetch transaction: {}",
                    e
                )))
            }
        };

        parse_transaction(&transaction).map(Some)
    }
}

fn is_missing_transaction(message: &str) -> bool {
    message.contains("invalid type: null")
}

/// Extract mint and UI amount from a jsonParsed SPL token account.
fn token_account_balance(parsed: &Value) -> Option<TokenAccountBalance> {
    let info = parsed.get("info")?;
    let mint = info.get("mint")?.as_str()?.to_string();
    let ui_amount = info
        .get("tokenAmount")
        .and_then(|amount| amount.get("uiAmount"))
        .and_then(Value::as_f64)
        .unwrap_or(0.0);

    Some(TokenAccountBalance { mint, ui_amount })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn extracts_mint_and_amount_from_parsed_account() {
        let parsed = json!({
            "type": "account",
            "info": {
                "mint": "MintA",
                "owner": "Owner",
                "tokenAmount": {"amount": "1500000", "decimals": 6, "uiAmount": 1.5, "uiAmountString": "1.5"}
            }
        });

        assert_eq!(
            token_account_balance(&parsed),
            Some(TokenAccountBalance {
                mint: "MintA".to_string(),
                ui_amount: 1.5,
            })
        );
    }

    #[test]
    fn null_ui_amount_reads_as_zero() {
        let parsed = json!({"info": {"mint": "MintA", "tokenAmount": {"uiAmount": null}}});
        assert_eq!(token_account_balance(&parsed).unwrap().ui_amount, 0.0);
    }

    #[test]
    fn account_without_mint_is_ignored() {
        assert_eq!(token_account_balance(&json!({"info": {}})), None);
    }

    #[test]
    fn parse_address_rejects_garbage() {
        assert!(matches!(
            parse_address("not-a-wallet"),
            Err(AppError::InvalidAddress(_))
        ));
        assert!(parse_address("JUP4Fb2cqiRUcaTHdrPC8h2gNsA2ETXiPDD33WcGuJB").is_ok());
    }

    #[test]
    fn null_transaction_response_is_treated_as_missing() {
        assert!(is_missing_transaction(
            "serde error: invalid type: null, expected struct EncodedConfirmedTransactionWithStatusMeta"
        ));
        assert!(!is_missing_transaction("error sending request"));
    }
}
