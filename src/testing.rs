//! Mock collaborators shared by unit tests.

use crate::error::AppError;
use crate::lookup::{TokenInfo, TokenLookup};
use crate::solana::models::ParsedTransaction;
use crate::solana::rpc::{ChainClient, SignatureInfo, TokenAccountBalance};
use crate::solscan::client::UpstreamError;
use crate::solscan::{SolscanUpstream, UpstreamRequest, UpstreamResponse};
use async_trait::async_trait;
use solana_sdk::pubkey::Pubkey;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Token lookup with canned metadata and prices. Clones share call counters.
#[derive(Clone, Default)]
pub struct MockTokenLookup {
    infos: HashMap<String, TokenInfo>,
    prices: HashMap<String, f64>,
    failing_mints: HashSet<String>,
    failing_prices: HashSet<String>,
    info_calls: Arc<AtomicUsize>,
}

impl MockTokenLookup {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(self, mint: &str, symbol: &str, name: &str) -> Self {
        self.with_info(
            mint,
            TokenInfo {
                symbol: Some(symbol.to_string()),
                name: Some(name.to_string()),
            },
        )
    }

    pub fn with_info(mut self, mint: &str, info: TokenInfo) -> Self {
        self.infos.insert(mint.to_string(), info);
        self
    }

    pub fn with_price(mut self, mint: &str, price: f64) -> Self {
        self.prices.insert(mint.to_string(), price);
        self
    }

    pub fn with_failing_mint(mut self, mint: &str) -> Self {
        self.failing_mints.insert(mint.to_string());
        self
    }

    pub fn with_failing_price(mut self, mint: &str) -> Self {
        self.failing_prices.insert(mint.to_string());
        self
    }

    pub fn info_calls(&self) -> usize {
        self.info_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenLookup for MockTokenLookup {
    async fn token_info(&self, mint: &str) -> Result<TokenInfo, AppError> {
        self.info_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing_mints.contains(mint) {
            return Err(AppError::Upstream(format!("metadata unavailable for {}", mint)));
        }
        self.infos
            .get(mint)
            .cloned()
            .ok_or_else(|| AppError::Upstream(format!("unknown mint {}", mint)))
    }

    async fn token_price(&self, mint: &str) -> Result<Option<f64>, AppError> {
        if self.failing_prices.contains(mint) {
            return Err(AppError::Upstream(format!("price unavailable for {}", mint)));
        }
        Ok(self.prices.get(mint).copied())
    }
}

/// What the mock chain returns for one signature's detail.
#[derive(Clone)]
pub enum TransactionFixture {
    Found(ParsedTransaction),
    Missing,
    Failing,
}

/// Chain client with canned wallet data. Clones share call counters.
#[derive(Clone, Default)]
pub struct MockChainClient {
    lamports: u64,
    fail_balance: bool,
    token_accounts: Vec<TokenAccountBalance>,
    signatures: Vec<SignatureInfo>,
    transactions: HashMap<String, TransactionFixture>,
    calls: Arc<AtomicUsize>,
    transaction_calls: Arc<AtomicUsize>,
}

impl MockChainClient {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_balance(mut self, lamports: u64) -> Self {
        self.lamports = lamports;
        self
    }

    pub fn with_failing_balance(mut self) -> Self {
        self.fail_balance = true;
        self
    }

    pub fn with_token_account(mut self, mint: &str, ui_amount: f64) -> Self {
        self.token_accounts.push(TokenAccountBalance {
            mint: mint.to_string(),
            ui_amount,
        });
        self
    }

    /// Append a signature; signatures are listed in insertion order.
    pub fn with_signature(mut self, signature: &str, block_time: Option<i64>, fixture: TransactionFixture) -> Self {
        self.signatures.push(SignatureInfo {
            signature: signature.to_string(),
            block_time,
        });
        self.transactions.insert(signature.to_string(), fixture);
        self
    }

    pub fn total_calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn transaction_calls(&self) -> usize {
        self.transaction_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ChainClient for MockChainClient {
    async fn get_balance(&self, _owner: &Pubkey) -> Result<u64, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_balance {
            return Err(AppError::SolanaClient("balance unavailable".to_string()));
        }
        Ok(self.lamports)
    }

    async fn get_token_accounts(&self, _owner: &Pubkey) -> Result<Vec<TokenAccountBalance>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.token_accounts.clone())
    }

    async fn get_signatures(&self, _address: &Pubkey, limit: usize) -> Result<Vec<SignatureInfo>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.signatures.iter().take(limit).cloned().collect())
    }

    async fn get_transaction(&self, signature: &str) -> Result<Option<ParsedTransaction>, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        match self.transactions.get(signature) {
            Some(TransactionFixture::Found(tx)) => Ok(Some(tx.clone())),
            Some(TransactionFixture::Missing) | None => Ok(None),
            Some(TransactionFixture::Failing) => {
                Err(AppError::SolanaClient(format!("failed to fetch {}", signature)))
            }
        }
    }
}

/// Solscan upstream that replays queued results and records requests.
#[derive(Clone, Default)]
pub struct MockUpstream {
    responses: Arc<Mutex<VecDeque<Result<UpstreamResponse, UpstreamError>>>>,
    requests: Arc<Mutex<Vec<UpstreamRequest>>>,
}

impl MockUpstream {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, status: u16, body: &str) -> Self {
        self.push(Ok(UpstreamResponse {
            status,
            body: body.to_string(),
        }))
    }

    pub fn fail(self, error: UpstreamError) -> Self {
        self.push(Err(error))
    }

    fn push(self, result: Result<UpstreamResponse, UpstreamError>) -> Self {
        self.responses
            .lock()
            .expect("mock upstream lock")
            .push_back(result);
        self
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().expect("mock upstream lock").len()
    }

    pub fn requests(&self) -> Vec<UpstreamRequest> {
        self.requests.lock().expect("mock upstream lock").clone()
    }
}

#[async_trait]
impl SolscanUpstream for MockUpstream {
    async fn fetch(&self, request: UpstreamRequest) -> Result<UpstreamResponse, UpstreamError> {
        self.requests
            .lock()
            .expect("mock upstream lock")
            .push(request);
        self.responses
            .lock()
            .expect("mock upstream lock")
            .pop_front()
            .unwrap_or_else(|| Err(UpstreamError::Network("no response queued".to_string())))
    }
}
