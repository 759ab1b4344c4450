use crate::solana::models::{ClassifiedTransaction, TokenBalance, WalletSnapshot};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Discrete state change applied to a `WalletStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "payload", rename_all = "camelCase")]
pub enum StoreAction {
    SetBalance(f64),
    SetTokenBalances(Vec<TokenBalance>),
    SetTransactions(Vec<ClassifiedTransaction>),
    SetLoading(bool),
}

/// Proof that a lookup was started at a given generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LookupTicket {
    generation: u64,
}

/// Presentation-side state for the wallet currently on screen.
///
/// Overlapping lookups are resolved by generation: only the most recently
/// started lookup may publish its snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletStore {
    balance: f64,
    token_balances: Vec<TokenBalance>,
    transactions: Vec<ClassifiedTransaction>,
    is_loading: bool,
    generation: u64,
}

impl WalletStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance(&self) -> f64 {
        self.balance
    }

    pub fn token_balances(&self) -> &[TokenBalance] {
        &self.token_balances
    }

    pub fn transactions(&self) -> &[ClassifiedTransaction] {
        &self.transactions
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn dispatch(&mut self, action: StoreAction) {
        match action {
            StoreAction::SetBalance(balance) => self.balance = balance,
            StoreAction::SetTokenBalances(balances) => self.token_balances = balances,
            StoreAction::SetTransactions(transactions) => self.transactions = transactions,
            StoreAction::SetLoading(loading) => self.is_loading = loading,
        }
    }

    pub fn begin_lookup(&mut self) -> LookupTicket {
        self.generation += 1;
        self.dispatch(StoreAction::SetLoading(true));
        LookupTicket {
            generation: self.generation,
        }
    }

    /// Publish a finished lookup. Returns false, leaving state untouched,
    /// when a newer lookup has started since `ticket` was issued.
    pub fn complete_lookup(&mut self, ticket: LookupTicket, snapshot: WalletSnapshot) -> bool {
        if ticket.generation != self.generation {
            debug!(
                ticket = ticket.generation,
                current = self.generation,
                "Discarding stale wallet snapshot"
            );
            return false;
        }

        self.dispatch(StoreAction::SetBalance(snapshot.sol_balance));
        self.dispatch(StoreAction::SetTokenBalances(snapshot.token_balances));
        self.dispatch(StoreAction::SetTransactions(snapshot.transactions));
        self.dispatch(StoreAction::SetLoading(false));
        true
    }

    /// Clear the loading flag after a failed lookup, if it is still current.
    pub fn fail_lookup(&mut self, ticket: LookupTicket) -> bool {
        if ticket.generation != self.generation {
            return false;
        }
        self.dispatch(StoreAction::SetLoading(false));
        true
    }
}
