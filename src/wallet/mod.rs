pub mod aggregator;
pub mod store;

pub use aggregator::WalletAggregator;
pub use store::WalletStore;
