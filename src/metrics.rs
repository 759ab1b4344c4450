use crate::error::AppError;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};

/// Prometheus metrics for the wallet viewer.
///
/// Each instance owns its registry so that independent instances (one per
/// test, one per process) never collide on registration.
#[derive(Clone)]
pub struct Metrics {
    registry: Registry,
    pub proxy_requests: IntCounterVec,
    pub upstream_failures: IntCounterVec,
    pub transactions_classified: IntCounterVec,
    pub transactions_skipped: IntCounter,
    pub token_lookup_failures: IntCounter,
    pub wallet_lookups: IntCounterVec,
    pub wallet_lookup_duration: Histogram,
}

impl Metrics {
    /// Create and register all metrics.
    ///
    /// Returns an error if any metric fails to register, so that the service
    /// fails fast at startup if monitoring cannot be initialized.
    pub fn new() -> Result<Self, AppError> {
        let registry = Registry::new();

        let proxy_requests = IntCounterVec::new(
            Opts::new(
                "wallet_viewer_proxy_requests_total",
                "Proxy requests handled, by endpoint and response status",
            ),
            &["endpoint", "status"],
        )?;

        let upstream_failures = IntCounterVec::new(
            Opts::new(
                "wallet_viewer_upstream_failures_total",
                "Upstream calls that failed, by endpoint and failure kind",
            ),
            &["endpoint", "kind"],
        )?;

        let transactions_classified = IntCounterVec::new(
            Opts::new(
                "wallet_viewer_transactions_classified_total",
                "Transactions classified, by resulting type",
            ),
            &["type"],
        )?;

        let transactions_skipped = IntCounter::new(
            "wallet_viewer_transactions_skipped_total",
            "Transactions skipped because their detail could not be retrieved",
        )?;

        let token_lookup_failures = IntCounter::new(
            "wallet_viewer_token_lookup_failures_total",
            "Token metadata lookups that failed while resolving wallet balances",
        )?;

        let wallet_lookups = IntCounterVec::new(
            Opts::new(
                "wallet_viewer_wallet_lookups_total",
                "Wallet snapshot lookups, by outcome",
            ),
            &["outcome"],
        )?;

        let wallet_lookup_duration = Histogram::with_opts(
            HistogramOpts::new(
                "wallet_viewer_wallet_lookup_seconds",
                "Time taken to assemble a wallet snapshot",
            )
            .buckets(vec![0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0, 60.0]),
        )?;

        registry.register(Box::new(proxy_requests.clone()))?;
        registry.register(Box::new(upstream_failures.clone()))?;
        registry.register(Box::new(transactions_classified.clone()))?;
        registry.register(Box::new(transactions_skipped.clone()))?;
        registry.register(Box::new(token_lookup_failures.clone()))?;
        registry.register(Box::new(wallet_lookups.clone()))?;
        registry.register(Box::new(wallet_lookup_duration.clone()))?;

        Ok(Self {
            registry,
            proxy_requests,
            upstream_failures,
            transactions_classified,
            transactions_skipped,
            token_lookup_failures,
            wallet_lookups,
            wallet_lookup_duration,
        })
    }

    /// Record one proxy response.
    pub fn record_proxy(&self, endpoint: &str, status: u16) {
        self.proxy_requests
            .with_label_values(&[endpoint, &status.to_string()])
            .inc();
    }

    pub fn record_upstream_failure(&self, endpoint: &str, kind: &str) {
        self.upstream_failures.with_label_values(&[endpoint, kind]).inc();
    }

    /// Get the metrics in Prometheus exposition format.
    pub fn gather(&self) -> Result<String, AppError> {
        let encoder = TextEncoder::new();
        let metric_families = self.registry.gather();
        let mut buffer = vec![];

        encoder.encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer)
            .map_err(|e| AppError::Config(format!("Failed to convert metrics to UTF-8: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_includes_recorded_series() {
        let metrics = Metrics::new().unwrap();
        metrics.record_proxy("solscan_transaction", 404);
        metrics.transactions_classified.with_label_values(&["SWAP"]).inc();

        let output = metrics.gather().unwrap();
        assert!(output.contains("wallet_viewer_proxy_requests_total"));
        assert!(output.contains("status=\"404\""));
        assert!(output.contains("type=\"SWAP\""));
    }

    #[test]
    fn independent_instances_do_not_collide() {
        assert!(Metrics::new().is_ok());
        assert!(Metrics::new().is_ok());
    }
}
