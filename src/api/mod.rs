pub mod solscan;
pub mod wallet;

use crate::metrics::Metrics;
use crate::solscan::SolscanUpstream;
use crate::wallet::WalletAggregator;
use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::error;

/// Base URLs and limits for the proxied Solscan APIs.
#[derive(Debug, Clone)]
pub struct SolscanEndpoints {
    pub public_base_url: String,
    pub pro_base_url: String,
    pub transaction_timeout: Duration,
}

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub upstream: Arc<dyn SolscanUpstream>,
    pub endpoints: Arc<SolscanEndpoints>,
    pub aggregator: Arc<WalletAggregator>,
    pub metrics: Arc<Metrics>,
}

impl AppState {
    /// Build a JSON response and count it against `endpoint`.
    pub(crate) fn respond(&self, endpoint: &'static str, status: StatusCode, body: Value) -> Response {
        self.metrics.record_proxy(endpoint, status.as_u16());
        (status, Json(body)).into_response()
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/solscan", get(solscan::get_transaction))
        .route("/api/solscan/v2/transactions", get(solscan::get_account_transactions))
        .route("/api/solscan/wallet", get(solscan::get_wallet_transactions))
        .route("/api/wallet", get(wallet::get_wallet_snapshot))
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> &'static str {
    "OK"
}

async fn metrics(State(state): State<AppState>) -> Response {
    match state.metrics.gather() {
        Ok(body) => (
            StatusCode::OK,
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
            body,
        )
            .into_response(),
        Err(e) => {
            error!(error = %e, "Failed to encode metrics");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

/// Treat an absent or blank query parameter as missing.
pub(crate) fn required(param: Option<String>) -> Option<String> {
    param.filter(|value| !value.trim().is_empty())
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::solana::classifier::TransactionClassifier;
    use crate::testing::{MockChainClient, MockTokenLookup, MockUpstream};

    pub fn state_with(upstream: MockUpstream, chain: MockChainClient, lookup: MockTokenLookup) -> AppState {
        let metrics = Arc::new(Metrics::new().unwrap());
        let classifier = TransactionClassifier::new(Arc::new(lookup));
        AppState {
            upstream: Arc::new(upstream),
            endpoints: Arc::new(SolscanEndpoints {
                public_base_url: "https://public-api.solscan.io".to_string(),
                pro_base_url: "https://pro-api.solscan.io".to_string(),
                transaction_timeout: Duration::from_secs(10),
            }),
            aggregator: Arc::new(WalletAggregator::new(
                Arc::new(chain),
                classifier,
                metrics.clone(),
                50,
            )),
            metrics,
        }
    }

    pub fn state(upstream: MockUpstream) -> AppState {
        state_with(upstream, MockChainClient::new(), MockTokenLookup::new())
    }

    pub async fn body_json(response: Response) -> (StatusCode, Value) {
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}
