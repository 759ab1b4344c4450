//! Proxies for the Solscan transaction and account APIs.
//!
//! Every failure is logged and answered with a JSON error body; required
//! parameters are checked before any upstream call.

use super::{required, AppState};
use crate::solscan::{UpstreamRequest, UpstreamResponse};
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use reqwest::Url;
use serde::Deserialize;
use serde_json::{json, Value};
use solana_sdk::signature::Signature;
use std::str::FromStr;
use tracing::{error, info, warn};

const TRANSACTION_ENDPOINT: &str = "solscan_transaction";
const ACCOUNT_TRANSACTIONS_ENDPOINT: &str = "solscan_v2_transactions";
const WALLET_ENDPOINT: &str = "solscan_wallet";

const DEFAULT_PAGE_LIMIT: &str = "10";

#[derive(Debug, Default, Deserialize)]
pub struct TransactionParams {
    pub signature: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct AccountTransactionsParams {
    pub address: Option<String>,
    pub limit: Option<String>,
    pub before: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct WalletParams {
    pub address: Option<String>,
}

/// Status to answer with when passing an upstream status through.
fn passthrough_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}

/// `GET /api/solscan?signature=<sig>`
pub async fn get_transaction(
    State(state): State<AppState>,
    Query(params): Query<TransactionParams>,
) -> Response {
    let Some(signature) = required(params.signature) else {
        return state.respond(
            TRANSACTION_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "error": "Signature is required" }),
        );
    };

    // Only a well-formed signature may reach the upstream path
    if let Err(e) = Signature::from_str(&signature) {
        warn!(signature = %signature, error = %e, "Rejecting malformed transaction signature");
        return state.respond(
            TRANSACTION_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid signature" }),
        );
    }

    let request = UpstreamRequest::new(format!(
        "{}/transaction/{}",
        state.endpoints.public_base_url, signature
    ))
    .with_timeout(state.endpoints.transaction_timeout);

    let response = match state.upstream.fetch(request).await {
        Ok(response) => response,
        Err(e) => {
            error!(signature = %signature, error = %e, "Solscan transaction request failed");
            state.metrics.record_upstream_failure(TRANSACTION_ENDPOINT, e.kind());
            return state.respond(
                TRANSACTION_ENDPOINT,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to fetch transaction data", "details": e.to_string() }),
            );
        }
    };

    if !response.is_success() {
        let message = if response.status == 404 {
            "Transaction not found on Solscan".to_string()
        } else {
            format!("Solscan API returned {}", response.status)
        };
        info!(signature = %signature, status = response.status, "{}", message);
        state.metrics.record_upstream_failure(TRANSACTION_ENDPOINT, "status");
        return state.respond(
            TRANSACTION_ENDPOINT,
            passthrough_status(response.status),
            json!({ "error": message }),
        );
    }

    match decode_transaction_body(&response) {
        Ok(data) => state.respond(TRANSACTION_ENDPOINT, StatusCode::OK, data),
        Err(BodyError::Empty) => {
            warn!(signature = %signature, "Empty response from Solscan");
            state.metrics.record_upstream_failure(TRANSACTION_ENDPOINT, "empty_body");
            state.respond(
                TRANSACTION_ENDPOINT,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Empty response from Solscan API" }),
            )
        }
        Err(BodyError::Invalid(details)) => {
            error!(signature = %signature, body = %response.body, "Failed to parse Solscan response");
            state.metrics.record_upstream_failure(TRANSACTION_ENDPOINT, "invalid_body");
            state.respond(
                TRANSACTION_ENDPOINT,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Invalid JSON response from Solscan API", "details": details }),
            )
        }
    }
}

#[derive(Debug, PartialEq)]
enum BodyError {
    Empty,
    Invalid(String),
}

/// Empty bodies and malformed bodies are reported differently.
fn decode_transaction_body(response: &UpstreamResponse) -> Result<Value, BodyError> {
    if response.body.trim().is_empty() {
        return Err(BodyError::Empty);
    }

    let data: Value =
        serde_json::from_str(&response.body).map_err(|e| BodyError::Invalid(e.to_string()))?;

    if !(data.is_object() || data.is_array()) {
        return Err(BodyError::Invalid("Invalid response format".to_string()));
    }

    Ok(data)
}

/// `GET /api/solscan/v2/transactions?address=<addr>&limit=<n>&before=<sig>`
pub async fn get_account_transactions(
    State(state): State<AppState>,
    Query(params): Query<AccountTransactionsParams>,
) -> Response {
    let failure = || json!({ "success": false, "errors": { "message": "Failed to fetch data from Solscan" } });

    let Some(address) = required(params.address) else {
        return state.respond(
            ACCOUNT_TRANSACTIONS_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "success": false, "errors": { "message": "Address is required" } }),
        );
    };

    let limit = required(params.limit).unwrap_or_else(|| DEFAULT_PAGE_LIMIT.to_string());
    let before = required(params.before);

    let url = match account_transactions_url(&state.endpoints.pro_base_url, &address, &limit, before.as_deref()) {
        Ok(url) => url,
        Err(e) => {
            error!(error = %e, "Invalid Solscan pro API URL");
            return state.respond(ACCOUNT_TRANSACTIONS_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure());
        }
    };

    let response = match state.upstream.fetch(UpstreamRequest::new(url)).await {
        Ok(response) => response,
        Err(e) => {
            error!(address = %address, error = %e, "Solscan account transactions request failed");
            state.metrics.record_upstream_failure(ACCOUNT_TRANSACTIONS_ENDPOINT, e.kind());
            return state.respond(ACCOUNT_TRANSACTIONS_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure());
        }
    };

    match serde_json::from_str::<Value>(&response.body) {
        Ok(data) => state.respond(
            ACCOUNT_TRANSACTIONS_ENDPOINT,
            passthrough_status(response.status),
            data,
        ),
        Err(e) => {
            error!(address = %address, status = response.status, error = %e, "Undecodable Solscan response");
            state.metrics.record_upstream_failure(ACCOUNT_TRANSACTIONS_ENDPOINT, "invalid_body");
            state.respond(ACCOUNT_TRANSACTIONS_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure())
        }
    }
}

fn account_transactions_url(
    base: &str,
    address: &str,
    limit: &str,
    before: Option<&str>,
) -> Result<String, String> {
    let mut url = Url::parse_with_params(
        &format!("{}/v2.0/account/transactions", base),
        &[("address", address), ("limit", limit)],
    )
    .map_err(|e| e.to_string())?;
    if let Some(before) = before {
        url.query_pairs_mut().append_pair("before", before);
    }
    Ok(url.to_string())
}

/// `GET /api/solscan/wallet?address=<addr>`
pub async fn get_wallet_transactions(
    State(state): State<AppState>,
    Query(params): Query<WalletParams>,
) -> Response {
    let failure = || json!({ "error": "Failed to fetch wallet data" });

    let Some(address) = required(params.address) else {
        return state.respond(
            WALLET_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "error": "Wallet address is required" }),
        );
    };

    let url = match Url::parse_with_params(
        &format!("{}/account/transactions", state.endpoints.public_base_url),
        &[("account", address.as_str())],
    ) {
        Ok(url) => url.to_string(),
        Err(e) => {
            error!(error = %e, "Invalid Solscan public API URL");
            return state.respond(WALLET_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure());
        }
    };

    let response = match state.upstream.fetch(UpstreamRequest::new(url)).await {
        Ok(response) => response,
        Err(e) => {
            error!(address = %address, error = %e, "Error fetching wallet data");
            state.metrics.record_upstream_failure(WALLET_ENDPOINT, e.kind());
            return state.respond(WALLET_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure());
        }
    };

    if !response.is_success() {
        warn!(address = %address, status = response.status, "Solscan wallet lookup rejected");
        state.metrics.record_upstream_failure(WALLET_ENDPOINT, "status");
        return state.respond(
            WALLET_ENDPOINT,
            passthrough_status(response.status),
            json!({ "error": format!("Solscan API returned {}", response.status) }),
        );
    }

    match serde_json::from_str::<Value>(&response.body) {
        Ok(data) => state.respond(WALLET_ENDPOINT, StatusCode::OK, data),
        Err(e) => {
            error!(address = %address, error = %e, "Error decoding wallet data");
            state.metrics.record_upstream_failure(WALLET_ENDPOINT, "invalid_body");
            state.respond(WALLET_ENDPOINT, StatusCode::INTERNAL_SERVER_ERROR, failure())
        }
    }
}
