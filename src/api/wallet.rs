use super::{required, AppState};
use crate::error::AppError;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use serde::Deserialize;
use serde_json::json;
use tracing::error;

const SNAPSHOT_ENDPOINT: &str = "wallet_snapshot";

#[derive(Debug, Default, Deserialize)]
pub struct SnapshotParams {
    pub address: Option<String>,
}

/// `GET /api/wallet?address=<addr>`: balances plus classified history.
pub async fn get_wallet_snapshot(
    State(state): State<AppState>,
    Query(params): Query<SnapshotParams>,
) -> Response {
    let Some(address) = required(params.address) else {
        return state.respond(
            SNAPSHOT_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "error": "Wallet address is required" }),
        );
    };

    match state.aggregator.fetch_wallet_snapshot(&address).await {
        Ok(snapshot) => match serde_json::to_value(&snapshot) {
            Ok(body) => state.respond(SNAPSHOT_ENDPOINT, StatusCode::OK, body),
            Err(e) => {
                error!(address = %address, error = %e, "Failed to serialize wallet snapshot");
                state.respond(
                    SNAPSHOT_ENDPOINT,
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Failed to fetch wallet data", "details": e.to_string() }),
                )
            }
        },
        Err(AppError::InvalidAddress(details)) => state.respond(
            SNAPSHOT_ENDPOINT,
            StatusCode::BAD_REQUEST,
            json!({ "error": "Invalid wallet address", "details": details }),
        ),
        Err(e) => {
            error!(address = %address, error = %e, "Error fetching wallet data");
            state.respond(
                SNAPSHOT_ENDPOINT,
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Failed to fetch wallet data", "details": e.to_string() }),
            )
        }
    }
}
