//! The route handler for the totals and the progress towards the savings target.

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::{
    app_state::{LedgerState, lock_ledger},
    response::success,
};

/// A route handler for getting the totals and the progress towards the
/// savings target.
pub async fn get_summary_endpoint(State(state): State<LedgerState>) -> Response {
    match lock_ledger(&state.ledger) {
        Ok(ledger) => success(json!({ "data": ledger.compute_summary() })),
        Err(error) => error.into_response(),
    }
}
