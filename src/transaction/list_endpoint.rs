//! Defines the endpoint for listing transactions.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    app_state::{LedgerState, lock_ledger},
    response::success,
    transaction::TransactionFilter,
};

/// The query parameters for listing transactions.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsQuery {
    /// One of "all", "income" or "expense". Defaults to "all".
    #[serde(rename = "type")]
    pub filter: Option<String>,
}

/// A route handler for listing transactions, newest first.
pub async fn list_transactions_endpoint(
    State(state): State<LedgerState>,
    Query(query): Query<ListTransactionsQuery>,
) -> Response {
    match list_transactions(&state, query) {
        Ok(response) => response,
        Err(error) => error.into_response(),
    }
}

fn list_transactions(state: &LedgerState, query: ListTransactionsQuery) -> Result<Response, Error> {
    let filter = match query.filter.as_deref() {
        None | Some("") => TransactionFilter::All,
        Some(text) => text.parse()?,
    };

    let ledger = lock_ledger(&state.ledger)?;
    let transactions: Vec<_> = ledger.filter_by_type(filter).collect();

    Ok(success(json!({ "data": transactions })))
}
