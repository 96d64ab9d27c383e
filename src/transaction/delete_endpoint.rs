//! Defines the endpoint for deleting a transaction.

use axum::{
    extract::{Query, State},
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use serde_json::json;

use crate::{
    Error,
    app_state::{LedgerState, lock_ledger},
    database_id::TransactionId,
    response::success,
};

/// The query parameters for deleting a transaction.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteTransactionQuery {
    /// The ID of the transaction to delete.
    pub id: Option<String>,
}

/// A route handler for deleting a transaction.
///
/// Deleting a transaction that does not exist is not an error, but the
/// response has `success` set to false.
pub async fn delete_transaction_endpoint(
    State(state): State<LedgerState>,
    Query(query): Query<DeleteTransactionQuery>,
) -> Response {
    match delete_transaction(&state, query) {
        Ok(()) => success(json!({ "message": "Transaction deleted successfully" })),
        Err(error) => error.into_response(),
    }
}

fn delete_transaction(state: &LedgerState, query: DeleteTransactionQuery) -> Result<(), Error> {
    let raw_id = query.id.ok_or(Error::MissingField("id"))?;
    let id: TransactionId = raw_id
        .trim()
        .parse()
        .map_err(|_| Error::InvalidTransactionId(raw_id.clone()))?;

    if lock_ledger(&state.ledger)?.delete_transaction(id)? {
        Ok(())
    } else {
        Err(Error::DeleteMissingTransaction)
    }
}
