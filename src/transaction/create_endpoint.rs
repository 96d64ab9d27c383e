//! Defines the endpoint for creating a new transaction.

use axum::{
    Json,
    extract::{FromRef, State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    AppState, Error,
    app_state::{SharedLedger, lock_ledger},
    response::success,
    timezone::today_in,
    transaction::{Transaction, TransactionType, parse_date},
};

/// The state needed to create a transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionState {
    /// The ledger to add transactions to.
    pub ledger: SharedLedger,
    /// The local timezone as a canonical timezone name, e.g. "Asia/Jakarta".
    pub local_timezone: String,
}

impl FromRef<AppState> for CreateTransactionState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            ledger: state.ledger.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The request body for creating a transaction.
///
/// Every field is optional here so that missing fields can be reported in the
/// response body instead of rejecting the request.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct CreateTransactionRequest {
    /// Either "income" or "expense".
    #[serde(rename = "type")]
    pub transaction_type: Option<String>,
    /// The amount of money, must be positive.
    pub amount: Option<f64>,
    /// Text detailing the transaction.
    pub description: Option<String>,
    /// The date when the transaction ocurred as `YYYY-MM-DD`, defaults to today.
    pub date: Option<String>,
    /// The name of the person recording the transaction.
    pub user: Option<String>,
}

/// A route handler for creating a new transaction, responds with the new
/// transaction's ID.
pub async fn create_transaction_endpoint(
    State(state): State<CreateTransactionState>,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Response {
    match create_transaction(&state, payload) {
        Ok(transaction) => success(json!({
            "message": "Transaction added successfully",
            "id": transaction.id,
        })),
        Err(error) => error.into_response(),
    }
}

fn create_transaction(
    state: &CreateTransactionState,
    payload: Result<Json<CreateTransactionRequest>, JsonRejection>,
) -> Result<Transaction, Error> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;

    let transaction_type: TransactionType = request
        .transaction_type
        .ok_or(Error::MissingField("type"))?
        .parse()?;
    let amount = request.amount.ok_or(Error::MissingField("amount"))?;
    let description = request
        .description
        .ok_or(Error::MissingField("description"))?;

    let mut builder = Transaction::build(transaction_type, amount, &description).user(request.user);

    // An empty date is treated the same as a missing date.
    if let Some(date) = request.date.filter(|date| !date.trim().is_empty()) {
        builder = builder.date(parse_date(&date)?);
    }

    let Some(today) = today_in(&state.local_timezone) else {
        return Err(Error::InvalidTimezoneError(state.local_timezone.clone()));
    };

    lock_ledger(&state.ledger)?.add_transaction_on(builder, today)
}
