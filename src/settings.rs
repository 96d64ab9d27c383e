//! The savings target: its database queries and route handlers.

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::{IntoResponse, Response},
};
use rusqlite::{Connection, OptionalExtension};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{
    Error,
    app_state::{LedgerState, lock_ledger},
    database_id::TransactionId,
    response::success,
};

const TARGET_KEY: &str = "target_amount";
const NEXT_ID_KEY: &str = "next_transaction_id";

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the settings table in the database.
///
/// Each setting is stored as a row keyed by its name. The value column has no
/// type so that integer settings keep their type.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_settings_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS settings (
            setting_key TEXT PRIMARY KEY,
            setting_value NOT NULL
        )",
        (),
    )?;

    Ok(())
}

/// Get the savings target, `None` if it has never been saved.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub fn get_target(connection: &Connection) -> Result<Option<f64>, Error> {
    connection
        .query_row(
            "SELECT setting_value FROM settings WHERE setting_key = ?1",
            [TARGET_KEY],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Save the savings target, replacing any previous target.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub fn save_target(target: f64, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (setting_key, setting_value) VALUES (?1, ?2)
         ON CONFLICT(setting_key) DO UPDATE SET setting_value = excluded.setting_value",
        (TARGET_KEY, target),
    )?;

    Ok(())
}

/// Get the ID for the next new transaction, `None` if it has never been saved.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub fn get_next_id(connection: &Connection) -> Result<Option<TransactionId>, Error> {
    connection
        .query_row(
            "SELECT setting_value FROM settings WHERE setting_key = ?1",
            [NEXT_ID_KEY],
            |row| row.get(0),
        )
        .optional()
        .map_err(Error::from)
}

/// Save the ID for the next new transaction.
///
/// # Errors
/// Returns [Error::SqlError] if there is some SQL error.
pub fn save_next_id(next_id: TransactionId, connection: &Connection) -> Result<(), Error> {
    connection.execute(
        "INSERT INTO settings (setting_key, setting_value) VALUES (?1, ?2)
         ON CONFLICT(setting_key) DO UPDATE SET setting_value = excluded.setting_value",
        (NEXT_ID_KEY, next_id),
    )?;

    Ok(())
}

// ============================================================================
// ROUTE HANDLERS
// ============================================================================

/// The request body for setting the savings target.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct SetTargetRequest {
    /// The new savings target.
    pub target: Option<f64>,
}

/// A route handler for getting the savings target.
pub async fn get_target_endpoint(State(state): State<LedgerState>) -> Response {
    match lock_ledger(&state.ledger) {
        Ok(ledger) => success(json!({ "target": ledger.target() })),
        Err(error) => error.into_response(),
    }
}

/// A route handler for setting the savings target.
pub async fn set_target_endpoint(
    State(state): State<LedgerState>,
    payload: Result<Json<SetTargetRequest>, JsonRejection>,
) -> Response {
    match set_target(&state, payload) {
        Ok(()) => success(json!({ "message": "Target updated successfully" })),
        Err(error) => error.into_response(),
    }
}

fn set_target(
    state: &LedgerState,
    payload: Result<Json<SetTargetRequest>, JsonRejection>,
) -> Result<(), Error> {
    let Json(request) =
        payload.map_err(|rejection| Error::InvalidRequestBody(rejection.body_text()))?;
    let target = request.target.ok_or(Error::MissingField("target"))?;

    lock_ledger(&state.ledger)?.set_target(target)
}
