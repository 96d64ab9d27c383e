//! Savings tracker is an app for logging income and expenses against a shared
//! savings target.
//!
//! The [Ledger] owns the transactions and the savings target and computes the
//! running balance and the progress towards the target. The ledger is persisted
//! through a [LedgerStore], either a directory of JSON files ([JsonFileStore])
//! or a SQLite database ([SQLiteStore]).
//!
//! This library also provides a JSON REST API over a SQLite-backed ledger, see
//! [build_router].

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod app_state;
mod currency;
mod database_id;
mod db;
mod endpoints;
mod ledger;
mod logging;
mod not_found;
mod profile;
mod response;
mod routing;
mod settings;
mod stores;
mod summary;
mod timezone;
mod transaction;

pub use app_state::AppState;
pub use currency::format_currency;
pub use database_id::TransactionId;
pub use db::initialize as initialize_db;
pub use ledger::{DEFAULT_TARGET, Ledger, Summary};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use profile::{Profile, ProfileDirectory};
pub use routing::build_router;
pub use stores::{JsonFileStore, LedgerStore, SQLiteStore};
pub use timezone::{get_local_offset, today_in};
pub use transaction::{
    Transaction, TransactionBuilder, TransactionFilter, TransactionType, parse_date,
};

use crate::response::failure;

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The amount of a transaction was zero, negative, or not a finite number.
    #[error("{0} is not a valid amount, amounts must be a positive number")]
    InvalidAmount(f64),

    /// A transaction was created with an empty (or whitespace only) description.
    #[error("the description cannot be empty")]
    EmptyDescription,

    /// The transaction type was neither "income" nor "expense".
    #[error("\"{0}\" is not a valid transaction type, expected \"income\" or \"expense\"")]
    InvalidTransactionType(String),

    /// The text could not be parsed as a calendar date in the format `YYYY-MM-DD`.
    #[error("\"{0}\" is not a valid date, expected a date like 2025-01-31")]
    InvalidDate(String),

    /// The savings target was zero, negative, or not a finite number.
    #[error("{0} is not a valid target, the target must be a positive number")]
    InvalidTarget(f64),

    /// The transaction filter was not one of "all", "income" or "expense".
    #[error("\"{0}\" is not a valid filter, expected \"all\", \"income\" or \"expense\"")]
    InvalidFilter(String),

    /// The text could not be parsed as a transaction ID.
    #[error("\"{0}\" is not a valid transaction ID")]
    InvalidTransactionId(String),

    /// A required field was missing from a request.
    #[error("missing required field \"{0}\"")]
    MissingField(&'static str),

    /// The request body could not be parsed as JSON.
    #[error("could not parse the request body: {0}")]
    InvalidRequestBody(String),

    /// Tried to delete a transaction that does not exist.
    #[error("transaction not found")]
    DeleteMissingTransaction,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// The files backing a [JsonFileStore] could not be read or written.
    #[error("could not access the ledger storage: {0}")]
    StorageError(String),

    /// An error occurred while serializing or deserializing JSON.
    #[error("could not (de)serialize JSON: {0}")]
    JSONSerializationError(String),

    /// Could not acquire the ledger lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An error occurred while getting the local timezone from a canonical timezone string.
    #[error("invalid timezone {0}")]
    InvalidTimezoneError(String),
}

/// The broad categories of [Error].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Missing or invalid input. The operation was aborted and nothing changed.
    Validation,
    /// The storage could not be read or written.
    Persistence,
    /// The operation referred to something that does not exist.
    NotFound,
    /// The application was configured incorrectly, e.g. an unknown timezone.
    Configuration,
}

impl Error {
    /// Which category of error this is.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::InvalidAmount(_)
            | Error::EmptyDescription
            | Error::InvalidTransactionType(_)
            | Error::InvalidDate(_)
            | Error::InvalidTarget(_)
            | Error::InvalidFilter(_)
            | Error::InvalidTransactionId(_)
            | Error::MissingField(_)
            | Error::InvalidRequestBody(_) => ErrorKind::Validation,
            Error::DeleteMissingTransaction => ErrorKind::NotFound,
            Error::SqlError(_)
            | Error::StorageError(_)
            | Error::JSONSerializationError(_)
            | Error::DatabaseLockError => ErrorKind::Persistence,
            Error::InvalidTimezoneError(_) => ErrorKind::Configuration,
        }
    }
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Error::StorageError(value.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(value: serde_json::Error) -> Self {
        Error::JSONSerializationError(value.to_string())
    }
}

impl IntoResponse for Error {
    /// Render the error as a `{"success": false, "message": ...}` body.
    ///
    /// Validation and not found errors are part of the normal conversation
    /// with the client and are sent with the status code 200, so clients must
    /// check `success` rather than the status code.
    fn into_response(self) -> Response {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => {
                tracing::debug!("Rejected request: {self}");
                failure(StatusCode::OK, &self.to_string())
            }
            ErrorKind::Configuration => {
                tracing::error!("The server is misconfigured: {self}");
                failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    &format!("{self}. Check the server settings."),
                )
            }
            // Storage errors are not intended to be shown to the client.
            ErrorKind::Persistence => {
                tracing::error!("An unexpected error occurred: {self}");
                failure(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred, check the server logs for more details.",
                )
            }
        }
    }
}
