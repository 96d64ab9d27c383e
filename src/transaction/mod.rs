//! Transaction management for the savings tracker.
//!
//! This module contains everything related to transactions:
//! - The `Transaction` model and `TransactionBuilder` for creating transactions
//! - Database functions for storing and loading transactions
//! - Route handlers for listing, creating and deleting transactions

mod core;
mod create_endpoint;
mod delete_endpoint;
mod list_endpoint;

pub use core::{
    Transaction, TransactionBuilder, TransactionFilter, TransactionType, create_transaction_table,
    get_all_transactions, overwrite_transactions, parse_date,
};
pub(crate) use core::newest_first;
pub use create_endpoint::create_transaction_endpoint;
pub use delete_endpoint::delete_transaction_endpoint;
pub use list_endpoint::list_transactions_endpoint;
