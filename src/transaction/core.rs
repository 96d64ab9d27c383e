//! Defines the core data models and database queries for transactions.

use std::{cmp::Ordering, fmt::Display, str::FromStr};

use rusqlite::{
    Connection, Row, ToSql,
    types::{FromSql, FromSqlError, FromSqlResult, ToSqlOutput, ValueRef},
};
use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime, macros::format_description};

use crate::{Error, database_id::TransactionId};

// ============================================================================
// MODELS
// ============================================================================

/// Whether money was earned or spent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    /// Money earned, e.g. a salary.
    Income,
    /// Money spent, e.g. groceries.
    Expense,
}

impl TransactionType {
    /// The lowercase name used in JSON and in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Income => "income",
            TransactionType::Expense => "expense",
        }
    }
}

impl Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(TransactionType::Income),
            "expense" => Ok(TransactionType::Expense),
            _ => Err(Error::InvalidTransactionType(s.to_owned())),
        }
    }
}

impl ToSql for TransactionType {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(ToSqlOutput::from(self.as_str()))
    }
}

impl FromSql for TransactionType {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        value
            .as_str()?
            .parse()
            .map_err(|error| FromSqlError::Other(Box::new(error)))
    }
}

/// An expense or income, i.e. an event where money was either spent or earned.
///
/// To create a new `Transaction`, use [Transaction::build] and add it to a
/// [crate::Ledger].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// The ID of the transaction, unique within the ledger.
    pub id: TransactionId,
    /// Whether the money was earned or spent.
    #[serde(rename = "type")]
    pub transaction_type: TransactionType,
    /// How much money was earned or spent, always positive.
    pub amount: f64,
    /// A text description of what the transaction was for.
    pub description: String,
    /// When the transaction happened.
    pub date: Date,
    /// When the transaction was recorded.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// The name of the person who recorded the transaction.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Transaction {
    /// Create a new transaction.
    ///
    /// Shortcut for [TransactionBuilder] for discoverability.
    pub fn build(
        transaction_type: TransactionType,
        amount: f64,
        description: &str,
    ) -> TransactionBuilder {
        TransactionBuilder {
            transaction_type,
            amount,
            description: description.to_owned(),
            date: None,
            user: None,
        }
    }
}

/// The ledger's ordering: newest first.
///
/// Transactions are sorted by `date` descending, ties are broken by
/// `created_at` descending and then by `id` descending.
pub(crate) fn newest_first(lhs: &Transaction, rhs: &Transaction) -> Ordering {
    rhs.date
        .cmp(&lhs.date)
        .then_with(|| rhs.created_at.cmp(&lhs.created_at))
        .then_with(|| rhs.id.cmp(&lhs.id))
}

/// A builder for creating [Transaction] instances.
///
/// The ID and creation time are assigned by the ledger when the transaction is
/// added.
///
/// # Examples
///
/// ```
/// use savings_tracker::{Transaction, TransactionType};
/// use time::macros::date;
///
/// let builder = Transaction::build(TransactionType::Expense, 45_000.0, "Groceries")
///     .date(date!(2025 - 01 - 15))
///     .user(Some("Citra".to_owned()));
///
/// assert_eq!(builder.date, Some(date!(2025 - 01 - 15)));
/// ```
#[derive(Debug, PartialEq, Clone)]
pub struct TransactionBuilder {
    /// Whether the money was earned or spent.
    pub transaction_type: TransactionType,

    /// The amount of money earned or spent.
    ///
    /// Must be a finite number greater than zero. The direction of the money is
    /// given by `transaction_type`, not by the sign of the amount.
    pub amount: f64,

    /// A human-readable description of the transaction.
    ///
    /// Must contain at least one non-whitespace character.
    pub description: String,

    /// The date when the transaction occurred.
    ///
    /// Defaults to today's date if not specified.
    pub date: Option<Date>,

    /// The name of the person recording the transaction.
    pub user: Option<String>,
}

impl TransactionBuilder {
    /// Set the date of the transaction.
    pub fn date(mut self, date: Date) -> Self {
        self.date = Some(date);
        self
    }

    /// Set the name of the person recording the transaction.
    pub fn user(mut self, user: Option<String>) -> Self {
        self.user = user;
        self
    }

    /// Check that the amount and description are valid.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::InvalidAmount] if the amount is not a finite, positive number,
    /// - or [Error::EmptyDescription] if the description is empty.
    pub fn validate(&self) -> Result<(), Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::InvalidAmount(self.amount));
        }

        if self.description.trim().is_empty() {
            return Err(Error::EmptyDescription);
        }

        Ok(())
    }

    /// Validate the builder and create the [Transaction].
    ///
    /// `today` is used when no date was set.
    pub(crate) fn finalize(
        self,
        id: TransactionId,
        today: Date,
        created_at: OffsetDateTime,
    ) -> Result<Transaction, Error> {
        self.validate()?;

        Ok(Transaction {
            id,
            transaction_type: self.transaction_type,
            amount: self.amount,
            description: self.description.trim().to_owned(),
            date: self.date.unwrap_or(today),
            created_at,
            user: self
                .user
                .map(|user| user.trim().to_owned())
                .filter(|user| !user.is_empty()),
        })
    }
}

/// Which transactions to show in a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TransactionFilter {
    /// Show every transaction.
    #[default]
    All,
    /// Only show income.
    Income,
    /// Only show expenses.
    Expense,
}

impl TransactionFilter {
    /// Whether `transaction` should be shown under this filter.
    pub fn matches(&self, transaction: &Transaction) -> bool {
        match self {
            TransactionFilter::All => true,
            TransactionFilter::Income => transaction.transaction_type == TransactionType::Income,
            TransactionFilter::Expense => transaction.transaction_type == TransactionType::Expense,
        }
    }
}

impl FromStr for TransactionFilter {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" => Ok(TransactionFilter::All),
            "income" => Ok(TransactionFilter::Income),
            "expense" => Ok(TransactionFilter::Expense),
            _ => Err(Error::InvalidFilter(s.to_owned())),
        }
    }
}

/// Parse a date in the format `YYYY-MM-DD`.
///
/// # Errors
/// Returns [Error::InvalidDate] if `text` is not a valid calendar date.
pub fn parse_date(text: &str) -> Result<Date, Error> {
    Date::parse(text.trim(), format_description!("[year]-[month]-[day]"))
        .map_err(|_| Error::InvalidDate(text.to_owned()))
}

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Create the transaction table in the database.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                id INTEGER PRIMARY KEY,
                type TEXT NOT NULL CHECK (type IN ('income', 'expense')),
                amount REAL NOT NULL CHECK (amount > 0),
                description TEXT NOT NULL,
                date TEXT NOT NULL,
                created_at TEXT NOT NULL,
                user TEXT
                )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_transaction_date_created_at
            ON \"transaction\"(date, created_at);",
        (),
    )?;

    Ok(())
}

/// Retrieve every transaction in the database, newest first.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error.
pub fn get_all_transactions(connection: &Connection) -> Result<Vec<Transaction>, Error> {
    connection
        .prepare(
            "SELECT id, type, amount, description, date, created_at, user FROM \"transaction\"
             ORDER BY date DESC, created_at DESC, id DESC",
        )?
        .query_map([], map_transaction_row)?
        .map(|maybe_transaction| maybe_transaction.map_err(Error::from))
        .collect()
}

/// Replace every transaction in the database with `transactions`.
///
/// This does not start a SQL transaction of its own, callers should run it
/// inside one so that a failed insert leaves the table unchanged.
///
/// # Errors
/// This function will return a [Error::SqlError] if there is some SQL error,
/// e.g. two transactions share an ID.
pub fn overwrite_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<(), Error> {
    connection.execute("DELETE FROM \"transaction\"", [])?;

    let mut statement = connection.prepare(
        "INSERT INTO \"transaction\" (id, type, amount, description, date, created_at, user)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for transaction in transactions {
        statement.execute((
            transaction.id,
            transaction.transaction_type,
            transaction.amount,
            &transaction.description,
            transaction.date,
            transaction.created_at,
            &transaction.user,
        ))?;
    }

    Ok(())
}

/// Map a database row to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        transaction_type: row.get(1)?,
        amount: row.get(2)?,
        description: row.get(3)?,
        date: row.get(4)?,
        created_at: row.get(5)?,
        user: row.get(6)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod model_tests {
    use std::cmp::Ordering;

    use time::{OffsetDateTime, macros::date};

    use crate::{
        Error,
        transaction::{
            Transaction, TransactionFilter, TransactionType, core::newest_first, parse_date,
        },
    };

    #[test]
    fn parses_transaction_types() {
        assert_eq!("income".parse(), Ok(TransactionType::Income));
        assert_eq!(" Expense ".parse(), Ok(TransactionType::Expense));
        assert_eq!(
            "transfer".parse::<TransactionType>(),
            Err(Error::InvalidTransactionType("transfer".to_owned()))
        );
    }

    #[test]
    fn parses_filters() {
        assert_eq!("all".parse(), Ok(TransactionFilter::All));
        assert_eq!("income".parse(), Ok(TransactionFilter::Income));
        assert_eq!("EXPENSE".parse(), Ok(TransactionFilter::Expense));
        assert_eq!(
            "savings".parse::<TransactionFilter>(),
            Err(Error::InvalidFilter("savings".to_owned()))
        );
    }

    #[test]
    fn parses_dates() {
        assert_eq!(parse_date("2025-10-05"), Ok(date!(2025 - 10 - 05)));
        assert_eq!(
            parse_date("2025-02-30"),
            Err(Error::InvalidDate("2025-02-30".to_owned()))
        );
        assert_eq!(
            parse_date("yesterday"),
            Err(Error::InvalidDate("yesterday".to_owned()))
        );
    }

    #[test]
    fn finalize_rejects_non_positive_amounts() {
        let now = OffsetDateTime::now_utc();

        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let result = Transaction::build(TransactionType::Income, amount, "Salary").finalize(
                1,
                now.date(),
                now,
            );

            assert!(
                matches!(result, Err(Error::InvalidAmount(_))),
                "want InvalidAmount for {amount}, got {result:?}"
            );
        }
    }

    #[test]
    fn finalize_rejects_blank_description() {
        let now = OffsetDateTime::now_utc();

        let result =
            Transaction::build(TransactionType::Expense, 10.0, "   ").finalize(1, now.date(), now);

        assert_eq!(result, Err(Error::EmptyDescription));
    }

    #[test]
    fn finalize_defaults_date_to_today() {
        let now = OffsetDateTime::now_utc();
        let today = date!(2025 - 10 - 05);

        let transaction = Transaction::build(TransactionType::Expense, 10.0, " Coffee ")
            .user(Some("  ".to_owned()))
            .finalize(7, today, now)
            .unwrap();

        assert_eq!(transaction.id, 7);
        assert_eq!(transaction.date, today);
        assert_eq!(transaction.description, "Coffee");
        assert_eq!(transaction.user, None);
    }

    #[test]
    fn orders_by_date_then_creation_time() {
        let now = OffsetDateTime::now_utc();
        let older = Transaction::build(TransactionType::Income, 1.0, "a")
            .date(date!(2025 - 01 - 01))
            .finalize(1, now.date(), now)
            .unwrap();
        let newer = Transaction::build(TransactionType::Income, 1.0, "b")
            .date(date!(2025 - 01 - 02))
            .finalize(2, now.date(), now)
            .unwrap();
        let same_day_later = Transaction::build(TransactionType::Income, 1.0, "c")
            .date(date!(2025 - 01 - 02))
            .finalize(3, now.date(), now + time::Duration::seconds(1))
            .unwrap();

        assert_eq!(newest_first(&newer, &older), Ordering::Less);
        assert_eq!(newest_first(&same_day_later, &newer), Ordering::Less);
        assert_eq!(newest_first(&older, &same_day_later), Ordering::Greater);
    }

    #[test]
    fn serializes_with_type_and_camel_case_fields() {
        let created_at = OffsetDateTime::from_unix_timestamp(1_735_689_600).unwrap();
        let transaction = Transaction::build(TransactionType::Income, 600_000.0, "Salary")
            .date(date!(2025 - 01 - 01))
            .finalize(1, date!(2025 - 01 - 01), created_at)
            .unwrap();

        let json = serde_json::to_value(&transaction).unwrap();

        assert_eq!(json["type"], "income");
        assert_eq!(json["date"], "2025-01-01");
        assert_eq!(json["createdAt"], "2025-01-01T00:00:00Z");
        assert!(json.get("user").is_none());
    }
}
