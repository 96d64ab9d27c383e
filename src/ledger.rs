//! The ledger: the transactions, the savings target, and the summary derived
//! from them.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::{
    Error,
    database_id::TransactionId,
    stores::LedgerStore,
    transaction::{Transaction, TransactionBuilder, TransactionFilter, TransactionType, newest_first},
};

/// The savings target used until the user sets one.
pub const DEFAULT_TARGET: f64 = 50_000_000.0;

/// The totals and the progress towards the savings target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// The sum of all income.
    pub total_income: f64,
    /// The sum of all expenses.
    pub total_expense: f64,
    /// Income minus expenses, may be negative.
    pub balance: f64,
    /// The savings target the progress is measured against.
    pub target: f64,
    /// The balance as a percentage of the target, between 0 and 100.
    pub progress_percent: f64,
    /// Whether the balance has reached the target.
    pub target_reached: bool,
}

impl Summary {
    /// Compute the summary of `transactions` against `target`.
    ///
    /// A target that is zero, negative or not finite gives a progress of 0
    /// instead of a division error.
    pub fn new<'a>(transactions: impl IntoIterator<Item = &'a Transaction>, target: f64) -> Self {
        let (total_income, total_expense) =
            transactions
                .into_iter()
                .fold((0.0, 0.0), |(income, expense), transaction| {
                    match transaction.transaction_type {
                        TransactionType::Income => (income + transaction.amount, expense),
                        TransactionType::Expense => (income, expense + transaction.amount),
                    }
                });

        let balance = total_income - total_expense;
        let progress_percent = progress_percent(balance, target);

        Self {
            total_income,
            total_expense,
            balance,
            target,
            progress_percent,
            target_reached: balance >= target && progress_percent >= 100.0,
        }
    }
}

fn progress_percent(balance: f64, target: f64) -> f64 {
    if !target.is_finite() || target <= 0.0 {
        return 0.0;
    }

    let percent = balance * 100.0 / target;

    if percent.is_nan() {
        0.0
    } else {
        percent.clamp(0.0, 100.0)
    }
}

/// The transactions and savings target of one household.
///
/// The ledger is loaded in full from a [LedgerStore] and every change is
/// written back to the store before it is applied in memory. If the store
/// fails, the ledger is left unchanged.
///
/// Transactions are kept newest first, see [Ledger::transactions].
#[derive(Debug)]
pub struct Ledger<S> {
    store: S,
    transactions: Vec<Transaction>,
    target: f64,
    next_id: TransactionId,
}

impl<S: LedgerStore> Ledger<S> {
    /// Load the transactions and the target from `store`.
    ///
    /// The target falls back to [DEFAULT_TARGET] if it has never been set.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read.
    pub fn load(store: S) -> Result<Self, Error> {
        let mut ledger = Self {
            store,
            transactions: Vec::new(),
            target: DEFAULT_TARGET,
            next_id: 1,
        };

        ledger.reload()?;

        Ok(ledger)
    }

    /// Discard the in-memory state and read everything from the store again.
    ///
    /// IDs handed out before, including those of deleted transactions, are not
    /// reused.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read, the ledger is unchanged in
    /// that case.
    pub fn reload(&mut self) -> Result<(), Error> {
        let mut transactions = self.store.load_transactions()?;
        let target = self.store.load_target()?.unwrap_or(DEFAULT_TARGET);
        let stored_next_id = self.store.load_next_id()?.unwrap_or(1);

        transactions.sort_by(newest_first);

        let after_last_id = transactions
            .iter()
            .map(|transaction| transaction.id + 1)
            .max()
            .unwrap_or(1);

        tracing::debug!(
            "Loaded {} transactions with a target of {target}",
            transactions.len()
        );

        self.next_id = self.next_id.max(after_last_id).max(stored_next_id);
        self.transactions = transactions;
        self.target = target;

        Ok(())
    }

    /// Add a new transaction to the ledger.
    ///
    /// The transaction is dated today (UTC) if the builder has no date, use
    /// [Ledger::add_transaction_on] to supply the local date instead.
    ///
    /// # Errors
    /// Returns a validation error if the amount or description is invalid, or
    /// a persistence error if the store cannot be written. Nothing is added in
    /// either case.
    pub fn add_transaction(&mut self, builder: TransactionBuilder) -> Result<Transaction, Error> {
        self.add_transaction_on(builder, OffsetDateTime::now_utc().date())
    }

    /// Add a new transaction to the ledger, dated `today` if the builder has
    /// no date.
    ///
    /// # Errors
    /// Returns a validation error if the amount or description is invalid, or
    /// a persistence error if the store cannot be written. Nothing is added in
    /// either case.
    pub fn add_transaction_on(
        &mut self,
        builder: TransactionBuilder,
        today: Date,
    ) -> Result<Transaction, Error> {
        let transaction = builder.finalize(self.next_id, today, OffsetDateTime::now_utc())?;

        let position = self
            .transactions
            .partition_point(|existing| newest_first(existing, &transaction) == Ordering::Less);

        let mut transactions = self.transactions.clone();
        transactions.insert(position, transaction.clone());

        self.store.save_transactions(&transactions, self.next_id + 1)?;

        self.transactions = transactions;
        self.next_id += 1;

        tracing::info!(
            "Added {} transaction {} of {}",
            transaction.transaction_type,
            transaction.id,
            transaction.amount
        );

        Ok(transaction)
    }

    /// Remove the transaction with the ID `id`.
    ///
    /// Returns `false` if there is no such transaction, nothing is written to
    /// the store in that case.
    ///
    /// # Errors
    /// Returns a persistence error if the store cannot be written, the
    /// transaction is kept in that case.
    pub fn delete_transaction(&mut self, id: TransactionId) -> Result<bool, Error> {
        let Some(position) = self
            .transactions
            .iter()
            .position(|transaction| transaction.id == id)
        else {
            tracing::debug!("Tried to delete transaction {id} which is not in the ledger");
            return Ok(false);
        };

        let mut transactions = self.transactions.clone();
        transactions.remove(position);

        self.store.save_transactions(&transactions, self.next_id)?;
        self.transactions = transactions;

        tracing::info!("Deleted transaction {id}");

        Ok(true)
    }

    /// Replace the savings target.
    ///
    /// # Errors
    /// Returns [Error::InvalidTarget] if `target` is not a finite, positive
    /// number, or a persistence error if the store cannot be written. The
    /// target is unchanged in either case.
    pub fn set_target(&mut self, target: f64) -> Result<(), Error> {
        if !target.is_finite() || target <= 0.0 {
            return Err(Error::InvalidTarget(target));
        }

        self.store.save_target(target)?;
        self.target = target;

        tracing::info!("Set the savings target to {target}");

        Ok(())
    }

    /// The totals and the progress towards the target.
    pub fn compute_summary(&self) -> Summary {
        Summary::new(&self.transactions, self.target)
    }

    /// The transactions matching `filter`, newest first.
    pub fn filter_by_type(
        &self,
        filter: TransactionFilter,
    ) -> impl Iterator<Item = &Transaction> + '_ {
        self.transactions
            .iter()
            .filter(move |transaction| filter.matches(transaction))
    }
}

impl<S> Ledger<S> {
    /// All transactions sorted by date, newest first. Transactions on the same
    /// date are sorted by when they were recorded, newest first.
    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Get the transaction with the ID `id`.
    pub fn get_transaction(&self, id: TransactionId) -> Option<&Transaction> {
        self.transactions
            .iter()
            .find(|transaction| transaction.id == id)
    }

    /// The savings target.
    pub fn target(&self) -> f64 {
        self.target
    }

    /// The store the ledger is persisted to.
    pub fn store(&self) -> &S {
        &self.store
    }
}

#[cfg(test)]
mod tests {
    use rusqlite::Connection;
    use tempfile::TempDir;
    use time::macros::date;

    use crate::{
        Error,
        database_id::TransactionId,
        ledger::{DEFAULT_TARGET, Ledger, Summary},
        stores::{JsonFileStore, LedgerStore, SQLiteStore},
        transaction::{Transaction, TransactionFilter, TransactionType},
    };

    fn get_test_ledger() -> Ledger<SQLiteStore> {
        let store = SQLiteStore::new(Connection::open_in_memory().unwrap()).unwrap();
        Ledger::load(store).unwrap()
    }

    fn add(ledger: &mut Ledger<SQLiteStore>, transaction_type: TransactionType, amount: f64) {
        ledger
            .add_transaction(Transaction::build(transaction_type, amount, "test"))
            .unwrap();
    }

    /// A store that can be read but never written.
    #[derive(Debug, Default)]
    struct ReadOnlyStore;

    impl LedgerStore for ReadOnlyStore {
        fn load_transactions(&self) -> Result<Vec<Transaction>, Error> {
            Ok(Vec::new())
        }

        fn load_next_id(&self) -> Result<Option<TransactionId>, Error> {
            Ok(None)
        }

        fn save_transactions(&mut self, _: &[Transaction], _: TransactionId) -> Result<(), Error> {
            Err(Error::StorageError("read only".to_owned()))
        }

        fn load_target(&self) -> Result<Option<f64>, Error> {
            Ok(None)
        }

        fn save_target(&mut self, _: f64) -> Result<(), Error> {
            Err(Error::StorageError("read only".to_owned()))
        }
    }

    #[test]
    fn new_ledger_is_empty_with_default_target() {
        let ledger = get_test_ledger();

        assert!(ledger.transactions().is_empty());
        assert_eq!(ledger.target(), DEFAULT_TARGET);
        assert_eq!(
            ledger.compute_summary(),
            Summary {
                total_income: 0.0,
                total_expense: 0.0,
                balance: 0.0,
                target: DEFAULT_TARGET,
                progress_percent: 0.0,
                target_reached: false,
            }
        );
    }

    #[test]
    fn balance_is_income_minus_expense() {
        let mut ledger = get_test_ledger();
        add(&mut ledger, TransactionType::Income, 1_250.5);
        add(&mut ledger, TransactionType::Expense, 300.25);
        add(&mut ledger, TransactionType::Income, 49.75);
        add(&mut ledger, TransactionType::Expense, 1_500.0);

        let summary = ledger.compute_summary();

        assert_eq!(summary.total_income, 1_300.25);
        assert_eq!(summary.total_expense, 1_800.25);
        assert_eq!(summary.total_income - summary.total_expense, summary.balance);
        assert_eq!(summary.balance, -500.0);
        assert_eq!(summary.progress_percent, 0.0);
    }

    #[test]
    fn equal_income_and_expense_leave_balance_unchanged() {
        let mut ledger = get_test_ledger();
        add(&mut ledger, TransactionType::Income, 2_000.0);
        let before = ledger.compute_summary().balance;

        add(&mut ledger, TransactionType::Income, 750.0);
        add(&mut ledger, TransactionType::Expense, 750.0);

        assert_eq!(ledger.compute_summary().balance, before);
    }

    #[test]
    fn progress_is_capped_at_100() {
        let mut ledger = get_test_ledger();
        ledger.set_target(100.0).unwrap();
        add(&mut ledger, TransactionType::Income, 1_000_000.0);

        let summary = ledger.compute_summary();

        assert_eq!(summary.progress_percent, 100.0);
        assert!(summary.target_reached);
    }

    #[test]
    fn progress_stays_within_bounds() {
        let target = 1_000.0;
        let amounts = [0.5, 10.0, 999.0, 1_000.0, 5_000.0, 1e12];

        for amount in amounts {
            for transaction_type in [TransactionType::Income, TransactionType::Expense] {
                let mut ledger = get_test_ledger();
                ledger.set_target(target).unwrap();
                add(&mut ledger, transaction_type, amount);

                let progress = ledger.compute_summary().progress_percent;

                assert!(
                    (0.0..=100.0).contains(&progress),
                    "progress {progress} out of bounds for {transaction_type} of {amount}"
                );
            }
        }
    }

    #[test]
    fn savings_scenario() {
        let mut ledger = get_test_ledger();
        ledger.set_target(1_000_000.0).unwrap();

        add(&mut ledger, TransactionType::Income, 600_000.0);
        let summary = ledger.compute_summary();
        assert_eq!(summary.balance, 600_000.0);
        assert_eq!(summary.progress_percent, 60.0);
        assert!(!summary.target_reached);

        add(&mut ledger, TransactionType::Expense, 100_000.0);
        let summary = ledger.compute_summary();
        assert_eq!(summary.balance, 500_000.0);
        assert_eq!(summary.progress_percent, 50.0);
        assert!(!summary.target_reached);

        add(&mut ledger, TransactionType::Income, 500_000.0);
        let summary = ledger.compute_summary();
        assert_eq!(summary.balance, 1_000_000.0);
        assert_eq!(summary.progress_percent, 100.0);
        assert!(summary.target_reached);
    }

    #[test]
    fn zero_target_gives_zero_progress() {
        let transactions = [Transaction::build(TransactionType::Income, 500.0, "Gift")
            .finalize(1, date!(2025 - 01 - 01), time::OffsetDateTime::now_utc())
            .unwrap()];

        let summary = Summary::new(&transactions, 0.0);

        assert_eq!(summary.balance, 500.0);
        assert_eq!(summary.progress_percent, 0.0);
        assert!(!summary.target_reached);
    }

    #[test]
    fn summary_is_idempotent() {
        let mut ledger = get_test_ledger();
        add(&mut ledger, TransactionType::Income, 10.0);
        add(&mut ledger, TransactionType::Expense, 3.0);

        assert_eq!(ledger.compute_summary(), ledger.compute_summary());
    }

    #[test]
    fn delete_unknown_id_returns_false() {
        let mut ledger = get_test_ledger();
        add(&mut ledger, TransactionType::Income, 10.0);
        add(&mut ledger, TransactionType::Expense, 3.0);
        let before = ledger.compute_summary();

        let deleted = ledger.delete_transaction(42).unwrap();

        assert!(!deleted);
        assert_eq!(ledger.compute_summary(), before);
        assert_eq!(ledger.transactions().len(), 2);
    }

    #[test]
    fn delete_removes_transaction() {
        let mut ledger = get_test_ledger();
        let transaction = ledger
            .add_transaction(Transaction::build(TransactionType::Expense, 3.0, "Coffee"))
            .unwrap();

        let deleted = ledger.delete_transaction(transaction.id).unwrap();

        assert!(deleted);
        assert_eq!(ledger.get_transaction(transaction.id), None);
        assert_eq!(ledger.compute_summary().total_expense, 0.0);
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let mut ledger = get_test_ledger();
        let first = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 1.0, "a"))
            .unwrap();
        ledger.delete_transaction(first.id).unwrap();

        let second = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 1.0, "b"))
            .unwrap();

        assert_ne!(first.id, second.id);
    }

    #[test]
    fn ids_are_not_reused_after_restart_with_json_files() {
        let dir = TempDir::new().unwrap();
        let mut ledger = Ledger::load(JsonFileStore::new(dir.path()).unwrap()).unwrap();
        ledger
            .add_transaction(Transaction::build(TransactionType::Income, 1.0, "a"))
            .unwrap();
        let newest = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 1.0, "b"))
            .unwrap();
        ledger.delete_transaction(newest.id).unwrap();
        drop(ledger);

        let mut ledger = Ledger::load(JsonFileStore::new(dir.path()).unwrap()).unwrap();
        let after_restart = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 1.0, "c"))
            .unwrap();

        assert_ne!(after_restart.id, newest.id);
        assert!(after_restart.id > newest.id);
    }

    #[test]
    fn ids_are_not_reused_after_restart_with_sqlite() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("ledger.db");
        let open = || Ledger::load(SQLiteStore::new(Connection::open(&db_path).unwrap()).unwrap());
        let mut ledger = open().unwrap();
        let only = ledger
            .add_transaction(Transaction::build(TransactionType::Expense, 1.0, "a"))
            .unwrap();
        ledger.delete_transaction(only.id).unwrap();
        drop(ledger);

        let mut ledger = open().unwrap();
        let after_restart = ledger
            .add_transaction(Transaction::build(TransactionType::Expense, 1.0, "b"))
            .unwrap();

        assert!(after_restart.id > only.id);
    }

    #[test]
    fn invalid_transaction_is_not_added() {
        let mut ledger = get_test_ledger();

        let result =
            ledger.add_transaction(Transaction::build(TransactionType::Income, -5.0, "Refund"));

        assert_eq!(result, Err(Error::InvalidAmount(-5.0)));
        assert!(ledger.transactions().is_empty());
    }

    #[test]
    fn set_target_rejects_invalid_values() {
        let mut ledger = get_test_ledger();

        for target in [0.0, -10.0, f64::INFINITY] {
            assert_eq!(ledger.set_target(target), Err(Error::InvalidTarget(target)));
        }

        assert_eq!(ledger.target(), DEFAULT_TARGET);
    }

    #[test]
    fn transactions_are_sorted_newest_first() {
        let mut ledger = get_test_ledger();
        for (description, date) in [
            ("middle", date!(2025 - 02 - 01)),
            ("oldest", date!(2025 - 01 - 01)),
            ("newest", date!(2025 - 03 - 01)),
            ("newest, added later", date!(2025 - 03 - 01)),
        ] {
            ledger
                .add_transaction(
                    Transaction::build(TransactionType::Income, 1.0, description).date(date),
                )
                .unwrap();
        }

        let descriptions: Vec<_> = ledger
            .transactions()
            .iter()
            .map(|transaction| transaction.description.as_str())
            .collect();

        assert_eq!(
            descriptions,
            vec!["newest, added later", "newest", "middle", "oldest"]
        );
    }

    #[test]
    fn filter_by_type_preserves_order() {
        let mut ledger = get_test_ledger();
        for (transaction_type, date) in [
            (TransactionType::Income, date!(2025 - 01 - 01)),
            (TransactionType::Expense, date!(2025 - 01 - 02)),
            (TransactionType::Expense, date!(2025 - 01 - 03)),
            (TransactionType::Income, date!(2025 - 01 - 04)),
            (TransactionType::Expense, date!(2025 - 01 - 05)),
        ] {
            ledger
                .add_transaction(Transaction::build(transaction_type, 1.0, "test").date(date))
                .unwrap();
        }

        let income: Vec<_> = ledger.filter_by_type(TransactionFilter::Income).collect();

        assert_eq!(income.len(), 2);
        assert!(
            income
                .iter()
                .all(|transaction| transaction.transaction_type == TransactionType::Income)
        );
        assert_eq!(income[0].date, date!(2025 - 01 - 04));
        assert_eq!(income[1].date, date!(2025 - 01 - 01));
        assert_eq!(ledger.filter_by_type(TransactionFilter::All).count(), 5);
        assert_eq!(ledger.filter_by_type(TransactionFilter::Expense).count(), 3);
    }

    #[test]
    fn changes_are_persisted_to_the_store() {
        let mut ledger = get_test_ledger();
        ledger.set_target(1_000.0).unwrap();
        let kept = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 10.0, "kept"))
            .unwrap();
        let deleted = ledger
            .add_transaction(Transaction::build(TransactionType::Income, 20.0, "deleted"))
            .unwrap();
        ledger.delete_transaction(deleted.id).unwrap();

        let stored_transactions = ledger.store().load_transactions().unwrap();
        let stored_target = ledger.store().load_target().unwrap();

        assert_eq!(stored_transactions, vec![kept]);
        assert_eq!(stored_target, Some(1_000.0));
    }

    #[test]
    fn reload_reads_the_store_again() {
        let mut ledger = get_test_ledger();
        add(&mut ledger, TransactionType::Income, 10.0);

        ledger.reload().unwrap();

        assert_eq!(ledger.transactions().len(), 1);
        assert_eq!(ledger.compute_summary().total_income, 10.0);
    }

    #[test]
    fn failed_writes_leave_the_ledger_unchanged() {
        let mut ledger = Ledger::load(ReadOnlyStore).unwrap();

        let add_result =
            ledger.add_transaction(Transaction::build(TransactionType::Income, 10.0, "Salary"));
        let target_result = ledger.set_target(1_000.0);

        assert_eq!(
            add_result,
            Err(Error::StorageError("read only".to_owned()))
        );
        assert_eq!(
            target_result,
            Err(Error::StorageError("read only".to_owned()))
        );
        assert!(ledger.transactions().is_empty());
        assert_eq!(ledger.target(), DEFAULT_TARGET);
    }
}
