use std::{error::Error, path::PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use savings_tracker::{
    JsonFileStore, Ledger, ProfileDirectory, Transaction, TransactionFilter, TransactionId,
    TransactionType, format_currency, parse_date,
};

/// Keep track of income and expenses against a savings target.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// The directory the ledger is stored in.
    #[arg(long, default_value = "savings-data")]
    data_dir: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Record a new transaction.
    Add {
        /// Either "income" or "expense".
        transaction_type: TransactionType,
        /// The amount of money, must be positive.
        amount: f64,
        /// Text detailing the transaction.
        description: String,
        /// The date of the transaction as YYYY-MM-DD, defaults to today.
        #[arg(long)]
        date: Option<String>,
        /// The name of the person recording the transaction.
        #[arg(long)]
        user: Option<String>,
    },
    /// Delete the transaction with the given ID.
    Delete {
        /// The ID shown by `list`.
        id: TransactionId,
    },
    /// List the transactions, newest first.
    List {
        /// One of "all", "income" or "expense".
        #[arg(long, default_value = "all")]
        filter: TransactionFilter,
    },
    /// Show the totals and the progress towards the savings target.
    Summary,
    /// Replace the savings target.
    SetTarget {
        /// The new target, must be positive.
        target: f64,
    },
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let store = JsonFileStore::new(&args.data_dir)?;
    let mut ledger = Ledger::load(store)?;

    match args.command {
        Command::Add {
            transaction_type,
            amount,
            description,
            date,
            user,
        } => {
            let mut builder = Transaction::build(transaction_type, amount, &description).user(user);

            if let Some(date) = date {
                builder = builder.date(parse_date(&date)?);
            }

            let transaction = ledger.add_transaction(builder)?;
            let profiles = ProfileDirectory::built_in();
            let profile = profiles.lookup(transaction.user.as_deref().unwrap_or_default());

            println!("{}", profile.added_message_for(transaction.transaction_type));
            println!(
                "Added {} #{}: {}",
                transaction.transaction_type,
                transaction.id,
                format_currency(transaction.amount)
            );
        }
        Command::Delete { id } => {
            if ledger.delete_transaction(id)? {
                println!("Deleted transaction #{id}");
            } else {
                return Err(format!("transaction #{id} not found").into());
            }
        }
        Command::List { filter } => {
            for transaction in ledger.filter_by_type(filter) {
                let sign = match transaction.transaction_type {
                    TransactionType::Income => "+",
                    TransactionType::Expense => "-",
                };

                println!(
                    "#{:<4} {} {sign}{:>16}  {}{}",
                    transaction.id,
                    transaction.date,
                    format_currency(transaction.amount),
                    transaction.description,
                    transaction
                        .user
                        .as_ref()
                        .map(|user| format!(" ({user})"))
                        .unwrap_or_default()
                );
            }
        }
        Command::Summary => {
            let summary = ledger.compute_summary();

            println!("Income:   {}", format_currency(summary.total_income));
            println!("Expenses: {}", format_currency(summary.total_expense));
            println!("Balance:  {}", format_currency(summary.balance));
            println!("Target:   {}", format_currency(summary.target));
            println!("Progress: {:.1}%", summary.progress_percent);

            if summary.target_reached {
                println!("Target reached!");
            }
        }
        Command::SetTarget { target } => {
            ledger.set_target(target)?;
            println!("Target set to {}", format_currency(target));
        }
    }

    Ok(())
}
