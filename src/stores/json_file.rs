//! Implements a ledger store that keeps each value in its own JSON file.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use serde::{Serialize, de::DeserializeOwned};

use crate::{Error, database_id::TransactionId, stores::LedgerStore, transaction::Transaction};

const TRANSACTIONS_FILE: &str = "transactions.json";
const TARGET_FILE: &str = "target.json";
const NEXT_ID_FILE: &str = "next_id.json";
const TMP_SUFFIX: &str = "tmp";

/// Stores the ledger as JSON files in a directory on the local machine.
///
/// The transactions are kept in `transactions.json`, the target in
/// `target.json` and the ID for the next transaction in `next_id.json`. A
/// missing file is treated as an empty ledger or an unset value.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    /// Create a store in the directory `root`, creating the directory if
    /// needed.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the directory cannot be created.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, Error> {
        let root = root.into();
        fs::create_dir_all(&root)?;

        Ok(Self { root })
    }

    /// The directory the files are stored in.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read<T: DeserializeOwned>(&self, file_name: &str) -> Result<Option<T>, Error> {
        let path = self.root.join(file_name);

        if !path.exists() {
            return Ok(None);
        }

        let data = fs::read_to_string(&path)?;

        Ok(Some(serde_json::from_str(&data)?))
    }

    fn write<T: Serialize + ?Sized>(&self, file_name: &str, value: &T) -> Result<(), Error> {
        let data = serde_json::to_string_pretty(value)?;

        write_atomic(&self.root.join(file_name), &data)
    }
}

impl LedgerStore for JsonFileStore {
    fn load_transactions(&self) -> Result<Vec<Transaction>, Error> {
        Ok(self.read(TRANSACTIONS_FILE)?.unwrap_or_default())
    }

    fn load_next_id(&self) -> Result<Option<TransactionId>, Error> {
        self.read(NEXT_ID_FILE)
    }

    /// The next ID is written first, a failure between the two writes can only
    /// leave a gap in the IDs.
    fn save_transactions(
        &mut self,
        transactions: &[Transaction],
        next_id: TransactionId,
    ) -> Result<(), Error> {
        self.write(NEXT_ID_FILE, &next_id)?;
        self.write(TRANSACTIONS_FILE, transactions)
    }

    fn load_target(&self) -> Result<Option<f64>, Error> {
        self.read(TARGET_FILE)
    }

    fn save_target(&mut self, target: f64) -> Result<(), Error> {
        self.write(TARGET_FILE, &target)
    }
}

/// Write `data` to a temporary file next to `path` and then move it into
/// place, so a failed write never leaves a half written file behind.
fn write_atomic(path: &Path, data: &str) -> Result<(), Error> {
    let tmp_path = path.with_extension(TMP_SUFFIX);

    let mut file = File::create(&tmp_path)?;
    file.write_all(data.as_bytes())?;
    file.sync_all()?;

    fs::rename(&tmp_path, path)?;

    Ok(())
}
