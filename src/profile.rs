//! Personalized content for the people sharing the ledger.

use std::{collections::HashMap, fs, path::Path, sync::Arc};

use axum::{
    extract::{Path as UrlPath, State},
    response::Response,
};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::{Error, response::success, transaction::TransactionType};

/// Replaced with the kind of transaction in [Profile::added_message].
const TRANSACTION_KIND_PLACEHOLDER: &str = "{kind}";

/// The personalized text shown to one user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// The line shown under the app's title.
    pub subtitle: String,
    /// Example descriptions shown in the empty description input.
    pub description_placeholder: String,
    /// The heading for the list of tips.
    pub tips_title: String,
    /// Saving tips for this user.
    pub tips: Vec<String>,
    /// The heading of the savings target form.
    pub target_title: String,
    /// The text explaining the savings target form.
    pub target_description: String,
    /// The message shown after a transaction is added. `{kind}` is replaced
    /// with "pemasukan" for income or "pengeluaran" for expenses.
    pub added_message: String,
    /// The message shown once the savings target has been reached.
    pub celebration: String,
}

impl Profile {
    /// The message to show after adding a transaction of `transaction_type`.
    pub fn added_message_for(&self, transaction_type: TransactionType) -> String {
        let kind = match transaction_type {
            TransactionType::Income => "pemasukan",
            TransactionType::Expense => "pengeluaran",
        };

        self.added_message.replace(TRANSACTION_KIND_PLACEHOLDER, kind)
    }
}

/// Maps user names to their [Profile], falling back to a generic profile for
/// unknown users.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDirectory {
    /// The profiles keyed by user name.
    #[serde(default)]
    pub profiles: HashMap<String, Profile>,
    /// The profile for users without an entry in `profiles`.
    pub fallback: Profile,
}

impl ProfileDirectory {
    /// The profiles for Rasya and Citra.
    pub fn built_in() -> Self {
        let profiles = HashMap::from([
            (
                "Rasya".to_owned(),
                Profile {
                    subtitle: "Semangat menabung untuk masa depan yang cerah! 💪".to_owned(),
                    description_placeholder: "Contoh: Gaji Rasya, Beli kopi, Transfer ke Citra"
                        .to_owned(),
                    tips_title: "💡 Tips Khusus untuk Rasya:".to_owned(),
                    tips: vec![
                        "Sisihkan 25% dari gaji untuk tabungan bersama".to_owned(),
                        "Catat pengeluaran harian di aplikasi ini".to_owned(),
                        "Diskusikan rencana keuangan dengan Citra".to_owned(),
                        "Rayakan setiap pencapaian target kecil".to_owned(),
                    ],
                    target_title: "🎯 Target Tabungan Rasya".to_owned(),
                    target_description:
                        "Tentukan target yang ingin kamu capai untuk masa depan bersama Citra"
                            .to_owned(),
                    added_message: "✨ Keren Rasya! Transaksi {kind} berhasil ditambahkan!"
                        .to_owned(),
                    celebration: "🎉 Mantap Rasya!".to_owned(),
                },
            ),
            (
                "Citra".to_owned(),
                Profile {
                    subtitle: "Yuk wujudkan impian kita bersama-sama! ✨".to_owned(),
                    description_placeholder:
                        "Contoh: Gaji Citra, Belanja bulanan, Tabungan bersama".to_owned(),
                    tips_title: "💡 Tips Khusus untuk Citra:".to_owned(),
                    tips: vec![
                        "Buat budget belanja bulanan yang realistis".to_owned(),
                        "Sisihkan uang receh untuk tabungan darurat".to_owned(),
                        "Komunikasi terbuka dengan Rasya tentang keuangan".to_owned(),
                        "Investasi kecil untuk masa depan bersama".to_owned(),
                    ],
                    target_title: "🎯 Target Tabungan Citra".to_owned(),
                    target_description:
                        "Atur target tabungan yang ingin kita wujudkan bersama Rasya".to_owned(),
                    added_message: "🎉 Hebat Citra! Transaksi {kind} sudah tercatat!".to_owned(),
                    celebration: "🎉 Keren Citra!".to_owned(),
                },
            ),
        ]);

        let fallback = Profile {
            subtitle: "Mari wujudkan impian bersama, satu langkah pada satu waktu ✨".to_owned(),
            description_placeholder: "Contoh: Gaji bulanan, Beli makan".to_owned(),
            tips_title: "💡 Tips Menabung:".to_owned(),
            tips: vec![
                "Catat setiap pemasukan dan pengeluaran".to_owned(),
                "Tetapkan target yang realistis".to_owned(),
            ],
            target_title: "🎯 Target Tabungan".to_owned(),
            target_description: "Tentukan target tabungan yang ingin dicapai bersama".to_owned(),
            added_message: "✨ Transaksi {kind} berhasil ditambahkan!".to_owned(),
            celebration: "🎉 Target Tercapai!".to_owned(),
        };

        Self { profiles, fallback }
    }

    /// Load a profile directory from a JSON file shaped like
    /// `{"profiles": {"<name>": Profile, ...}, "fallback": Profile}`.
    ///
    /// # Errors
    /// Returns [Error::StorageError] if the file cannot be read, or
    /// [Error::JSONSerializationError] if it is not a valid profile directory.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;

        Ok(serde_json::from_str(&text)?)
    }

    /// Get the profile for `name`, or the fallback profile if there is none.
    pub fn lookup(&self, name: &str) -> &Profile {
        self.profiles.get(name.trim()).unwrap_or(&self.fallback)
    }
}

impl Default for ProfileDirectory {
    fn default() -> Self {
        Self::built_in()
    }
}

/// A route handler for getting a user's profile.
pub async fn get_profile_endpoint(
    State(profiles): State<Arc<ProfileDirectory>>,
    UrlPath(name): UrlPath<String>,
) -> Response {
    tracing::debug!("Looking up profile for {name}");
    success(json!({ "data": profiles.lookup(&name) }))
}
